use std::path::PathBuf;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/todos/";
pub const DEFAULT_LOG_FILE: &str = "todo-board.log";

#[derive(Debug, Clone)]
pub struct Config {
    /// Collection endpoint; item URLs are this plus the task id.
    pub base_url: Url,
    pub log_file: PathBuf,
}

impl Config {
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
