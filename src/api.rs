//! HTTP client for the remote task collection.
//!
//! `GET <base>` lists tasks, `POST <base>` creates one, and
//! `PUT`/`DELETE <base><id>` replace or remove a single task.

use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::task::{Draft, Task, TaskId};

#[derive(Debug, Clone)]
pub struct TaskApi {
    client: Client,
    base_url: Url,
}

impl TaskApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn item_url(&self, id: TaskId) -> Result<Url> {
        Ok(self.base_url.join(&id.to_string())?)
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        let url = self.base_url.clone();
        let response = self.client.get(url.clone()).send().await?;
        let tasks: Vec<Task> = success("GET", url, response)?.json().await?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    pub async fn create(&self, draft: &Draft) -> Result<()> {
        let url = self.base_url.clone();
        let response = self.client.post(url.clone()).json(draft).send().await?;
        success("POST", url, response)?;
        debug!(title = %draft.title, "created task");
        Ok(())
    }

    /// Replaces the whole remote record with `task`.
    pub async fn update(&self, task: &Task) -> Result<()> {
        let url = self.item_url(task.id)?;
        let response = self.client.put(url.clone()).json(task).send().await?;
        success("PUT", url, response)?;
        debug!(id = %task.id, status = %task.status, "updated task");
        Ok(())
    }

    pub async fn delete(&self, id: TaskId) -> Result<()> {
        let url = self.item_url(id)?;
        let response = self.client.delete(url.clone()).send().await?;
        success("DELETE", url, response)?;
        debug!(%id, "deleted task");
        Ok(())
    }
}

fn success(method: &'static str, url: Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            method,
            url,
            status,
        })
    }
}
