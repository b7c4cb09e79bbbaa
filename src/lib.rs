pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod task;
pub mod todo_list;
pub mod ui;
