pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, ReportConfig};
pub use crate::core::dataset::{CsvExport, DataSet, JsonExport};
pub use crate::core::notify::{Inbox, User};
pub use crate::core::report::ReportPipeline;
pub use crate::core::todo::TodoList;
pub use crate::domain::model::{Notification, Post, Record, Task};
pub use crate::utils::error::{Result, RowkitError};
