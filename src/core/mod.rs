pub mod collections;
pub mod dataset;
pub mod hr;
pub mod notify;
pub mod report;
pub mod sequences;
pub mod todo;

pub use crate::domain::model::{Notification, Post, Record, Task};
pub use crate::domain::ports::{Channel, Storage};
pub use crate::utils::error::Result;
