use crate::domain::model::Notification;
use crate::utils::error::Result;

/// File access behind the persistence features, so pipelines and managers
/// can be tested against any base directory.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// A pluggable notification delivery strategy. Implementations decide how
/// a message reaches the recipient; the result is always recorded as a
/// `Notification`.
pub trait Channel: Send + Sync {
    fn name(&self) -> &'static str;
    fn send(&self, to: &str, message: &str) -> Notification;
}
