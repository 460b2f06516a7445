pub mod cli;
pub mod toml_config;

pub use self::cli::{Cli, Command, LocalStorage, TodoAction};
pub use self::toml_config::ReportConfig;
