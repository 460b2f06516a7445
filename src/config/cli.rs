use crate::domain::ports::Storage;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem-backed storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(name = "rowkit", about = "Record-oriented data toolkit")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage a to-do list persisted as JSON
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },
    /// Run the HR report pipeline from a TOML config
    Report {
        /// Path to the report configuration file
        #[arg(long, default_value = "report.toml")]
        config: PathBuf,
        /// Base directory the config paths are resolved against
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum TodoAction {
    /// Add a task to the database
    Add {
        title: String,
        #[arg(long, default_value = "todo.json")]
        db: PathBuf,
        #[arg(long)]
        priority: Option<u8>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List tasks, optionally filtered and sorted
    List {
        #[arg(long, default_value = "todo.json")]
        db: PathBuf,
        /// Show only open tasks
        #[arg(long)]
        open: bool,
        #[arg(long)]
        tag: Option<String>,
        /// One of: id, priority, title, due
        #[arg(long, default_value = "id")]
        order_by: String,
    },
    /// Mark a task done (or open again with --undo)
    Done {
        id: u32,
        #[arg(long, default_value = "todo.json")]
        db: PathBuf,
        #[arg(long)]
        undo: bool,
    },
    /// Remove a task
    Remove {
        id: u32,
        #[arg(long, default_value = "todo.json")]
        db: PathBuf,
    },
    /// Print task counts and per-tag totals
    Stats {
        #[arg(long, default_value = "todo.json")]
        db: PathBuf,
    },
    /// Run the non-interactive end-to-end demo scenario
    Demo {
        /// Directory the demo writes its files into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}
