//! To-do manager: CRUD over an in-memory task list with normalization,
//! filtering/sorting, stats, JSON persistence and CSV import/export.

use crate::domain::model::Task;
use crate::utils::error::{Result, RowkitError};
use crate::utils::text::normalize_whitespace;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CSV_HEADER: [&str; 7] = ["id", "title", "priority", "due", "done", "tags", "created"];

/// Optional fields accepted when adding a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub priority: Option<u8>,
    pub due: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Id,
    Priority,
    Title,
    Due,
}

impl FromStr for OrderBy {
    type Err = RowkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "id" => Ok(OrderBy::Id),
            "priority" => Ok(OrderBy::Priority),
            "title" => Ok(OrderBy::Title),
            "due" => Ok(OrderBy::Due),
            other => Err(RowkitError::validation(format!(
                "unknown order key: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// `Some(true)` keeps only open tasks, `Some(false)` only completed
    /// ones, `None` applies no state filter.
    pub only_open: Option<bool>,
    pub tag: Option<String>,
    pub order_by: OrderBy,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoStats {
    pub total: usize,
    pub open: usize,
    pub done: usize,
    pub by_tag: BTreeMap<String, usize>,
}

/// Accepts `None` or a valid `YYYY-MM-DD` string; anything else is
/// normalized to no due date.
pub fn parse_due(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Normalizes the user-facing fields of a task:
/// - title: trim + collapse whitespace, error when empty afterwards
/// - priority: clamped to 1..=5
/// - tags: lowercased, trimmed, deduped keeping first, sorted
/// - due: via `parse_due`
pub fn normalize_task_fields(
    title: &str,
    priority: u8,
    tags: &[String],
    due: Option<&str>,
) -> Result<(String, u8, Vec<String>, Option<NaiveDate>)> {
    let norm_title = normalize_whitespace(title);
    if norm_title.is_empty() {
        return Err(RowkitError::validation("empty task title"));
    }

    let norm_priority = priority.clamp(1, 5);

    let mut seen = HashSet::new();
    let mut norm_tags: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect();
    norm_tags.sort();

    Ok((norm_title, norm_priority, norm_tags, parse_due(due)))
}

/// Compact single-line rendering, omitting empty parts:
/// `[ ] #3 (P2) Buy milk - due 2025-12-01 - tags: home,shop`
pub fn format_task(task: &Task) -> String {
    let status = if task.done { "[x]" } else { "[ ]" };
    let mut out = format!("{} #{} (P{}) {}", status, task.id, task.priority, task.title);
    if let Some(due) = task.due {
        out.push_str(&format!(" - due {}", due));
    }
    if !task.tags.is_empty() {
        out.push_str(&format!(" - tags: {}", task.tags.join(",")));
    }
    out
}

#[derive(Debug, Default)]
pub struct TodoList {
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct CsvTaskRow {
    #[allow(dead_code)]
    id: Option<u32>,
    title: String,
    priority: Option<u8>,
    due: Option<String>,
    done: Option<String>,
    tags: Option<String>,
    #[allow(dead_code)]
    created: Option<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn next_id(&self) -> u32 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Adds a normalized task: id = max existing id + 1 (1 on an empty
    /// list), created = today, default priority 3, not done.
    pub fn add(&mut self, title: &str, options: NewTask) -> Result<Task> {
        let (title, priority, tags, due) = normalize_task_fields(
            title,
            options.priority.unwrap_or(3),
            &options.tags,
            options.due.as_deref(),
        )?;
        let task = Task {
            id: self.next_id(),
            title,
            priority,
            due,
            done: false,
            tags,
            created: Local::now().date_naive(),
        };
        self.tasks.push(task.clone());
        tracing::debug!("added task #{}", task.id);
        Ok(task)
    }

    /// Sets the done state of the task with the given id. Returns whether
    /// a task was updated.
    pub fn toggle_done(&mut self, task_id: u32, done: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.done = done;
                true
            }
            None => false,
        }
    }

    /// Removes the task with the given id. Returns whether one existed.
    pub fn remove(&mut self, task_id: u32) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        self.tasks.len() < before
    }

    /// Filtered, sorted copy of the task list. Ordering by due date puts
    /// dated tasks first, ascending, undated last.
    pub fn list(&self, filter: &TaskFilter) -> Vec<Task> {
        let tag = filter.tag.as_ref().map(|t| t.to_lowercase());
        let mut out: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| match filter.only_open {
                Some(true) => !t.done,
                Some(false) => t.done,
                None => true,
            })
            .filter(|t| match &tag {
                Some(tag) => t.tags.iter().any(|x| x == tag),
                None => true,
            })
            .cloned()
            .collect();

        match filter.order_by {
            OrderBy::Id => out.sort_by_key(|t| t.id),
            OrderBy::Priority => out.sort_by_key(|t| t.priority),
            OrderBy::Title => out.sort_by_key(|t| t.title.to_lowercase()),
            OrderBy::Due => out.sort_by_key(|t| (t.due.is_none(), t.due)),
        }
        out
    }

    pub fn stats(&self) -> TodoStats {
        let total = self.tasks.len();
        let done = self.tasks.iter().filter(|t| t.done).count();
        let mut by_tag: BTreeMap<String, usize> = BTreeMap::new();
        for t in &self.tasks {
            for tag in &t.tags {
                *by_tag.entry(tag.to_lowercase()).or_insert(0) += 1;
            }
        }
        TodoStats {
            total,
            open: total - done,
            done,
            by_tag,
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(&self.tasks)?)?;
        Ok(())
    }

    /// Loads a task list from a JSON file; a missing file yields an empty
    /// list.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        Ok(Self::from_tasks(tasks))
    }

    /// CSV export with header id,title,priority,due,done,tags,created;
    /// tags are pipe-joined.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(CSV_HEADER)?;
        for t in &self.tasks {
            writer.write_record([
                t.id.to_string(),
                t.title.clone(),
                t.priority.to_string(),
                t.due.map(|d| d.to_string()).unwrap_or_default(),
                t.done.to_string(),
                t.tags.join("|"),
                t.created.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Imports tasks from CSV, normalizing fields and deduping against
    /// existing tasks on (lowercased title, due date). Imported tasks get
    /// fresh sequential ids and today's creation date. Returns the number
    /// of tasks actually imported.
    pub fn import_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let mut existing: HashSet<(String, Option<NaiveDate>)> = self
            .tasks
            .iter()
            .map(|t| (t.title.to_lowercase(), t.due))
            .collect();
        let mut next_id = self.next_id();
        let mut imported = 0;

        let mut reader = csv::Reader::from_path(path)?;
        for row in reader.deserialize() {
            let row: CsvTaskRow = row?;
            let tags: Vec<String> = row
                .tags
                .as_deref()
                .unwrap_or_default()
                .split('|')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            let (title, priority, tags, due) = normalize_task_fields(
                &row.title,
                row.priority.unwrap_or(3),
                &tags,
                row.due.as_deref(),
            )?;

            let key = (title.to_lowercase(), due);
            if !existing.insert(key) {
                continue;
            }

            let done = matches!(
                row.done.as_deref().unwrap_or("false").trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "y"
            );
            self.tasks.push(Task {
                id: next_id,
                title,
                priority,
                due,
                done,
                tags,
                created: Local::now().date_naive(),
            });
            next_id += 1;
            imported += 1;
        }
        tracing::debug!("imported {} tasks from CSV", imported);
        Ok(imported)
    }
}

/// Summary returned by the non-interactive demo scenario.
#[derive(Debug)]
pub struct DemoSummary {
    pub imported: usize,
    pub stats: TodoStats,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

/// End-to-end scenario without user input: create three tasks, persist to
/// JSON, reload, export to CSV and re-import (expecting zero duplicates).
pub fn demo_scenario(dir: &Path) -> Result<DemoSummary> {
    let mut todo = TodoList::new();
    todo.add(
        "Task A",
        NewTask {
            priority: Some(2),
            tags: vec!["work".to_string()],
            ..NewTask::default()
        },
    )?;
    todo.add(
        "Task B",
        NewTask {
            priority: Some(5),
            due: Some("2025-12-01".to_string()),
            ..NewTask::default()
        },
    )?;
    todo.add(
        "Task C",
        NewTask {
            tags: vec!["personal".to_string()],
            ..NewTask::default()
        },
    )?;

    let json_path = dir.join("db.json");
    todo.save_json(&json_path)?;
    let mut reloaded = TodoList::load_json(&json_path)?;

    let csv_path = dir.join("export.csv");
    reloaded.export_csv(&csv_path)?;
    let imported = reloaded.import_csv(&csv_path)?;

    Ok(DemoSummary {
        imported,
        stats: reloaded.stats(),
        json_path,
        csv_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn test_add_defaults() {
        let mut todo = TodoList::new();
        let t = todo.add("Buy milk", NewTask::default()).unwrap();
        assert_eq!(t.id, 1);
        assert_eq!(t.title, "Buy milk");
        assert_eq!(t.priority, 3);
        assert_eq!(t.due, None);
        assert!(!t.done);
        assert!(t.tags.is_empty());
        assert_eq!(t.created, today());

        let t2 = todo.add("Walk the dog", NewTask { priority: Some(2), ..NewTask::default() }).unwrap();
        assert_eq!(t2.id, 2);
    }

    #[test]
    fn test_id_is_max_plus_one_after_removal() {
        let mut todo = TodoList::new();
        todo.add("a", NewTask::default()).unwrap();
        todo.add("b", NewTask::default()).unwrap();
        assert!(todo.remove(1));
        let t = todo.add("c", NewTask::default()).unwrap();
        assert_eq!(t.id, 3);
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut todo = TodoList::new();
        todo.add("a", NewTask::default()).unwrap();
        assert!(todo.toggle_done(1, true));
        assert!(todo.tasks()[0].done);
        assert!(!todo.toggle_done(999, true));
        assert!(!todo.remove(999));
        assert!(todo.remove(1));
        assert!(todo.is_empty());
    }

    #[test]
    fn test_normalize_task_fields() {
        let (title, priority, tags, due) = normalize_task_fields(
            "  compra   Pane  ",
            9,
            &["Spesa".to_string(), "  ".to_string(), "Pane".to_string(), "spesa".to_string()],
            Some("2025-02-30"),
        )
        .unwrap();
        assert_eq!(title, "compra Pane");
        assert_eq!(priority, 5);
        assert_eq!(tags, vec!["pane", "spesa"]);
        assert_eq!(due, None);
    }

    #[test]
    fn test_normalize_rejects_empty_title() {
        assert!(normalize_task_fields("   ", 3, &[], None).is_err());
    }

    #[test]
    fn test_parse_due() {
        assert_eq!(
            parse_due(Some("2025-12-01")),
            NaiveDate::from_ymd_opt(2025, 12, 1)
        );
        assert_eq!(parse_due(Some("2025-02-30")), None);
        assert_eq!(parse_due(Some("")), None);
        assert_eq!(parse_due(None), None);
    }

    #[test]
    fn test_list_filters_and_ordering() {
        let mut todo = TodoList::new();
        todo.add("Study Rust", NewTask { priority: Some(5), due: Some("2025-12-01".into()), tags: vec!["Study".into(), "Rust".into()] }).unwrap();
        todo.add("Pay bills", NewTask { priority: Some(2), due: Some("2025-10-10".into()), tags: vec!["home".into()] }).unwrap();
        todo.add("Buy eggs", NewTask { priority: Some(4), tags: vec!["Shopping".into()], ..NewTask::default() }).unwrap();
        todo.toggle_done(3, true);

        let open = todo.list(&TaskFilter { only_open: Some(true), ..TaskFilter::default() });
        assert!(open.iter().all(|t| !t.done));
        assert_eq!(open.len(), 2);

        let rust_only = todo.list(&TaskFilter { tag: Some("RUST".into()), ..TaskFilter::default() });
        assert_eq!(rust_only.len(), 1);
        assert_eq!(rust_only[0].title, "Study Rust");

        let by_due = todo.list(&TaskFilter { order_by: OrderBy::Due, ..TaskFilter::default() });
        assert_eq!(by_due[0].title, "Pay bills");
        assert_eq!(by_due[1].title, "Study Rust");
        assert_eq!(by_due[2].title, "Buy eggs"); // undated last

        let by_priority = todo.list(&TaskFilter { order_by: OrderBy::Priority, ..TaskFilter::default() });
        assert_eq!(by_priority[0].priority, 2);
    }

    #[test]
    fn test_stats() {
        let mut todo = TodoList::new();
        todo.add("a", NewTask { tags: vec!["home".into()], ..NewTask::default() }).unwrap();
        todo.add("b", NewTask { tags: vec!["home".into(), "urgent".into()], ..NewTask::default() }).unwrap();
        todo.toggle_done(1, true);

        let s = todo.stats();
        assert_eq!(s.total, 2);
        assert_eq!(s.open, 1);
        assert_eq!(s.done, 1);
        assert_eq!(s.by_tag["home"], 2);
        assert_eq!(s.by_tag["urgent"], 1);
    }

    #[test]
    fn test_format_task() {
        let mut todo = TodoList::new();
        let t = todo
            .add("Buy milk", NewTask {
                priority: Some(2),
                due: Some("2025-12-01".into()),
                tags: vec!["home".into(), "shop".into()],
            })
            .unwrap();
        assert_eq!(
            format_task(&t),
            "[ ] #1 (P2) Buy milk - due 2025-12-01 - tags: home,shop"
        );

        let plain = todo.add("Project", NewTask { priority: Some(5), ..NewTask::default() }).unwrap();
        todo.toggle_done(plain.id, true);
        let plain = todo.tasks().last().unwrap();
        assert_eq!(format_task(plain), "[x] #2 (P5) Project");
    }

    #[test]
    fn test_order_by_from_str() {
        assert_eq!("priority".parse::<OrderBy>().unwrap(), OrderBy::Priority);
        assert_eq!("Due".parse::<OrderBy>().unwrap(), OrderBy::Due);
        assert!("size".parse::<OrderBy>().is_err());
    }
}
