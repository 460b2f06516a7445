use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of tabular data: a mapping from field name to JSON value.
/// Fields are kept ordered so exports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.data.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|k| k.as_str())
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(|v| v.as_f64())
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.data.get(field).and_then(|v| v.as_i64())
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.data.get(field).and_then(|v| v.as_bool())
    }
}

impl FromIterator<(String, serde_json::Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Record {
            data: iter.into_iter().collect(),
        }
    }
}

/// A piece of content published by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// The outcome of one notification delivery. Two notifications are the
/// same entry when channel, recipient and message all match; timestamps
/// and seen flags are not part of the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    pub to: String,
    pub message: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seen: bool,
}

impl Notification {
    pub fn new(channel: impl Into<String>, to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            to: to.into(),
            message: message.into(),
            created_at: Utc::now(),
            seen: false,
        }
    }

    /// The dedupe key used by inbox membership and imports.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.channel, &self.to, &self.message)
    }
}

impl PartialEq for Notification {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Notification {}

/// A to-do entry. Field normalization and id assignment live in
/// `core::todo`; this is the persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub priority: u8,
    pub due: Option<NaiveDate>,
    pub done: bool,
    pub tags: Vec<String>,
    pub created: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accessors() {
        let r = Record::new()
            .with("name", "Anna")
            .with("age", 30)
            .with("score", 4.5)
            .with("active", true);

        assert_eq!(r.get_str("name"), Some("Anna"));
        assert_eq!(r.get_i64("age"), Some(30));
        assert_eq!(r.get_f64("age"), Some(30.0));
        assert_eq!(r.get_f64("score"), Some(4.5));
        assert_eq!(r.get_bool("active"), Some(true));
        assert_eq!(r.get_str("missing"), None);
        assert!(r.contains_field("name"));
    }

    #[test]
    fn test_notification_identity_ignores_timestamp_and_seen() {
        let a = Notification::new("email", "alice", "m1");
        let mut b = Notification::new("email", "alice", "m1");
        b.seen = true;
        let c = Notification::new("email", "alice", "m2");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
