//! Notification center: users observe each other (follower lists),
//! deliveries go through pluggable channels, and every user owns an inbox
//! with JSON/CSV persistence deduped on (channel, recipient, message).

use crate::domain::model::{Notification, Post};
use crate::domain::ports::Channel;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

pub struct EmailChannel;

impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn send(&self, to: &str, message: &str) -> Notification {
        Notification::new(self.name(), to, message)
    }
}

pub struct SmsChannel;

impl Channel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
    }

    fn send(&self, to: &str, message: &str) -> Notification {
        Notification::new(self.name(), to, message)
    }
}

pub struct PushChannel;

impl Channel for PushChannel {
    fn name(&self) -> &'static str {
        "push"
    }

    fn send(&self, to: &str, message: &str) -> Notification {
        Notification::new(self.name(), to, message)
    }
}

const CSV_HEADER: [&str; 5] = ["channel", "to", "message", "created_at", "seen"];

/// Collected notifications for one recipient.
#[derive(Debug, Default)]
pub struct Inbox {
    items: Vec<Notification>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Membership by identity: channel, recipient and message.
    pub fn contains(&self, notification: &Notification) -> bool {
        self.items.iter().any(|n| n == notification)
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn by_user(&self, username: &str) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.to == username).collect()
    }

    pub fn by_channel(&self, channel: &str) -> Vec<&Notification> {
        let ch = channel.to_lowercase();
        self.items
            .iter()
            .filter(|n| n.channel.to_lowercase() == ch)
            .collect()
    }

    pub fn unseen_count(&self) -> usize {
        self.items.iter().filter(|n| !n.seen).count()
    }

    pub fn mark_all_seen(&mut self) {
        for n in &mut self.items {
            n.seen = true;
        }
    }

    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(&self.items)?)?;
        Ok(())
    }

    /// Imports notifications from a JSON file, skipping entries whose
    /// identity is already present. Missing file imports nothing.
    /// Returns the number of newly added entries.
    pub fn import_json(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(0);
        }
        let content = fs::read_to_string(path)?;
        let incoming: Vec<Notification> = serde_json::from_str(&content)?;
        Ok(self.merge(incoming))
    }

    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(CSV_HEADER)?;
        for n in &self.items {
            let created_at = n.created_at.to_rfc3339();
            writer.write_record([
                n.channel.as_str(),
                n.to.as_str(),
                n.message.as_str(),
                created_at.as_str(),
                if n.seen { "1" } else { "0" },
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// CSV counterpart of `import_json`. Unparseable timestamps fall back
    /// to now; `seen` accepts 1/true/yes/y.
    pub fn import_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(0);
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut incoming = Vec::new();
        for row in reader.records() {
            let row = row?;
            let created_at = row
                .get(3)
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);
            let seen = matches!(
                row.get(4).unwrap_or("0").trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "y"
            );
            incoming.push(Notification {
                channel: row.get(0).unwrap_or_default().to_string(),
                to: row.get(1).unwrap_or_default().to_string(),
                message: row.get(2).unwrap_or_default().to_string(),
                created_at,
                seen,
            });
        }
        Ok(self.merge(incoming))
    }

    fn merge(&mut self, incoming: Vec<Notification>) -> usize {
        let mut seen: HashSet<(String, String, String)> = self
            .items
            .iter()
            .map(|n| (n.channel.clone(), n.to.clone(), n.message.clone()))
            .collect();
        let mut added = 0;
        for n in incoming {
            let key = (n.channel.clone(), n.to.clone(), n.message.clone());
            if seen.insert(key) {
                self.items.push(n);
                added += 1;
            }
        }
        added
    }
}

/// A platform user: observable by followers, delivering to itself through
/// a preferred channel, keeping an in-memory activity log.
pub struct User {
    pub username: String,
    pub inbox: Inbox,
    preferred: Box<dyn Channel>,
    followers: BTreeSet<String>,
    log: Vec<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_channel(username, Box::new(EmailChannel))
    }

    pub fn with_channel(username: impl Into<String>, preferred: Box<dyn Channel>) -> Self {
        Self {
            username: username.into(),
            inbox: Inbox::new(),
            preferred,
            followers: BTreeSet::new(),
            log: Vec::new(),
        }
    }

    pub fn log(&mut self, event: &str) {
        self.log.push(format!("{} {}", Utc::now().to_rfc3339(), event));
    }

    pub fn activity(&self) -> &[String] {
        &self.log
    }

    /// Registers this user on the other user's follower list.
    pub fn follow(&mut self, other: &mut User) {
        other.followers.insert(self.username.clone());
        let event = format!("follow {}", other.username);
        self.log(&event);
    }

    pub fn unfollow(&mut self, other: &mut User) {
        other.followers.remove(&self.username);
        let event = format!("unfollow {}", other.username);
        self.log(&event);
    }

    /// Follower usernames, sorted.
    pub fn followers(&self) -> Vec<String> {
        self.followers.iter().cloned().collect()
    }

    pub fn post(&mut self, content: &str) -> Post {
        self.log("post");
        Post::new(self.username.clone(), content)
    }

    /// Usernames to notify for a new post: the sorted follower list.
    pub fn notify(&self, post: &Post) -> Vec<String> {
        tracing::debug!("notifying {} followers of a post by {}", self.followers.len(), post.author);
        self.followers()
    }

    /// Delivers a message to this user through the preferred channel and
    /// stores the result in the inbox.
    pub fn receive(&mut self, message: &str) -> Notification {
        let notification = self.preferred.send(&self.username, message);
        self.inbox.add(notification.clone());
        let event = format!("receive via {}", notification.channel);
        self.log(&event);
        notification
    }
}
