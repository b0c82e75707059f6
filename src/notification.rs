use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }
}

const MAX_VISIBLE: usize = 5;

/// Transient toasts. Entries expire `ttl` after they were pushed.
#[derive(Debug)]
pub struct NotificationCenter {
    entries: VecDeque<(Notification, Instant)>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        NotificationCenter {
            entries: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    pub fn push_at(&mut self, notification: Notification, now: Instant) {
        let text = notification.message.as_str();
        match notification.level {
            NotificationLevel::Success => tracing::info!(text, "notification"),
            NotificationLevel::Warning => tracing::warn!(text, "notification"),
            NotificationLevel::Error => tracing::error!(text, "notification"),
        }
        self.entries.push_back((notification, now));
        while self.entries.len() > MAX_VISIBLE {
            self.entries.pop_front();
        }
    }

    pub fn prune(&mut self) {
        self.prune_at(Instant::now());
    }

    pub fn prune_at(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|(_, created)| now.saturating_duration_since(*created) < ttl);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().map(|(n, _)| n)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}
