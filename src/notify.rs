//! Transient notifications shown in the status area.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }
}

/// Queue of notifications; each expires `ttl` after it was pushed.
#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<(Instant, Notification)>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl Notifications {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, n: Notification) {
        match n.level {
            Level::Error => tracing::warn!(message = %n.message, "notify"),
            _ => tracing::info!(message = %n.message, "notify"),
        }
        self.items.push_back((Instant::now(), n));
    }

    /// Drop expired entries.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items.retain(|(at, _)| now.duration_since(*at) < ttl);
    }

    /// Most recent live notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.back().map(|(_, n)| n)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
