use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, description)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, description)
    }

    fn new(kind: NotificationKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

/// Short-lived notifications shown on top of the window.
#[derive(Debug)]
pub struct ToastQueue {
    lifetime: Duration,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            toasts: Vec::new(),
        }
    }

    pub fn push(&mut self, notification: Notification, now: Instant) {
        match notification.kind {
            NotificationKind::Error => {
                warn!("{}: {}", notification.title, notification.description)
            }
            _ => info!("{}: {}", notification.title, notification.description),
        }
        self.toasts.push(Toast {
            notification,
            expires_at: now + self.lifetime,
        });
    }

    pub fn extend(&mut self, notifications: impl IntoIterator<Item = Notification>, now: Instant) {
        for notification in notifications {
            self.push(notification, now);
        }
    }

    /// Drops expired toasts and returns the time until the next one expires.
    pub fn prune(&mut self, now: Instant) -> Option<Duration> {
        self.toasts.retain(|t| t.expires_at > now);
        self.toasts
            .iter()
            .map(|t| t.expires_at.saturating_duration_since(now))
            .min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_lifetime() {
        let start = Instant::now();
        let mut queue = ToastQueue::new(Duration::from_secs(4));

        queue.push(Notification::success("Upload successful", "ok"), start);
        queue.push(
            Notification::error("Upload failed", "duplicate file"),
            start + Duration::from_secs(2),
        );

        let next = queue.prune(start + Duration::from_secs(1));
        assert_eq!(next, Some(Duration::from_secs(3)));
        assert_eq!(queue.iter().count(), 2);

        queue.prune(start + Duration::from_secs(5));
        let remaining: Vec<_> = queue.iter().map(|t| t.notification.title.as_str()).collect();
        assert_eq!(remaining, vec!["Upload failed"]);

        assert_eq!(queue.prune(start + Duration::from_secs(7)), None);
        assert!(queue.is_empty());
    }
}
