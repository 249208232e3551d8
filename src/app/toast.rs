use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const TOAST_TTL: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

/// Transient notifications. Oldest toasts are dropped first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    fn push_at(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match level {
            ToastLevel::Info => tracing::info!("{}", message),
            ToastLevel::Warning => tracing::warn!("{}", message),
            ToastLevel::Error => tracing::error!("{}", message),
        }
        self.toasts.push_back(Toast {
            message,
            level,
            expires_at: now + TOAST_TTL,
        });
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire() {
        let mut queue = ToastQueue::default();
        let start = Instant::now();
        queue.push_at(ToastLevel::Info, "first", start);
        queue.push_at(ToastLevel::Warning, "second", start + Duration::from_secs(2));

        queue.prune(start + Duration::from_millis(3500));
        let left: Vec<_> = queue.visible().map(|t| t.message.as_str()).collect();
        assert_eq!(left, vec!["second"]);

        queue.prune(start + Duration::from_secs(6));
        assert!(queue.is_empty());
    }

    #[test]
    fn oldest_dropped_when_full() {
        let mut queue = ToastQueue::default();
        for i in 0..6 {
            queue.info(format!("t{i}"));
        }
        let messages: Vec<_> = queue.visible().map(|t| t.message.clone()).collect();
        assert_eq!(messages, vec!["t2", "t3", "t4", "t5"]);
        assert_eq!(queue.latest().unwrap().message, "t5");
    }
}
