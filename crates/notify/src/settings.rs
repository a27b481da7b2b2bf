//! Notification settings.
//!
//! Explicit, injected values: the worker receives its recipient and
//! threshold at construction time rather than reading ambient state at
//! call time, so tests can pin both deterministically.

/// Default low-stock threshold when none is configured.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifySettings {
    /// Where notifications go. `None` disables delivery entirely.
    pub recipient: Option<String>,
    /// A movement dropping stock from at-or-above to below this value
    /// triggers the low-stock email.
    pub low_stock_threshold: i64,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            recipient: None,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl NotifySettings {
    pub fn new(recipient: impl Into<String>, low_stock_threshold: i64) -> Self {
        Self {
            recipient: Some(recipient.into()),
            low_stock_threshold,
        }
    }

    /// Read settings from the process environment
    /// (`NOTIFY_RECIPIENT`, `LOW_STOCK_THRESHOLD`).
    pub fn from_env() -> Self {
        let recipient = std::env::var("NOTIFY_RECIPIENT").ok().filter(|s| !s.is_empty());
        let low_stock_threshold = std::env::var("LOW_STOCK_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        Self {
            recipient,
            low_stock_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_ten() {
        let settings = NotifySettings::default();
        assert_eq!(settings.low_stock_threshold, 10);
        assert!(settings.recipient.is_none());
    }

    #[test]
    fn new_sets_recipient() {
        let settings = NotifySettings::new("admin@example.com", 5);
        assert_eq!(settings.recipient.as_deref(), Some("admin@example.com"));
        assert_eq!(settings.low_stock_threshold, 5);
    }
}
