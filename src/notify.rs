//! Notification sink consumed by the fetch layer.
//!
//! The core emits three categories of user-facing events; how they are
//! rendered (toasts, logs, anything else) is the consumer's business.

/// Sink for user-facing catalog events.
pub trait Notifier: Send + Sync {
    /// Data loaded.
    fn success(&self, message: &str);
    /// Retry in progress.
    fn info(&self, message: &str);
    /// Load failed.
    fn error(&self, message: &str);
}

/// Default sink: forwards events to the tracing pipeline.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(category = "success", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(category = "info", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(category = "error", "{}", message);
    }
}

#[cfg(test)]
pub mod testing {
    use super::Notifier;
    use std::sync::Mutex;

    /// Records every emitted event for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub events: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn count(&self, category: &str) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|(c, _)| c == category)
                .count()
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(("success".to_string(), message.to_string()));
        }

        fn info(&self, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(("info".to_string(), message.to_string()));
        }

        fn error(&self, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(("error".to_string(), message.to_string()));
        }
    }
}
