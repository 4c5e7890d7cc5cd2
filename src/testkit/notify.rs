//! Message collector for notification assertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::notify::Notifier;

/// Thread-safe message collector; clones share the same buffer.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().expect("lock messages").clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().expect("lock messages").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .expect("lock messages")
            .push(text.to_string());
        Ok(())
    }
}
