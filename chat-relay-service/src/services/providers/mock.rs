//! Mock provider implementation for testing.

use super::{ChatProvider, ProviderError};
use crate::models::ConversationTurn;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type FailureFactory = Box<dyn Fn() -> ProviderError + Send + Sync>;

enum Behavior {
    Reply(String),
    Fail(FailureFactory),
}

/// Mock chat provider. Records every call so tests can assert whether,
/// how often, and with what history the provider was invoked.
pub struct MockChatProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    histories: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl MockChatProvider {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Reply(reply.into()),
            calls: AtomicUsize::new(0),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with<F>(failure: F) -> Self
    where
        F: Fn() -> ProviderError + Send + Sync + 'static,
    {
        Self {
            behavior: Behavior::Fail(Box::new(failure)),
            calls: AtomicUsize::new(0),
            histories: Mutex::new(Vec::new()),
        }
    }

    /// Number of times `generate_reply` has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The history slices received, in call order.
    pub fn received_histories(&self) -> Vec<Vec<ConversationTurn>> {
        self.histories.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn generate_reply(
        &self,
        _prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.histories.lock().unwrap().push(history.to_vec());

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(make_error) => Err(make_error()),
        }
    }
}
