//! Chat provider abstraction and implementations.
//!
//! This module provides a trait-based abstraction over the generative
//! model backend, allowing the real Gemini client and the mock to be
//! swapped behind the same capability.

pub mod gemini;
pub mod mock;

use crate::models::ConversationTurn;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Provider returned no text")]
    EmptyResponse,
}

/// A capability that turns a prompt plus the caller's prior turns into
/// exactly one reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn generate_reply(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<String, ProviderError>;
}
