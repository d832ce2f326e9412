//! Per-turn conversation result

use serde::{Deserialize, Serialize};

/// Normalized outcome of one chat-completion call
///
/// A failed request is represented by `tokens == 0` with empty content; the
/// elapsed time is still recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationResult {
    /// Assistant reply text
    pub content: String,

    /// `usage.total_tokens` reported by the service
    pub tokens: u64,

    /// Wall-clock latency of the request, in seconds
    pub response_time: f64,

    /// Server-reported context compression ratio (0..1)
    #[serde(default)]
    pub compression_ratio: Option<f64>,

    /// Server-reported context size
    #[serde(default)]
    pub context_size: Option<u64>,
}

impl ConversationResult {
    pub fn new(content: impl Into<String>, tokens: u64, response_time: f64) -> Self {
        Self {
            content: content.into(),
            tokens,
            response_time,
            compression_ratio: None,
            context_size: None,
        }
    }

    /// Zero-valued result for a request that did not succeed
    pub fn failed(response_time: f64) -> Self {
        Self {
            response_time,
            ..Self::default()
        }
    }

    pub fn with_compression_ratio(mut self, ratio: Option<f64>) -> Self {
        self.compression_ratio = ratio;
        self
    }

    pub fn with_context_size(mut self, size: Option<u64>) -> Self {
        self.context_size = size;
        self
    }

    pub fn is_success(&self) -> bool {
        self.tokens > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result() {
        let r = ConversationResult::failed(1.5);
        assert_eq!(r.tokens, 0);
        assert!(r.content.is_empty());
        assert_eq!(r.response_time, 1.5);
        assert!(!r.is_success());
    }

    #[test]
    fn test_builder() {
        let r = ConversationResult::new("ok", 42, 0.2)
            .with_compression_ratio(Some(0.4))
            .with_context_size(Some(1024));
        assert!(r.is_success());
        assert_eq!(r.compression_ratio, Some(0.4));
        assert_eq!(r.context_size, Some(1024));
    }
}
