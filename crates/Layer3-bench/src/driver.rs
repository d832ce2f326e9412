//! Shared turn plumbing for the scenario testers

use ctxbench_foundation::{ConversationResult, TestConfig};
use ctxbench_provider::{ChatClient, ChatMessage, ChatRequest};
use tracing::info;

/// Preview length for logged messages
const PREVIEW_CHARS: usize = 50;

/// Sends requests one at a time, pausing after each
pub(crate) struct TurnDriver<'a> {
    client: &'a dyn ChatClient,
    config: &'a TestConfig,
}

impl<'a> TurnDriver<'a> {
    pub fn new(client: &'a dyn ChatClient, config: &'a TestConfig) -> Self {
        Self { client, config }
    }

    pub fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest::new(messages, self.config)
    }

    /// Send one request, then wait the configured delay
    pub async fn send(&self, request: ChatRequest) -> ConversationResult {
        let result = self.client.chat_completion(request).await;
        info!(
            "      tokens={} time={:.3}s{}",
            result.tokens,
            result.response_time,
            result
                .compression_ratio
                .map(|r| format!(" compression={:.2}", r))
                .unwrap_or_default()
        );
        tokio::time::sleep(self.config.delay()).await;
        result
    }
}

/// Full transcript re-sent on every turn when context sharing is off
#[derive(Debug, Default)]
pub(crate) struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn push_user(&mut self, content: &str) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Empty replies (failed requests) are not recorded
    pub fn push_reply(&mut self, content: &str) {
        if !content.is_empty() {
            self.messages.push(ChatMessage::assistant(content));
        }
    }

    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// First `PREVIEW_CHARS` characters, with an ellipsis when cut
pub(crate) fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_counts_chars() {
        let long = "中".repeat(60);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_transcript_skips_empty_reply() {
        let mut t = Transcript::default();
        t.push_user("q1");
        t.push_reply("");
        t.push_user("q2");
        t.push_reply("a2");
        assert_eq!(t.len(), 3);
        assert_eq!(t.snapshot()[2], ChatMessage::assistant("a2"));
    }
}
