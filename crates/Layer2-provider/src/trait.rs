//! ChatClient trait and request type
//!
//! ## 타입 의존성
//!
//! - `ConversationResult`: Layer1-foundation에서 re-export (지표 계산의 입력)
//! - `ChatMessage`: 이 레이어 고유 정의

use crate::message::ChatMessage;
use async_trait::async_trait;
use ctxbench_foundation::TestConfig;

// Re-export ConversationResult from Layer1-foundation (표준 타입)
pub use ctxbench_foundation::ConversationResult;

/// One chat-completion call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Messages to send (full history, or just the newest turn when sharing)
    pub messages: Vec<ChatMessage>,

    /// Ask the server to reconstruct context from its own state
    pub context_sharing: bool,

    /// Identity the shared context is keyed on
    pub agent_id: Option<String>,

    /// Logical group several agents share context in
    pub shared_context_group: Option<String>,

    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Plain request using the model parameters from `config`
    pub fn new(messages: Vec<ChatMessage>, config: &TestConfig) -> Self {
        Self {
            messages,
            context_sharing: false,
            agent_id: None,
            shared_context_group: None,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Enable context sharing keyed on `agent_id`
    pub fn with_context_sharing(mut self, agent_id: impl Into<String>) -> Self {
        self.context_sharing = true;
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_context_group(mut self, group: Option<String>) -> Self {
        self.shared_context_group = group;
        self
    }

    /// Whether the vendor context-sharing fields go on the wire
    pub fn shares_context(&self) -> bool {
        self.context_sharing && self.agent_id.is_some()
    }
}

/// Chat-completion service the scenario testers talk to
///
/// Implementations never fail a completion call: transport or API errors are
/// reported as a zero-token [`ConversationResult`] carrying the elapsed time.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// `true` when the service answers its health endpoint
    async fn health_check(&self) -> bool;

    /// Send one request and normalize the response
    async fn chat_completion(&self, request: ChatRequest) -> ConversationResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_config() {
        let config = TestConfig::default();
        let req = ChatRequest::new(vec![ChatMessage::user("hi")], &config);
        assert_eq!(req.model, "gpt-3.5-turbo");
        assert_eq!(req.max_tokens, 150);
        assert!(!req.shares_context());
    }

    #[test]
    fn test_context_sharing_requires_agent() {
        let config = TestConfig::default();
        let mut req = ChatRequest::new(vec![], &config).with_context_sharing("agent");
        assert!(req.shares_context());

        req.agent_id = None;
        assert!(!req.shares_context());
    }
}
