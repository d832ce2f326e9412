//! Per-turn raw records persisted in stage artifacts

use ctxbench_foundation::ConversationResult;
use serde::{Deserialize, Serialize};

/// One turn as written to `raw_results` (response text is not persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-based turn number
    pub turn: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    pub tokens: u64,
    pub response_time: f64,

    #[serde(default)]
    pub compression_ratio: Option<f64>,

    #[serde(default)]
    pub context_size: Option<u64>,
}

impl TurnRecord {
    pub fn from_result(turn: usize, result: &ConversationResult) -> Self {
        Self {
            turn,
            agent: None,
            tokens: result.tokens,
            response_time: result.response_time,
            compression_ratio: result.compression_ratio,
            context_size: result.context_size,
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Number a whole run, starting at turn 1
    pub fn from_results(results: &[ConversationResult]) -> Vec<Self> {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| Self::from_result(i + 1, r))
            .collect()
    }
}

/// Raw records of both conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResults {
    pub without_context_sharing: Vec<TurnRecord>,
    pub with_context_sharing: Vec<TurnRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_is_one_based() {
        let results = vec![
            ConversationResult::new("a", 10, 0.1),
            ConversationResult::failed(0.2),
        ];
        let records = TurnRecord::from_results(&results);
        assert_eq!(records[0].turn, 1);
        assert_eq!(records[1].turn, 2);
        assert_eq!(records[1].tokens, 0);
    }

    #[test]
    fn test_agent_omitted_when_absent() {
        let record = TurnRecord::from_result(1, &ConversationResult::new("a", 5, 0.1));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("agent").is_none());

        let json = serde_json::to_value(record.with_agent("tech_lead")).unwrap();
        assert_eq!(json["agent"], "tech_lead");
    }
}
