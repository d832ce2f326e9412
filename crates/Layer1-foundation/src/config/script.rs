//! Conversation scripts
//!
//! 단일 에이전트는 메시지 목록, 다중 에이전트는 에이전트 태그가 붙은 턴 목록

use serde::{Deserialize, Serialize};

/// Single-agent script: one identity asking a sequence of questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleAgentScript {
    /// Scenario name (used in logs and artifacts)
    pub scenario: String,

    /// Agent id sent with context-sharing requests
    #[serde(default = "default_single_agent_id")]
    pub agent_id: String,

    /// Ordered user messages
    pub messages: Vec<String>,
}

fn default_single_agent_id() -> String {
    "single_agent_tester".to_string()
}

impl SingleAgentScript {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Keep only the first `rounds` messages
    pub fn truncated(&self, rounds: usize) -> Self {
        Self {
            scenario: self.scenario.clone(),
            agent_id: self.agent_id.clone(),
            messages: self.messages.iter().take(rounds).cloned().collect(),
        }
    }
}

/// A participant in the multi-agent script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Stable id, also used as `agent_id` on the wire
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub role: String,
}

/// One scripted turn of the multi-agent conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTurn {
    pub agent: String,
    pub message: String,
}

/// Multi-agent script: turns interleaved across named agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAgentScript {
    pub scenario: String,

    /// Logical group the agents share context in
    #[serde(default)]
    pub context_group: Option<String>,

    /// Agents in declaration order
    pub agents: Vec<AgentProfile>,

    /// Turns in chronological order
    pub turns: Vec<ScriptedTurn>,
}

impl MultiAgentScript {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Look up an agent profile by id
    pub fn agent(&self, id: &str) -> Option<&AgentProfile> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Display name for an agent id, falling back to the id itself
    pub fn agent_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.agent(id).map(|a| a.name.as_str()).unwrap_or(id)
    }

    /// Keep only the first `rounds` turns
    pub fn truncated(&self, rounds: usize) -> Self {
        Self {
            scenario: self.scenario.clone(),
            context_group: self.context_group.clone(),
            agents: self.agents.clone(),
            turns: self.turns.iter().take(rounds).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> MultiAgentScript {
        MultiAgentScript {
            scenario: "demo".to_string(),
            context_group: None,
            agents: vec![AgentProfile {
                id: "a".to_string(),
                name: "Alice".to_string(),
                role: String::new(),
            }],
            turns: vec![
                ScriptedTurn {
                    agent: "a".to_string(),
                    message: "one".to_string(),
                },
                ScriptedTurn {
                    agent: "a".to_string(),
                    message: "two".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_agent_name_fallback() {
        let s = script();
        assert_eq!(s.agent_name("a"), "Alice");
        assert_eq!(s.agent_name("ghost"), "ghost");
    }

    #[test]
    fn test_truncated_keeps_order() {
        let s = script().truncated(1);
        assert_eq!(s.len(), 1);
        assert_eq!(s.turns[0].message, "one");
        assert_eq!(s.agents.len(), 1);
    }

    #[test]
    fn test_single_agent_default_id() {
        let json = r#"{"scenario": "x", "messages": ["hi"]}"#;
        let s: SingleAgentScript = serde_json::from_str(json).unwrap();
        assert_eq!(s.agent_id, "single_agent_tester");
        assert_eq!(s.truncated(5).len(), 1);
    }
}
