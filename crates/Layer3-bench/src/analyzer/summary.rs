//! Scenario summaries decoded once at the analyzer boundary
//!
//! 누락된 비교 결과, 시나리오 키, 필드는 모두 0으로 처리합니다 (에러 없음).

use ctxbench_foundation::{
    PerformanceMetrics, ScenarioComparison, WITHOUT_CONTEXT_SHARING, WITH_CONTEXT_SHARING,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token/latency summary of one condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSummary {
    pub avg_tokens: f64,
    pub total_tokens: u64,
    pub avg_response_time: f64,
}

impl ConditionSummary {
    fn from_metrics(metrics: Option<&PerformanceMetrics>) -> Self {
        metrics
            .map(|m| Self {
                avg_tokens: m.avg_tokens,
                total_tokens: m.total_tokens,
                avg_response_time: m.avg_response_time,
            })
            .unwrap_or_default()
    }

    fn from_value(value: Option<&Value>) -> Self {
        Self {
            avg_tokens: number(value, "avg_tokens"),
            total_tokens: number(value, "total_tokens").max(0.0) as u64,
            avg_response_time: number(value, "avg_response_time"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementSummary {
    pub token_efficiency: f64,
    pub token_savings: i64,
    pub response_time_change: f64,
}

/// "Without" / "with" summaries plus improvements of one scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSummary {
    pub without_context_sharing: ConditionSummary,
    pub with_context_sharing: ConditionSummary,
    pub improvements: ImprovementSummary,
}

impl ScenarioSummary {
    /// Decode an in-memory comparison; `None` gives all zeros
    pub fn from_comparison(comparison: Option<&ScenarioComparison>) -> Self {
        let Some(comparison) = comparison else {
            return Self::default();
        };

        Self {
            without_context_sharing: ConditionSummary::from_metrics(
                comparison.metrics(WITHOUT_CONTEXT_SHARING),
            ),
            with_context_sharing: ConditionSummary::from_metrics(
                comparison.metrics(WITH_CONTEXT_SHARING),
            ),
            improvements: ImprovementSummary {
                token_efficiency: comparison.improvements.token_efficiency,
                token_savings: comparison.improvements.token_savings,
                response_time_change: comparison.improvements.response_time,
            },
        }
    }

    /// Decode a saved stage artifact (`comparison` or `overall_comparison` key)
    pub fn from_artifact(artifact: &Value) -> Self {
        let Some(comparison) = artifact
            .get("comparison")
            .or_else(|| artifact.get("overall_comparison"))
        else {
            return Self::default();
        };

        let scenarios = comparison.get("scenarios");
        let scenario = |name: &str| scenarios.and_then(|s| s.get(name));
        let improvements = comparison.get("improvements");

        Self {
            without_context_sharing: ConditionSummary::from_value(scenario(
                WITHOUT_CONTEXT_SHARING,
            )),
            with_context_sharing: ConditionSummary::from_value(scenario(WITH_CONTEXT_SHARING)),
            improvements: ImprovementSummary {
                token_efficiency: number(improvements, "token_efficiency"),
                token_savings: number(improvements, "token_savings") as i64,
                response_time_change: number(improvements, "response_time"),
            },
        }
    }
}

fn number(value: Option<&Value>, key: &str) -> f64 {
    value
        .and_then(|v| v.get(key))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxbench_foundation::{ConversationResult, MetricsCalculator};
    use serde_json::json;

    fn comparison() -> ScenarioComparison {
        let without = vec![
            ConversationResult::new("a", 100, 0.5),
            ConversationResult::new("b", 100, 0.5),
        ];
        let with = vec![
            ConversationResult::new("a", 50, 0.25),
            ConversationResult::new("b", 50, 0.25),
        ];
        MetricsCalculator::compare_scenarios(
            &without,
            &with,
            WITHOUT_CONTEXT_SHARING,
            WITH_CONTEXT_SHARING,
        )
    }

    #[test]
    fn test_missing_comparison_is_zero() {
        assert_eq!(ScenarioSummary::from_comparison(None), ScenarioSummary::default());
        assert_eq!(
            ScenarioSummary::from_artifact(&json!({})),
            ScenarioSummary::default()
        );
        assert_eq!(
            ScenarioSummary::from_artifact(&Value::Null),
            ScenarioSummary::default()
        );
    }

    #[test]
    fn test_from_comparison() {
        let summary = ScenarioSummary::from_comparison(Some(&comparison()));
        assert_eq!(summary.without_context_sharing.total_tokens, 200);
        assert_eq!(summary.with_context_sharing.avg_tokens, 50.0);
        assert_eq!(summary.improvements.token_savings, 100);
        assert!((summary.improvements.token_efficiency - 50.0).abs() < 1e-9);
        assert!((summary.improvements.response_time_change - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_artifact_matches_in_memory() {
        let artifact = json!({ "test_type": "single_agent_comparison", "comparison": comparison() });
        let from_json = ScenarioSummary::from_artifact(&artifact);
        assert_eq!(from_json, ScenarioSummary::from_comparison(Some(&comparison())));

        let artifact = json!({ "overall_comparison": comparison() });
        assert_eq!(
            ScenarioSummary::from_artifact(&artifact).improvements.token_savings,
            100
        );
    }

    #[test]
    fn test_partial_artifact_defaults_fields() {
        let artifact = json!({
            "comparison": {
                "scenarios": { "Without Context Sharing": { "total_tokens": 500 } },
                "improvements": { "token_efficiency": 12.5 }
            }
        });
        let summary = ScenarioSummary::from_artifact(&artifact);
        assert_eq!(summary.without_context_sharing.total_tokens, 500);
        assert_eq!(summary.without_context_sharing.avg_tokens, 0.0);
        assert_eq!(summary.with_context_sharing, ConditionSummary::default());
        assert_eq!(summary.improvements.token_efficiency, 12.5);
        assert_eq!(summary.improvements.token_savings, 0);
    }
}
