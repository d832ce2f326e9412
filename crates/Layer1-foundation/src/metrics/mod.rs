//! Metrics - 턴별 결과와 지표 계산
//!
//! - `result`: ConversationResult (요청/응답 1쌍)
//! - `calculator`: PerformanceMetrics, ScenarioComparison
//! - `cost`: 토큰 비용 추정

mod calculator;
mod cost;
mod result;

pub use calculator::{
    ComparisonSummary, Improvements, MetricsCalculator, PerformanceMetrics, ScenarioComparison,
};
pub use cost::CostEstimate;
pub use result::ConversationResult;

/// Scenario name for the full-history baseline
pub const WITHOUT_CONTEXT_SHARING: &str = "Without Context Sharing";

/// Scenario name for the context-sharing candidate
pub const WITH_CONTEXT_SHARING: &str = "With Context Sharing";
