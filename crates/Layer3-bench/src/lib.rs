//! # ctxbench-scenario
//!
//! Context Sharing 비교 시나리오 레이어입니다.
//!
//! ## 핵심 컴포넌트
//!
//! - **SingleAgentTester**: 단일 에이전트 스크립트를 공유 없이/공유하여 두 번 실행
//! - **MultiAgentTester**: 여러 에이전트가 번갈아 말하는 스크립트 (시간순 유지)
//! - **ChartGenerator**: 비교 차트 PNG 생성 (plotters)
//! - **DataAnalyzer**: 두 비교 결과를 종합 분석하고 리포트 렌더링
//!
//! ## 사용 예
//!
//! ```ignore
//! use ctxbench_scenario::{ChartGenerator, SingleAgentTester};
//!
//! let tester = SingleAgentTester::new(client, config)
//!     .with_charts(ChartGenerator::new("test_results/charts"));
//!
//! if let Some(run) = tester.run_comparison_test().await? {
//!     println!("{:.1}%", run.comparison.improvements.token_efficiency);
//! }
//! ```

pub mod analyzer;
pub mod chart;
mod driver;
pub mod multi_agent;
pub mod record;
pub mod single_agent;

pub use analyzer::{
    render_markdown, translate_to_english, ComprehensiveAnalysis, DataAnalyzer, ScenarioSummary,
    Verdict,
};
pub use chart::{AgentSeries, ChartGenerator};
pub use multi_agent::{AgentMetrics, AgentTurnResult, ChartPaths, MultiAgentRun, MultiAgentTester};
pub use record::{RawResults, TurnRecord};
pub use single_agent::{SingleAgentRun, SingleAgentTester};
