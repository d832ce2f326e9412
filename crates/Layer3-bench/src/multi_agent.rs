//! Multi-agent comparison
//!
//! 여러 에이전트가 번갈아 말하는 스크립트를 두 번 실행합니다.
//! 결과는 항상 시간순(턴 순서)으로 유지하며, 에이전트별 지표는
//! 별도로 그룹화해서 계산합니다.

use crate::chart::{AgentSeries, ChartGenerator};
use crate::driver::{preview, Transcript, TurnDriver};
use crate::record::{RawResults, TurnRecord};
use ctxbench_foundation::{
    BenchConfig, ConversationResult, Error, MetricsCalculator, Result, ScenarioComparison,
    WITHOUT_CONTEXT_SHARING, WITH_CONTEXT_SHARING,
};
use ctxbench_provider::{ChatClient, ChatMessage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const MULTI_AGENT_TEST_TYPE: &str = "multi_agent_comparison";
pub const MULTI_AGENT_CHART: &str = "multi_agent_comparison.png";
pub const MULTI_AGENT_BREAKDOWN_CHART: &str = "multi_agent_breakdown.png";

/// One turn's result tagged with the agent that spoke
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTurnResult {
    pub agent: String,
    pub result: ConversationResult,
}

/// Per-agent comparison block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub agent_id: String,
    pub name: String,
    pub comparison: ScenarioComparison,
    pub turns_without: usize,
    pub turns_with: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPaths {
    pub overall_comparison: Option<PathBuf>,
    pub agent_breakdown: Option<PathBuf>,
}

/// Output of one multi-agent comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAgentRun {
    /// Always `multi_agent_comparison`
    pub test_type: String,

    pub scenario: String,

    /// Wall time of both passes (seconds)
    pub total_test_time: f64,

    pub total_conversation_turns: usize,

    pub participating_agents: usize,

    /// Chronological comparison of every turn
    pub overall_comparison: ScenarioComparison,

    /// In agent declaration order
    pub agent_specific_metrics: Vec<AgentMetrics>,

    pub chart_paths: ChartPaths,

    /// Chronological, each record tagged with its agent
    pub raw_results: RawResults,
}

/// Drives the multi-agent script through a [`ChatClient`]
pub struct MultiAgentTester {
    /// 대상 서비스
    client: Arc<dyn ChatClient>,

    /// 설정 (불변)
    config: BenchConfig,

    /// 차트 생성기 (없으면 차트 생략)
    charts: Option<ChartGenerator>,
}

impl MultiAgentTester {
    pub fn new(client: Arc<dyn ChatClient>, config: BenchConfig) -> Self {
        Self {
            client,
            config,
            charts: None,
        }
    }

    pub fn with_charts(mut self, charts: ChartGenerator) -> Self {
        self.charts = Some(charts);
        self
    }

    /// One transcript shared by all agents, re-sent in full every turn
    pub async fn run_without_context_sharing(&self) -> Vec<AgentTurnResult> {
        info!("🔍 Testing Multi-Agent WITHOUT Context Sharing...");

        let script = &self.config.multi_agent;
        let driver = TurnDriver::new(self.client.as_ref(), &self.config.test_config);
        let mut transcript = Transcript::default();
        let mut results = Vec::with_capacity(script.len());

        for (i, turn) in script.turns.iter().enumerate() {
            info!(
                "   Turn {}/{} - {}: {}",
                i + 1,
                script.len(),
                script.agent_name(&turn.agent),
                preview(&turn.message)
            );

            transcript.push_user(&turn.message);
            let result = driver.send(driver.request(transcript.snapshot())).await;
            transcript.push_reply(&result.content);
            results.push(AgentTurnResult {
                agent: turn.agent.clone(),
                result,
            });
        }

        results
    }

    /// Only the current message, keyed on the speaking agent and the shared group
    pub async fn run_with_context_sharing(&self) -> Vec<AgentTurnResult> {
        info!("🔍 Testing Multi-Agent WITH Context Sharing...");

        let script = &self.config.multi_agent;
        let driver = TurnDriver::new(self.client.as_ref(), &self.config.test_config);
        let mut results = Vec::with_capacity(script.len());

        for (i, turn) in script.turns.iter().enumerate() {
            info!(
                "   Turn {}/{} - {}: {}",
                i + 1,
                script.len(),
                script.agent_name(&turn.agent),
                preview(&turn.message)
            );

            let request = driver
                .request(vec![ChatMessage::user(turn.message.as_str())])
                .with_context_sharing(turn.agent.as_str())
                .with_context_group(script.context_group.clone());
            results.push(AgentTurnResult {
                agent: turn.agent.clone(),
                result: driver.send(request).await,
            });
        }

        results
    }

    /// Health check, both passes, overall and per-agent comparisons, charts
    ///
    /// Returns `Ok(None)` when the service is not healthy.
    pub async fn run_comparison_test(&self) -> Result<Option<MultiAgentRun>> {
        info!("🚀 Starting Multi-Agent Comparison Test...");

        if self.config.multi_agent.is_empty() {
            return Err(Error::Validation(
                "multi-agent script has no turns".to_string(),
            ));
        }

        if !self.client.health_check().await {
            warn!("❌ PC Node is not healthy, aborting test");
            return Ok(None);
        }

        let start = Instant::now();
        let turns_without = self.run_without_context_sharing().await;
        let turns_with = self.run_with_context_sharing().await;
        let total_test_time = start.elapsed().as_secs_f64();

        // Chronological order on both sides, so turn N pairs with turn N
        let all_without = results_of(&turns_without);
        let all_with = results_of(&turns_with);

        let overall_comparison = MetricsCalculator::compare_scenarios(
            &all_without,
            &all_with,
            WITHOUT_CONTEXT_SHARING,
            WITH_CONTEXT_SHARING,
        );

        let agent_specific_metrics = self.agent_metrics(&turns_without, &turns_with);
        let chart_paths = self.render_charts(&all_without, &all_with, &turns_without, &turns_with);

        let script = &self.config.multi_agent;
        Ok(Some(MultiAgentRun {
            test_type: MULTI_AGENT_TEST_TYPE.to_string(),
            scenario: script.scenario.clone(),
            total_test_time,
            total_conversation_turns: script.len(),
            participating_agents: script.agents.len(),
            overall_comparison,
            agent_specific_metrics,
            chart_paths,
            raw_results: RawResults {
                without_context_sharing: tagged_records(&turns_without),
                with_context_sharing: tagged_records(&turns_with),
            },
        }))
    }

    /// Per-agent comparisons for agents that spoke in both passes
    pub fn agent_metrics(
        &self,
        turns_without: &[AgentTurnResult],
        turns_with: &[AgentTurnResult],
    ) -> Vec<AgentMetrics> {
        self.config
            .multi_agent
            .agents
            .iter()
            .filter_map(|agent| {
                let without = results_for(turns_without, &agent.id);
                let with = results_for(turns_with, &agent.id);
                if without.is_empty() || with.is_empty() {
                    return None;
                }

                let comparison = MetricsCalculator::compare_scenarios(
                    &without,
                    &with,
                    &format!("{} (Without)", agent.name),
                    &format!("{} (With)", agent.name),
                );

                Some(AgentMetrics {
                    agent_id: agent.id.clone(),
                    name: agent.name.clone(),
                    comparison,
                    turns_without: without.len(),
                    turns_with: with.len(),
                })
            })
            .collect()
    }

    fn render_charts(
        &self,
        all_without: &[ConversationResult],
        all_with: &[ConversationResult],
        turns_without: &[AgentTurnResult],
        turns_with: &[AgentTurnResult],
    ) -> ChartPaths {
        let Some(charts) = &self.charts else {
            return ChartPaths::default();
        };

        let overall_comparison = charts
            .generate_comparison_chart(
                all_without,
                all_with,
                WITHOUT_CONTEXT_SHARING,
                WITH_CONTEXT_SHARING,
                "Multi-Agent Performance Comparison (Token Efficiency Focus)",
                MULTI_AGENT_CHART,
            )
            .map_err(|e| warn!("Chart generation failed: {}", e))
            .ok();

        let series: Vec<AgentSeries> = self
            .config
            .multi_agent
            .agents
            .iter()
            .flat_map(|agent| {
                [
                    AgentSeries::new(
                        format!("{} (Without)", agent.name),
                        results_for(turns_without, &agent.id),
                    ),
                    AgentSeries::new(
                        format!("{} (With)", agent.name),
                        results_for(turns_with, &agent.id),
                    ),
                ]
            })
            .filter(|s| !s.results.is_empty())
            .collect();

        let agent_breakdown = charts
            .generate_multi_agent_chart(
                &series,
                "Multi-Agent Breakdown by Agent",
                MULTI_AGENT_BREAKDOWN_CHART,
            )
            .map_err(|e| warn!("Agent chart generation failed: {}", e))
            .ok();

        ChartPaths {
            overall_comparison,
            agent_breakdown,
        }
    }
}

fn results_of(turns: &[AgentTurnResult]) -> Vec<ConversationResult> {
    turns.iter().map(|t| t.result.clone()).collect()
}

fn results_for(turns: &[AgentTurnResult], agent_id: &str) -> Vec<ConversationResult> {
    turns
        .iter()
        .filter(|t| t.agent == agent_id)
        .map(|t| t.result.clone())
        .collect()
}

fn tagged_records(turns: &[AgentTurnResult]) -> Vec<TurnRecord> {
    turns
        .iter()
        .enumerate()
        .map(|(i, t)| TurnRecord::from_result(i + 1, &t.result).with_agent(t.agent.as_str()))
        .collect()
}
