//! Single-agent comparison
//!
//! 같은 대화 스크립트를 두 번 실행합니다:
//! 1. Context Sharing 없이 - 매 턴마다 전체 히스토리 전송
//! 2. Context Sharing 사용 - 현재 메시지만 전송, 서버가 컨텍스트 복원

use crate::chart::ChartGenerator;
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

pub const SINGLE_AGENT_TEST_TYPE: &str = "single_agent_comparison";
pub const SINGLE_AGENT_CHART: &str = "single_agent_comparison.png";

/// Output of one single-agent comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleAgentRun {
    /// Always `single_agent_comparison`
    pub test_type: String,

    pub scenario: String,

    /// Wall time of both passes (seconds)
    pub total_test_time: f64,

    pub conversation_rounds: usize,

    pub comparison: ScenarioComparison,

    /// `None` when chart rendering was skipped or failed
    pub chart_path: Option<PathBuf>,

    pub raw_results: RawResults,
}

/// Drives the single-agent script through a [`ChatClient`]
pub struct SingleAgentTester {
    /// 대상 서비스
    client: Arc<dyn ChatClient>,

    /// 설정 (불변)
    config: BenchConfig,

    /// 차트 생성기 (없으면 차트 생략)
    charts: Option<ChartGenerator>,
}

impl SingleAgentTester {
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

    /// Every turn re-sends the whole transcript
    pub async fn run_without_context_sharing(&self) -> Vec<ConversationResult> {
        info!("🔍 Testing WITHOUT Context Sharing...");

        let script = &self.config.single_agent;
        let driver = TurnDriver::new(self.client.as_ref(), &self.config.test_config);
        let mut transcript = Transcript::default();
        let mut results = Vec::with_capacity(script.len());

        for (i, message) in script.messages.iter().enumerate() {
            info!("   Turn {}/{}: {}", i + 1, script.len(), preview(message));

            transcript.push_user(message);
            let result = driver.send(driver.request(transcript.snapshot())).await;
            transcript.push_reply(&result.content);
            results.push(result);
        }

        results
    }

    /// Every turn sends only its own message, keyed on the script's agent id
    pub async fn run_with_context_sharing(&self) -> Vec<ConversationResult> {
        info!("🔍 Testing WITH Context Sharing...");

        let script = &self.config.single_agent;
        let driver = TurnDriver::new(self.client.as_ref(), &self.config.test_config);
        let mut results = Vec::with_capacity(script.len());

        for (i, message) in script.messages.iter().enumerate() {
            info!("   Turn {}/{}: {}", i + 1, script.len(), preview(message));

            let request = driver
                .request(vec![ChatMessage::user(message.as_str())])
                .with_context_sharing(script.agent_id.as_str());
            results.push(driver.send(request).await);
        }

        results
    }

    /// Health check, both passes, comparison and chart
    ///
    /// Returns `Ok(None)` when the service is not healthy.
    pub async fn run_comparison_test(&self) -> Result<Option<SingleAgentRun>> {
        info!("🚀 Starting Single Agent Comparison Test...");

        if self.config.single_agent.is_empty() {
            return Err(Error::Validation(
                "single-agent script has no messages".to_string(),
            ));
        }

        if !self.client.health_check().await {
            warn!("❌ PC Node is not healthy, aborting test");
            return Ok(None);
        }

        let start = Instant::now();
        let results_without = self.run_without_context_sharing().await;
        let results_with = self.run_with_context_sharing().await;
        let total_test_time = start.elapsed().as_secs_f64();

        let comparison = MetricsCalculator::compare_scenarios(
            &results_without,
            &results_with,
            WITHOUT_CONTEXT_SHARING,
            WITH_CONTEXT_SHARING,
        );

        let chart_path = self.charts.as_ref().and_then(|charts| {
            charts
                .generate_comparison_chart(
                    &results_without,
                    &results_with,
                    WITHOUT_CONTEXT_SHARING,
                    WITH_CONTEXT_SHARING,
                    "Single Agent Performance Comparison",
                    SINGLE_AGENT_CHART,
                )
                .map_err(|e| warn!("Chart generation failed: {}", e))
                .ok()
        });

        Ok(Some(SingleAgentRun {
            test_type: SINGLE_AGENT_TEST_TYPE.to_string(),
            scenario: self.config.single_agent.scenario.clone(),
            total_test_time,
            conversation_rounds: results_without.len(),
            comparison,
            chart_path,
            raw_results: RawResults {
                without_context_sharing: TurnRecord::from_results(&results_without),
                with_context_sharing: TurnRecord::from_results(&results_with),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ctxbench_provider::ChatRequest;

    struct FixedClient;

    #[async_trait]
    impl ChatClient for FixedClient {
        async fn health_check(&self) -> bool {
            true
        }

        async fn chat_completion(&self, request: ChatRequest) -> ConversationResult {
            let tokens = if request.context_sharing { 40 } else { 100 };
            ConversationResult::new("ok", tokens, 0.01)
        }
    }

    fn config() -> BenchConfig {
        let mut config = BenchConfig::builtin().unwrap().quick(3);
        config.test_config.delay_between_requests = 0.0;
        config
    }

    #[tokio::test]
    async fn test_chart_rendered_when_configured() {
        if !crate::chart::ensure_font() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();

        let run = SingleAgentTester::new(Arc::new(FixedClient), config())
            .with_charts(ChartGenerator::new(dir.path().join("charts")))
            .run_comparison_test()
            .await
            .unwrap()
            .unwrap();

        let path = run.chart_path.unwrap();
        assert_eq!(path, dir.path().join("charts").join(SINGLE_AGENT_CHART));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_no_chart_without_generator() {
        let run = SingleAgentTester::new(Arc::new(FixedClient), config())
            .run_comparison_test()
            .await
            .unwrap()
            .unwrap();
        assert!(run.chart_path.is_none());
        assert_eq!(run.comparison.improvements.token_savings, 180);
    }
}
