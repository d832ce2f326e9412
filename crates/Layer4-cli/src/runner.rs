//! Test Runner
//!
//! 단일 에이전트 → 다중 에이전트 → 종합 분석 → 아티팩트 순서로 실행합니다.
//! 각 단계의 에러는 `errors`에 기록되고 다음 단계는 계속 진행됩니다.

use crate::docs;
use crate::summary;
use chrono::{DateTime, Local};
use ctxbench_foundation::{run_timestamp, ArtifactStore, BenchConfig, Result};
use ctxbench_provider::ChatClient;
use ctxbench_scenario::{
    render_markdown, translate_to_english, ChartGenerator, ComprehensiveAnalysis, DataAnalyzer,
    MultiAgentRun, MultiAgentTester, SingleAgentRun, SingleAgentTester,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const SINGLE_AGENT_STAGE: &str = "single_agent";
pub const MULTI_AGENT_STAGE: &str = "multi_agent";

/// 실행 옵션
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub skip_single: bool,
    pub skip_multi: bool,
    pub results_dir: PathBuf,
    pub docs_dir: Option<PathBuf>,
}

/// Everything one run produced (`complete_test_results_{ts}.json`)
#[derive(Debug, Clone, Serialize)]
pub struct CompleteResults {
    pub test_run_id: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    /// Seconds
    pub total_duration: f64,
    pub tests_completed: Vec<String>,
    pub errors: Vec<String>,

    /// `None` inside a completed stage means the service was unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_agent_results: Option<Option<SingleAgentRun>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_agent_results: Option<Option<MultiAgentRun>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprehensive_analysis: Option<ComprehensiveAnalysis>,
}

impl CompleteResults {
    fn new(timestamp: &str) -> Self {
        let now = Local::now();
        Self {
            test_run_id: format!("pc_node_test_{}", timestamp),
            start_time: now,
            end_time: now,
            total_duration: 0.0,
            tests_completed: Vec::new(),
            errors: Vec::new(),
            single_agent_results: None,
            multi_agent_results: None,
            comprehensive_analysis: None,
        }
    }

    pub fn completed(&self, stage: &str) -> bool {
        self.tests_completed.iter().any(|s| s == stage)
    }

    fn record_error(&mut self, message: String) {
        println!("❌ {}", message);
        warn!("{}", message);
        self.errors.push(message);
    }
}

/// 벤치마크 실행기
pub struct TestRunner {
    client: Arc<dyn ChatClient>,
    config: BenchConfig,
    options: RunOptions,
    store: ArtifactStore,
}

impl TestRunner {
    pub fn new(client: Arc<dyn ChatClient>, config: BenchConfig, options: RunOptions) -> Self {
        let store = ArtifactStore::new(&options.results_dir);
        Self {
            client,
            config,
            options,
            store,
        }
    }

    pub fn results_dir(&self) -> &Path {
        self.store.base_dir()
    }

    fn charts(&self) -> ChartGenerator {
        ChartGenerator::new(self.store.subdir("charts").base_dir())
    }

    /// 전체 실행
    ///
    /// 단계별 실패는 `errors`에 모이고, 결과 디렉토리를 만들 수 없거나 최종 결과
    /// 파일을 쓸 수 없을 때만 `Err`를 반환합니다.
    pub async fn run_all_tests(&self) -> Result<CompleteResults> {
        println!("🚀 Starting PC Node Comprehensive Performance Testing");
        println!("{}", "=".repeat(60));

        self.store.ensure_dir()?;
        let timestamp = run_timestamp();
        let started = Instant::now();
        let mut results = CompleteResults::new(&timestamp);

        if !self.options.skip_single {
            println!("\n🤖 Running Single Agent Tests...");
            match self.run_single_stage(&timestamp).await {
                Ok(run) => {
                    results.single_agent_results = Some(run);
                    results.tests_completed.push(SINGLE_AGENT_STAGE.to_string());
                }
                Err(e) => results.record_error(format!("Single agent test failed: {}", e)),
            }
        }

        if !self.options.skip_multi {
            println!("\n👥 Running Multi-Agent Tests...");
            match self.run_multi_stage(&timestamp).await {
                Ok(run) => {
                    results.multi_agent_results = Some(run);
                    results.tests_completed.push(MULTI_AGENT_STAGE.to_string());
                }
                Err(e) => results.record_error(format!("Multi-agent test failed: {}", e)),
            }
        }

        // 종합 분석은 두 단계가 모두 끝났을 때만
        if results.completed(SINGLE_AGENT_STAGE) && results.completed(MULTI_AGENT_STAGE) {
            println!("\n📊 Generating Comprehensive Analysis...");
            match self.run_analysis_stage(&results, &timestamp) {
                Ok(analysis) => results.comprehensive_analysis = Some(analysis),
                Err(e) => results.record_error(format!("Comprehensive analysis failed: {}", e)),
            }
        }

        let publish_error = match (&self.options.docs_dir, &results.comprehensive_analysis) {
            (Some(docs_dir), Some(analysis)) => {
                docs::publish(docs_dir, self.charts().output_dir(), analysis).err()
            }
            _ => None,
        };
        if let Some(e) = publish_error {
            results.record_error(format!("Report publishing failed: {}", e));
        }

        results.end_time = Local::now();
        results.total_duration = started.elapsed().as_secs_f64();

        let path = self
            .store
            .save_json(&format!("complete_test_results_{}.json", timestamp), &results)?;
        info!("Complete results saved to {}", path.display());

        Ok(results)
    }

    async fn run_single_stage(&self, timestamp: &str) -> Result<Option<SingleAgentRun>> {
        let tester = SingleAgentTester::new(self.client.clone(), self.config.clone())
            .with_charts(self.charts());
        let run = tester.run_comparison_test().await?;

        let filename = format!("single_agent_{}.json", timestamp);
        let path = match &run {
            Some(run) => {
                summary::print_single_agent_summary(run);
                self.store.save_json(&filename, run)?
            }
            None => self.store.save_json(&filename, &serde_json::json!({}))?,
        };

        println!("✅ Single agent test completed - saved to {}", path.display());
        Ok(run)
    }

    async fn run_multi_stage(&self, timestamp: &str) -> Result<Option<MultiAgentRun>> {
        let tester = MultiAgentTester::new(self.client.clone(), self.config.clone())
            .with_charts(self.charts());
        let run = tester.run_comparison_test().await?;

        let filename = format!("multi_agent_{}.json", timestamp);
        let path = match &run {
            Some(run) => {
                summary::print_multi_agent_summary(run);
                self.store.save_json(&filename, run)?
            }
            None => self.store.save_json(&filename, &serde_json::json!({}))?,
        };

        println!("✅ Multi-agent test completed - saved to {}", path.display());
        Ok(run)
    }

    fn run_analysis_stage(
        &self,
        results: &CompleteResults,
        timestamp: &str,
    ) -> Result<ComprehensiveAnalysis> {
        let single = results.single_agent_results.as_ref().and_then(Option::as_ref);
        let multi = results.multi_agent_results.as_ref().and_then(Option::as_ref);

        let analysis = DataAnalyzer::new(self.config.test_config.cost_per_1k_tokens)
            .analyze_runs(single, multi);
        let report = render_markdown(&analysis);

        let path = self
            .store
            .save_text(&format!("analysis_report_{}.md", timestamp), &report)?;
        self.store.save_text(
            &format!("analysis_report_{}.en.md", timestamp),
            &translate_to_english(&report),
        )?;

        println!(
            "✅ Comprehensive analysis completed - report saved to {}",
            path.display()
        );
        Ok(analysis)
    }
}
