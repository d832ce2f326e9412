//! Data Analyzer - 단일/다중 에이전트 비교 결과 종합 분석
//!
//! - `summary.rs` - 비교 결과를 ScenarioSummary로 디코딩 (누락 시 0)
//! - `report.rs` - 중국어 마크다운 리포트 렌더링
//! - `translate.rs` - 순서가 있는 규칙 기반 영어 변환

mod report;
mod summary;
mod translate;

pub use report::render_markdown;
pub use summary::{ConditionSummary, ImprovementSummary, ScenarioSummary};
pub use translate::translate_to_english;

use crate::multi_agent::MultiAgentRun;
use crate::single_agent::SingleAgentRun;
use chrono::{DateTime, Local};
use ctxbench_foundation::CostEstimate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Scripted single-agent conversation length
pub const SINGLE_AGENT_ROUNDS: u64 = 19;

/// Scripted multi-agent conversation length
pub const MULTI_AGENT_ROUNDS: u64 = 20;

/// Rounds the per-1,000 projection is scaled to
const PROJECTION_ROUNDS: f64 = 1000.0;

// ============================================================================
// Analysis model
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub single_agent: ScenarioSummary,
    pub multi_agent: ScenarioSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharingEffectiveness {
    pub single_agent_efficiency: f64,
    pub multi_agent_efficiency: f64,
    pub scalability_factor: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityImpact {
    pub single_agent_avg_tokens: f64,
    pub multi_agent_avg_tokens: f64,
    pub complexity_overhead: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInsights {
    pub context_sharing_effectiveness: SharingEffectiveness,
    pub complexity_impact: ComplexityImpact,
}

/// Token savings of one scenario over its fixed round count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSavings {
    pub rounds: u64,
    pub tokens_without: u64,
    pub tokens_with: u64,
    pub savings: i64,
    pub savings_percentage: f64,
    pub per_round_savings: f64,
}

impl ScenarioSavings {
    fn new(summary: &ScenarioSummary, rounds: u64) -> Self {
        let tokens_without = summary.without_context_sharing.total_tokens;
        let tokens_with = summary.with_context_sharing.total_tokens;
        let savings = tokens_without as i64 - tokens_with as i64;

        Self {
            rounds,
            tokens_without,
            tokens_with,
            savings,
            savings_percentage: percentage(savings as f64, tokens_without as f64),
            per_round_savings: savings as f64 / rounds as f64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalSavings {
    pub tokens: i64,
    pub percentage: f64,
    pub avg_per_round: f64,
    pub per_1000_rounds: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSavingsAnalysis {
    pub single_agent: ScenarioSavings,
    pub multi_agent: ScenarioSavings,
    pub total: TotalSavings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCost {
    pub cost_without_context: f64,
    pub cost_with_context: f64,
    pub savings_usd: f64,
    pub savings_percentage: f64,
}

impl ScenarioCost {
    fn new(summary: &ScenarioSummary, cost_per_1k_tokens: f64) -> Self {
        let cost_without_context =
            CostEstimate::usd(summary.without_context_sharing.total_tokens, cost_per_1k_tokens);
        let cost_with_context =
            CostEstimate::usd(summary.with_context_sharing.total_tokens, cost_per_1k_tokens);
        let savings_usd = cost_without_context - cost_with_context;

        Self {
            cost_without_context,
            cost_with_context,
            savings_usd,
            savings_percentage: percentage(savings_usd, cost_without_context),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalCost {
    pub usd: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub cost_per_1k_tokens: f64,
    pub single_agent: ScenarioCost,
    pub multi_agent: ScenarioCost,
    pub total_savings: TotalCost,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub when_to_use_context_sharing: Vec<String>,
    pub performance_optimization: Vec<String>,
    pub cost_optimization: Vec<String>,
    pub architecture_considerations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalabilityAnalysis {
    pub scaling_efficiency: f64,
    pub single_agent_baseline: f64,
    pub multi_agent_performance: f64,
    pub scalability_rating: String,
    pub recommendations: Vec<String>,
}

/// Overall judgement of the two efficiencies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Both efficiencies above 20%
    Excellent,
    /// Either efficiency above 10%
    Good,
    #[default]
    Mixed,
}

impl Verdict {
    pub fn from_efficiencies(single: f64, multi: f64) -> Self {
        if single > 20.0 && multi > 20.0 {
            Verdict::Excellent
        } else if single > 10.0 || multi > 10.0 {
            Verdict::Good
        } else {
            Verdict::Mixed
        }
    }
}

/// Everything the report is rendered from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveAnalysis {
    pub generated_at: DateTime<Local>,
    pub test_summary: TestSummary,
    pub performance_insights: PerformanceInsights,
    pub token_savings: TokenSavingsAnalysis,
    pub cost_analysis: CostAnalysis,
    pub recommendations: Recommendations,
    pub scalability_analysis: ScalabilityAnalysis,
    pub verdict: Verdict,
}

// ============================================================================
// DataAnalyzer
// ============================================================================

/// Merges single- and multi-agent comparisons into one analysis
#[derive(Debug, Clone)]
pub struct DataAnalyzer {
    cost_per_1k_tokens: f64,
}

impl Default for DataAnalyzer {
    fn default() -> Self {
        Self::new(0.002)
    }
}

impl DataAnalyzer {
    pub fn new(cost_per_1k_tokens: f64) -> Self {
        Self { cost_per_1k_tokens }
    }

    /// Analyze in-memory runs; a missing run counts as all zeros
    pub fn analyze_runs(
        &self,
        single: Option<&SingleAgentRun>,
        multi: Option<&MultiAgentRun>,
    ) -> ComprehensiveAnalysis {
        let single = ScenarioSummary::from_comparison(single.map(|r| &r.comparison));
        let multi = ScenarioSummary::from_comparison(multi.map(|r| &r.overall_comparison));
        self.analyze(single, multi)
    }

    /// Analyze saved stage artifacts
    pub fn analyze_artifacts(
        &self,
        single: &serde_json::Value,
        multi: &serde_json::Value,
    ) -> ComprehensiveAnalysis {
        self.analyze(
            ScenarioSummary::from_artifact(single),
            ScenarioSummary::from_artifact(multi),
        )
    }

    pub fn analyze(&self, single: ScenarioSummary, multi: ScenarioSummary) -> ComprehensiveAnalysis {
        info!("📊 Analyzing comprehensive test results...");

        let performance_insights = performance_insights(&single, &multi);
        let token_savings = token_savings(&single, &multi);
        let cost_analysis = self.cost_analysis(&single, &multi);
        let recommendations = recommendations(&single, &multi);
        let scalability_analysis = scalability(&single, &multi);
        let verdict = Verdict::from_efficiencies(
            single.improvements.token_efficiency,
            multi.improvements.token_efficiency,
        );

        ComprehensiveAnalysis {
            generated_at: Local::now(),
            test_summary: TestSummary {
                single_agent: single,
                multi_agent: multi,
            },
            performance_insights,
            token_savings,
            cost_analysis,
            recommendations,
            scalability_analysis,
            verdict,
        }
    }

    fn cost_analysis(&self, single: &ScenarioSummary, multi: &ScenarioSummary) -> CostAnalysis {
        let single_cost = ScenarioCost::new(single, self.cost_per_1k_tokens);
        let multi_cost = ScenarioCost::new(multi, self.cost_per_1k_tokens);

        let usd = single_cost.savings_usd + multi_cost.savings_usd;
        let baseline = single_cost.cost_without_context + multi_cost.cost_without_context;

        CostAnalysis {
            cost_per_1k_tokens: self.cost_per_1k_tokens,
            single_agent: single_cost,
            multi_agent: multi_cost,
            total_savings: TotalCost {
                usd,
                percentage: percentage(usd, baseline),
            },
        }
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn performance_insights(single: &ScenarioSummary, multi: &ScenarioSummary) -> PerformanceInsights {
    let single_efficiency = single.improvements.token_efficiency;
    let multi_efficiency = multi.improvements.token_efficiency;
    let scalability_factor = if single_efficiency > 0.0 {
        multi_efficiency / single_efficiency
    } else {
        0.0
    };

    let single_tokens = single.with_context_sharing.avg_tokens;
    let multi_tokens = multi.with_context_sharing.avg_tokens;
    let complexity_overhead = if single_tokens > 0.0 {
        (multi_tokens - single_tokens) / single_tokens * 100.0
    } else {
        0.0
    };

    PerformanceInsights {
        context_sharing_effectiveness: SharingEffectiveness {
            single_agent_efficiency: single_efficiency,
            multi_agent_efficiency: multi_efficiency,
            scalability_factor,
        },
        complexity_impact: ComplexityImpact {
            single_agent_avg_tokens: single_tokens,
            multi_agent_avg_tokens: multi_tokens,
            complexity_overhead,
        },
    }
}

fn token_savings(single: &ScenarioSummary, multi: &ScenarioSummary) -> TokenSavingsAnalysis {
    let single_savings = ScenarioSavings::new(single, SINGLE_AGENT_ROUNDS);
    let multi_savings = ScenarioSavings::new(multi, MULTI_AGENT_ROUNDS);

    let tokens = single_savings.savings + multi_savings.savings;
    let baseline = (single_savings.tokens_without + multi_savings.tokens_without) as f64;
    let avg_per_round = tokens as f64 / (SINGLE_AGENT_ROUNDS + MULTI_AGENT_ROUNDS) as f64;

    TokenSavingsAnalysis {
        single_agent: single_savings,
        multi_agent: multi_savings,
        total: TotalSavings {
            tokens,
            percentage: percentage(tokens as f64, baseline),
            avg_per_round,
            per_1000_rounds: avg_per_round * PROJECTION_ROUNDS,
        },
    }
}

fn recommendations(single: &ScenarioSummary, multi: &ScenarioSummary) -> Recommendations {
    let single_efficiency = single.improvements.token_efficiency;
    let multi_efficiency = multi.improvements.token_efficiency;
    let mut recs = Recommendations::default();

    if single_efficiency > 20.0 {
        recs.when_to_use_context_sharing.push(format!(
            "✅ 单智能体场景显示 {:.1}% 的Token效率提升，推荐使用",
            single_efficiency
        ));
    }

    if multi_efficiency > 30.0 {
        recs.when_to_use_context_sharing.push(format!(
            "✅ 多智能体场景显示 {:.1}% 的Token效率提升，强烈推荐使用",
            multi_efficiency
        ));
    }

    if multi_efficiency > single_efficiency * 1.2 {
        recs.architecture_considerations
            .push("🏗️ Context Sharing在多智能体环境中表现更优，适合协作型应用".to_string());
    }

    if single_efficiency > 0.0 {
        recs.performance_optimization
            .push("⚡ Context Sharing有效减少Token使用，提升响应效率".to_string());
    }

    recs.cost_optimization
        .push("💰 通过Context Sharing可显著降低API调用成本".to_string());

    recs
}

fn scalability(single: &ScenarioSummary, multi: &ScenarioSummary) -> ScalabilityAnalysis {
    let single_tokens = single.with_context_sharing.avg_tokens;
    let multi_tokens = multi.with_context_sharing.avg_tokens;

    let scaling_efficiency = if single_tokens > 0.0 {
        (1.0 - multi_tokens / single_tokens) * 100.0
    } else {
        0.0
    };

    ScalabilityAnalysis {
        scaling_efficiency,
        single_agent_baseline: single_tokens,
        multi_agent_performance: multi_tokens,
        scalability_rating: scalability_rating(scaling_efficiency).to_string(),
        recommendations: vec![scalability_recommendation(scaling_efficiency).to_string()],
    }
}

fn scalability_rating(efficiency: f64) -> &'static str {
    if efficiency >= 20.0 {
        "⭐⭐⭐⭐⭐ 优秀"
    } else if efficiency >= 10.0 {
        "⭐⭐⭐⭐ 良好"
    } else if efficiency >= 0.0 {
        "⭐⭐⭐ 一般"
    } else {
        "⭐⭐ 需要优化"
    }
}

fn scalability_recommendation(efficiency: f64) -> &'static str {
    if efficiency >= 15.0 {
        "🚀 Context Sharing展现出色的扩展性能，适合大规模部署"
    } else if efficiency >= 5.0 {
        "📈 Context Sharing具备良好扩展潜力，建议在复杂场景中使用"
    } else {
        "🔧 建议进一步优化Context Sharing算法以提升扩展效率"
    }
}
