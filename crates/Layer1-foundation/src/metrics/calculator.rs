//! Metrics calculator
//!
//! 턴별 결과 목록을 집계 지표로 변환하고 두 시나리오를 비교합니다.
//! 평균/합계는 토큰이 0보다 큰 결과(성공한 요청)만 사용합니다.

use super::result::ConversationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Types
// ============================================================================

/// Aggregate statistics for one scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceMetrics {
    /// Mean tokens over successful turns
    pub avg_tokens: f64,

    /// Sum of tokens over successful turns
    pub total_tokens: u64,

    /// Mean latency over all turns, in seconds
    pub avg_response_time: f64,

    /// Second-half vs first-half mean tokens, percent
    pub token_growth_rate: f64,

    /// Mean of reported compression ratios
    pub compression_efficiency: f64,

    /// Coefficient of variation of tokens, percent
    pub stability_coefficient: f64,
}

/// Derived A-vs-B improvement figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Improvements {
    /// `token_savings / total_tokens_a * 100`
    pub token_efficiency: f64,

    /// `(avg_time_a - avg_time_b) / avg_time_a * 100`
    pub response_time: f64,

    /// `total_tokens_a - total_tokens_b`; negative when B used more
    pub token_savings: i64,
}

/// Which scenario won, and by how much
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSummary {
    pub better_scenario: String,
    pub token_improvement_pct: f64,
    pub time_improvement_pct: f64,
}

/// Flat A/B comparison record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioComparison {
    /// Scenario name → metrics
    pub scenarios: BTreeMap<String, PerformanceMetrics>,
    pub improvements: Improvements,
    pub summary: ComparisonSummary,
}

impl ScenarioComparison {
    pub fn metrics(&self, scenario: &str) -> Option<&PerformanceMetrics> {
        self.scenarios.get(scenario)
    }
}

// ============================================================================
// MetricsCalculator
// ============================================================================

/// Stateless metrics calculator
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Aggregate a scenario's per-turn results
    pub fn calculate_metrics(results: &[ConversationResult]) -> PerformanceMetrics {
        if results.is_empty() {
            return PerformanceMetrics::default();
        }

        let tokens: Vec<f64> = results
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.tokens as f64)
            .collect();

        let avg_tokens = mean(&tokens);
        let total_tokens = successful_tokens(results);

        // Failed requests still cost time, so latency averages over every turn
        let response_times: Vec<f64> = results.iter().map(|r| r.response_time).collect();
        let avg_response_time = mean(&response_times);

        let compression_ratios: Vec<f64> =
            results.iter().filter_map(|r| r.compression_ratio).collect();

        let stability_coefficient = if avg_tokens > 0.0 {
            population_std_dev(&tokens, avg_tokens) / avg_tokens * 100.0
        } else {
            0.0
        };

        PerformanceMetrics {
            avg_tokens,
            total_tokens,
            avg_response_time,
            token_growth_rate: growth_rate(&tokens),
            compression_efficiency: mean(&compression_ratios),
            stability_coefficient,
        }
    }

    /// Compare scenario A (baseline) against scenario B (candidate)
    pub fn compare_scenarios(
        scenario_a: &[ConversationResult],
        scenario_b: &[ConversationResult],
        scenario_a_name: &str,
        scenario_b_name: &str,
    ) -> ScenarioComparison {
        let metrics_a = Self::calculate_metrics(scenario_a);
        let metrics_b = Self::calculate_metrics(scenario_b);

        let total_a = metrics_a.total_tokens;
        let total_b = metrics_b.total_tokens;

        let token_savings = total_a as i64 - total_b as i64;
        let token_efficiency = if total_a > 0 {
            token_savings as f64 / total_a as f64 * 100.0
        } else {
            0.0
        };

        let response_time = if metrics_a.avg_response_time > 0.0 {
            (metrics_a.avg_response_time - metrics_b.avg_response_time)
                / metrics_a.avg_response_time
                * 100.0
        } else {
            0.0
        };

        // Strict sign check: a tie goes to A
        let better_scenario = if token_efficiency > 0.0 {
            scenario_b_name
        } else {
            scenario_a_name
        };

        let mut scenarios = BTreeMap::new();
        scenarios.insert(scenario_a_name.to_string(), metrics_a);
        scenarios.insert(scenario_b_name.to_string(), metrics_b);

        ScenarioComparison {
            scenarios,
            improvements: Improvements {
                token_efficiency,
                response_time,
                token_savings,
            },
            summary: ComparisonSummary {
                better_scenario: better_scenario.to_string(),
                token_improvement_pct: token_efficiency.abs(),
                time_improvement_pct: response_time.abs(),
            },
        }
    }
}

/// Sum of tokens over successful turns
pub(crate) fn successful_tokens(results: &[ConversationResult]) -> u64 {
    results
        .iter()
        .filter(|r| r.is_success())
        .map(|r| r.tokens)
        .sum()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percent change of the second half's mean over the first half's
fn growth_rate(tokens: &[f64]) -> f64 {
    if tokens.len() < 2 {
        return 0.0;
    }

    let (first_half, second_half) = tokens.split_at(tokens.len() / 2);
    if first_half.is_empty() || second_half.is_empty() {
        return 0.0;
    }

    let first_mean = mean(first_half);
    if first_mean == 0.0 {
        return 0.0;
    }
    (mean(second_half) - first_mean) / first_mean * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "Scenario A";
    const B: &str = "Scenario B";

    fn results(tokens: &[u64]) -> Vec<ConversationResult> {
        tokens
            .iter()
            .map(|&t| ConversationResult::new("reply", t, 0.5))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let m = MetricsCalculator::calculate_metrics(&[]);
        assert_eq!(m, PerformanceMetrics::default());
        assert_eq!(m.total_tokens, 0);
        assert_eq!(m.avg_tokens, 0.0);
        assert_eq!(m.avg_response_time, 0.0);
        assert_eq!(m.token_growth_rate, 0.0);
        assert_eq!(m.compression_efficiency, 0.0);
        assert_eq!(m.stability_coefficient, 0.0);
    }

    #[test]
    fn test_average_and_total() {
        let m = MetricsCalculator::calculate_metrics(&results(&[10, 20, 30, 40]));
        assert!(approx(m.avg_tokens, 25.0));
        assert_eq!(m.total_tokens, 100);
        assert!(approx(m.avg_response_time, 0.5));
    }

    #[test]
    fn test_zero_token_result_excluded() {
        let mut rs = results(&[10, 20, 30, 40]);
        rs.insert(2, ConversationResult::failed(2.5));

        let m = MetricsCalculator::calculate_metrics(&rs);
        assert!(approx(m.avg_tokens, 25.0));
        assert_eq!(m.total_tokens, 100);
        // latency still includes the failed turn
        assert!(approx(m.avg_response_time, (0.5 * 4.0 + 2.5) / 5.0));
    }

    #[test]
    fn test_growth_rate() {
        let m = MetricsCalculator::calculate_metrics(&results(&[10, 10, 10, 20, 20, 20]));
        assert!(approx(m.token_growth_rate, 100.0));
    }

    #[test]
    fn test_growth_rate_odd_length_and_single_sample() {
        // [10] | [20, 30] -> (25 - 10) / 10
        let m = MetricsCalculator::calculate_metrics(&results(&[10, 20, 30]));
        assert!(approx(m.token_growth_rate, 150.0));

        let single = MetricsCalculator::calculate_metrics(&results(&[10]));
        assert_eq!(single.token_growth_rate, 0.0);
    }

    #[test]
    fn test_stability_zero_variance() {
        let m = MetricsCalculator::calculate_metrics(&results(&[50, 50, 50, 50]));
        assert_eq!(m.stability_coefficient, 0.0);
    }

    #[test]
    fn test_stability_coefficient_of_variation() {
        // mean 20, population std dev 10
        let m = MetricsCalculator::calculate_metrics(&results(&[10, 30]));
        assert!(approx(m.stability_coefficient, 50.0));
    }

    #[test]
    fn test_compression_efficiency() {
        let rs = vec![
            ConversationResult::new("a", 10, 0.1).with_compression_ratio(Some(0.2)),
            ConversationResult::new("b", 10, 0.1),
            ConversationResult::new("c", 10, 0.1).with_compression_ratio(Some(0.6)),
        ];
        let m = MetricsCalculator::calculate_metrics(&rs);
        assert!(approx(m.compression_efficiency, 0.4));
    }

    #[test]
    fn test_all_failed_results() {
        let rs = vec![ConversationResult::failed(1.0), ConversationResult::failed(3.0)];
        let m = MetricsCalculator::calculate_metrics(&rs);
        assert_eq!(m.total_tokens, 0);
        assert_eq!(m.avg_tokens, 0.0);
        assert_eq!(m.stability_coefficient, 0.0);
        assert!(approx(m.avg_response_time, 2.0));
    }

    #[test]
    fn test_better_scenario_b_wins() {
        let c = MetricsCalculator::compare_scenarios(&results(&[60, 40]), &results(&[50, 30]), A, B);
        assert!(approx(c.improvements.token_efficiency, 20.0));
        assert_eq!(c.improvements.token_savings, 20);
        assert_eq!(c.summary.better_scenario, B);
        assert!(approx(c.summary.token_improvement_pct, 20.0));
    }

    #[test]
    fn test_better_scenario_a_wins() {
        let c = MetricsCalculator::compare_scenarios(&results(&[80]), &results(&[100]), A, B);
        assert!(approx(c.improvements.token_efficiency, -25.0));
        assert_eq!(c.improvements.token_savings, -20);
        assert_eq!(c.summary.better_scenario, A);
        assert!(approx(c.summary.token_improvement_pct, 25.0));
    }

    #[test]
    fn test_tie_goes_to_a() {
        let c = MetricsCalculator::compare_scenarios(&results(&[50]), &results(&[50]), A, B);
        assert_eq!(c.improvements.token_efficiency, 0.0);
        assert_eq!(c.summary.better_scenario, A);
    }

    #[test]
    fn test_zero_baseline_has_zero_efficiency() {
        let c = MetricsCalculator::compare_scenarios(&[], &results(&[10, 20]), A, B);
        assert_eq!(c.improvements.token_efficiency, 0.0);
        assert_eq!(c.improvements.response_time, 0.0);
        assert_eq!(c.improvements.token_savings, -30);
        assert_eq!(c.summary.better_scenario, A);
    }

    #[test]
    fn test_token_savings_antisymmetric() {
        let a = results(&[120, 130, 0, 140]);
        let b = results(&[40, 55, 61]);
        let ab = MetricsCalculator::compare_scenarios(&a, &b, A, B);
        let ba = MetricsCalculator::compare_scenarios(&b, &a, B, A);
        assert_eq!(ab.improvements.token_savings, -ba.improvements.token_savings);
    }

    #[test]
    fn test_response_time_improvement() {
        let a = vec![ConversationResult::new("a", 10, 2.0)];
        let b = vec![ConversationResult::new("b", 10, 1.5)];
        let c = MetricsCalculator::compare_scenarios(&a, &b, A, B);
        assert!(approx(c.improvements.response_time, 25.0));
        assert!(approx(c.summary.time_improvement_pct, 25.0));
    }

    #[test]
    fn test_comparison_scenarios_block() {
        let c = MetricsCalculator::compare_scenarios(&results(&[10]), &results(&[5]), A, B);
        assert_eq!(c.metrics(A).map(|m| m.total_tokens), Some(10));
        assert_eq!(c.metrics(B).map(|m| m.total_tokens), Some(5));
        assert!(c.metrics("missing").is_none());
    }

    #[test]
    fn test_comparison_lenient_decode() {
        let json = r#"{"improvements": {"token_efficiency": 12.5}}"#;
        let c: ScenarioComparison = serde_json::from_str(json).unwrap();
        assert!(c.scenarios.is_empty());
        assert_eq!(c.improvements.token_efficiency, 12.5);
        assert_eq!(c.improvements.token_savings, 0);
        assert!(c.summary.better_scenario.is_empty());
    }
}
