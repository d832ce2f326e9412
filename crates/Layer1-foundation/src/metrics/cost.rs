//! Token cost estimate

use super::calculator::{successful_tokens, MetricsCalculator};
use super::result::ConversationResult;
use serde::{Deserialize, Serialize};

/// Estimated spend for a list of turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub total_tokens: u64,
    pub estimated_cost_usd: f64,
    pub cost_per_turn: f64,
    pub tokens_per_turn: f64,
}

impl CostEstimate {
    /// USD cost of `tokens` at `cost_per_1k_tokens`
    pub fn usd(tokens: u64, cost_per_1k_tokens: f64) -> f64 {
        tokens as f64 / 1000.0 * cost_per_1k_tokens
    }
}

impl MetricsCalculator {
    /// Cost of the successful turns; per-turn figures divide by all turns
    pub fn calculate_cost(results: &[ConversationResult], cost_per_1k_tokens: f64) -> CostEstimate {
        let total_tokens = successful_tokens(results);
        let estimated_cost_usd = CostEstimate::usd(total_tokens, cost_per_1k_tokens);

        if results.is_empty() {
            return CostEstimate {
                total_tokens,
                estimated_cost_usd,
                ..CostEstimate::default()
            };
        }

        let turns = results.len() as f64;
        CostEstimate {
            total_tokens,
            estimated_cost_usd,
            cost_per_turn: estimated_cost_usd / turns,
            tokens_per_turn: total_tokens as f64 / turns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_estimate() {
        let rs = vec![
            ConversationResult::new("a", 1500, 0.1),
            ConversationResult::new("b", 500, 0.1),
            ConversationResult::failed(0.1),
            ConversationResult::new("c", 2000, 0.1),
        ];
        let cost = MetricsCalculator::calculate_cost(&rs, 0.002);
        assert_eq!(cost.total_tokens, 4000);
        assert!((cost.estimated_cost_usd - 0.008).abs() < 1e-12);
        assert!((cost.cost_per_turn - 0.002).abs() < 1e-12);
        assert!((cost.tokens_per_turn - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_cost_estimate_empty() {
        let cost = MetricsCalculator::calculate_cost(&[], 0.002);
        assert_eq!(cost, CostEstimate::default());
    }
}
