//! Console summaries

use crate::runner::CompleteResults;
use ctxbench_foundation::{ScenarioComparison, WITHOUT_CONTEXT_SHARING, WITH_CONTEXT_SHARING};
use ctxbench_scenario::{ComprehensiveAnalysis, MultiAgentRun, SingleAgentRun, Verdict};
use std::path::Path;

fn print_condition(comparison: &ScenarioComparison, scenario: &str, heading: &str) {
    let metrics = comparison.metrics(scenario).cloned().unwrap_or_default();
    println!("🔸 {}:", heading);
    println!("   Average Tokens: {:.1}", metrics.avg_tokens);
    println!("   Total Tokens: {}", metrics.total_tokens);
    println!("   Average Response Time: {:.3}s", metrics.avg_response_time);
}

fn print_improvements(comparison: &ScenarioComparison, heading: &str) {
    let improvements = &comparison.improvements;
    println!("\n💡 {}:", heading);
    println!("   Token Efficiency: {:.1}%", improvements.token_efficiency);
    println!("   Token Savings: {} tokens", improvements.token_savings);
    println!("   Response Time Change: {:.1}%", improvements.response_time);
}

pub fn print_single_agent_summary(run: &SingleAgentRun) {
    let comparison = &run.comparison;

    println!("\n{}", "=".repeat(60));
    println!("📊 SINGLE AGENT TEST SUMMARY");
    println!("{}", "=".repeat(60));

    print_condition(comparison, WITHOUT_CONTEXT_SHARING, "Without Context Sharing");
    println!();
    print_condition(comparison, WITH_CONTEXT_SHARING, "With Context Sharing");
    print_improvements(comparison, "Performance Improvements");

    let pct = comparison.summary.token_improvement_pct;
    if comparison.summary.better_scenario == WITH_CONTEXT_SHARING {
        println!("\n✅ Context Sharing shows {:.1}% better token efficiency!", pct);
    } else {
        println!("\n⚠️  Traditional approach shows {:.1}% better performance", pct);
    }
    println!("{}", "=".repeat(60));
}

pub fn print_multi_agent_summary(run: &MultiAgentRun) {
    let comparison = &run.overall_comparison;

    println!("\n{}", "=".repeat(70));
    println!("📊 MULTI-AGENT TEST SUMMARY");
    println!("{}", "=".repeat(70));

    print_condition(
        comparison,
        WITHOUT_CONTEXT_SHARING,
        "Overall Performance (Without Context Sharing)",
    );
    println!();
    print_condition(
        comparison,
        WITH_CONTEXT_SHARING,
        "Overall Performance (With Context Sharing)",
    );
    print_improvements(comparison, "Overall Improvements");

    println!("\n👥 Agent-Specific Performance:");
    for agent in &run.agent_specific_metrics {
        let improvements = &agent.comparison.improvements;
        println!("   📋 {}:", agent.name);
        println!("      Token Efficiency: {:.1}%", improvements.token_efficiency);
        println!("      Token Savings: {} tokens", improvements.token_savings);
        println!("      Turns: {}", agent.turns_with);
    }

    let pct = comparison.summary.token_improvement_pct;
    if comparison.summary.better_scenario == WITH_CONTEXT_SHARING {
        println!(
            "\n✅ Multi-Agent Context Sharing shows {:.1}% better token efficiency!",
            pct
        );
        println!("🤝 Successful cross-agent knowledge sharing demonstrated!");
    } else {
        println!("\n⚠️  Traditional approach shows {:.1}% better performance", pct);
    }
    println!("{}", "=".repeat(70));
}

pub fn print_key_indicators(analysis: &ComprehensiveAnalysis) {
    let summary = &analysis.test_summary;

    println!("\n📊 KEY PERFORMANCE INDICATORS:");
    println!(
        "🤖 Single Agent Token Efficiency: {:.1}%",
        summary.single_agent.improvements.token_efficiency
    );
    println!(
        "👥 Multi-Agent Token Efficiency: {:.1}%",
        summary.multi_agent.improvements.token_efficiency
    );
    println!(
        "💰 Overall Cost Savings: {:.1}%",
        analysis.cost_analysis.total_savings.percentage
    );
    println!(
        "📈 Scalability Rating: {}",
        analysis.scalability_analysis.scalability_rating
    );
}

fn print_verdict(verdict: Verdict) {
    match verdict {
        Verdict::Excellent => {
            println!("🌟 EXCELLENT: PC Node Context Sharing shows outstanding performance!");
            println!("   Recommended for production use in both single and multi-agent scenarios.");
        }
        Verdict::Good => {
            println!("✅ GOOD: PC Node Context Sharing demonstrates clear benefits.");
            println!("   Recommended for scenarios with moderate to high conversation complexity.");
        }
        Verdict::Mixed => {
            println!(
                "⚠️  MIXED: PC Node Context Sharing shows some benefits but needs optimization."
            );
        }
    }
}

pub fn print_final_summary(results: &CompleteResults, results_dir: &Path) {
    println!("\n{}", "=".repeat(80));
    println!("🏆 PC NODE COMPREHENSIVE TEST SUMMARY");
    println!("{}", "=".repeat(80));

    println!("📅 Test Run ID: {}", results.test_run_id);
    println!("⏱️  Total Duration: {:.2} seconds", results.total_duration);
    println!("✅ Tests Completed: {}", results.tests_completed.join(", "));

    if !results.errors.is_empty() {
        println!("❌ Errors: {}", results.errors.len());
        for error in &results.errors {
            println!("   - {}", error);
        }
    }

    if let Some(analysis) = &results.comprehensive_analysis {
        print_key_indicators(analysis);
    }

    println!("\n🎯 FINAL VERDICT:");
    if !results.tests_completed.is_empty() && results.errors.is_empty() {
        match &results.comprehensive_analysis {
            Some(analysis) => print_verdict(analysis.verdict),
            None => println!("✅ Tests completed successfully but comprehensive analysis unavailable."),
        }
    } else {
        println!("❌ INCOMPLETE: Some tests failed or were skipped. Review errors above.");
    }

    println!("{}", "=".repeat(80));
    println!("📁 All results saved in: {}/", results_dir.display());
    println!("{}", "=".repeat(80));
}
