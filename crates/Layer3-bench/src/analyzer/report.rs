//! Markdown report (Chinese source text)
//!
//! 영어 버전은 `translate.rs`의 규칙 목록으로 생성되므로, 여기의 고정 문구를
//! 바꾸면 번역 규칙도 함께 갱신해야 합니다.

use super::{ComprehensiveAnalysis, ScenarioSavings, ScenarioSummary};

pub const SINGLE_AGENT_IMAGE: &str = "images/single_agent_comparison.png";
pub const MULTI_AGENT_IMAGE: &str = "images/multi_agent_comparison.png";

/// Render the full Chinese report
pub fn render_markdown(analysis: &ComprehensiveAnalysis) -> String {
    let mut output = String::new();

    output.push_str("# PC Node 性能分析报告\n\n");
    output.push_str(&format!(
        "*生成时间: {}*\n\n",
        analysis.generated_at.format("%Y年%m月%d日")
    ));

    // 테스트 개요
    output.push_str("## 📊 测试概览\n\n");
    push_scenario_overview(
        &mut output,
        "### 单智能体测试结果",
        &analysis.test_summary.single_agent,
        &format!("![单智能体性能对比]({})", SINGLE_AGENT_IMAGE),
    );
    push_scenario_overview(
        &mut output,
        "### 多智能体测试结果",
        &analysis.test_summary.multi_agent,
        &format!("![多智能体性能对比]({})", MULTI_AGENT_IMAGE),
    );

    // 성능 인사이트
    let effectiveness = &analysis.performance_insights.context_sharing_effectiveness;
    let complexity = &analysis.performance_insights.complexity_impact;
    output.push_str("## 💡 性能洞察\n\n");
    output.push_str("### Context Sharing效果\n");
    output.push_str(&format!(
        "- **单智能体效率**: {:.1}%\n",
        effectiveness.single_agent_efficiency
    ));
    output.push_str(&format!(
        "- **多智能体效率**: {:.1}%\n",
        effectiveness.multi_agent_efficiency
    ));
    output.push_str(&format!(
        "- **可扩展性因子**: {:.2}\n\n",
        effectiveness.scalability_factor
    ));
    output.push_str("### 复杂度影响\n");
    output.push_str(&format!(
        "- **单智能体平均Token**: {:.1}\n",
        complexity.single_agent_avg_tokens
    ));
    output.push_str(&format!(
        "- **多智能体平均Token**: {:.1}\n",
        complexity.multi_agent_avg_tokens
    ));
    output.push_str(&format!(
        "- **复杂度开销**: {:.1}%\n\n",
        complexity.complexity_overhead
    ));

    // Token 절감 분석
    let savings = &analysis.token_savings;
    let cost = &analysis.cost_analysis;
    output.push_str("## 💰 Token节省分析\n\n");
    push_scenario_savings(&mut output, "### 单智能体场景", &savings.single_agent);
    push_scenario_savings(&mut output, "### 多智能体场景", &savings.multi_agent);
    output.push_str("### 总体节省\n");
    output.push_str(&format!(
        "- **总Token节省**: {} tokens\n",
        savings.total.tokens
    ));
    output.push_str(&format!(
        "- **总节省比例**: {:.1}%\n",
        savings.total.percentage
    ));
    output.push_str(&format!(
        "- **平均每轮节省**: {:.1} tokens\n",
        savings.total.avg_per_round
    ));
    output.push_str(&format!(
        "- **预估成本节省**: ${:.4} (单价 ${}/1K tokens)\n\n",
        cost.total_savings.usd, cost.cost_per_1k_tokens
    ));

    // 권장 사항
    let recs = &analysis.recommendations;
    output.push_str("## 🎯 使用建议\n\n");
    push_list(&mut output, "### 何时使用Context Sharing", &recs.when_to_use_context_sharing);
    push_list(&mut output, "### 性能优化建议", &recs.performance_optimization);
    push_list(&mut output, "### 成本优化建议", &recs.cost_optimization);
    push_list(&mut output, "### 架构考虑", &recs.architecture_considerations);

    // 확장성
    let scalability = &analysis.scalability_analysis;
    output.push_str("## 📈 可扩展性分析\n\n");
    output.push_str(&format!(
        "- **扩展效率**: {:.1}%\n",
        scalability.scaling_efficiency
    ));
    output.push_str(&format!(
        "- **可扩展性评级**: {}\n\n",
        scalability.scalability_rating
    ));
    push_list(&mut output, "### 扩展建议", &scalability.recommendations);

    // 요약
    output.push_str("## 📋 总结\n\n");
    output.push_str("本次测试验证了PC Node在Context Sharing方面的性能表现：\n\n");
    output.push_str(&format!(
        "1. **单智能体场景**: Context Sharing带来了 {:.1}% 的Token效率提升\n",
        effectiveness.single_agent_efficiency
    ));
    output.push_str(&format!(
        "2. **多智能体场景**: Context Sharing带来了 {:.1}% 的Token效率提升\n",
        effectiveness.multi_agent_efficiency
    ));
    output.push_str(&format!(
        "3. **Token节省**: 平均每轮对话节省 {:.1} tokens\n",
        savings.total.avg_per_round
    ));
    output.push_str(&format!(
        "4. **规模效应**: 每1000轮对话节省 {:.0} tokens\n\n",
        savings.total.per_1000_rounds
    ));

    output.push_str("---\n");
    output.push_str("*报告由PC Node自动生成 | 数据来源: 综合性能测试*\n");

    output
}

fn push_scenario_overview(output: &mut String, heading: &str, summary: &ScenarioSummary, image: &str) {
    output.push_str(&format!("{}\n", heading));
    output.push_str(&format!(
        "- **Token效率提升**: {:.1}%\n",
        summary.improvements.token_efficiency
    ));
    output.push_str(&format!(
        "- **Token节省**: {} tokens\n",
        summary.improvements.token_savings
    ));
    output.push_str(&format!(
        "- **响应时间变化**: {:.1}%\n\n",
        summary.improvements.response_time_change
    ));
    output.push_str(&format!("{}\n\n", image));
}

fn push_scenario_savings(output: &mut String, heading: &str, savings: &ScenarioSavings) {
    output.push_str(&format!("{}\n", heading));
    output.push_str(&format!(
        "- **不使用Context Sharing**: {} tokens\n",
        savings.tokens_without
    ));
    output.push_str(&format!(
        "- **使用Context Sharing**: {} tokens\n",
        savings.tokens_with
    ));
    output.push_str(&format!(
        "- **节省**: {} tokens ({:.1}%)\n",
        savings.savings, savings.savings_percentage
    ));
    output.push_str(&format!(
        "- **每轮节省**: {:.1} tokens\n\n",
        savings.per_round_savings
    ));
}

fn push_list(output: &mut String, heading: &str, items: &[String]) {
    output.push_str(&format!("{}\n", heading));
    if items.is_empty() {
        output.push_str("- 暂无\n");
    }
    for item in items {
        output.push_str(&format!("- {}\n", item));
    }
    output.push('\n');
}
