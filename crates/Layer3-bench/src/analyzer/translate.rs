//! zh → en report translation
//!
//! 명시적인 순서의 (패턴, 치환) 규칙 목록을 한 번씩 적용합니다:
//! 1. 고정 문구 치환 (긴 문구 먼저)
//! 2. 정규식 규칙 (인코딩 깨짐 제거, 추천 문구)
//! 3. 전각 문장부호
//! 4. 공백 정리
//!
//! 목록에 없는 문구는 번역되지 않은 채 남습니다.

use lazy_static::lazy_static;
use regex::Regex;

/// Literal phrase substitutions, applied in order
const PHRASE_RULES: &[(&str, &str)] = &[
    // Title and date
    ("# PC Node 性能分析报告", "# PC Node Performance Analysis Report"),
    ("*生成时间:", "*Generated on:"),
    ("年", "/"),
    ("月", "/"),
    ("日*", "*"),
    // Overview
    ("## 📊 测试概览", "## 📊 Test Overview"),
    ("### 单智能体测试结果", "### Single Agent Test Results"),
    ("### 多智能体测试结果", "### Multi-Agent Test Results"),
    ("**Token效率提升**", "**Token Efficiency Improvement**"),
    ("**响应时间变化**", "**Response Time Change**"),
    (
        "![单智能体性能对比](images/single_agent_comparison.png)",
        "![Single Agent Performance Comparison](images/single_agent_comparison.png)",
    ),
    (
        "![多智能体性能对比](images/multi_agent_comparison.png)",
        "![Multi-Agent Performance Comparison](images/multi_agent_comparison.png)",
    ),
    // Insights
    ("## 💡 性能洞察", "## 💡 Performance Insights"),
    ("### Context Sharing效果", "### Context Sharing Effectiveness"),
    ("**单智能体效率**", "**Single Agent Efficiency**"),
    ("**多智能体效率**", "**Multi-Agent Efficiency**"),
    ("**可扩展性因子**", "**Scalability Factor**"),
    ("### 复杂度影响", "### Complexity Impact"),
    ("**单智能体平均Token**", "**Single Agent Avg Tokens**"),
    ("**多智能体平均Token**", "**Multi-Agent Avg Tokens**"),
    ("**复杂度开销**", "**Complexity Overhead**"),
    // Savings
    ("## 💰 Token节省分析", "## 💰 Token Savings Analysis"),
    ("### 单智能体场景", "### Single Agent Scenario"),
    ("### 多智能体场景", "### Multi-Agent Scenario"),
    ("**不使用Context Sharing**", "**Without Context Sharing**"),
    ("**使用Context Sharing**", "**With Context Sharing**"),
    ("**节省**", "**Savings**"),
    ("### 总体节省", "### Total Savings"),
    ("**总Token节省**", "**Total Token Savings**"),
    ("**总节省比例**", "**Total Savings Percentage**"),
    ("**每轮节省**", "**Per Round Savings**"),
    ("**平均每轮节省**", "**Average Per Round Savings**"),
    ("**预估成本节省**", "**Estimated Cost Savings**"),
    ("(单价 ", "(at "),
    // Recommendations
    ("## 🎯 使用建议", "## 🎯 Usage Recommendations"),
    ("### 何时使用Context Sharing", "### When to Use Context Sharing"),
    ("### 性能优化建议", "### Performance Optimization"),
    ("### 成本优化建议", "### Cost Optimization"),
    ("### 架构考虑", "### Architecture Considerations"),
    ("单智能体场景显示", "Single agent scenario shows"),
    ("多智能体场景显示", "Multi-agent scenario shows"),
    (
        "Context Sharing在多智能体环境中表现更优，适合协作型应用",
        "Context Sharing performs better in multi-agent environments, suitable for collaborative applications",
    ),
    (
        "Context Sharing有效减少Token使用，提升响应效率",
        "Context Sharing effectively reduces token usage and improves response efficiency",
    ),
    (
        "通过Context Sharing可显著降低API调用成本",
        "Context Sharing significantly reduces API call costs",
    ),
    ("- 暂无", "- None"),
    // Scalability
    ("## 📈 可扩展性分析", "## 📈 Scalability Analysis"),
    ("**扩展效率**", "**Scaling Efficiency**"),
    ("**可扩展性评级**", "**Scalability Rating**"),
    ("### 扩展建议", "### Scaling Recommendations"),
    (
        "Context Sharing展现出色的扩展性能，适合大规模部署",
        "Context Sharing shows excellent scaling performance, suitable for large-scale deployment",
    ),
    (
        "Context Sharing具备良好扩展潜力，建议在复杂场景中使用",
        "Context Sharing has good scaling potential, recommended for complex scenarios",
    ),
    (
        "建议进一步优化Context Sharing算法以提升扩展效率",
        "Further optimization of the Context Sharing algorithm is recommended to improve scaling efficiency",
    ),
    ("优秀", "Excellent"),
    ("良好", "Good"),
    ("一般", "Average"),
    ("需要优化", "Needs Optimization"),
    // Summary
    ("## 📋 总结", "## 📋 Summary"),
    (
        "本次测试验证了PC Node在Context Sharing方面的性能表现：",
        "This test validates the performance of PC Node's Context Sharing capabilities:",
    ),
    (
        "**单智能体场景**: Context Sharing带来了",
        "**Single Agent Scenario**: Context Sharing achieved",
    ),
    (
        "**多智能体场景**: Context Sharing带来了",
        "**Multi-Agent Scenario**: Context Sharing achieved",
    ),
    ("的Token效率提升", " token efficiency improvement"),
    (
        "**Token节省**: 平均每轮对话节省",
        "**Token Savings**: Average per round savings -",
    ),
    ("**Token节省**", "**Token Savings**"),
    (
        "**规模效应**: 每1000轮对话节省",
        "**Scale Projection**: Savings per 1,000 rounds -",
    ),
    (
        "*报告由PC Node自动生成 | 数据来源: 综合性能测试*",
        "*Report automatically generated by PC Node | Data source: Comprehensive performance testing*",
    ),
];

/// Regex substitutions, applied after the phrases
const PATTERN_RULES: &[(&str, &str)] = &[
    // Encoding artifacts
    (r"\x{FFFD}+", ""),
    // Recommendation phrases, the longer form first
    (r"，强烈推荐使用", ", highly recommended"),
    (r"，推荐使用", ", recommended for use"),
    (r"强烈推荐使用", "highly recommended"),
    (r"推荐使用", "recommended for use"),
    (
        r"improvement(highly recommended|recommended for use)",
        "improvement, $1",
    ),
];

/// Full-width punctuation
const PUNCTUATION_RULES: &[(&str, &str)] = &[
    ("，", ", "),
    ("。", ". "),
    ("：", ": "),
    ("；", "; "),
    ("（", " ("),
    ("）", ")"),
];

/// Whitespace cleanup, applied last
const WHITESPACE_RULES: &[(&str, &str)] = &[(r"[ \t]+", " "), (r" +\n", "\n")];

lazy_static! {
    static ref PATTERNS: Vec<(Regex, &'static str)> = compile(PATTERN_RULES);
    static ref WHITESPACE: Vec<(Regex, &'static str)> = compile(WHITESPACE_RULES);
}

fn compile(rules: &[(&'static str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, *replacement)))
        .collect()
}

/// Produce the English variant of a rendered report
pub fn translate_to_english(chinese: &str) -> String {
    let mut text = chinese.to_string();

    for (from, to) in PHRASE_RULES {
        text = text.replace(from, to);
    }
    for (re, to) in PATTERNS.iter() {
        text = re.replace_all(&text, *to).into_owned();
    }
    for (from, to) in PUNCTUATION_RULES {
        text = text.replace(from, to);
    }
    for (re, to) in WHITESPACE.iter() {
        text = re.replace_all(&text, *to).into_owned();
    }

    text
}
