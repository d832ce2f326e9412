//! # ctxbench-foundation
//!
//! Foundation layer for ctxbench:
//! - Config: 벤치마크 설정 (BenchConfig, 대화 스크립트)
//! - Metrics: 턴별 결과 (ConversationResult), 지표 계산, 시나리오 비교
//! - Storage: 결과 아티팩트 (JSON, Markdown, 차트 복사)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Runner (Layer4)                                     │
//! │      │                                               │
//! │      ▼                                               │
//! │  Scenario testers ──► ChatClient (Layer2)            │
//! │      │                                               │
//! │      ▼                                               │
//! │  MetricsCalculator ──► ScenarioComparison            │
//! │      │                                               │
//! │      ▼                                               │
//! │  Analyzer / Report ──► ArtifactStore                 │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{
    AgentProfile, BenchConfig, MultiAgentScript, ScriptedTurn, SingleAgentScript, TestConfig,
    BASE_URL_ENV,
};

// ============================================================================
// Metrics
// ============================================================================
pub use metrics::{
    ComparisonSummary, ConversationResult, CostEstimate, Improvements, MetricsCalculator,
    PerformanceMetrics, ScenarioComparison, WITHOUT_CONTEXT_SHARING, WITH_CONTEXT_SHARING,
};

// ============================================================================
// Storage
// ============================================================================
pub use storage::{run_timestamp, ArtifactStore};
