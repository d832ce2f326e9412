//! Config - 벤치마크 설정 관리
//!
//! - `bench.rs` - BenchConfig 통합 설정 (로드, 검증, 환경 변수 오버라이드)
//! - `script.rs` - 단일/다중 에이전트 대화 스크립트

mod bench;
mod script;

pub use bench::{BenchConfig, TestConfig, BASE_URL_ENV};
pub use script::{AgentProfile, MultiAgentScript, ScriptedTurn, SingleAgentScript};
