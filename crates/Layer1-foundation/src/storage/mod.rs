//! Storage module for ctxbench
//!
//! - `artifact`: 결과 디렉토리 - JSON 덤프, Markdown 리포트, 차트 복사

mod artifact;

pub use artifact::{run_timestamp, ArtifactStore};
