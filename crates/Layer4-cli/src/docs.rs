//! Docs publishing
//!
//! 차트를 `{docs}/images/`로 복사하고 중국어/영어 리포트를 docs 루트에 씁니다.
//! 리포트의 이미지 경로(`images/*.png`)가 이 배치를 가정합니다.

use ctxbench_foundation::{ArtifactStore, Error, Result};
use ctxbench_scenario::{render_markdown, translate_to_english, ComprehensiveAnalysis};
use std::path::{Path, PathBuf};
use tracing::info;

pub const ZH_REPORT: &str = "pc_node_performance_report.zh.md";
pub const EN_REPORT: &str = "pc_node_performance_report.md";

pub fn publish(docs_dir: &Path, charts_dir: &Path, analysis: &ComprehensiveAnalysis) -> Result<()> {
    let docs = ArtifactStore::new(docs_dir);
    let images = docs.subdir("images");
    images.ensure_dir()?;

    if charts_dir.is_dir() {
        for entry in std::fs::read_dir(charts_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "png") {
                images.copy_in(&path)?;
                println!("📊 Chart copied: {}", path.display());
            }
        }
    }

    let report = render_markdown(analysis);
    let zh = write_report(&docs, ZH_REPORT, &report)?;
    let en = write_report(&docs, EN_REPORT, &translate_to_english(&report))?;

    info!("Published reports: {}, {}", zh.display(), en.display());
    Ok(())
}

fn write_report(docs: &ArtifactStore, filename: &str, content: &str) -> Result<PathBuf> {
    docs.save_text(filename, content)
        .map_err(|e| Error::Report(format!("Failed to write {}: {}", filename, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxbench_scenario::DataAnalyzer;
    use tempfile::TempDir;

    #[test]
    fn test_publish_copies_only_png() {
        let temp = TempDir::new().unwrap();
        let charts = temp.path().join("charts");
        std::fs::create_dir_all(&charts).unwrap();
        std::fs::write(charts.join("single_agent_comparison.png"), b"png").unwrap();
        std::fs::write(charts.join("notes.txt"), b"txt").unwrap();

        let docs = temp.path().join("docs");
        let analysis = DataAnalyzer::default().analyze_runs(None, None);
        publish(&docs, &charts, &analysis).unwrap();

        assert!(docs.join("images/single_agent_comparison.png").exists());
        assert!(!docs.join("images/notes.txt").exists());
        assert!(docs.join(ZH_REPORT).exists());
        assert!(docs.join(EN_REPORT).exists());
    }

    #[test]
    fn test_unwritable_report_is_report_error() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        // A directory where the report file should go
        std::fs::create_dir_all(docs.join(ZH_REPORT)).unwrap();

        let analysis = DataAnalyzer::default().analyze_runs(None, None);
        let err = publish(&docs, &temp.path().join("missing"), &analysis).unwrap_err();
        assert!(matches!(err, Error::Report(_)));
        assert!(err.to_string().contains(ZH_REPORT));
    }

    #[test]
    fn test_publish_without_charts() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        let analysis = DataAnalyzer::default().analyze_runs(None, None);

        publish(&docs, &temp.path().join("missing"), &analysis).unwrap();
        assert!(docs.join("images").is_dir());
    }
}
