//! Comparison charts (PNG, plotters bitmap backend)
//!
//! - `generate_comparison_chart`: 2x2 패널 (토큰 추이, 누적 토큰, 평균/합계 막대, 개선율)
//! - `generate_multi_agent_chart`: 에이전트별 토큰 타임라인, 턴 수, 평균 토큰/지연

use ctxbench_foundation::{ConversationResult, Error, MetricsCalculator, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const FONT_FAMILY: &str = "sans-serif";

/// Overrides the font file charts are rendered with
pub const CHART_FONT_ENV: &str = "CTXBENCH_CHART_FONT";

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/PingFang.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const WITHOUT_COLOR: RGBColor = RGBColor(214, 69, 65);
const WITH_COLOR: RGBColor = RGBColor(46, 134, 171);
const SAVINGS_COLOR: RGBColor = RGBColor(39, 174, 96);
const LOSS_COLOR: RGBColor = RGBColor(192, 57, 43);

const COMPARISON_SIZE: (u32, u32) = (1600, 1200);
const MULTI_AGENT_SIZE: (u32, u32) = (1600, 1200);

/// One labelled token series of the per-agent breakdown
#[derive(Debug, Clone)]
pub struct AgentSeries {
    pub label: String,
    pub results: Vec<ConversationResult>,
}

impl AgentSeries {
    pub fn new(label: impl Into<String>, results: Vec<ConversationResult>) -> Self {
        Self {
            label: label.into(),
            results,
        }
    }
}

/// Writes comparison charts into one output directory
#[derive(Debug, Clone)]
pub struct ChartGenerator {
    output_dir: PathBuf,
}

impl ChartGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn prepare(&self, filename: &str) -> Result<PathBuf> {
        if !ensure_font() {
            return Err(Error::Chart(format!(
                "no usable font found (set {} to a .ttf/.ttc file)",
                CHART_FONT_ENV
            )));
        }
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(filename))
    }

    /// Render the four-panel comparison of two result lists
    pub fn generate_comparison_chart(
        &self,
        scenario_a: &[ConversationResult],
        scenario_b: &[ConversationResult],
        name_a: &str,
        name_b: &str,
        title: &str,
        filename: &str,
    ) -> Result<PathBuf> {
        if scenario_a.is_empty() && scenario_b.is_empty() {
            return Err(Error::Chart("no results to plot".to_string()));
        }

        let path = self.prepare(filename)?;
        let series = [
            (name_a, tokens_of(scenario_a), WITHOUT_COLOR),
            (name_b, tokens_of(scenario_b), WITH_COLOR),
        ];

        draw_comparison(&path, title, &series, scenario_a, scenario_b)
            .map_err(|e| Error::Chart(e.to_string()))?;

        info!("📊 Chart saved: {}", path.display());
        Ok(path)
    }

    /// Render the per-agent breakdown
    pub fn generate_multi_agent_chart(
        &self,
        agents: &[AgentSeries],
        title: &str,
        filename: &str,
    ) -> Result<PathBuf> {
        if agents.iter().all(|a| a.results.is_empty()) {
            return Err(Error::Chart("no agent results to plot".to_string()));
        }

        let path = self.prepare(filename)?;
        draw_multi_agent(&path, title, agents).map_err(|e| Error::Chart(e.to_string()))?;

        info!("📊 Chart saved: {}", path.display());
        Ok(path)
    }
}

// ============================================================================
// Fonts
// ============================================================================

/// Register a font for `FONT_FAMILY` once per process
pub(crate) fn ensure_font() -> bool {
    static REGISTERED: OnceLock<bool> = OnceLock::new();

    *REGISTERED.get_or_init(|| {
        let from_env = std::env::var(CHART_FONT_ENV).ok().map(PathBuf::from);
        let candidates = from_env
            .into_iter()
            .chain(FONT_CANDIDATES.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            // plotters keeps a reference for the rest of the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                debug!("Chart font: {}", path.display());
                return true;
            }
        }

        warn!("No chart font found; charts will be skipped");
        false
    })
}

// ============================================================================
// Drawing
// ============================================================================

fn tokens_of(results: &[ConversationResult]) -> Vec<f64> {
    results.iter().map(|r| r.tokens as f64).collect()
}

fn cumulative(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

fn percent_change(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        (before - after) / before * 100.0
    } else {
        0.0
    }
}

fn draw_comparison(
    path: &Path,
    title: &str,
    series: &[(&str, Vec<f64>, RGBColor); 2],
    scenario_a: &[ConversationResult],
    scenario_b: &[ConversationResult],
) -> DrawResult<()> {
    let root = BitMapBackend::new(path, COMPARISON_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, (FONT_FAMILY, 36))?;
    let panels = root.split_evenly((2, 2));

    draw_lines(&panels[0], "Tokens per Turn", "Tokens", series)?;

    // Cumulative usage with the savings annotation
    let cumulative_series: Vec<(&str, Vec<f64>, RGBColor)> = series
        .iter()
        .map(|(name, values, color)| (*name, cumulative(values), *color))
        .collect();
    draw_lines(&panels[1], "Cumulative Tokens", "Tokens", &cumulative_series)?;

    let metrics_a = MetricsCalculator::calculate_metrics(scenario_a);
    let metrics_b = MetricsCalculator::calculate_metrics(scenario_b);
    let savings = metrics_a.total_tokens as i64 - metrics_b.total_tokens as i64;
    let savings_pct = percent_change(
        metrics_a.total_tokens as f64,
        metrics_b.total_tokens as f64,
    );
    panels[1].draw(&Text::new(
        format!("Saved: {} tokens ({:.1}%)", savings, savings_pct),
        (90, 50),
        (FONT_FAMILY, 22).into_font().color(&SAVINGS_COLOR),
    ))?;

    // Average / total side by side
    let (avg_area, total_area) = panels[2].split_horizontally((COMPARISON_SIZE.0 / 4) as i32);
    draw_bars(
        &avg_area,
        "Average Tokens",
        "Tokens",
        &[
            (series[0].0.to_string(), metrics_a.avg_tokens, WITHOUT_COLOR),
            (series[1].0.to_string(), metrics_b.avg_tokens, WITH_COLOR),
        ],
        |v| format!("{:.1}", v),
    )?;
    draw_bars(
        &total_area,
        "Total Tokens",
        "Tokens",
        &[
            (series[0].0.to_string(), metrics_a.total_tokens as f64, WITHOUT_COLOR),
            (series[1].0.to_string(), metrics_b.total_tokens as f64, WITH_COLOR),
        ],
        |v| format!("{:.0}", v),
    )?;

    // Improvements
    let avg_efficiency = percent_change(metrics_a.avg_tokens, metrics_b.avg_tokens);
    let improvement_color = |v: f64| if v >= 0.0 { SAVINGS_COLOR } else { LOSS_COLOR };
    draw_bars(
        &panels[3],
        "Improvement (%)",
        "Percent",
        &[
            (
                "Avg token efficiency".to_string(),
                avg_efficiency,
                improvement_color(avg_efficiency),
            ),
            (
                "Total cost savings".to_string(),
                savings_pct,
                improvement_color(savings_pct),
            ),
        ],
        |v| format!("{:.1}%", v),
    )?;

    root.present()?;
    Ok(())
}

fn draw_multi_agent(path: &Path, title: &str, agents: &[AgentSeries]) -> DrawResult<()> {
    let root = BitMapBackend::new(path, MULTI_AGENT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, (FONT_FAMILY, 36))?;
    let panels = root.split_evenly((2, 2));

    let colors: Vec<RGBColor> = (0..agents.len())
        .map(|i| {
            let (r, g, b) = Palette99::pick(i).rgb();
            RGBColor(r, g, b)
        })
        .collect();

    let timeline: Vec<(&str, Vec<f64>, RGBColor)> = agents
        .iter()
        .zip(&colors)
        .map(|(a, c)| (a.label.as_str(), tokens_of(&a.results), *c))
        .collect();
    draw_lines(&panels[0], "Token Timeline per Agent", "Tokens", &timeline)?;

    let bars = |value: &dyn Fn(&[ConversationResult]) -> f64| -> Vec<(String, f64, RGBColor)> {
        agents
            .iter()
            .zip(&colors)
            .map(|(a, c)| (a.label.clone(), value(&a.results), *c))
            .collect()
    };

    draw_bars(
        &panels[1],
        "Turns per Agent",
        "Turns",
        &bars(&|r| r.len() as f64),
        |v| format!("{:.0}", v),
    )?;
    draw_bars(
        &panels[2],
        "Average Tokens per Agent",
        "Tokens",
        &bars(&|r| MetricsCalculator::calculate_metrics(r).avg_tokens),
        |v| format!("{:.1}", v),
    )?;
    draw_bars(
        &panels[3],
        "Average Response Time per Agent",
        "Milliseconds",
        &bars(&|r| MetricsCalculator::calculate_metrics(r).avg_response_time * 1000.0),
        |v| format!("{:.0}", v),
    )?;

    root.present()?;
    Ok(())
}

fn draw_lines(
    area: &Panel<'_>,
    caption: &str,
    y_desc: &str,
    series: &[(&str, Vec<f64>, RGBColor)],
) -> DrawResult<()> {
    let turns = series.iter().map(|(_, v, _)| v.len()).max().unwrap_or(0).max(2);
    let y_max = series
        .iter()
        .flat_map(|(_, v, _)| v.iter().copied())
        .fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT_FAMILY, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(1usize..turns, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Turn")
        .y_desc(y_desc)
        .draw()?;

    for (name, values, color) in series {
        let color = *color;
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, v)| (i + 1, *v)),
                color.stroke_width(2),
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_bars(
    area: &Panel<'_>,
    caption: &str,
    y_desc: &str,
    bars: &[(String, f64, RGBColor)],
    format_value: impl Fn(f64) -> String,
) -> DrawResult<()> {
    let lo = bars.iter().map(|(_, v, _)| *v).fold(0.0f64, f64::min);
    let hi = bars.iter().map(|(_, v, _)| *v).fold(0.0f64, f64::max);
    let pad = if hi - lo > 0.0 { (hi - lo) * 0.15 } else { 1.0 };
    let y_range = (if lo < 0.0 { lo - pad } else { 0.0 })..(hi + pad);
    let x_range = -0.5..(bars.len().max(1) as f64 - 0.5);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT_FAMILY, 24))
        .margin(15)
        .x_label_area_size(10)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc(y_desc)
        .draw()?;

    for (i, (name, value, color)) in bars.iter().enumerate() {
        let x = i as f64;
        let color = *color;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - 0.35, 0.0), (x + 0.35, *value)],
                color.filled(),
            )))?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        let anchor = if *value >= 0.0 {
            Pos::new(HPos::Center, VPos::Bottom)
        } else {
            Pos::new(HPos::Center, VPos::Top)
        };
        chart.draw_series(std::iter::once(Text::new(
            format_value(*value),
            (x, *value),
            TextStyle::from((FONT_FAMILY, 18).into_font()).pos(anchor),
        )))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative() {
        assert_eq!(cumulative(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
        assert!(cumulative(&[]).is_empty());
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(100.0, 80.0), 20.0);
        assert_eq!(percent_change(0.0, 80.0), 0.0);
    }

    #[test]
    fn test_empty_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ChartGenerator::new(dir.path());

        let err = generator
            .generate_comparison_chart(&[], &[], "A", "B", "t", "x.png")
            .unwrap_err();
        assert!(matches!(err, Error::Chart(_)));

        let err = generator
            .generate_multi_agent_chart(&[AgentSeries::new("a", vec![])], "t", "y.png")
            .unwrap_err();
        assert!(matches!(err, Error::Chart(_)));
        assert!(!dir.path().join("x.png").exists());
    }

    fn results(tokens: &[u64]) -> Vec<ConversationResult> {
        tokens
            .iter()
            .map(|&t| {
                if t == 0 {
                    ConversationResult::failed(0.2)
                } else {
                    ConversationResult::new("ok", t, 0.5)
                }
            })
            .collect()
    }

    fn assert_png(path: &Path) {
        let len = std::fs::metadata(path).unwrap().len();
        assert!(len > 0, "empty chart: {}", path.display());
    }

    // 폰트가 없는 환경에서는 렌더링 테스트를 건너뜀
    #[test]
    fn test_comparison_chart_creates_output_dir() {
        if !ensure_font() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("charts");
        let generator = ChartGenerator::new(&out);

        let path = generator
            .generate_comparison_chart(
                &results(&[100, 105, 110]),
                &results(&[40, 42, 44]),
                "A",
                "B",
                "Comparison",
                "comparison.png",
            )
            .unwrap();

        assert_eq!(path, out.join("comparison.png"));
        assert_png(&path);
    }

    #[test]
    fn test_comparison_chart_edge_cases() {
        if !ensure_font() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let generator = ChartGenerator::new(dir.path().join("edge"));

        // B uses more tokens than A
        let worse = generator
            .generate_comparison_chart(&results(&[40]), &results(&[100]), "A", "B", "t", "worse.png")
            .unwrap();
        assert_png(&worse);

        // Every request failed
        let failed = generator
            .generate_comparison_chart(&results(&[0, 0]), &results(&[0]), "A", "B", "t", "zero.png")
            .unwrap();
        assert_png(&failed);
    }

    #[test]
    fn test_multi_agent_chart() {
        if !ensure_font() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let generator = ChartGenerator::new(dir.path().join("agents"));
        let series = [
            AgentSeries::new("Alice (Without)", results(&[100, 300])),
            AgentSeries::new("Alice (With)", results(&[10, 30])),
            AgentSeries::new("Bob (Without)", results(&[200])),
            AgentSeries::new("Bob (With)", results(&[0])),
        ];

        let path = generator
            .generate_multi_agent_chart(&series, "Breakdown", "agents.png")
            .unwrap();
        assert!(path.starts_with(dir.path().join("agents")));
        assert_png(&path);
    }
}
