use crate::domain::Stats;
use crate::error::{Result, StatsError};
use crate::services::analysis::Sample;
use chrono::DateTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::path::Path;

const SIZE: (u32, u32) = (1500, 1000);
const FONT_FAMILY: &str = "sans-serif";
static FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
const ORANGE: RGBColor = RGBColor(255, 165, 0);

struct Panel {
    title: &'static str,
    color: RGBColor,
    value: fn(&Stats) -> u64,
}

fn panels() -> [Panel; 4] {
    [
        Panel {
            title: "AI Agents",
            color: BLUE,
            value: |s| s.ai_agents,
        },
        Panel {
            title: "Submolts",
            color: GREEN,
            value: |s| s.submolts,
        },
        Panel {
            title: "Posts",
            color: RED,
            value: |s| s.posts,
        },
        Panel {
            title: "Comments",
            color: ORANGE,
            value: |s| s.comments,
        },
    ]
}

/// Axis label for a count: `950`, `1.5K`, `2.0M`.
fn compact(value: f64) -> String {
    if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{}", value as i64)
    }
}

fn date_label(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.naive_utc().format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Sample times as seconds on a naive clock, so labels show the recorded
/// wall time unchanged.
fn seconds(sample: &Sample) -> i64 {
    sample.at.and_utc().timestamp()
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    samples: &[Sample],
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let root = root.titled("Moltbook Statistics Over Time", (FONT_FAMILY, 32))?;

    let (mut x_min, mut x_max) = samples
        .iter()
        .map(seconds)
        .fold((i64::MAX, i64::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if x_min >= x_max {
        x_min -= 3600;
        x_max += 3600;
    }

    for (area, panel) in root.split_evenly((2, 2)).iter().zip(panels().iter()) {
        let points: Vec<(i64, f64)> = samples
            .iter()
            .map(|s| (seconds(s), (panel.value)(&s.stats) as f64))
            .collect();
        let y_max = points.iter().map(|&(_, y)| y).fold(0.0, f64::max).max(1.0) * 1.1;

        let mut chart = ChartBuilder::on(area)
            .caption(panel.title, (FONT_FAMILY, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Count")
            .x_labels(6)
            .x_label_formatter(&|x| date_label(*x))
            .y_label_formatter(&|y| compact(*y))
            .light_line_style(BLACK.mix(0.05))
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().copied(), &panel.color))?;
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 3, panel.color.filled())),
        )?;
    }

    root.present()
}

/// The bitmap backend rasterizes text itself and needs glyphs registered
/// under the family name the charts ask for. Registering again is a no-op.
fn register_fonts() -> Result<()> {
    register_font(FONT_FAMILY, FontStyle::Normal, FONT)
        .map_err(|_| StatsError::Chart("bundled font could not be loaded".to_string()))
}

/// Writes the 2x2 chart grid as PNG and SVG.
pub fn render_charts(samples: &[Sample], png: &Path, svg: &Path) -> Result<()> {
    if samples.is_empty() {
        return Err(StatsError::Chart("no samples to plot".to_string()));
    }
    register_fonts()?;

    draw(BitMapBackend::new(png, SIZE).into_drawing_area(), samples)
        .map_err(|e| StatsError::Chart(e.to_string()))?;
    draw(SVGBackend::new(svg, SIZE).into_drawing_area(), samples)
        .map_err(|e| StatsError::Chart(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn counts_are_compacted() {
        assert_eq!(compact(950.0), "950");
        assert_eq!(compact(1500.0), "1.5K");
        assert_eq!(compact(2_000_000.0), "2.0M");
    }

    #[test]
    fn svg_and_png_are_written() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("stats.png");
        let svg = dir.path().join("stats.svg");
        let at = NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let samples = vec![
            Sample {
                at,
                stats: Stats {
                    ai_agents: 1000,
                    submolts: 10,
                    posts: 200,
                    comments: 30,
                },
            },
            Sample {
                at: at + chrono::Duration::hours(1),
                stats: Stats {
                    ai_agents: 1500,
                    submolts: 12,
                    posts: 260,
                    comments: 45,
                },
            },
        ];

        render_charts(&samples, &png, &svg).unwrap();

        assert!(std::fs::metadata(&png).unwrap().len() > 0);
        let markup = std::fs::read_to_string(&svg).unwrap();
        assert!(markup.contains("<svg"));
        assert!(markup.contains("Moltbook Statistics Over Time"));
    }

    #[test]
    fn single_sample_renders_titles_on_the_bitmap() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("one.png");
        let svg = dir.path().join("one.svg");
        let at = NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(23, 20, 47)
            .unwrap();
        let sample = Sample {
            at,
            stats: Stats {
                ai_agents: 1234,
                submolts: 56,
                posts: 789,
                comments: 10,
            },
        };

        let outcome = std::panic::catch_unwind(|| render_charts(&[sample], &png, &svg));

        assert!(matches!(outcome, Ok(Ok(()))));
        assert!(std::fs::metadata(&png).unwrap().len() > 0);
    }

    #[test]
    fn nothing_to_plot_is_an_error() {
        let dir = tempdir().unwrap();
        let result = render_charts(&[], &dir.path().join("a.png"), &dir.path().join("a.svg"));
        assert!(matches!(result, Err(StatsError::Chart(_))));
    }
}
