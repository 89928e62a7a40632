//! Bar charts of frequency sequences.
//!
//! A [`BarChart`] is a plain description built from
//! [`Aggregator::top_n_by_frequency`](crate::Aggregator::top_n_by_frequency)
//! output. Drawing it is the job of a [`ChartRenderer`]; the crate ships
//! [`TextChartRenderer`], which draws block-character bars to any writer.

use crate::aggregate::Frequency;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Rows used for the tallest bar of a vertical chart.
const VERTICAL_HEIGHT: usize = 12;

const BLOCK: &str = "█";

/// Direction the bars grow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bars grow upwards, categories along the bottom.
    Vertical,
    /// Bars grow to the right, one category per line.
    Horizontal,
}

/// Description of a bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    pub orientation: Orientation,
    pub bars: Vec<Frequency>,
}

impl BarChart {
    pub fn new(
        title: impl Into<String>,
        category_label: impl Into<String>,
        value_label: impl Into<String>,
        orientation: Orientation,
        bars: Vec<Frequency>,
    ) -> Self {
        Self {
            title: title.into(),
            category_label: category_label.into(),
            value_label: value_label.into(),
            orientation,
            bars,
        }
    }

    /// Countries with the most stores.
    pub fn top_countries(bars: Vec<Frequency>, n: usize) -> Self {
        Self::new(
            format!("Top {} countries by store count", n),
            "Country",
            "Stores",
            Orientation::Vertical,
            bars,
        )
    }

    /// Cities with the most stores.
    pub fn top_cities(bars: Vec<Frequency>, n: usize) -> Self {
        Self::new(
            format!("Top {} cities by store count", n),
            "City",
            "Stores",
            Orientation::Vertical,
            bars,
        )
    }

    /// Cities with the most stores inside one country.
    pub fn top_cities_in(country: &str, bars: Vec<Frequency>, n: usize) -> Self {
        Self::new(
            format!("Top {} cities in {} by store count", n, country),
            "City",
            "Stores",
            Orientation::Horizontal,
            bars,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Largest count among the bars, 0 when there are none.
    pub fn max_count(&self) -> usize {
        self.bars.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }
}

/// Something that can draw a [`BarChart`].
pub trait ChartRenderer {
    fn render(&mut self, chart: &BarChart) -> Result<()>;
}

/// Draws charts as text.
pub struct TextChartRenderer<W: Write> {
    out: W,
    width: usize,
}

impl TextChartRenderer<io::Stdout> {
    /// Renderer writing to standard output.
    pub fn stdout(width: usize) -> Self {
        Self::new(io::stdout(), width)
    }
}

impl<W: Write> TextChartRenderer<W> {
    /// `width` is the length in characters of the longest horizontal bar.
    pub fn new(out: W, width: usize) -> Self {
        Self { out, width }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TextChartRenderer<W> {
    fn render(&mut self, chart: &BarChart) -> Result<()> {
        writeln!(self.out, "{}", render_text(chart, self.width))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Render a chart to a string.
pub fn render_text(chart: &BarChart, width: usize) -> String {
    let mut lines = vec![chart.title.clone(), "=".repeat(chart.title.chars().count())];

    if chart.is_empty() {
        lines.push("(no data)".to_string());
    } else {
        match chart.orientation {
            Orientation::Horizontal => render_horizontal(chart, width, &mut lines),
            Orientation::Vertical => render_vertical(chart, &mut lines),
        }
    }

    lines.join("\n")
}

/// Length of a bar for `count`, scaled so that `max` spans `span` cells.
///
/// Non-zero counts always get at least one cell.
fn scaled(count: usize, max: usize, span: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    ((count * span + max / 2) / max).max(1)
}

fn render_horizontal(chart: &BarChart, width: usize, lines: &mut Vec<String>) {
    let max = chart.max_count();
    let label_width = chart
        .bars
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain(std::iter::once(chart.category_label.chars().count()))
        .max()
        .unwrap_or(0);

    lines.push(format!(
        "{:<label_width$} | {}",
        chart.category_label, chart.value_label
    ));
    for (label, count) in &chart.bars {
        lines.push(format!(
            "{:<label_width$} | {} {}",
            label,
            BLOCK.repeat(scaled(*count, max, width)),
            count
        ));
    }
}

fn render_vertical(chart: &BarChart, lines: &mut Vec<String>) {
    let max = chart.max_count();
    let heights: Vec<usize> = chart
        .bars
        .iter()
        .map(|(_, count)| scaled(*count, max, VERTICAL_HEIGHT))
        .collect();
    let axis_width = max.to_string().len().max(chart.value_label.chars().count());

    lines.push(format!("{:>axis_width$}", chart.value_label));
    for level in (1..=VERTICAL_HEIGHT).rev() {
        let tick = if level == VERTICAL_HEIGHT {
            max.to_string()
        } else {
            String::new()
        };
        let mut line = format!("{:>axis_width$} |", tick);
        for height in &heights {
            line.push_str(if *height >= level { "  █" } else { "   " });
        }
        lines.push(line.trim_end().to_string());
    }
    lines.push(format!(
        "{:>axis_width$} +{}",
        "",
        "-".repeat(heights.len() * 3 + 1)
    ));

    let mut index_line = format!("{:>axis_width$}  ", "");
    for position in 1..=heights.len() {
        index_line.push_str(&format!("{:>3}", position));
    }
    lines.push(index_line.trim_end().to_string());

    lines.push(format!("{}:", chart.category_label));
    for (position, (label, count)) in chart.bars.iter().enumerate() {
        lines.push(format!("  {:>2}. {} ({})", position + 1, label, count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bars() -> Vec<Frequency> {
        vec![
            ("Shanghai".to_string(), 40),
            ("Beijing".to_string(), 20),
            ("Hangzhou".to_string(), 1),
        ]
    }

    #[test]
    fn test_scaled() {
        assert_eq!(scaled(40, 40, 20), 20);
        assert_eq!(scaled(20, 40, 20), 10);
        assert_eq!(scaled(1, 40, 20), 1);
        assert_eq!(scaled(0, 40, 20), 0);
        assert_eq!(scaled(3, 0, 20), 0);
    }

    #[test]
    fn test_horizontal_render() {
        let chart = BarChart::top_cities_in("CN", bars(), 3);
        let text = render_text(&chart, 20);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Top 3 cities in CN by store count");
        assert_eq!(lines[2], "City     | Stores");
        assert_eq!(lines[3], format!("Shanghai | {} 40", "█".repeat(20)));
        assert_eq!(lines[4], format!("Beijing  | {} 20", "█".repeat(10)));
        assert_eq!(lines[5], "Hangzhou | █ 1");
    }

    #[test]
    fn test_vertical_render() {
        let chart = BarChart::top_countries(
            vec![("US".to_string(), 12), ("CN".to_string(), 6)],
            2,
        );
        let text = render_text(&chart, 20);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Top 2 countries by store count");
        assert_eq!(lines[2], "Stores");
        // Tallest level: only the first bar reaches it.
        assert_eq!(lines[3], "    12 |  █");
        // Half height: both bars.
        assert_eq!(lines[3 + VERTICAL_HEIGHT / 2], "       |  █  █");
        assert!(text.contains("   1. US (12)"));
        assert!(text.contains("   2. CN (6)"));
    }

    #[test]
    fn test_empty_chart() {
        let chart = BarChart::top_cities(Vec::new(), 10);
        assert!(render_text(&chart, 20).ends_with("(no data)"));
    }

    #[test]
    fn test_text_renderer_writes_to_sink() {
        let mut renderer = TextChartRenderer::new(Vec::new(), 10);
        renderer.render(&BarChart::top_cities(bars(), 3)).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.starts_with("Top 3 cities by store count\n"));
        assert!(output.contains("Shanghai (40)"));
    }

    #[test]
    fn test_chart_serialization() {
        let chart = BarChart::top_countries(vec![("US".to_string(), 2)], 10);
        let json = serde_json::to_string(&chart).unwrap();
        assert!(json.contains("\"orientation\":\"vertical\""));
        assert!(json.contains("[\"US\",2]"));
    }
}
