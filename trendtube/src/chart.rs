use crate::error::{Result, TrendError};
use crate::trending::{FrequencyTable, Target, Trending};
use chrono::{DateTime, Utc};
use log::info;
use std::fmt;
use std::fs;
use std::path::Path;

pub const TITLE_CAPTION: &str = "Frequency of Words from YouTube Video Titles on the Trending Page";
pub const TAG_CAPTION: &str = "Frequency of a Given Tag on the YouTube Trending Page";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BAR_COLOR: &str = "darkorange";
const WIDTH: usize = 960;
const MARGIN: usize = 40;
const HEADER: usize = 70;
const AXIS: usize = 30;
const ROW: usize = 22;
const TEXT_BAR_WIDTH: usize = 40;

/// Horizontal bar chart of a frequency table. Bars are kept in table order,
/// so the most frequent term is drawn at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    caption: String,
    captured_at: DateTime<Utc>,
    bars: Vec<(String, usize)>,
}

impl BarChart {
    pub fn new(
        caption: impl Into<String>,
        captured_at: DateTime<Utc>,
        table: &FrequencyTable,
    ) -> Self {
        BarChart {
            caption: caption.into(),
            captured_at,
            bars: table.entries().to_vec(),
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn timestamp(&self) -> String {
        self.captured_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn bars(&self) -> &[(String, usize)] {
        &self.bars
    }

    fn max_count(&self) -> usize {
        self.bars.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }

    pub fn render_svg(&self) -> String {
        Svg(self).to_string()
    }

    /// Text rendering for the terminal, most frequent term first.
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    pub fn save_svg(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render_svg())?;
        info!("Wrote chart to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.caption)?;
        writeln!(f, "{}", self.timestamp())?;
        if self.bars.is_empty() {
            return writeln!(f, "(no terms met the threshold)");
        }

        let label_width = self
            .bars
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let max = self.max_count().max(1);
        for (label, count) in self.bars.iter().rev() {
            let filled = (count * TEXT_BAR_WIDTH).div_ceil(max);
            writeln!(f, "{label:<label_width$} | {} {count}", "█".repeat(filled))?;
        }
        Ok(())
    }
}

struct Svg<'a>(&'a BarChart);

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.0;
        let ticks = chart.max_count() + 1;
        let plot_width = WIDTH - 2 * MARGIN;
        let plot_height = ROW * chart.bars.len().max(1);
        let height = HEADER + plot_height + AXIS + MARGIN;
        let unit = plot_width as f64 / ticks as f64;
        let bottom = HEADER + plot_height;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" font-family="sans-serif">"#
        )?;
        writeln!(f, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            f,
            r#"  <text x="{}" y="28" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
            WIDTH / 2,
            escape(&chart.caption)
        )?;
        writeln!(
            f,
            r#"  <text x="{}" y="50" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
            WIDTH / 2,
            chart.timestamp()
        )?;

        // Grid sits behind the bars.
        for tick in 0..=ticks {
            let x = MARGIN as f64 + tick as f64 * unit;
            writeln!(
                f,
                r##"  <line x1="{x:.1}" y1="{HEADER}" x2="{x:.1}" y2="{bottom}" stroke="#d0d0d0" stroke-width="1"/>"##
            )?;
            writeln!(
                f,
                r#"  <text x="{x:.1}" y="{}" text-anchor="middle" font-size="11">{tick}</text>"#,
                bottom + 16
            )?;
        }

        for (row, (label, count)) in chart.bars.iter().rev().enumerate() {
            let y = HEADER + row * ROW;
            let bar_width = *count as f64 * unit;
            writeln!(
                f,
                r#"  <rect x="{MARGIN}" y="{}" width="{bar_width:.1}" height="{}" fill="{BAR_COLOR}"/>"#,
                y + 2,
                ROW - 4
            )?;
            writeln!(
                f,
                r#"  <text x="{}" y="{}" font-size="12">{}</text>"#,
                MARGIN + 4,
                y + ROW / 2 + 4,
                escape(label)
            )?;
        }

        writeln!(
            f,
            r#"  <line x1="{MARGIN}" y1="{bottom}" x2="{}" y2="{bottom}" stroke="black" stroke-width="1"/>"#,
            WIDTH - MARGIN
        )?;
        writeln!(f, "</svg>")
    }
}

impl Trending {
    /// The chart for `target`, computing its frequency table with `threshold`
    /// first if there is none. `None` when no target is selected.
    pub fn bar_chart(
        &mut self,
        target: Option<Target>,
        threshold: usize,
    ) -> Result<Option<BarChart>> {
        let Some(target) = target else {
            return Ok(None);
        };
        let captured_at = self.date().ok_or_else(|| {
            TrendError::InvalidState("snapshot has no capture time; fetch videos first".to_string())
        })?;

        let caption = match target {
            Target::Title => TITLE_CAPTION,
            Target::Tag => TAG_CAPTION,
        };
        let table = self.frequencies_or_compute(target, threshold);
        Ok(Some(BarChart::new(caption, captured_at, table)))
    }

    /// Render the chart for `target` to an SVG file at `output` and print it
    /// to stdout. Does nothing when no target is selected.
    pub fn bar_plot(
        &mut self,
        target: Option<Target>,
        threshold: usize,
        output: &Path,
    ) -> Result<()> {
        let Some(chart) = self.bar_chart(target, threshold)? else {
            return Ok(());
        };
        chart.save_svg(output)?;
        print!("{}", chart.render_text());
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trending::CombineOptions;
    use crate::video::Video;
    use chrono::TimeZone;

    fn captured() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 11, 2, 18, 4, 9).unwrap()
    }

    fn table(terms: &[&str]) -> FrequencyTable {
        let terms: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
        FrequencyTable::from_terms(&terms, 1)
    }

    #[test]
    fn timestamp_uses_fixed_format() {
        let chart = BarChart::new(TAG_CAPTION, captured(), &FrequencyTable::default());
        assert_eq!(chart.timestamp(), "2020-11-02 18:04:09");
    }

    #[test]
    fn svg_has_one_bar_per_entry() {
        let chart = BarChart::new(TAG_CAPTION, captured(), &table(&["a", "b", "b", "c&d"]));
        let svg = chart.render_svg();

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches(r#"fill="darkorange""#).count(), 3);
        assert!(svg.contains("c&amp;d"));
        assert!(svg.contains(TAG_CAPTION));
        assert!(svg.contains("2020-11-02 18:04:09"));
    }

    #[test]
    fn text_puts_most_frequent_first() {
        let chart = BarChart::new(
            TITLE_CAPTION,
            captured(),
            &table(&["rare", "common", "common"]),
        );
        let text = chart.render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], TITLE_CAPTION);
        assert_eq!(lines[1], "2020-11-02 18:04:09");
        assert!(lines[2].starts_with("common"));
        assert!(lines[2].ends_with(" 2"));
        assert!(lines[3].starts_with("rare"));
    }

    #[test]
    fn empty_chart_renders_both_forms() {
        let chart = BarChart::new(TAG_CAPTION, captured(), &FrequencyTable::default());
        let svg = chart.render_svg();

        assert!(svg.ends_with("</svg>\n"));
        assert!(!svg.contains(r#"fill="darkorange""#));
        assert_eq!(chart.render_text(), chart.to_string());
        assert!(chart.render_text().ends_with("(no terms met the threshold)\n"));
    }

    #[test]
    fn bar_chart_computes_missing_table() {
        let mut trending = Trending::from_videos(
            vec![
                Video::with_details("a", "t", Some(vec!["music".into(), "live".into()])),
                Video::with_details("b", "t", Some(vec!["music".into()])),
            ],
            captured(),
        );
        trending.combine_tags(CombineOptions::default()).unwrap();

        let chart = trending.bar_chart(Some(Target::Tag), 2).unwrap().unwrap();
        assert_eq!(chart.bars(), &[("music".to_string(), 2)]);
        assert!(trending.tag_frequencies().is_some());
        assert!(trending.bar_chart(None, 2).unwrap().is_none());
    }

    #[test]
    fn chart_without_capture_time_is_invalid() {
        let mut trending = Trending::new();
        assert!(matches!(
            trending.bar_chart(Some(Target::Title), 1),
            Err(TrendError::InvalidState(_))
        ));
    }
}
