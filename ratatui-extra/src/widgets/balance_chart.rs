use av_common::balance::{BalanceHistory, DaySeriesPoint};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::Style,
    symbols::Marker,
    widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget},
};

use crate::{
    extensions::{RectExt, ThemedWidget},
    thematize::Thematize,
};

pub const TOTAL_SERIES_NAME: &str = "Total USD";
pub const EMPTY_MESSAGE: &str = "No balance history";

/// One line of the chart, points are `(day index, usd)` with the oldest day
/// at index 0.
#[derive(Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Line chart of a balance history, one line per tracked token plus the
/// total, oldest day on the left.
pub struct BalanceChart<'a> {
    history: &'a BalanceHistory,
    date_format: &'a str,
}

impl<'a> BalanceChart<'a> {
    pub fn new(history: &'a BalanceHistory) -> Self {
        Self {
            history,
            date_format: "%b %d",
        }
    }

    pub fn date_format(mut self, date_format: &'a str) -> Self {
        self.date_format = date_format;
        self
    }

    /// Token series in ranking order followed by the total. A token missing
    /// on some day is plotted at zero for that day.
    pub fn series(&self) -> Vec<Series> {
        let mut series: Vec<Series> = self
            .history
            .tracked_tokens
            .iter()
            .map(|symbol| Series {
                name: symbol.clone(),
                points: self.points(|point| point.quote(symbol).unwrap_or(0.0)),
            })
            .collect();

        series.push(Series {
            name: TOTAL_SERIES_NAME.to_string(),
            points: self.points(|point| point.total_usd),
        });

        series
    }

    fn points(&self, value: impl Fn(&DaySeriesPoint) -> f64) -> Vec<(f64, f64)> {
        self.history
            .chronological()
            .enumerate()
            .map(|(i, point)| (i as f64, value(point)))
            .collect()
    }

    pub fn x_labels(&self) -> Vec<String> {
        let dates: Vec<String> = self
            .history
            .chronological()
            .map(|point| point.date.format(self.date_format).to_string())
            .collect();

        match dates.len() {
            0 => vec![],
            1 | 2 => dates,
            n => vec![
                dates[0].clone(),
                dates[(n - 1) / 2].clone(),
                dates[n - 1].clone(),
            ],
        }
    }

    fn y_max(&self) -> f64 {
        let max = self
            .history
            .max_total_usd()
            .max(self.history.max_token_quote());
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }
}

/// Compact dollar amount for axis labels, e.g. `$950`, `$12.3k`, `$1.5M`.
pub fn format_usd(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("${:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("${:.1}k", value / 1_000.0)
    } else {
        format!("${value:.0}")
    }
}

impl ThemedWidget for BalanceChart<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &impl Thematize) {
        if self.history.is_empty() {
            let middle = area.margin_top(area.height / 2).change_height(1);
            Paragraph::new(EMPTY_MESSAGE)
                .alignment(Alignment::Center)
                .style(theme.style_dim())
                .render(middle, buf);
            return;
        }

        let series = self.series();
        let day_count = self.history.series.len();
        // a single point has no segment to draw
        let graph_type = if day_count == 1 {
            GraphType::Scatter
        } else {
            GraphType::Line
        };

        let total_index = series.len() - 1;
        let datasets: Vec<Dataset> = series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let style = if i == total_index {
                    theme.total_style()
                } else {
                    Style::default().fg(theme.series_color(i))
                };
                Dataset::default()
                    .name(s.name.as_str())
                    .marker(Marker::Braille)
                    .graph_type(graph_type)
                    .style(style)
                    .data(&s.points)
            })
            .collect();

        let y_max = self.y_max();
        let x_axis = Axis::default()
            .style(theme.style_dim())
            .bounds([0.0, (day_count.saturating_sub(1)).max(1) as f64])
            .labels(self.x_labels());
        let y_axis = Axis::default()
            .style(theme.style_dim())
            .bounds([0.0, y_max])
            .labels([
                format_usd(0.0),
                format_usd(y_max / 2.0),
                format_usd(y_max),
            ]);

        Chart::new(datasets)
            .style(theme.style())
            .x_axis(x_axis)
            .y_axis(y_axis)
            .legend_position(Some(LegendPosition::TopLeft))
            .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)))
            .render(area, buf);
    }
}
