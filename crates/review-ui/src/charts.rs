//! Line charts of daily review counts.
//!
//! Each chart draws two lines over the same day axis: all reviews and
//! top-reviewer reviews. The selected day, if any, is marked with a single
//! scatter point.

use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use review_data::series::{ChartTimeUnit, DailySeries};

use crate::themes::Theme;

/// Render `series` as a two-line chart into `area`.
pub fn render_series_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &DailySeries,
    unit: ChartTimeUnit,
    selected: Option<usize>,
    theme: &Theme,
) {
    let totals = points(&series.totals);
    let tops = points(&series.tops);
    let marker: Vec<(f64, f64)> = selected
        .and_then(|i| totals.get(i).copied())
        .into_iter()
        .collect();

    let mut datasets = vec![
        Dataset::default()
            .name("all")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_total)
            .data(&totals),
        Dataset::default()
            .name("top")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_top)
            .data(&tops),
    ];
    if !marker.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(theme.selection)
                .data(&marker),
        );
    }

    let x_max = series.len().saturating_sub(1).max(1) as f64;
    let y_max = y_upper_bound(series.max_total());

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {title} ")),
        )
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(x_labels(series, unit)),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{}", (y_max / 2.0).round() as u64)),
                    Span::raw(format!("{}", y_max as u64)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// `(index, value)` points for a chart dataset.
fn points(values: &[u64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v as f64))
        .collect()
}

/// Leave a little head-room above the highest point; never below 1.
fn y_upper_bound(max: u64) -> f64 {
    (max + (max / 10).max(1)) as f64
}

/// First, middle and last day labels in the unit's tick format.
fn x_labels(series: &DailySeries, unit: ChartTimeUnit) -> Vec<String> {
    let format = |i: usize| {
        series
            .day_at(i)
            .map(|d: NaiveDate| d.format(unit.tick_format()).to_string())
            .unwrap_or_default()
    };
    match series.len() {
        0 => Vec::new(),
        1 => vec![format(0)],
        2 => vec![format(0), format(1)],
        n => vec![format(0), format(n / 2), format(n - 1)],
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
