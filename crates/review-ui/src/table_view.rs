//! Product summary table for the review dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per product
//! plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use review_core::formatting::format_count;
use review_data::query::ProductCount;

use crate::themes::Theme;

/// Render the per-product review counts into `area`.
///
/// Rows keep the order of `products` (most reviewed first). The last row
/// sums all products.
pub fn render_product_table(
    frame: &mut Frame,
    area: Rect,
    products: &[ProductCount],
    theme: &Theme,
) {
    let header_cells = ["Product", "Reviews", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let total: u64 = products.iter().map(|p| p.reviews).sum();

    let mut rows: Vec<Row> = products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            Row::new(vec![
                Cell::from(product.product_id.clone()),
                Cell::from(format_count(product.reviews)),
                Cell::from(format_share(product.reviews, total)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from(format!("TOTAL ({} products)", products.len())),
            Cell::from(format_count(total)),
            Cell::from(""),
        ])
        .style(theme.value),
    );

    let widths = [
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Products "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Percentage of `part` in `total`, one decimal, e.g. `"33.3%"`.
fn format_share(part: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}

/// Render a placeholder when nothing has been loaded yet, or the load
/// produced no data.
pub fn render_no_data(frame: &mut Frame, area: Rect, error: Option<&str>, theme: &Theme) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled("No review data loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Pass CSV exports named with a YYYYMMDD date, or a directory of them.",
            theme.dim,
        )),
    ];
    if let Some(err) = error {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(format!("Last load failed: {err}"), theme.error)));
    }
    text.push(Line::from(Span::styled(
        "Press 'r' to reload, 'q' or Ctrl+C to exit",
        theme.dim,
    )));
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Review Monitor "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
