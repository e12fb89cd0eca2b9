//! Scrollable list of review cards.

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use review_core::formatting::{format_count, format_review_date, format_stars};
use review_core::models::DisplayReview;

use crate::themes::Theme;

/// Lines per card, including the blank spacer.
pub const CARD_HEIGHT: usize = 4;

/// Cut `text` to at most `max_width` terminal columns, appending `…` when
/// something was dropped. Line breaks are flattened to spaces.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.width() <= max_width {
        return flat;
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Build the lines of one review card.
pub fn review_card_lines(review: &DisplayReview, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let r = &review.review;

    let mut first = vec![
        Span::styled(format_stars(r.rating), theme.rating_style(r.rating)),
        Span::raw("  "),
        Span::styled(format_review_date(&r.created_at), theme.label),
        Span::raw("  "),
    ];
    if review.is_top() {
        first.push(Span::styled(format!(" {} ", r.reviewer_rank.trim()), theme.top_badge));
        first.push(Span::raw(" "));
    }
    first.push(Span::styled(r.display_name.clone(), theme.bold));
    first.push(Span::styled(format!(" · {}", r.vendor_name), theme.dim));

    let mut meta = vec![Span::styled(
        truncate_to_width(&format!("{} · {}", review.product_id, review.item_name), width),
        theme.dim,
    )];
    if !r.attachments.is_empty() {
        meta.push(Span::styled(
            format!("  📷 {}", r.attachments.len()),
            theme.info,
        ));
    }
    if r.helpful_true_count > 0 {
        meta.push(Span::styled(
            format!("  👍 {}", format_count(r.helpful_true_count)),
            theme.success,
        ));
    }

    vec![
        Line::from(first),
        Line::from(meta),
        Line::from(Span::styled(truncate_to_width(&r.content, width), theme.text)),
        Line::from(""),
    ]
}

/// Render the list with `scroll` cards skipped from the top.
pub fn render_review_list(
    frame: &mut Frame,
    area: Rect,
    reviews: &[DisplayReview],
    counts_label: &str,
    scroll: usize,
    theme: &Theme,
) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_cards = (area.height.saturating_sub(2) as usize) / CARD_HEIGHT + 1;

    let lines: Vec<Line> = if reviews.is_empty() {
        vec![Line::from(Span::styled("No reviews match the current filters", theme.dim))]
    } else {
        reviews
            .iter()
            .skip(scroll)
            .take(visible_cards)
            .flat_map(|review| review_card_lines(review, inner_width, theme))
            .collect()
    };

    let title = Line::from(vec![
        Span::raw(" Reviews: "),
        Span::styled(counts_label.to_string(), theme.value.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
    ]);

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
