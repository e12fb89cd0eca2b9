use crate::themes::Theme;
use ratatui::text::{Line, Span};
use review_core::time_utils::{format_day, DateRange};

/// Dashboard header rendering three lines:
///
/// 1. Application title.
/// 2. A 60-column `=` separator.
/// 3. Active filters in `[ range | product | top | day ]` format.
pub struct Header<'a> {
    pub range: DateRange,
    /// Product filter as typed; shown as `*` when blank.
    pub product_filter: &'a str,
    pub top_only: bool,
    pub drill_date: Option<String>,
    /// Filter text is being edited.
    pub editing: bool,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Render the header as a `Vec<Line>` containing exactly three lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let product_style = if self.editing {
            self.theme.input
        } else {
            self.theme.value
        };
        let product = if self.product_filter.trim().is_empty() && !self.editing {
            "*".to_string()
        } else {
            self.product_filter.to_string()
        };

        let mut info = vec![
            Span::styled("[ ", self.theme.label),
            Span::styled(
                format!(
                    "{} → {}",
                    format_day(self.range.start()),
                    format_day(self.range.end())
                ),
                self.theme.value,
            ),
            Span::styled(" | product: ", self.theme.label),
            Span::styled(product, product_style),
        ];
        if self.top_only {
            info.push(Span::styled(" | ", self.theme.label));
            info.push(Span::styled("top only", self.theme.top_badge));
        }
        if let Some(day) = &self.drill_date {
            info.push(Span::styled(" | day: ", self.theme.label));
            info.push(Span::styled(day.clone(), self.theme.selection));
        }
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(Span::styled("REVIEW MONITOR", self.theme.header)),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(info),
        ]
    }
}

/// One-line key reference shown at the bottom of the dashboard.
pub fn key_hints(theme: &Theme, editing: bool) -> Line<'static> {
    let hints: &[(&str, &str)] = if editing {
        &[("Enter", "apply"), ("Esc", "done"), ("Backspace", "delete")]
    } else {
        &[
            ("q", "quit"),
            ("t", "top only"),
            ("/", "product"),
            ("←→", "day"),
            ("Enter", "drill"),
            ("Esc", "clear"),
            ("[ ]", "start"),
            ("{ }", "end"),
            ("↑↓", "scroll"),
            ("r", "reload"),
        ]
    };

    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(format!(" {key} "), theme.bold));
        spans.push(Span::styled(format!("{action} "), theme.dim));
    }
    Line::from(spans)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_line_count_and_separator() {
        let theme = Theme::dark();
        let header = Header {
            range: range(),
            product_filter: "",
            top_only: false,
            drill_date: None,
            editing: false,
            theme: &theme,
        };
        let lines = header.to_lines();
        assert_eq!(lines.len(), 3);
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_default_filters() {
        let theme = Theme::dark();
        let header = Header {
            range: range(),
            product_filter: "  ",
            top_only: false,
            drill_date: None,
            editing: false,
            theme: &theme,
        };
        let info = text(&header.to_lines()[2]);
        assert_eq!(info, "[ 2024-01-01 → 2024-01-03 | product: * ]");
    }

    #[test]
    fn test_header_all_filters() {
        let theme = Theme::dark();
        let header = Header {
            range: range(),
            product_filter: "P1",
            top_only: true,
            drill_date: Some("2024-01-02".to_string()),
            editing: false,
            theme: &theme,
        };
        let info = text(&header.to_lines()[2]);
        assert!(info.contains("product: P1"));
        assert!(info.contains("top only"));
        assert!(info.contains("day: 2024-01-02"));
    }

    #[test]
    fn test_header_editing_shows_raw_input() {
        let theme = Theme::dark();
        let header = Header {
            range: range(),
            product_filter: "",
            top_only: false,
            drill_date: None,
            editing: true,
            theme: &theme,
        };
        let lines = header.to_lines();
        assert_eq!(lines[2].spans[3].content, "");
        assert_eq!(lines[2].spans[3].style, theme.input);
    }

    #[test]
    fn test_key_hints_modes() {
        let theme = Theme::dark();
        assert!(text(&key_hints(&theme, false)).contains("reload"));
        assert!(text(&key_hints(&theme, true)).contains("apply"));
        assert!(!text(&key_hints(&theme, true)).contains("reload"));
    }
}
