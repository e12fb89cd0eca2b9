use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Guess the terminal background from `COLORFGBG` (`"fg;bg"`).
///
/// Background indices 0–6 are dark and 7–15 light. Anything else is
/// treated as dark.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    match value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.parse::<u8>().ok())
    {
        Some(7..=15) => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

/// The handful of colours a theme is derived from.
struct Palette {
    fg: Color,
    muted: Color,
    faint: Color,
    accent: Color,
    secondary: Color,
    highlight: Color,
    badge_fg: Color,
    emphasis: Modifier,
}

/// Every style the dashboard draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub separator: Style,

    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    /// All reviews line.
    pub series_total: Style,
    /// Top-reviewer line.
    pub series_top: Style,
    pub axis: Style,
    /// Day under the chart cursor, and the drilled-down day.
    pub selection: Style,

    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    pub top_badge: Style,
    /// Product filter text while it is being edited.
    pub input: Style,
}

impl Theme {
    fn from_palette(p: Palette) -> Self {
        let plain = |c: Color| Style::default().fg(c);
        let strong = |c: Color| Style::default().fg(c).add_modifier(p.emphasis);

        Self {
            header: strong(p.accent),
            separator: plain(p.faint),

            text: plain(p.fg),
            dim: plain(p.faint),
            bold: strong(p.fg),
            label: plain(p.muted),
            value: strong(p.fg),

            info: plain(p.accent),
            success: plain(Color::Green),
            warning: plain(Color::Yellow),
            error: plain(Color::Red),

            series_total: plain(p.accent),
            series_top: plain(p.secondary),
            axis: plain(p.muted),
            selection: strong(p.highlight),

            table_header: strong(p.accent),
            table_border: plain(p.faint),
            table_row: plain(p.fg),
            table_row_alt: plain(p.muted),

            top_badge: strong(p.badge_fg).bg(p.secondary),
            input: plain(p.highlight).add_modifier(Modifier::UNDERLINED),
        }
    }

    pub fn dark() -> Self {
        Self::from_palette(Palette {
            fg: Color::White,
            muted: Color::Gray,
            faint: Color::DarkGray,
            accent: Color::Cyan,
            secondary: Color::Magenta,
            highlight: Color::Yellow,
            badge_fg: Color::Black,
            emphasis: Modifier::BOLD,
        })
    }

    /// Dark text with saturated accents for white or light-grey terminals.
    pub fn light() -> Self {
        Self::from_palette(Palette {
            fg: Color::Black,
            muted: Color::DarkGray,
            faint: Color::Gray,
            accent: Color::Blue,
            secondary: Color::Magenta,
            highlight: Color::Red,
            badge_fg: Color::White,
            emphasis: Modifier::BOLD,
        })
    }

    /// Eight-colour ANSI palette with no bold or underline, for terminals
    /// that render modifiers poorly.
    pub fn classic() -> Self {
        let mut theme = Self::from_palette(Palette {
            fg: Color::White,
            muted: Color::Gray,
            faint: Color::DarkGray,
            accent: Color::Cyan,
            secondary: Color::Magenta,
            highlight: Color::Yellow,
            badge_fg: Color::Magenta,
            emphasis: Modifier::empty(),
        });
        theme.top_badge = Style::default().fg(Color::Magenta);
        theme.input = Style::default().fg(Color::Yellow);
        theme
    }

    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// `light`, `dark` or `classic`; anything else (including `auto`)
    /// detects the background.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    /// 4–5 stars good, 3 middling, fewer poor.
    pub fn rating_style(&self, rating: u8) -> Style {
        match rating {
            4.. => self.success,
            3 => self.warning,
            _ => self.error,
        }
    }

    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }
}
