use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Series colours for the six makes the dashboard charts by name.
const MAKE_COLORS: [(&str, Color); 6] = [
    ("ford", Color::Blue),
    ("chevrolet", Color::Yellow),
    ("ram", Color::Red),
    ("toyota", Color::Green),
    ("gmc", Color::Magenta),
    ("nissan", Color::Cyan),
];

/// Colours handed out to any other make, picked by name.
const FALLBACK_COLORS: [Color; 4] = [
    Color::LightBlue,
    Color::LightGreen,
    Color::LightMagenta,
    Color::LightYellow,
];

/// Complete theme definition carrying all UI styles used by explorer-ui
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,
    pub heading: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub axis: Style,
    pub axis_title: Style,
    pub chart_border: Style,
    /// Whether make colours may use the bright ANSI variants.
    pub bright_makes: bool,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            heading: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),

            axis: Style::default().fg(Color::Gray),
            axis_title: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            chart_border: Style::default().fg(Color::DarkGray),
            bright_makes: true,

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content remains legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),

            axis: Style::default().fg(Color::DarkGray),
            axis_title: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            chart_border: Style::default().fg(Color::Gray),
            bright_makes: true,

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers for compatibility with minimal terminal
    /// emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            heading: Style::default().fg(Color::Yellow),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),

            axis: Style::default().fg(Color::Gray),
            axis_title: Style::default().fg(Color::Gray),
            chart_border: Style::default().fg(Color::DarkGray),
            bright_makes: false,

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Series style for a make. The same make gets the same colour in every
    /// chart and in the summary table.
    pub fn make_style(&self, make: &str) -> Style {
        let color = MAKE_COLORS
            .iter()
            .find(|(name, _)| *name == make)
            .map(|(_, color)| *color)
            .unwrap_or_else(|| {
                let idx = make.bytes().map(usize::from).sum::<usize>() % FALLBACK_COLORS.len();
                FALLBACK_COLORS[idx]
            });
        Style::default().fg(self.restrict(color))
    }

    /// Map bright ANSI colours to their base colour when the theme forbids them.
    fn restrict(&self, color: Color) -> Color {
        if self.bright_makes {
            return color;
        }
        match color {
            Color::LightBlue => Color::Blue,
            Color::LightGreen => Color::Green,
            Color::LightMagenta => Color::Magenta,
            Color::LightYellow => Color::Yellow,
            other => other,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.success.fg, Some(Color::Green));
        assert_eq!(t.warning.fg, Some(Color::Yellow));
        assert_eq!(t.axis.fg, Some(Color::Gray));
        assert!(t.bright_makes);
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_creation() {
        let t = Theme::classic();
        assert!(!t.bold.add_modifier.contains(Modifier::BOLD));
        assert!(!t.heading.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.table_total.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        let classic = Theme::from_name("classic");
        assert!(!classic.header.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    // ── make_style ───────────────────────────────────────────────────────────

    #[test]
    fn test_make_style_known_makes() {
        let t = Theme::dark();
        assert_eq!(t.make_style("ford").fg, Some(Color::Blue));
        assert_eq!(t.make_style("chevrolet").fg, Some(Color::Yellow));
        assert_eq!(t.make_style("ram").fg, Some(Color::Red));
        assert_eq!(t.make_style("nissan").fg, Some(Color::Cyan));
    }

    #[test]
    fn test_make_style_other_makes_are_stable() {
        let t = Theme::dark();
        let first = t.make_style("dodge");
        assert_eq!(t.make_style("dodge"), first);
        assert!(FALLBACK_COLORS.iter().any(|c| first.fg == Some(*c)));
    }

    #[test]
    fn test_make_style_classic_avoids_bright_colours() {
        let t = Theme::classic();
        for make in ["dodge", "jeep", "unknown", "x"] {
            let fg = t.make_style(make).fg;
            assert!(
                !matches!(
                    fg,
                    Some(Color::LightBlue | Color::LightGreen | Color::LightMagenta | Color::LightYellow)
                ),
                "bright colour for {make}"
            );
        }
    }
}
