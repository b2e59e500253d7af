use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const ORNAMENT: &str = "▰▱▰";

/// Dashboard header rendering four lines:
///
/// 1. Application title between ornaments (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Dataset and listing count in `[ source | N pickups ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the loaded dataset.
    pub source: &'a str,
    pub pickups: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, pickups: usize, theme: &'a Theme) -> Self {
        Self {
            source,
            pickups,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ORNAMENT, self.theme.header_accent),
                Span::styled(" PICKUP TRUCK EXPLORER ", self.theme.header),
                Span::styled(ORNAMENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(format!("{} pickups", self.pickups), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new("vehicles_us.csv", 12, &theme).to_lines();
        assert_eq!(lines.len(), 4, "header must produce exactly 4 lines");
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new("vehicles_us.csv", 12, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("PICKUP TRUCK EXPLORER"), "got: {title}");
        assert!(title.starts_with(ORNAMENT) && title.ends_with(ORNAMENT));
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new("vehicles_us.csv", 0, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::light();
        let lines = Header::new("vehicles_us.csv", 5_123, &theme).to_lines();
        assert_eq!(text(&lines[2]), "[ vehicles_us.csv | 5123 pickups ]");
        assert_eq!(lines[2].spans.len(), 5);
        assert!(text(&lines[3]).is_empty());
    }
}
