use ratatui::text::{Line, Span};

use crate::dashboard_view::Section;
use crate::themes::Theme;

/// Page heading shown above the first section.
pub const HEADING: &str = "Do some pickup makes sell faster, or for more money?";

/// Prose shown above (or, for the last section, instead of) each chart.
pub fn paragraphs(section: Section) -> &'static [&'static str] {
    match section {
        Section::MajorPrices => &[
            "About a year of used-vehicle ads, narrowed down to pickup trucks. \
             Ford, Chevrolet and Ram account for most of them, so their asking \
             prices are overlaid here first.",
            "A few listings sit far out on the right. Press c to drop everything \
             at or above the cutoff and look at the bulk of the market.",
        ],
        Section::MinorPrices => &[
            "Toyota, GMC and Nissan have far fewer ads. Their chart is always cut \
             off so the handful of expensive outliers do not flatten the rest.",
        ],
        Section::PriceByYear => &[
            "Newer trucks ask more, as expected. The window is limited to model \
             years 1990 through 2019 and prices between $500 and $100k; older \
             collector trucks are left out.",
        ],
        Section::DaysListed => &[
            "How long an ad stays up depends on more than the make, the price \
             being one obvious factor. Still, it is a rough measure of how \
             quickly a typical truck finds a buyer.",
        ],
        Section::PriceVsDays => &[
            "Each point is one truck. Ads repeating the same model year, model \
             and odometer reading were merged before this chart was drawn, \
             keeping only the latest posting.",
        ],
        Section::Closing => &[
            "Chevrolet asks a little more than Ford at the median, and Ram more \
             than both despite having fewer ads.",
            "Time on the market barely differs between the three. Their \
             distributions have slightly different shapes but similar centres.",
            "Run with --view summary for the per-make medians behind these \
             charts.",
        ],
    }
}

/// Styled lines for `section`, with the page heading on the first section.
pub fn to_lines(section: Section, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if section == Section::MajorPrices {
        lines.push(Line::from(Span::styled(HEADING, theme.heading)));
        lines.push(Line::from(""));
    }
    for (i, paragraph) in paragraphs(section).iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(*paragraph, theme.text)));
    }
    lines
}
