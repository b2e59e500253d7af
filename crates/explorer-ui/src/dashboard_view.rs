//! Sectioned EDA dashboard for the pickup subset.
//!
//! Each frame is drawn from [`DashboardState`] and the immutable pickup
//! listings alone; chart inputs are recomputed on every draw so a state
//! change always shows up in the next frame.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Wrap},
    Frame,
};

use explorer_core::catalog::{
    DEFAULT_HISTOGRAM_BINS, DEFAULT_MINOR_PRICE_CUTOFF, DEFAULT_PRICE_CUTOFF, MAJOR_MAKES,
    MINOR_MAKES,
};
use explorer_core::formatting::{format_number, format_price, format_price_compact};
use explorer_core::models::PickupListing;
use explorer_data::views::{self, HistogramView, ScatterBounds, ScatterView};

use crate::components::header::Header;
use crate::components::narrative;
use crate::themes::Theme;

// ── Section ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    MajorPrices,
    MinorPrices,
    PriceByYear,
    DaysListed,
    PriceVsDays,
    Closing,
}

impl Section {
    /// Page order.
    pub const ALL: [Section; 6] = [
        Section::MajorPrices,
        Section::MinorPrices,
        Section::PriceByYear,
        Section::DaysListed,
        Section::PriceVsDays,
        Section::Closing,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::MajorPrices => "Price Frequencies by Make",
            Section::MinorPrices => "Price Frequencies, Smaller Makes",
            Section::PriceByYear => "Price by Model Year",
            Section::DaysListed => "Listing Length Frequencies by Make",
            Section::PriceVsDays => "Prices and Days Listed, by Make",
            Section::Closing => "Takeaways",
        }
    }

    /// Next section, staying on the last one.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// Previous section, staying on the first one.
    pub fn previous(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

// ── State and configuration ───────────────────────────────────────────────────

/// Everything the user can change while the dashboard is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardState {
    pub section: Section,
    /// Whether the major-makes price chart is cut off at the configured price.
    pub cutoff_enabled: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            section: Section::MajorPrices,
            cutoff_enabled: false,
        }
    }
}

impl DashboardState {
    pub fn next_section(&mut self) {
        self.section = self.section.next();
    }

    pub fn previous_section(&mut self) {
        self.section = self.section.previous();
    }

    pub fn toggle_cutoff(&mut self) {
        self.cutoff_enabled = !self.cutoff_enabled;
    }
}

/// Fixed parameters of a dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Shown in the header.
    pub source: String,
    pub price_cutoff: i64,
    pub minor_price_cutoff: i64,
    pub histogram_bins: usize,
    pub scatter_bounds: ScatterBounds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            price_cutoff: DEFAULT_PRICE_CUTOFF,
            minor_price_cutoff: DEFAULT_MINOR_PRICE_CUTOFF,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            scatter_bounds: ScatterBounds::default(),
        }
    }
}

// ── Chart inputs ──────────────────────────────────────────────────────────────

/// Histogram of the major makes under the current toggle state.
pub fn major_price_view(
    pickups: &[PickupListing],
    state: &DashboardState,
    config: &DashboardConfig,
) -> HistogramView {
    let cutoff = state.cutoff_enabled.then_some(config.price_cutoff);
    views::price_histogram(pickups, &MAJOR_MAKES, cutoff, config.histogram_bins)
}

pub fn minor_price_view(pickups: &[PickupListing], config: &DashboardConfig) -> HistogramView {
    views::price_histogram(
        pickups,
        &MINOR_MAKES,
        Some(config.minor_price_cutoff),
        config.histogram_bins,
    )
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Draw the whole dashboard page for `state` into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    pickups: &[PickupListing],
    state: &DashboardState,
    config: &DashboardConfig,
    theme: &Theme,
) {
    let text_height = if state.section == Section::Closing {
        Constraint::Min(6)
    } else {
        Constraint::Length(6)
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            text_height,
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Header::new(&config.source, pickups.len(), theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

    frame.render_widget(
        Paragraph::new(Text::from(narrative::to_lines(state.section, theme)))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let title = state.section.title();
    match state.section {
        Section::MajorPrices => {
            let view = major_price_view(pickups, state, config);
            render_histogram(frame, chunks[2], title, "Price", &view, true, theme);
        }
        Section::MinorPrices => {
            let view = minor_price_view(pickups, config);
            let title = format!(
                "{title} (under {})",
                format_price(config.minor_price_cutoff as f64)
            );
            render_histogram(frame, chunks[2], &title, "Price", &view, true, theme);
        }
        Section::PriceByYear => {
            let view = views::price_by_year(pickups, &config.scatter_bounds);
            render_scatter(frame, chunks[2], title, "Model Year", &view, theme);
        }
        Section::DaysListed => {
            let view =
                views::days_listed_histogram(pickups, &MAJOR_MAKES, config.histogram_bins);
            render_histogram(frame, chunks[2], title, "Days Listed", &view, false, theme);
        }
        Section::PriceVsDays => {
            let view = views::price_vs_days(pickups);
            render_scatter(frame, chunks[2], title, "Days Listed", &view, theme);
        }
        Section::Closing => {}
    }

    frame.render_widget(Paragraph::new(footer(state, config, theme)), chunks[3]);
}

/// Key hints, section position and cutoff state.
fn footer<'a>(state: &DashboardState, config: &DashboardConfig, theme: &'a Theme) -> Line<'a> {
    let position = format!(" {}/{} ", state.section.index() + 1, Section::ALL.len());
    let cutoff = if state.cutoff_enabled {
        format!("cutoff {} on", format_price(config.price_cutoff as f64))
    } else {
        format!("cutoff {} off", format_price(config.price_cutoff as f64))
    };
    let cutoff_style = if state.cutoff_enabled {
        theme.success
    } else {
        theme.dim
    };
    Line::from(vec![
        Span::styled(position, theme.value),
        Span::styled("←/→ section  ", theme.label),
        Span::styled("c ", theme.label),
        Span::styled(cutoff, cutoff_style),
        Span::styled("  q quit", theme.label),
    ])
}

/// Chart bounds for `range`; a single value gets a one-unit window.
fn bounds(range: (f64, f64)) -> [f64; 2] {
    let (lo, hi) = range;
    if hi > lo {
        [lo, hi]
    } else {
        [lo, lo + 1.0]
    }
}

/// Axis labels at the ends and middle of `range`.
fn axis_labels(range: (f64, f64), price: bool) -> Vec<String> {
    let [lo, hi] = bounds(range);
    let label = |v: f64| {
        if price {
            format_price_compact(v)
        } else {
            format!("{v:.0}")
        }
    };
    vec![label(lo), label((lo + hi) / 2.0), label(hi)]
}

/// Overlaid bars, one dataset per make.
///
/// Each make's bars are shifted a fraction of a bin to the right so the
/// series stay distinguishable where they overlap.
fn render_histogram(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    x_title: &str,
    view: &HistogramView,
    x_is_price: bool,
    theme: &Theme,
) {
    let series_count = view.series.len().max(1) as f64;
    let bars: Vec<Vec<(f64, f64)>> = view
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            series
                .bins
                .iter()
                .filter(|b| b.count > 0)
                .map(|b| {
                    let width = b.end - b.start;
                    let x = b.start + width * (i as f64 + 0.5) / series_count;
                    (x, b.count as f64)
                })
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = view
        .series
        .iter()
        .zip(bars.iter())
        .map(|(series, points)| {
            Dataset::default()
                .name(format!("{} ({})", series.make, format_number(series.total() as f64, 0)))
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(theme.make_style(&series.make))
                .data(points)
        })
        .collect();

    let max_count = view.max_count().max(1) as f64;
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.chart_border)
                .title(format!(" {} ", title)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(x_title.to_string(), theme.axis_title))
                .style(theme.axis)
                .bounds(bounds(view.range))
                .labels(axis_labels(view.range, x_is_price)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Trucks Advertised", theme.axis_title))
                .style(theme.axis)
                .bounds([0.0, max_count])
                .labels(axis_labels((0.0, max_count), false)),
        )
        .legend_position(Some(LegendPosition::TopRight));

    frame.render_widget(chart, area);
}

/// Price on the y axis, one dataset per make.
fn render_scatter(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    x_title: &str,
    view: &ScatterView,
    theme: &Theme,
) {
    let datasets: Vec<Dataset> = view
        .series
        .iter()
        .map(|series| {
            Dataset::default()
                .name(series.make.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(theme.make_style(&series.make))
                .data(&series.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.chart_border)
                .title(format!(" {} ", title)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(x_title.to_string(), theme.axis_title))
                .style(theme.axis)
                .bounds(bounds(view.x_range))
                .labels(axis_labels(view.x_range, false)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme.axis_title))
                .style(theme.axis)
                .bounds(bounds(view.y_range))
                .labels(axis_labels(view.y_range, true)),
        )
        .legend_position(Some(LegendPosition::TopLeft));

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
