//! Per-make summary table for the `summary` view.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per make plus
//! a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use explorer_core::formatting;
use explorer_data::aggregator::{MakeAggregator, MakeStats, MakeSummary};

use crate::themes::Theme;

/// Data for a single row in the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    pub make: String,
    /// Most listed model of the make.
    pub top_model: String,
    pub listings: usize,
    pub median_price: Option<f64>,
    pub mean_price: Option<f64>,
    pub median_days_listed: Option<f64>,
    pub median_model_year: Option<f64>,
}

impl TableRowData {
    pub fn from_summary(summary: &MakeSummary) -> Self {
        let mut row = Self::from_stats(&summary.make, &summary.stats);
        row.top_model = summary.top_model().unwrap_or_default().to_string();
        row
    }

    fn from_stats(make: &str, stats: &MakeStats) -> Self {
        Self {
            make: make.to_string(),
            top_model: String::new(),
            listings: stats.count(),
            median_price: stats.median_price(),
            mean_price: stats.mean_price(),
            median_days_listed: stats.median_days_listed(),
            median_model_year: stats.median_model_year(),
        }
    }
}

/// Table rows and the totals row for a set of summaries.
pub fn build_rows(summaries: &[MakeSummary]) -> (Vec<TableRowData>, TableRowData) {
    let rows = summaries.iter().map(TableRowData::from_summary).collect();
    let totals = TableRowData::from_stats("TOTAL", &MakeAggregator::calculate_totals(summaries));
    (rows, totals)
}

fn price_cell(value: Option<f64>) -> String {
    value.map(formatting::format_price).unwrap_or_else(|| "-".to_string())
}

fn number_cell(value: Option<f64>, decimals: u32) -> String {
    value
        .map(|v| formatting::format_number(v, decimals))
        .unwrap_or_else(|| "-".to_string())
}

/// Year cells carry no thousands separator.
fn year_cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.0}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Render the per-make table into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[TableRowData],
    totals: &TableRowData,
    theme: &Theme,
) {
    let header_cells = [
        "Make",
        "Top Model",
        "Listings",
        "Median Price",
        "Mean Price",
        "Median Days",
        "Median Year",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.make.clone()).style(theme.make_style(&row.make)),
                Cell::from(row.top_model.clone()),
                Cell::from(formatting::format_number(row.listings as f64, 0)),
                Cell::from(price_cell(row.median_price)),
                Cell::from(price_cell(row.mean_price)),
                Cell::from(number_cell(row.median_days_listed, 1)),
                Cell::from(year_cell(row.median_model_year)),
            ])
            .style(style)
        })
        .collect();

    let total_row = Row::new(vec![
        Cell::from(totals.make.clone()),
        Cell::from(format!("{} makes", rows.len())),
        Cell::from(formatting::format_number(totals.listings as f64, 0)),
        Cell::from(price_cell(totals.median_price)),
        Cell::from(price_cell(totals.mean_price)),
        Cell::from(number_cell(totals.median_days_listed, 1)),
        Cell::from(year_cell(totals.median_model_year)),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(12),
        Constraint::Length(30),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(13),
        Constraint::Length(12),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder when the dataset has no pickups.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No pickup listings found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check the data file or try --match-mode substring.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Pickup Explorer "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
