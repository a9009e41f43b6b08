use crate::core::analytics::{AssetValue, PortfolioSummary};
use crate::core::asset::{AssetRecord, Figure};
use crate::core::indicators::DividendAverage;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a cell for "N/A" values, with error-specific styling.
pub fn na_cell(has_error: bool) -> Cell {
    let color = if has_error {
        Color::Red
    } else {
        Color::DarkGrey
    };
    Cell::new("N/A").fg(color).set_alignment(CellAlignment::Right)
}

/// Absent figures are dimmed, malformed ones shown in red with their text.
pub fn figure_cell(figure: &Figure, decimals: usize) -> Cell {
    match figure {
        Figure::Value(v) => {
            Cell::new(format!("{v:.decimals$}")).set_alignment(CellAlignment::Right)
        }
        Figure::Absent => na_cell(false),
        Figure::Malformed(raw) => Cell::new(format!("invalid: {raw}"))
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right),
    }
}

/// Computed figures are missing either because an input was missing or
/// because it was flagged; flagged assets are shown in red.
fn computed_cell(value: Option<f64>, flagged: bool, decimals: usize) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{v:.decimals$}")).set_alignment(CellAlignment::Right),
        None => na_cell(flagged),
    }
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64, with_message: bool) -> ProgressBar {
    let template = if with_message {
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    } else {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    };

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Indicators of one asset as printed while the run progresses.
pub fn asset_block(record: &AssetRecord) -> String {
    let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/D".to_string());
    let mut lines = vec![format!(
        "{} - site Investidor10",
        style_text(&record.ticker, StyleType::Title)
    )];
    if let Some(error) = &record.render_error {
        lines.push(style_text(&format!("Page not rendered: {error}"), StyleType::Error));
        return lines.join("\n");
    }
    lines.extend([
        format!("Cotação: {}", record.quote),
        format!("DY (12M): {}", or_missing(&record.dividend_yield_12m)),
        format!("P/VP: {}", record.price_to_book),
        format!("Média últimos 6 dividendos: {}", record.avg_dividend),
        format!("Tipo de Fundo: {}", or_missing(&record.fund_type)),
        format!("Segmento: {}", or_missing(&record.segment)),
        format!("Valor Patrimonial: {}", or_missing(&record.book_value)),
        format!("Cotistas: {}", or_missing(&record.shareholder_count)),
    ]);
    lines.join("\n")
}

/// Summary table of every asset followed by the portfolio totals.
pub fn portfolio_table(values: &[AssetValue], summary: &PortfolioSummary) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Ticker"),
        header_cell("Cotas"),
        header_cell("Cotação"),
        header_cell("Total gasto"),
        header_cell("P/VP"),
        header_cell("Média div./cota"),
        header_cell("Total div."),
        header_cell("DY (12M)"),
        header_cell("Índice"),
    ]);

    for value in values {
        let record = &value.record;
        let flagged = value.is_flagged();
        let avg_dividend = match record.avg_dividend {
            DividendAverage::Mean(v) => {
                Cell::new(format!("{v:.4}")).set_alignment(CellAlignment::Right)
            }
            DividendAverage::NotAvailable => na_cell(flagged),
        };
        let ticker = if flagged {
            Cell::new(&record.ticker).fg(Color::Red)
        } else {
            Cell::new(&record.ticker)
        };

        table.add_row(vec![
            ticker,
            format_optional_cell(Some(record.share_count), |u| format!("{u}")),
            figure_cell(&record.quote, 2),
            computed_cell(value.total_spent, flagged, 2),
            figure_cell(&record.price_to_book, 2),
            avg_dividend,
            computed_cell(value.total_dividends, flagged, 2),
            format_optional_cell(record.dividend_yield_12m.clone(), |dy| dy),
            computed_cell(value.yield_index, flagged, 4),
        ]);
    }

    let mut output = table.to_string();

    let issues: Vec<String> = values
        .iter()
        .flat_map(|v| {
            v.issues
                .iter()
                .map(move |issue| format!("{}: {issue}", v.record.ticker))
        })
        .collect();
    if !issues.is_empty() {
        output.push('\n');
        for issue in issues {
            output.push_str(&format!("\n{}", style_text(&issue, StyleType::Error)));
        }
    }

    output.push_str(&format!(
        "\n\n{} {}",
        style_text("Total gasto em R$:", StyleType::TotalLabel),
        style_text(&format!("{:.2}", summary.total_spent), StyleType::TotalValue)
    ));
    output.push_str(&format!(
        "\n{} {}",
        style_text("Acréscimo de dividendos em R$:", StyleType::TotalLabel),
        style_text(&format!("{:.2}", summary.total_dividends), StyleType::TotalValue)
    ));
    if summary.incomplete > 0 {
        output.push_str(&format!(
            "\n{}",
            style_text(
                &format!("{} asset(s) left out of the totals", summary.incomplete),
                StyleType::Subtle
            )
        ));
    }

    output
}
