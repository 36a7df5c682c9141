//! Document model for a single-page invoice and the builders that fill it
//! from an [`InvoiceConfig`].
//!
//! The model only describes structure and styling. Turning it into a PDF is
//! the job of a [`crate::pdf::PdfRenderer`].

use serde::Serialize;

use crate::config::InvoiceConfig;
use crate::error::Result;

/// Cosmetic constants used when composing an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStyle {
    pub title: &'static str,
    pub title_size: f32,
    pub title_color: &'static str,
    /// Padding applied to every side of every cell, in points
    pub cell_padding: f32,
    /// Vertical page margin as a fraction of the page height
    pub vertical_margin: f32,
    /// Background of the itemized table's header and total cells
    pub header_shade: &'static str,
    /// Background of the itemized table's data and filler rows
    pub row_shade: &'static str,
    pub filler_rows: usize,
    pub currency_symbol: &'static str,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            title: "INVOICE",
            title_size: 16.0,
            title_color: "a19f9a",
            cell_padding: 2.0,
            vertical_margin: 0.02,
            header_shade: "e8e7e3",
            row_shade: "ffffff",
            filler_rows: 8,
            currency_symbol: "£",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
}

/// Which edges of a cell draw a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Borders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Borders {
    pub const ALL: Borders = Borders {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    pub const NONE: Borders = Borders {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub bold: bool,
    pub align: Align,
    pub background: Option<String>,
    pub borders: Borders,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            align: Align::Left,
            background: None,
            borders: Borders::NONE,
        }
    }

    pub fn blank() -> Self {
        Self::text("")
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub fn background(mut self, color: &str) -> Self {
        self.background = Some(color.to_string());
        self
    }

    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A fixed-column table; every row holds exactly `columns` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: usize,
    pub padding: f32,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    fn new(columns: usize, padding: f32) -> Self {
        Self {
            columns,
            padding,
            rows: Vec::new(),
        }
    }

    fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns);
        self.rows.push(row);
    }

    /// Single-column table with one cell per row
    fn single_column(cells: Vec<Cell>, padding: f32) -> Self {
        let mut table = Self::new(1, padding);
        for cell in cells {
            table.push_row(vec![cell]);
        }
        table
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .map(|cell| cell.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub size: f32,
    pub color: String,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Title(Title),
    Table(Table),
    /// Blank lines between blocks
    Spacer { lines: usize },
}

/// One composed invoice page, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDocument {
    pub vertical_margin: f32,
    pub elements: Vec<Element>,
}

impl InvoiceDocument {
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.elements.iter().filter_map(|e| match e {
            Element::Table(table) => Some(table),
            _ => None,
        })
    }
}

/// Compose the full invoice page.
///
/// `date` and `number` are already formatted for display.
pub fn compose(
    config: &InvoiceConfig,
    date: &str,
    number: &str,
    style: &LayoutStyle,
) -> Result<InvoiceDocument> {
    let title = Element::Title(Title {
        text: style.title.to_string(),
        size: style.title_size,
        color: style.title_color.to_string(),
        align: Align::Right,
    });

    Ok(InvoiceDocument {
        vertical_margin: style.vertical_margin,
        elements: vec![
            title,
            Element::Table(invoice_information(config, date, number, style)?),
            Element::Spacer { lines: 1 },
            Element::Table(billing_information(config, style)?),
            Element::Spacer { lines: 1 },
            Element::Table(itemized_charges(config, style)?),
            Element::Spacer { lines: 2 },
            Element::Table(payment_information(config, style)?),
        ],
    })
}

/// Sender details on the left, invoice date/number/purpose on the right.
///
/// The left column grows by one row when a sender company is configured. The
/// right-hand pairs always start level with the sender address, so the row
/// count is derived from both columns and the shorter one is padded with
/// blank cells.
pub fn invoice_information(
    config: &InvoiceConfig,
    date: &str,
    number: &str,
    style: &LayoutStyle,
) -> Result<Table> {
    let mut left = vec![Cell::text(config.require("from_name")?).bold()];
    if let Some(company) = config.optional("from_company").filter(|c| !c.trim().is_empty()) {
        left.push(Cell::text(company));
    }
    let right_offset = left.len();
    for key in ["from_address", "from_city", "from_postcode", "from_email"] {
        left.push(Cell::text(config.require(key)?));
    }

    let right = [
        ("Date:", date),
        ("Invoice #:", number),
        ("For:", config.require("bill_for")?),
    ];

    let rows = left.len().max(right_offset + right.len());
    let mut table = Table::new(4, style.cell_padding);

    for i in 0..rows {
        let sender = left.get(i).cloned().unwrap_or_else(Cell::blank);
        let (label, value) = match i.checked_sub(right_offset).and_then(|j| right.get(j)) {
            Some((label, value)) => (Cell::text(*label).bold(), Cell::text(*value).right()),
            None => (Cell::blank(), Cell::blank()),
        };
        table.push_row(vec![sender, Cell::blank(), label, value]);
    }

    Ok(table)
}

/// "BILL TO:" followed by the recipient lines; empty values keep their row.
pub fn billing_information(config: &InvoiceConfig, style: &LayoutStyle) -> Result<Table> {
    let mut cells = vec![Cell::text("BILL TO:").bold()];
    for key in [
        "bill_to_name",
        "bill_to_company",
        "bill_to_address",
        "bill_to_city",
        "bill_to_postcode",
    ] {
        cells.push(Cell::text(config.require(key)?));
    }
    Ok(Table::single_column(cells, style.cell_padding))
}

/// The single line item, filler rows and total.
///
/// Borders between the data row, the filler rows and the total row are
/// suppressed so the body reads as one ledger block.
pub fn itemized_charges(config: &InvoiceConfig, style: &LayoutStyle) -> Result<Table> {
    let description = config.require("description")?;
    let amount = format!("{}{}", style.currency_symbol, config.require("amount")?);

    let mut table = Table::new(2, style.cell_padding);

    table.push_row(vec![
        Cell::text("DESCRIPTION")
            .background(style.header_shade)
            .borders(Borders::ALL),
        Cell::text("AMOUNT")
            .right()
            .background(style.header_shade)
            .borders(Borders::ALL),
    ]);

    let open_bottom = Borders {
        bottom: false,
        ..Borders::ALL
    };
    table.push_row(vec![
        Cell::text(description)
            .background(style.row_shade)
            .borders(open_bottom),
        Cell::text(amount.clone())
            .right()
            .background(style.row_shade)
            .borders(open_bottom),
    ]);

    let filler = Cell::blank().background(style.row_shade).borders(Borders {
        top: false,
        bottom: false,
        ..Borders::ALL
    });
    for _ in 0..style.filler_rows {
        table.push_row(vec![filler.clone(), filler.clone()]);
    }

    table.push_row(vec![
        Cell::text("Total").bold().right().borders(Borders {
            bottom: false,
            left: false,
            ..Borders::ALL
        }),
        Cell::text(amount)
            .right()
            .background(style.header_shade)
            .borders(Borders::ALL),
    ]);

    Ok(table)
}

pub fn payment_information(config: &InvoiceConfig, style: &LayoutStyle) -> Result<Table> {
    let cells = vec![
        Cell::text("Payment details:").bold(),
        Cell::text(config.require("payment_name")?),
        Cell::text(format!("Account: {}", config.require("payment_account")?)),
        Cell::text(format!("Sort code: {}", config.require("payment_sortcode")?)),
    ];
    Ok(Table::single_column(cells, style.cell_padding))
}
