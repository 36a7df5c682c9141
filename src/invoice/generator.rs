use chrono::NaiveDate;
use std::path::PathBuf;

use crate::config::InvoiceConfig;
use crate::error::{InvoiceError, Result};
use crate::invoice::layout::{compose, InvoiceDocument, LayoutStyle};
use crate::invoice::numbering::{
    assign_numbers, format_invoice_date, format_invoice_number, invoice_path,
};
use crate::pdf::{PdfRenderer, TypstRenderer};

/// A composed invoice that has not been written yet
#[derive(Debug, Clone)]
pub struct PreparedInvoice {
    pub number: String,
    pub date: String,
    pub path: PathBuf,
    pub document: InvoiceDocument,
}

/// Composes invoices from one resolved config and hands them to a renderer.
pub struct InvoiceGenerator<R = TypstRenderer> {
    config: InvoiceConfig,
    style: LayoutStyle,
    renderer: R,
}

impl InvoiceGenerator<TypstRenderer> {
    pub fn new(config: InvoiceConfig) -> Self {
        Self::with_renderer(config, TypstRenderer::default())
    }
}

impl<R: PdfRenderer> InvoiceGenerator<R> {
    pub fn with_renderer(config: InvoiceConfig, renderer: R) -> Self {
        Self {
            config,
            style: LayoutStyle::default(),
            renderer,
        }
    }

    pub fn with_style(mut self, style: LayoutStyle) -> Self {
        self.style = style;
        self
    }

    pub fn config(&self) -> &InvoiceConfig {
        &self.config
    }

    /// Formatted invoice number and date for `seq` on `date`
    fn identify(&self, date: NaiveDate, seq: u64) -> Result<(String, String)> {
        let width = self.config.num_length()?;
        let number = format_invoice_number(seq, width, self.config.num_suffix());
        Ok((number, format_invoice_date(date)))
    }

    fn build(&self, number: String, date: String) -> Result<PreparedInvoice> {
        let document = compose(&self.config, &date, &number, &self.style)?;
        let prefix = self.config.require("invoice_filename_prefix")?;
        let path = invoice_path(&self.config.output_dir(), prefix, &number, &date);
        Ok(PreparedInvoice {
            number,
            date,
            path,
            document,
        })
    }

    /// Compose invoice `seq` for `date` without writing anything
    pub fn prepare(&self, date: NaiveDate, seq: u64) -> Result<PreparedInvoice> {
        let (number, date) = self.identify(date, seq)?;
        self.build(number, date)
    }

    /// Compose and write a single invoice, returning the file written.
    ///
    /// The output directory must already exist.
    pub fn generate(&self, date: NaiveDate, seq: u64) -> Result<PathBuf> {
        let (number, date) = self.identify(date, seq)?;
        println!("Generating invoice {} ({})", number, date);

        let invoice = self.build(number, date)?;

        let output_dir = self.config.output_dir();
        if !output_dir.is_dir() {
            return Err(InvoiceError::OutputDirNotFound(output_dir));
        }

        self.renderer.render(&invoice.document, &invoice.path)?;
        tracing::debug!(
            number = %invoice.number,
            path = %invoice.path.display(),
            "invoice rendered"
        );

        println!("Invoice written to {}", invoice.path.display());
        Ok(invoice.path)
    }

    /// Generate one invoice per date in ascending date order, numbering from
    /// `start`. Stops at the first failure; earlier invoices stay on disk.
    pub fn generate_batch(&self, start: u64, dates: &[NaiveDate]) -> Result<Vec<PathBuf>> {
        assign_numbers(dates, start)?
            .into_iter()
            .map(|(date, seq)| self.generate(date, seq))
            .collect()
    }
}
