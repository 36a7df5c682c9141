use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::error::{DateError, InvoiceError, Result};

/// Format accepted for invoice dates on the command line
pub const INPUT_DATE_FORMAT: &str = "%Y%m%d";

/// Format used for dates printed on the invoice and in file names
pub const DISPLAY_DATE_FORMAT: &str = "%d-%b-%Y";

/// Zero-pad `seq` to `width` digits and append `suffix`.
///
/// Numbers wider than `width` are kept whole rather than truncated.
pub fn format_invoice_number(seq: u64, width: usize, suffix: &str) -> String {
    format!("{:0width$}{}", seq, suffix, width = width)
}

/// Format a date as `DD-Mon-YYYY`, e.g. `05-Mar-2024`
pub fn format_invoice_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// `{prefix}_{number}_{date}.pdf`
pub fn invoice_filename(prefix: &str, number: &str, date: &str) -> String {
    format!("{}_{}_{}.pdf", prefix, number, date)
}

pub fn invoice_path(output_dir: &Path, prefix: &str, number: &str, date: &str) -> PathBuf {
    output_dir.join(invoice_filename(prefix, number, date))
}

/// Parse every date argument, collecting all failures before giving up.
///
/// Successfully parsed dates are returned in ascending order.
pub fn parse_dates<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(inputs.len());
    let mut errors = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        match NaiveDate::parse_from_str(input, INPUT_DATE_FORMAT) {
            Ok(date) => dates.push(date),
            Err(e) => errors.push(DateError {
                input: input.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if !errors.is_empty() {
        return Err(InvoiceError::InvalidDates(errors));
    }

    dates.sort();
    Ok(dates)
}

/// Pair each date with its invoice number, counting up from `start` in date order.
///
/// Fails without numbering anything if the last number would not fit in a `u64`.
pub fn assign_numbers(dates: &[NaiveDate], start: u64) -> Result<Vec<(NaiveDate, u64)>> {
    let mut sorted = dates.to_vec();
    sorted.sort();
    sorted
        .into_iter()
        .enumerate()
        .map(|(offset, date)| {
            u64::try_from(offset)
                .ok()
                .and_then(|offset| start.checked_add(offset))
                .map(|seq| (date, seq))
                .ok_or(InvoiceError::InvoiceNumberOverflow {
                    start,
                    count: dates.len(),
                })
        })
        .collect()
}
