use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::expand_path;
use crate::error::{InvoiceError, Result};

/// Zero-pad width used when `invoice_num_length` is not configured.
pub const DEFAULT_NUM_LENGTH: usize = 4;

/// The merged, read-only key/value configuration for one run.
///
/// Required keys are looked up lazily with [`InvoiceConfig::require`], so a
/// missing key is reported by the block that needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceConfig {
    values: BTreeMap<String, String>,
}

impl InvoiceConfig {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Look up a required key
    pub fn require(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| InvoiceError::MissingKey(key.to_string()))
    }

    /// Look up an optional key
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Width invoice numbers are zero-padded to. Zero or a negative width
    /// means no padding.
    pub fn num_length(&self) -> Result<usize> {
        let Some(raw) = self.optional("invoice_num_length") else {
            return Ok(DEFAULT_NUM_LENGTH);
        };
        let width: i64 = raw.trim().parse().map_err(|_| InvoiceError::InvalidSetting {
            key: "invoice_num_length".to_string(),
            value: raw.to_string(),
            reason: "must be a whole number".to_string(),
        })?;
        Ok(usize::try_from(width).unwrap_or(0))
    }

    pub fn num_suffix(&self) -> &str {
        self.optional("invoice_num_suffix").unwrap_or("")
    }

    /// Directory invoices are written to; defaults to the working directory
    pub fn output_dir(&self) -> PathBuf {
        match self.optional("output_dir") {
            Some(dir) if !dir.is_empty() => expand_path(dir),
            _ => PathBuf::from("."),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InvoiceConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
