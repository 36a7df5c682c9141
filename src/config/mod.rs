mod settings;

pub use settings::{InvoiceConfig, DEFAULT_NUM_LENGTH};

use crate::error::{InvoiceError, Result};
use ini::{Ini, ParseOption};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the section whose values every invoice type inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A parsed config file: shared defaults plus named invoice types.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    defaults: BTreeMap<String, String>,
    sections: Vec<(String, BTreeMap<String, String>)>,
}

impl ConfigFile {
    /// Load and parse the config file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(InvoiceError::ConfigFileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse INI contents; `path` is only used in error messages.
    ///
    /// Values are taken verbatim: quotes and backslashes are not interpreted
    /// and only whole-line `;`/`#` comments are recognised.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|e| {
            InvoiceError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        let mut defaults = BTreeMap::new();
        let mut sections: Vec<(String, BTreeMap<String, String>)> = Vec::new();

        for (name, properties) in ini.iter() {
            let values: BTreeMap<String, String> = properties
                .iter()
                .map(|(key, value)| (key.to_lowercase(), value.to_string()))
                .collect();

            match name {
                None if values.is_empty() => {}
                None => {
                    let key = values.keys().next().cloned().unwrap_or_default();
                    return Err(InvoiceError::InvalidConfigValue {
                        path: path.to_path_buf(),
                        key,
                        reason: "entries must be inside a section such as [DEFAULT]"
                            .to_string(),
                    });
                }
                Some(DEFAULT_SECTION) => defaults.extend(values),
                Some(name) => match sections.iter_mut().find(|(s, _)| s == name) {
                    Some((_, existing)) => existing.extend(values),
                    None => sections.push((name.to_string(), values)),
                },
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            defaults,
            sections,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Named sections in file order, excluding DEFAULT
    pub fn section_names(&self) -> Vec<String> {
        self.sections.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Named sections with the keys each one overrides
    pub fn sections(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.sections
            .iter()
            .map(|(name, values)| (name.as_str(), values.keys().map(String::as_str).collect()))
    }

    /// Merge DEFAULT with the requested invoice type.
    ///
    /// Without a type, or with `DEFAULT` itself, only the DEFAULT values are
    /// used. An unknown type is an error that lists every section the file
    /// defines.
    pub fn resolve(&self, invoice_type: Option<&str>) -> Result<InvoiceConfig> {
        let mut merged = self.defaults.clone();

        if let Some(name) = invoice_type.filter(|name| *name != DEFAULT_SECTION) {
            let (_, overrides) = self
                .sections
                .iter()
                .find(|(section, _)| section == name)
                .ok_or_else(|| InvoiceError::InvalidSection {
                    name: name.to_string(),
                    path: self.path.clone(),
                    options: self.section_names(),
                })?;
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        tracing::debug!(
            invoice_type = invoice_type.unwrap_or(DEFAULT_SECTION),
            keys = merged.len(),
            "resolved invoice config"
        );

        Ok(InvoiceConfig::new(merged))
    }
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Template content for a new config file
pub const CONFIG_TEMPLATE: &str = r#"; Values in [DEFAULT] apply to every invoice type. Each other section is an
; invoice type selected with --invoice-type and overrides DEFAULT values.
; Values are used exactly as written, so do not quote them.
;
; Example:
;   invoicer generate --invoice-type consulting --invoice-num 12 --dates 20240131 20240229

[DEFAULT]
from_name = Jane Doe
; optional
; from_company = Doe Consulting Ltd
from_address = 1 High Street
from_city = London
from_postcode = N1 1AA
from_email = jane@example.com

bill_to_name = Accounts Payable
bill_to_company = Example Client Ltd
bill_to_address = 2 Market Square
bill_to_city = Leeds
bill_to_postcode = LS1 2AB

payment_name = Example Bank
payment_account = 12345678
payment_sortcode = 00-00-00

invoice_filename_prefix = Invoice
; zero-padded width of the invoice number
invoice_num_length = 4
; optional
; invoice_num_suffix = -A
; optional, defaults to the current directory
; output_dir = ~/invoices

[consulting]
bill_for = Consulting services
description = Monthly consulting retainer
amount = 1500.00
"#;
