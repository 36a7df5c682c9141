pub mod config;
pub mod error;
pub mod invoice;
pub mod pdf;

pub use config::{ConfigFile, InvoiceConfig};
pub use error::{InvoiceError, Result};
pub use invoice::{InvoiceDocument, InvoiceGenerator};
