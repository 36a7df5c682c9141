mod generator;
pub mod layout;
pub mod numbering;

pub use generator::{InvoiceGenerator, PreparedInvoice};
pub use layout::{Cell, Element, InvoiceDocument, LayoutStyle, Table};
pub use numbering::{format_invoice_date, format_invoice_number, parse_dates};
