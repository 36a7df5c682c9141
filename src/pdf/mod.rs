mod typst;

pub use typst::TypstRenderer;

use std::path::Path;

use crate::error::Result;
use crate::invoice::InvoiceDocument;

/// Serializes a composed invoice to a PDF file.
///
/// Implementations must either leave a complete file at `output_path` or
/// nothing at all.
pub trait PdfRenderer {
    fn render(&self, document: &InvoiceDocument, output_path: &Path) -> Result<()>;
}
