use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{InvoiceError, Result};
use crate::invoice::InvoiceDocument;
use crate::pdf::PdfRenderer;

/// Embedded Typst template that lays out a serialized [`InvoiceDocument`].
/// Uses a placeholder that gets replaced with the actual JSON file path
const INVOICE_TEMPLATE: &str = r##"// Invoice Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  margin: (x: 2cm, y: data.vertical_margin * 297mm),
)

#set text(font: "Helvetica", size: 10pt)

#let shade(color) = if color == none { none } else { rgb("#" + color) }

#let edge(on) = if on { 0.5pt + black } else { none }

#let side(name) = if name == "right" { right } else { left }

#let render-cell(cell) = table.cell(
  fill: shade(cell.background),
  align: side(cell.align),
  stroke: (
    top: edge(cell.borders.top),
    bottom: edge(cell.borders.bottom),
    left: edge(cell.borders.left),
    right: edge(cell.borders.right),
  ),
)[
  #if cell.text.trim() == "" [~] else {
    text(weight: if cell.bold { "bold" } else { "regular" }, cell.text)
  }
]

#for element in data.elements {
  if element.kind == "title" {
    align(side(element.align), text(size: element.size * 1pt, fill: rgb("#" + element.color), element.text))
  } else if element.kind == "spacer" {
    v(element.lines * 1em)
  } else if element.kind == "table" {
    table(
      columns: (1fr,) * element.columns,
      inset: element.padding * 1pt,
      stroke: none,
      ..element.rows.flatten().map(render-cell),
    )
  }
}
"##;

/// Renders invoices with the Typst CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderer {
    work_dir: PathBuf,
}

impl Default for TypstRenderer {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("invoicer"),
        }
    }
}

impl TypstRenderer {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

impl PdfRenderer for TypstRenderer {
    /// Generate PDF using Typst CLI
    ///
    /// The PDF is compiled next to `output_path` and renamed into place once
    /// Typst succeeds.
    fn render(&self, document: &InvoiceDocument, output_path: &Path) -> Result<()> {
        // Check if typst is available
        if Command::new("typst").arg("--version").output().is_err() {
            return Err(InvoiceError::TypstNotFound);
        }

        fs::create_dir_all(&self.work_dir)?;

        let json_data = serde_json::to_string(document)
            .map_err(|e| InvoiceError::PdfGeneration(e.to_string()))?;

        // Per-process names so parallel runs don't clobber each other
        let stem = format!("invoice-{}", std::process::id());
        let json_name = format!("{stem}.json");
        let json_path = self.work_dir.join(&json_name);
        fs::write(&json_path, &json_data)?;

        let template_content = INVOICE_TEMPLATE.replace("DATA_JSON_PATH", &json_name);
        let template_path = self.work_dir.join(format!("{stem}.typ"));
        fs::write(&template_path, &template_content)?;

        let staging_path = output_path.with_extension("pdf.part");
        tracing::debug!(
            template = %template_path.display(),
            staging = %staging_path.display(),
            "running typst compile"
        );

        let result = Command::new("typst")
            .arg("compile")
            .arg("--root")
            .arg(&self.work_dir)
            .arg("--format")
            .arg("pdf")
            .arg(&template_path)
            .arg(&staging_path)
            .output();

        // Clean up temp files
        remove_scratch_file(&template_path);
        remove_scratch_file(&json_path);

        let output = result?;
        if !output.status.success() {
            remove_scratch_file(&staging_path);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InvoiceError::PdfGeneration(stderr.trim().to_string()));
        }

        fs::rename(&staging_path, output_path)?;
        Ok(())
    }
}

/// Best-effort removal of an intermediate file; failures are only logged.
/// Returns whether the file is gone.
fn remove_scratch_file(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "failed to remove scratch file");
            false
        }
    }
}
