//! PDF renditions of decision records.

pub mod renderer;
pub mod router;
pub mod service;
pub mod template;
#[cfg(test)]
mod tests;

pub use renderer::{CommandPdfRenderer, PdfRenderer, RenderError};
pub use router::{document_router, DocumentError};
pub use service::{appointment_filename, decision_filename, DocumentService, RenderedDocument};
