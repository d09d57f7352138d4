//! Uploaded files kept under the configured uploads directory.
//!
//! Stored names are relative to the uploads root and never escape it: every
//! lookup goes through [`FileStore::resolve`], which accepts plain path
//! segments only.

pub mod multipart;
pub mod response;
pub mod router;
pub mod store;
#[cfg(test)]
mod tests;

pub use multipart::{read_multipart, MultipartForm, UploadedFile};
pub use response::{file_response, Disposition};
pub use router::attachment_router;
pub use store::{
    is_allowed, is_inline_type, sanitize, size_label, AttachmentError, FileStore,
    ALLOWED_EXTENSIONS,
};
