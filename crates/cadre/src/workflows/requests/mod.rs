//! Service requests raised by portal users, with forwarding, returns and
//! administrator outcomes. Attachments live in the shared uploads store.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
#[cfg(test)]
mod tests;

pub use domain::{
    AttachmentSummary, Inbox, RequestForward, RequestId, RequestListing, RequestReturn,
    RequestState, ServiceRequest,
};
pub use repository::RequestRepository;
pub use router::request_router;
pub use service::{RequestService, RequestServiceError};
