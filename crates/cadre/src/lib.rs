//! Governorate HR administration portal.
//!
//! Accounts, committee and appointment decision records, job postings, service
//! requests and their attachments, plus PDF renditions of stored decisions.

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod validation;
pub mod workflows;
