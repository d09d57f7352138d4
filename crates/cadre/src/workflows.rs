//! HTTP workflows of the portal, each owning its routes, service and storage seam.

pub mod accounts;
pub mod attachments;
pub mod decisions;
pub mod documents;
pub mod jobs;
pub mod repository;
pub mod requests;
pub mod session;

use std::sync::Arc;

use axum::Router;

use self::accounts::{account_router, AccountService, SignupPolicy, UserRepository};
use self::attachments::{attachment_router, FileStore};
use self::decisions::{decision_router, DecisionRepository, DecisionService};
use self::documents::{document_router, DocumentService, PdfRenderer};
use self::jobs::{job_router, JobRepository, JobService};
use self::requests::{request_router, RequestRepository, RequestService};
use crate::config::SessionConfig;

/// Shared dependencies handed to every workflow router.
pub struct Portal<S, P> {
    pub store: Arc<S>,
    pub files: Arc<FileStore>,
    pub renderer: Arc<P>,
    pub signup: SignupPolicy,
}

impl<S, P> Portal<S, P>
where
    S: UserRepository + DecisionRepository + JobRepository + RequestRepository + 'static,
    P: PdfRenderer + 'static,
{
    pub fn new(store: Arc<S>, files: Arc<FileStore>, renderer: Arc<P>, signup: SignupPolicy) -> Self {
        Self {
            store,
            files,
            renderer,
            signup,
        }
    }

    pub fn accounts(&self) -> Arc<AccountService<S>> {
        Arc::new(AccountService::new(Arc::clone(&self.store), self.signup))
    }

    /// Every workflow route behind one session layer.
    pub fn router(&self, session: &SessionConfig) -> Router {
        let decisions = Arc::new(DecisionService::new(Arc::clone(&self.store)));
        let documents = Arc::new(DocumentService::new(Arc::clone(&self.renderer)));
        let jobs = Arc::new(JobService::new(Arc::clone(&self.store)));
        let requests = Arc::new(RequestService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::clone(&self.files),
        ));

        Router::new()
            .merge(account_router(self.accounts()))
            .merge(decision_router(Arc::clone(&decisions)))
            .merge(document_router(decisions, documents))
            .merge(job_router(jobs))
            .merge(request_router(requests))
            .merge(attachment_router(Arc::clone(&self.files)))
            .layer(session::session_layer(session))
    }
}
