use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{
    AttachmentSummary, ForwardForm, Inbox, NewForward, NewReturn, NewServiceRequest, NotesForm,
    ProcessForm, RequestChanges, RequestForward, RequestId, RequestListing, RequestReturn,
    RequestState, ReturnForm, ServiceRequest,
};
use super::repository::RequestRepository;
use crate::workflows::accounts::{UserId, UserRepository};
use crate::workflows::attachments::{
    is_allowed, size_label, AttachmentError, FileStore, MultipartForm,
};
use crate::workflows::repository::RepositoryError;
use crate::workflows::session::SessionUser;

/// Multipart field carrying request attachments.
const ATTACHMENTS_FIELD: &str = "attachments";

/// Service requests: intake, administrator actions and attachment access.
pub struct RequestService<R, U> {
    requests: Arc<R>,
    users: Arc<U>,
    files: Arc<FileStore>,
}

impl<R, U> RequestService<R, U>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(requests: Arc<R>, users: Arc<U>, files: Arc<FileStore>) -> Self {
        Self {
            requests,
            users,
            files,
        }
    }

    pub async fn submit(
        &self,
        actor: &SessionUser,
        form: MultipartForm,
    ) -> Result<ServiceRequest, RequestServiceError> {
        let request_type = required("request_type", form.text("request_type"))?;
        let title = required("title", form.text("title"))?;
        let description = required("description", form.text("description"))?;
        let attachments = self.store_attachments(actor, &form).await?;

        let request = self.requests.insert_request(NewServiceRequest {
            user_id: actor.user_id,
            request_type,
            title,
            description,
            attachments,
        })?;

        info!(
            request_id = request.id.0,
            attachments = request.attachments.len(),
            user = %actor.full_name,
            "submitted service request"
        );
        Ok(request)
    }

    /// Owner edit. Blank fields keep their stored value; new files replace the list.
    pub async fn update(
        &self,
        actor: &SessionUser,
        id: RequestId,
        form: MultipartForm,
    ) -> Result<ServiceRequest, RequestServiceError> {
        let request = self.load(id)?;
        if request.user_id != actor.user_id {
            warn!(request_id = id.0, user_id = actor.user_id.0, "request edit refused");
            return Err(RequestServiceError::Forbidden);
        }

        let attachments = self.store_attachments(actor, &form).await?;
        let changes = RequestChanges {
            title: optional(form.text("title")),
            description: optional(form.text("description")),
            attachments: (!attachments.is_empty()).then_some(attachments),
        };
        let updated = self.requests.update_request(id, changes).map_err(not_found)?;

        info!(request_id = id.0, user = %actor.full_name, "updated service request");
        Ok(updated)
    }

    /// Approve or reject; administrators only.
    pub fn process(
        &self,
        actor: &SessionUser,
        id: RequestId,
        form: ProcessForm,
    ) -> Result<ServiceRequest, RequestServiceError> {
        if !actor.administers_requests() {
            warn!(request_id = id.0, user_id = actor.user_id.0, "request processing refused");
            return Err(RequestServiceError::Forbidden);
        }
        let raw = form.status.as_deref().unwrap_or_default().trim();
        let status = RequestState::parse(raw)
            .filter(RequestState::is_decision)
            .ok_or_else(|| RequestServiceError::InvalidStatus(raw.to_string()))?;

        let notes = optional(form.notes.as_deref());
        let updated = self
            .requests
            .set_outcome(id, status, notes)
            .map_err(not_found)?;

        info!(
            request_id = id.0,
            status = status.as_str(),
            user = %actor.full_name,
            "processed service request"
        );
        Ok(updated)
    }

    pub fn forward(
        &self,
        actor: &SessionUser,
        id: RequestId,
        form: ForwardForm,
    ) -> Result<RequestForward, RequestServiceError> {
        self.authorize(actor, id)?;

        let recipient = form.forward_to.trim();
        let to_user_id = recipient
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| RequestServiceError::InvalidRecipient(recipient.to_string()))?;
        if self.users.user(to_user_id)?.is_none() {
            return Err(RequestServiceError::RecipientNotFound);
        }
        let due_date = NaiveDate::parse_from_str(form.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| RequestServiceError::InvalidDate(form.due_date.clone()))?;

        let forward = self
            .requests
            .forward_request(NewForward {
                request_id: id,
                from_user_id: actor.user_id,
                to_user_id,
                purpose: form.purpose.trim().to_string(),
                next_action: form.next_action.trim().to_string(),
                due_date,
                comments: form.comments.trim().to_string(),
            })
            .map_err(not_found)?;

        info!(
            request_id = id.0,
            to_user_id = to_user_id.0,
            user = %actor.full_name,
            "forwarded service request"
        );
        Ok(forward)
    }

    /// Send the request back to its owner with a reason.
    pub fn return_to_owner(
        &self,
        actor: &SessionUser,
        id: RequestId,
        form: ReturnForm,
    ) -> Result<RequestReturn, RequestServiceError> {
        let request = self.authorize(actor, id)?;
        let reason = required("reason", Some(form.reason.as_str()))?;

        let entry = self
            .requests
            .return_request(NewReturn {
                request_id: id,
                returned_by: actor.user_id,
                returned_to: request.user_id,
                reason,
                comments: form.comments.trim().to_string(),
            })
            .map_err(not_found)?;

        info!(request_id = id.0, user = %actor.full_name, "returned service request");
        Ok(entry)
    }

    pub fn save_notes(
        &self,
        actor: &SessionUser,
        id: RequestId,
        form: NotesForm,
    ) -> Result<ServiceRequest, RequestServiceError> {
        self.authorize(actor, id)?;
        let updated = self
            .requests
            .save_notes(id, form.notes.trim().to_string())
            .map_err(not_found)?;
        info!(request_id = id.0, user = %actor.full_name, "saved request notes");
        Ok(updated)
    }

    /// Administrators see every request, everyone else their own.
    pub fn list(&self, actor: &SessionUser) -> Result<Vec<RequestListing>, RequestServiceError> {
        let requests = if actor.administers_requests() {
            self.requests.all_requests()?
        } else {
            self.requests.requests_by_owner(actor.user_id)?
        };

        let mut names = HashMap::new();
        requests
            .into_iter()
            .map(|request| {
                let user = self.display_name(&mut names, request.user_id)?;
                Ok(RequestListing { request, user })
            })
            .collect()
    }

    /// Own requests plus those forwarded to the actor, with attachment metadata.
    pub async fn inbox(&self, actor: &SessionUser) -> Result<Inbox, RequestServiceError> {
        let mut requests = self.requests.requests_by_owner(actor.user_id)?;
        for forwarded in self.requests.requests_forwarded_to(actor.user_id)? {
            if !requests.iter().any(|request| request.id == forwarded.id) {
                requests.push(forwarded);
            }
        }
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let mut names = HashMap::new();
        let mut attachments = Vec::new();
        for request in &requests {
            for name in &request.attachments {
                let size = match self.files.size(name).await {
                    Ok(size) => size,
                    Err(AttachmentError::NotFound(_)) => {
                        warn!(request_id = request.id.0, file = %name, "attachment missing on disk");
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };
                attachments.push(AttachmentSummary {
                    name: name.clone(),
                    file_type: name
                        .rsplit_once('.')
                        .map(|(_, ext)| ext.to_ascii_lowercase())
                        .unwrap_or_default(),
                    date: request.created_at.format("%Y-%m-%d").to_string(),
                    size: size_label(size),
                    uploader: self.display_name(&mut names, request.user_id)?,
                    request_id: request.id,
                });
            }
        }

        Ok(Inbox {
            requests,
            attachments,
        })
    }

    /// Bytes of one of the request's attachments, for its owner, an administrator,
    /// or a user the request was forwarded to.
    pub async fn attachment(
        &self,
        actor: &SessionUser,
        id: RequestId,
        filename: &str,
    ) -> Result<Vec<u8>, RequestServiceError> {
        let request = self.load(id)?;
        if request.user_id != actor.user_id
            && !actor.administers_requests()
            && !self.forwarded_to(actor, id)?
        {
            warn!(request_id = id.0, user_id = actor.user_id.0, "attachment access refused");
            return Err(RequestServiceError::Forbidden);
        }
        if !request.has_attachment(filename) {
            return Err(RequestServiceError::AttachmentNotFound);
        }
        Ok(self.files.read(filename).await?)
    }

    fn load(&self, id: RequestId) -> Result<ServiceRequest, RequestServiceError> {
        self.requests
            .request(id)?
            .ok_or(RequestServiceError::RequestNotFound)
    }

    /// Load the request and check the actor owns it or administers requests.
    fn authorize(
        &self,
        actor: &SessionUser,
        id: RequestId,
    ) -> Result<ServiceRequest, RequestServiceError> {
        let request = self.load(id)?;
        if request.user_id != actor.user_id && !actor.administers_requests() {
            warn!(request_id = id.0, user_id = actor.user_id.0, "request access refused");
            return Err(RequestServiceError::Forbidden);
        }
        Ok(request)
    }

    fn forwarded_to(&self, actor: &SessionUser, id: RequestId) -> Result<bool, RequestServiceError> {
        Ok(self
            .requests
            .requests_forwarded_to(actor.user_id)?
            .iter()
            .any(|request| request.id == id))
    }

    /// Save every file under `attachments`. A single disallowed file rejects the
    /// whole submission before anything is written.
    async fn store_attachments(
        &self,
        actor: &SessionUser,
        form: &MultipartForm,
    ) -> Result<Vec<String>, RequestServiceError> {
        let files: Vec<_> = form.files_named(ATTACHMENTS_FIELD).collect();
        if let Some(file) = files.iter().find(|file| !is_allowed(&file.file_name)) {
            warn!(user_id = actor.user_id.0, file = %file.file_name, "request attachment refused");
            return Err(AttachmentError::NotAllowed(file.file_name.clone()).into());
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            stored.push(self.files.save(&file.file_name, None, &file.bytes).await?);
        }
        Ok(stored)
    }

    fn display_name(
        &self,
        cache: &mut HashMap<UserId, String>,
        id: UserId,
    ) -> Result<String, RequestServiceError> {
        if let Some(name) = cache.get(&id) {
            return Ok(name.clone());
        }
        let name = self
            .users
            .user(id)?
            .map(|user| user.full_name)
            .unwrap_or_default();
        cache.insert(id, name.clone());
        Ok(name)
    }
}

fn required(field: &'static str, value: Option<&str>) -> Result<String, RequestServiceError> {
    optional(value).ok_or(RequestServiceError::MissingField(field))
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn not_found(err: RepositoryError) -> RequestServiceError {
    match err {
        RepositoryError::NotFound => RequestServiceError::RequestNotFound,
        other => RequestServiceError::Repository(other),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("date `{0}` must use the YYYY-MM-DD format")]
    InvalidDate(String),
    #[error("request status must be approved or rejected, got `{0}`")]
    InvalidStatus(String),
    #[error("recipient `{0}` is not a user id")]
    InvalidRecipient(String),
    #[error("recipient does not exist")]
    RecipientNotFound,
    #[error("request not found")]
    RequestNotFound,
    #[error("attachment not found")]
    AttachmentNotFound,
    #[error("not permitted to act on this request")]
    Forbidden,
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
