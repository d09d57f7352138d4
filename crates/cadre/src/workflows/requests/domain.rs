use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::accounts::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Pending,
    Approved,
    Rejected,
    Forwarded,
    Returned,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Pending => "pending",
            RequestState::Approved => "approved",
            RequestState::Rejected => "rejected",
            RequestState::Forwarded => "forwarded",
            RequestState::Returned => "returned",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pending" => Some(RequestState::Pending),
            "approved" => Some(RequestState::Approved),
            "rejected" => Some(RequestState::Rejected),
            "forwarded" => Some(RequestState::Forwarded),
            "returned" => Some(RequestState::Returned),
            _ => None,
        }
    }

    /// Outcomes an administrator may record when processing a request.
    pub fn is_decision(&self) -> bool {
        matches!(self, RequestState::Approved | RequestState::Rejected)
    }
}

/// Generic ticket raised by a portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRequest {
    pub id: RequestId,
    pub user_id: UserId,
    pub request_type: String,
    pub title: String,
    pub description: String,
    pub status: RequestState,
    /// Stored file names relative to the uploads directory.
    pub attachments: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequest {
    pub fn has_attachment(&self, name: &str) -> bool {
        self.attachments.iter().any(|stored| stored == name)
    }
}

#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub user_id: UserId,
    pub request_type: String,
    pub title: String,
    pub description: String,
    pub attachments: Vec<String>,
}

/// Fields replaced by an owner edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct RequestChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestForward {
    pub id: i64,
    pub request_id: RequestId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub purpose: String,
    pub next_action: String,
    pub due_date: NaiveDate,
    pub comments: String,
    pub status: RequestState,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewForward {
    pub request_id: RequestId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub purpose: String,
    pub next_action: String,
    pub due_date: NaiveDate,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestReturn {
    pub id: i64,
    pub request_id: RequestId,
    pub returned_by: UserId,
    pub returned_to: UserId,
    pub reason: String,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReturn {
    pub request_id: RequestId,
    pub returned_by: UserId,
    pub returned_to: UserId,
    pub reason: String,
    pub comments: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessForm {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForwardForm {
    #[serde(default)]
    pub forward_to: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub next_action: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotesForm {
    #[serde(default)]
    pub notes: String,
}

/// Request as listed to users, with the owner's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestListing {
    #[serde(flatten)]
    pub request: ServiceRequest,
    pub user: String,
}

/// Attachment metadata shown in the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub date: String,
    pub size: String,
    pub uploader: String,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inbox {
    pub requests: Vec<ServiceRequest>,
    pub attachments: Vec<AttachmentSummary>,
}
