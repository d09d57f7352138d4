use super::domain::{
    NewForward, NewReturn, NewServiceRequest, RequestChanges, RequestForward, RequestId,
    RequestReturn, RequestState, ServiceRequest,
};
use crate::workflows::accounts::UserId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for service requests and their audit trails.
///
/// Mutations of a missing request fail with [`RepositoryError::NotFound`];
/// listings are ordered newest first.
pub trait RequestRepository: Send + Sync {
    fn insert_request(&self, request: NewServiceRequest) -> Result<ServiceRequest, RepositoryError>;
    fn request(&self, id: RequestId) -> Result<Option<ServiceRequest>, RepositoryError>;
    fn update_request(
        &self,
        id: RequestId,
        changes: RequestChanges,
    ) -> Result<ServiceRequest, RepositoryError>;
    fn set_outcome(
        &self,
        id: RequestId,
        status: RequestState,
        notes: Option<String>,
    ) -> Result<ServiceRequest, RepositoryError>;
    fn save_notes(&self, id: RequestId, notes: String) -> Result<ServiceRequest, RepositoryError>;
    /// Record the forward and mark the request `forwarded` in one transaction.
    fn forward_request(&self, forward: NewForward) -> Result<RequestForward, RepositoryError>;
    /// Record the return and mark the request `returned` in one transaction.
    fn return_request(&self, entry: NewReturn) -> Result<RequestReturn, RepositoryError>;
    fn all_requests(&self) -> Result<Vec<ServiceRequest>, RepositoryError>;
    fn requests_by_owner(&self, owner: UserId) -> Result<Vec<ServiceRequest>, RepositoryError>;
    fn requests_forwarded_to(&self, user: UserId) -> Result<Vec<ServiceRequest>, RepositoryError>;
    fn forwards(&self, id: RequestId) -> Result<Vec<RequestForward>, RepositoryError>;
    fn returns(&self, id: RequestId) -> Result<Vec<RequestReturn>, RepositoryError>;
}
