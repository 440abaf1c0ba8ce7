use crate::polls::Poll;
use crate::region::RegionType;
use crate::DomainResult;

use super::BoxFuture;

pub trait PollRepository: Send + Sync {
    fn create(&self, poll: &Poll) -> BoxFuture<'_, DomainResult<Poll>>;

    fn get(&self, poll_id: &str) -> BoxFuture<'_, DomainResult<Option<Poll>>>;

    /// Full-document replacement keyed by `poll.poll_id`.
    fn update(&self, poll: &Poll) -> BoxFuture<'_, DomainResult<Poll>>;

    /// Hard delete. Returns whether a record existed.
    fn delete(&self, poll_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<Poll>>>;

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<Poll>>>;

    fn list_featured_approved(&self) -> BoxFuture<'_, DomainResult<Vec<Poll>>>;
}
