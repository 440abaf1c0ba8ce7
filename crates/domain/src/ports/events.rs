use crate::events::Event;
use crate::region::RegionType;
use crate::DomainResult;

use super::BoxFuture;

pub trait EventRepository: Send + Sync {
    fn create(&self, event: &Event) -> BoxFuture<'_, DomainResult<Event>>;

    fn get(&self, event_id: &str) -> BoxFuture<'_, DomainResult<Option<Event>>>;

    /// Full-document replacement keyed by `event.event_id`.
    fn update(&self, event: &Event) -> BoxFuture<'_, DomainResult<Event>>;

    /// Hard delete. Returns whether a record existed.
    fn delete(&self, event_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<Event>>>;

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<Event>>>;
}
