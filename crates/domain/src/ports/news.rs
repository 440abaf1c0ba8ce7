use crate::news::News;
use crate::region::RegionType;
use crate::DomainResult;

use super::BoxFuture;

pub trait NewsRepository: Send + Sync {
    fn create(&self, news: &News) -> BoxFuture<'_, DomainResult<News>>;

    fn get(&self, news_id: &str) -> BoxFuture<'_, DomainResult<Option<News>>>;

    fn find_by_title(&self, title: &str) -> BoxFuture<'_, DomainResult<Option<News>>>;

    /// Full-document replacement keyed by `news.news_id`.
    fn update(&self, news: &News) -> BoxFuture<'_, DomainResult<News>>;

    /// Hard delete. Returns whether a record existed.
    fn delete(&self, news_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<News>>>;

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<News>>>;

    fn list_approved_in_regions(
        &self,
        region_ids: &[String],
    ) -> BoxFuture<'_, DomainResult<Vec<News>>>;

    fn list_featured(&self, limit: usize) -> BoxFuture<'_, DomainResult<Vec<News>>>;

    fn list_trending(&self, limit: usize) -> BoxFuture<'_, DomainResult<Vec<News>>>;
}
