use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use varta_domain::content::ContentStatus;
use varta_domain::error::DomainError;
use varta_domain::events::Event;
use varta_domain::news::News;
use varta_domain::polls::Poll;
use varta_domain::ports::events::EventRepository;
use varta_domain::ports::news::NewsRepository;
use varta_domain::ports::polls::PollRepository;
use varta_domain::ports::BoxFuture;
use varta_domain::region::RegionType;
use varta_domain::DomainResult;

fn sort_newest_first<T, K>(items: &mut [T], key: K)
where
    K: Fn(&T) -> (i64, String),
{
    items.sort_by(|left, right| {
        let (left_ms, left_id) = key(left);
        let (right_ms, right_id) = key(right);
        right_ms.cmp(&left_ms).then_with(|| right_id.cmp(&left_id))
    });
}

#[derive(Default)]
pub struct InMemoryNewsRepository {
    store: Arc<RwLock<HashMap<String, News>>>,
}

impl InMemoryNewsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NewsRepository for InMemoryNewsRepository {
    fn create(&self, news: &News) -> BoxFuture<'_, DomainResult<News>> {
        let news = news.clone();
        let store = self.store.clone();
        Box::pin(async move {
            store.write().await.insert(news.news_id.clone(), news.clone());
            Ok(news)
        })
    }

    fn get(&self, news_id: &str) -> BoxFuture<'_, DomainResult<Option<News>>> {
        let news_id = news_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&news_id).cloned()) })
    }

    fn find_by_title(&self, title: &str) -> BoxFuture<'_, DomainResult<Option<News>>> {
        let title = title.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            Ok(store
                .read()
                .await
                .values()
                .find(|news| news.title == title)
                .cloned())
        })
    }

    fn update(&self, news: &News) -> BoxFuture<'_, DomainResult<News>> {
        let news = news.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            if !store.contains_key(&news.news_id) {
                return Err(DomainError::NotFound);
            }
            store.insert(news.news_id.clone(), news.clone());
            Ok(news)
        })
    }

    fn delete(&self, news_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let news_id = news_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.write().await.remove(&news_id).is_some()) })
    }

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let region_id = region_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<News> = store
                .read()
                .await
                .values()
                .filter(|news| {
                    news.status == ContentStatus::Approved
                        && news.region.region_id() == region_id
                })
                .cloned()
                .collect();
            sort_newest_first(&mut items, |news| {
                (news.created_at_ms, news.news_id.clone())
            });
            Ok(items)
        })
    }

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<News> = store
                .read()
                .await
                .values()
                .filter(|news| {
                    news.status == ContentStatus::Approved
                        && news.region.region_type() == region_type
                })
                .cloned()
                .collect();
            sort_newest_first(&mut items, |news| {
                (news.created_at_ms, news.news_id.clone())
            });
            Ok(items)
        })
    }

    fn list_approved_in_regions(
        &self,
        region_ids: &[String],
    ) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let region_ids = region_ids.to_vec();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<News> = store
                .read()
                .await
                .values()
                .filter(|news| {
                    news.status == ContentStatus::Approved
                        && region_ids
                            .iter()
                            .any(|region_id| news.region.region_id() == region_id)
                })
                .cloned()
                .collect();
            sort_newest_first(&mut items, |news| {
                (news.created_at_ms, news.news_id.clone())
            });
            Ok(items)
        })
    }

    fn list_featured(&self, limit: usize) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<News> = store
                .read()
                .await
                .values()
                .filter(|news| news.featured)
                .cloned()
                .collect();
            sort_newest_first(&mut items, |news| {
                (news.created_at_ms, news.news_id.clone())
            });
            items.truncate(limit);
            Ok(items)
        })
    }

    fn list_trending(&self, limit: usize) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<News> = store
                .read()
                .await
                .values()
                .filter(|news| news.trending)
                .cloned()
                .collect();
            sort_newest_first(&mut items, |news| {
                (news.created_at_ms, news.news_id.clone())
            });
            items.truncate(limit);
            Ok(items)
        })
    }
}

#[derive(Default)]
pub struct InMemoryEventRepository {
    store: Arc<RwLock<HashMap<String, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventRepository for InMemoryEventRepository {
    fn create(&self, event: &Event) -> BoxFuture<'_, DomainResult<Event>> {
        let event = event.clone();
        let store = self.store.clone();
        Box::pin(async move {
            store
                .write()
                .await
                .insert(event.event_id.clone(), event.clone());
            Ok(event)
        })
    }

    fn get(&self, event_id: &str) -> BoxFuture<'_, DomainResult<Option<Event>>> {
        let event_id = event_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&event_id).cloned()) })
    }

    fn update(&self, event: &Event) -> BoxFuture<'_, DomainResult<Event>> {
        let event = event.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            if !store.contains_key(&event.event_id) {
                return Err(DomainError::NotFound);
            }
            store.insert(event.event_id.clone(), event.clone());
            Ok(event)
        })
    }

    fn delete(&self, event_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let event_id = event_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.write().await.remove(&event_id).is_some()) })
    }

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<Event>>> {
        let region_id = region_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<Event> = store
                .read()
                .await
                .values()
                .filter(|event| {
                    event.status == ContentStatus::Approved
                        && event.region.region_id() == region_id
                })
                .cloned()
                .collect();
            sort_newest_first(&mut items, |event| {
                (event.created_at_ms, event.event_id.clone())
            });
            Ok(items)
        })
    }

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<Event>>> {
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<Event> = store
                .read()
                .await
                .values()
                .filter(|event| {
                    event.status == ContentStatus::Approved
                        && event.region.region_type() == region_type
                })
                .cloned()
                .collect();
            sort_newest_first(&mut items, |event| {
                (event.created_at_ms, event.event_id.clone())
            });
            Ok(items)
        })
    }
}

#[derive(Default)]
pub struct InMemoryPollRepository {
    store: Arc<RwLock<HashMap<String, Poll>>>,
}

impl InMemoryPollRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PollRepository for InMemoryPollRepository {
    fn create(&self, poll: &Poll) -> BoxFuture<'_, DomainResult<Poll>> {
        let poll = poll.clone();
        let store = self.store.clone();
        Box::pin(async move {
            store.write().await.insert(poll.poll_id.clone(), poll.clone());
            Ok(poll)
        })
    }

    fn get(&self, poll_id: &str) -> BoxFuture<'_, DomainResult<Option<Poll>>> {
        let poll_id = poll_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&poll_id).cloned()) })
    }

    fn update(&self, poll: &Poll) -> BoxFuture<'_, DomainResult<Poll>> {
        let poll = poll.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            if !store.contains_key(&poll.poll_id) {
                return Err(DomainError::NotFound);
            }
            store.insert(poll.poll_id.clone(), poll.clone());
            Ok(poll)
        })
    }

    fn delete(&self, poll_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let poll_id = poll_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.write().await.remove(&poll_id).is_some()) })
    }

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<Poll>>> {
        let region_id = region_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<Poll> = store
                .read()
                .await
                .values()
                .filter(|poll| {
                    poll.status == ContentStatus::Approved
                        && poll.region.region_id() == region_id
                })
                .cloned()
                .collect();
            sort_newest_first(&mut items, |poll| {
                (poll.created_at_ms, poll.poll_id.clone())
            });
            Ok(items)
        })
    }

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<Poll>>> {
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<Poll> = store
                .read()
                .await
                .values()
                .filter(|poll| {
                    poll.status == ContentStatus::Approved
                        && poll.region.region_type() == region_type
                })
                .cloned()
                .collect();
            sort_newest_first(&mut items, |poll| {
                (poll.created_at_ms, poll.poll_id.clone())
            });
            Ok(items)
        })
    }

    fn list_featured_approved(&self) -> BoxFuture<'_, DomainResult<Vec<Poll>>> {
        let store = self.store.clone();
        Box::pin(async move {
            let mut items: Vec<Poll> = store
                .read()
                .await
                .values()
                .filter(|poll| poll.featured && poll.status == ContentStatus::Approved)
                .cloned()
                .collect();
            sort_newest_first(&mut items, |poll| {
                (poll.created_at_ms, poll.poll_id.clone())
            });
            Ok(items)
        })
    }
}
