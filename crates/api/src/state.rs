use std::sync::Arc;

use varta_domain::ports::db::DbAdapter;
use varta_domain::ports::events::EventRepository;
use varta_domain::ports::news::NewsRepository;
use varta_domain::ports::polls::PollRepository;
use varta_domain::ports::profiles::ProfileReader;
use varta_infra::config::AppConfig;
use varta_infra::db::{DbConfig, SurrealAdapter};
use varta_infra::profiles::HttpProfileReader;
use varta_infra::repositories::{
    self, InMemoryEventRepository, InMemoryNewsRepository, InMemoryPollRepository,
    SurrealEventRepository, SurrealNewsRepository, SurrealPollRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub news_repo: Arc<dyn NewsRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub poll_repo: Arc<dyn PollRepository>,
    pub profiles: Arc<dyn ProfileReader>,
    pub db: Option<Arc<dyn DbAdapter>>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let profiles: Arc<dyn ProfileReader> = Arc::new(HttpProfileReader::connect(&config).await?);

        if config.data_backend.eq_ignore_ascii_case("surreal") {
            let db_config = DbConfig::from_app_config(&config);
            let client = repositories::connect(&db_config).await?;
            return Ok(Self {
                config,
                news_repo: Arc::new(SurrealNewsRepository::with_client(client.clone())),
                event_repo: Arc::new(SurrealEventRepository::with_client(client.clone())),
                poll_repo: Arc::new(SurrealPollRepository::with_client(client)),
                profiles,
                db: Some(Arc::new(SurrealAdapter::new(db_config))),
            });
        }

        tracing::warn!("using in-memory data backend; content will not survive restarts");
        Ok(Self {
            config,
            news_repo: Arc::new(InMemoryNewsRepository::new()),
            event_repo: Arc::new(InMemoryEventRepository::new()),
            poll_repo: Arc::new(InMemoryPollRepository::new()),
            profiles,
            db: None,
        })
    }

    #[allow(dead_code)]
    pub fn with_repositories(
        config: AppConfig,
        news_repo: Arc<dyn NewsRepository>,
        event_repo: Arc<dyn EventRepository>,
        poll_repo: Arc<dyn PollRepository>,
        profiles: Arc<dyn ProfileReader>,
    ) -> Self {
        Self {
            config,
            news_repo,
            event_repo,
            poll_repo,
            profiles,
            db: None,
        }
    }
}
