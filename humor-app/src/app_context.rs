use crate::application::{CatalogStore, Gallery, IdentityVerifier, VoteRecorder, VoteStore, VotingFeed};
use crate::config::Config;
use crate::domain::Viewer;
use crate::infrastructure::auth::SupabaseAuth;
use crate::infrastructure::db::{create_connection, CatalogRepository, VoteRepository};
use crate::infrastructure::memory::MemoryStore;
use humor_errors::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub vote_recorder: Arc<VoteRecorder>,
    pub voting_feed: Arc<VotingFeed>,
    pub gallery: Arc<Gallery>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl AppContext {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        votes: Arc<dyn VoteStore>,
        identity: Arc<dyn IdentityVerifier>,
        gallery_page_size: u64,
    ) -> Self {
        Self {
            vote_recorder: Arc::new(VoteRecorder::new(votes.clone())),
            voting_feed: Arc::new(VotingFeed::new(catalog.clone(), votes)),
            gallery: Arc::new(Gallery::new(catalog, gallery_page_size)),
            identity,
        }
    }

    pub fn in_memory(store: Arc<MemoryStore>, identity: Arc<dyn IdentityVerifier>, gallery_page_size: u64) -> Self {
        Self::new(store.clone(), store, identity, gallery_page_size)
    }

    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let identity: Arc<dyn IdentityVerifier> = Arc::new(SupabaseAuth::new(
            &config.supabase_url,
            &config.supabase_anon_key,
            config.request_timeout,
        )?);

        match &config.database_url {
            Some(database_url) => {
                let db = create_connection(database_url, config.request_timeout)
                    .await
                    .map_err(|e| AppError::Unreachable(format!("Failed to connect to database: {}", e)))?;
                tracing::info!("Using Postgres store");
                Ok(Self::new(
                    Arc::new(CatalogRepository::new(db.clone(), config.request_timeout)),
                    Arc::new(VoteRepository::new(db, config.request_timeout)),
                    identity,
                    config.gallery_page_size,
                ))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
                Ok(Self::in_memory(Arc::new(MemoryStore::new()), identity, config.gallery_page_size))
            }
        }
    }

    /// Resolves an optional bearer token. No token means an anonymous viewer;
    /// a token that fails verification is an error.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Option<Viewer>, AppError> {
        let Some(token) = token else {
            return Ok(None);
        };
        match self.identity.verify(token).await {
            Ok(viewer) => Ok(Some(viewer)),
            Err(e) => {
                tracing::warn!("Bearer token verification failed: {}", e);
                Err(e)
            }
        }
    }
}
