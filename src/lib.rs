pub mod availability;
pub mod calendar;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod redis_client;
pub mod services;
pub mod store;

use std::sync::Arc;

use availability::AvailabilityService;
use calendar::HttpCalendarClient;
use pricing::PricingEngine;
use services::feed_summary::FeedSummaryService;
use services::lifecycle::LifecycleManager;
use services::notify::HttpNotifier;
use store::PgBookingStore;

// Shared state for the whole application.
pub struct AppState {
    pub config: config::Config,
    pub availability: AvailabilityService,
    pub pricing: PricingEngine,
    pub lifecycle: LifecycleManager,
    pub feed: FeedSummaryService,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;
        db.run_migrations().await?;

        let redis = redis_client::RedisClient::new(&config.redis.url).await?;

        let calendar = Arc::new(HttpCalendarClient::from_config(&config.calendar));
        let notifier = Arc::new(HttpNotifier::from_config(&config.notify));
        let store = Arc::new(PgBookingStore::new(db.clone()));

        let availability = AvailabilityService::new(calendar.clone());
        let pricing = PricingEngine::new(db.clone());
        let lifecycle = LifecycleManager::new(
            store,
            calendar,
            notifier,
            availability.clone(),
            pricing.clone(),
            config.notify.operator_email.clone(),
        );
        let feed = FeedSummaryService::from_config(&config.channel_feed, redis.clone());

        Ok(Arc::new(Self {
            config,
            availability,
            pricing,
            lifecycle,
            feed,
        }))
    }
}
