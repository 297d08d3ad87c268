use serde::Deserialize;
use std::env;

// Top-level configuration container, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub calendar: CalendarConfig,
    pub channel_feed: ChannelFeedConfig,
    pub notify: NotifyConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

// The authoritative room calendar: ICS export for reads, JSON API for
// blocking-event writes.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    pub feed_url: String,
    pub events_url: String,
    pub api_token: String,
}

// Secondary read-only channel feed (advisory, display-only).
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelFeedConfig {
    pub url: String,
    pub cache_ttl_seconds: u64,
}

// Transactional mail relay plus the addresses used in lifecycle messaging.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub endpoint: String,
    pub api_token: String,
    pub from_address: String,
    pub operator_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "lodge_booking=debug,tower_http=debug".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                pool_size: env::var("DB_POOL_SIZE")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("DB_POOL_SIZE must be a valid number"),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").expect("REDIS_URL must be set"),
            },
            calendar: CalendarConfig {
                feed_url: env::var("CALENDAR_FEED_URL").expect("CALENDAR_FEED_URL must be set"),
                events_url: env::var("CALENDAR_EVENTS_URL")
                    .expect("CALENDAR_EVENTS_URL must be set"),
                api_token: env::var("CALENDAR_API_TOKEN").expect("CALENDAR_API_TOKEN must be set"),
            },
            channel_feed: ChannelFeedConfig {
                url: env::var("CHANNEL_FEED_URL").expect("CHANNEL_FEED_URL must be set"),
                cache_ttl_seconds: env::var("CHANNEL_FEED_TTL_SECONDS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .expect("CHANNEL_FEED_TTL_SECONDS must be a valid number"),
            },
            notify: NotifyConfig {
                endpoint: env::var("NOTIFY_ENDPOINT").expect("NOTIFY_ENDPOINT must be set"),
                api_token: env::var("NOTIFY_API_TOKEN").expect("NOTIFY_API_TOKEN must be set"),
                from_address: env::var("NOTIFY_FROM_ADDRESS")
                    .unwrap_or_else(|_| "stay@lodge.example".to_string()),
                operator_email: env::var("OPERATOR_EMAIL").expect("OPERATOR_EMAIL must be set"),
            },
            admin: AdminConfig {
                token: env::var("ADMIN_TOKEN").expect("ADMIN_TOKEN must be set"),
            },
        }
    }
}
