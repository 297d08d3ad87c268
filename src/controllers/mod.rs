pub mod admin;
pub mod availability;
pub mod bookings;
pub mod feed;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(availability::routes())
        .merge(bookings::routes())
        .merge(admin::routes())
        .merge(feed::routes())
}
