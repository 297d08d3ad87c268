pub mod feed_summary;
pub mod lifecycle;
pub mod notify;
