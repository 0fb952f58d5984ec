pub mod content_id;
pub mod listing_name;
