pub mod health;
pub mod images;
pub mod listings;
pub mod profile;
pub mod saved_listings;
