pub mod auth;
pub mod posts;
pub mod slug;
pub mod store;
pub mod taxonomy;
