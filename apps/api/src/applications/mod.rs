pub mod candidates;
pub mod handlers;
pub mod status;
pub mod store;
pub mod tracker;
