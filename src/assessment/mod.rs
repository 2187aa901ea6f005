pub mod handlers;
pub mod models;
pub mod registry;
pub mod session;
