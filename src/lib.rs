pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mongo;
pub mod observability;
pub mod routes;
pub mod schema;
pub mod store;
pub mod types;
pub mod views;
