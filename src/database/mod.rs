/// SQLite pool management and migrations
pub mod connection;
/// Row types and queries for orders and reconciled payments
pub mod models;
