//! # Monetization Bot
//!
//! A Telegram bot that sells TikTok and Facebook monetization tutorials.
//!
//! ## Features
//! - Guided order conversation (service, country, WhatsApp number)
//! - Paystack payment links, static or initialized per order
//! - Signed Paystack webhook with exactly-once payment confirmation
//! - Automatic tutorial delivery and admin group notification
//! - Hourly expiry of abandoned orders
//! - Persistent storage with SQLite

/// Conversation handlers, commands, keyboards and message copy
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Payment processor client and webhook signatures
pub mod payments;
/// Checkout, delivery, webhook processing and background jobs
pub mod services;
/// Validation and logging helpers
pub mod utils;
