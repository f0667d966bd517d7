/// Payment link creation for a collected order
pub mod checkout;
/// Tutorial delivery and admin notification after payment
pub mod delivery;
/// Periodic removal of abandoned orders
pub mod expiry;
/// Axum router: health checks and the Paystack webhook
pub mod http;
/// Order submission and cancellation behind the conversation
pub mod orders;
/// Signed webhook validation and exactly-once reconciliation
pub mod webhook;
