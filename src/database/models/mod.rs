pub mod order;
pub mod processed_payment;
pub mod service;

pub use order::*;
pub use processed_payment::*;
pub use service::*;
