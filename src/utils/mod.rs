/// Structured log lines shared by handlers and services
pub mod logging;
/// User input parsing and validation
pub mod validation;
