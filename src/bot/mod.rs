/// Bot commands and their argument parsing
pub mod commands;
/// Order conversation steps
pub mod conversation;
/// Update routing, dialogue states and handlers
pub mod handlers;
/// Inline keyboards
pub mod keyboards;
/// User-facing message copy
pub mod texts;
