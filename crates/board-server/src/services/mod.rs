//! Business logic services

pub mod messages;

pub use messages::MessageService;
