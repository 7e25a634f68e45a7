//! Board Types - Pure type definitions for the message board
//!
//! This crate contains only plain data types with no async runtime
//! dependencies, so server and client code can share them.

pub mod message;

pub use message::*;
