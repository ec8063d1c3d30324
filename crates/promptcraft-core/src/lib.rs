//! Domain model and pure logic for the PromptCraft engine.
//!
//! This crate holds the scene descriptor, generation configuration,
//! prompt assembler, instruction selector, and session state. It performs
//! no I/O; the gateway and persistence collaborators live in the
//! interaction and infrastructure crates.

pub mod assembler;
pub mod config;
pub mod credential;
pub mod error;
pub mod instructions;
pub mod scene;
pub mod session;

// Re-export common error type
pub use error::{PromptCraftError, Result};
