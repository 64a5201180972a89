//! # hubot-core
//!
//! Core types, traits, configuration, and error handling for the Hubot
//! chat plugin.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;
