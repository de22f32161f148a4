//! Platform glue
//!
//! Browser-facing pieces the simulation talks to through plain data:
//! - Input intents from keyboard and on-screen controls
//! - Offline asset cache (service worker manifest and registration)

pub mod cache;
pub mod input;

pub use input::{Control, InputSource, InputState};
