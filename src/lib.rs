// Admin Tabs Library Entry Point
// This file exposes all modules so they can be imported by main.rs
// and tested independently.

// Shared state
pub mod error;
pub mod logging;
pub mod settings;
pub mod state;

// UI-facing command layer
pub mod commands;

// Pure logic modules (no host/UI types)
pub mod modules;

pub use commands::{Command, Reply};
pub use state::AppState;
