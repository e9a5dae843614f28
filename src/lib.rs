//! # Mindtui - Share Your Mind TUI Client
//!
//! A terminal client for the Share Your Mind social platform, built with
//! Ratatui around an Elm-like architecture.
//!
//! ## Architecture Overview
//!
//! - **Model** (`core::state`): one `AppState` value owning every slice
//! - **Message** (`core::msg`): events that can change the state
//! - **Update** (`core::update`): the only writer of state
//! - **Command** (`core::cmd`): side effects (network, disk, timers)
//! - **View** (`presentation::components`): stateless rendering
//!
//! List data lives in paged slots: each list remembers the query it was
//! loaded under, appends pages as the user scrolls and drops responses
//! that no longer match. Relationship and content changes fan out through
//! one reconciler so every loaded list stays consistent.
//!
//! ## Example Usage
//!
//! ```rust
//! use mindtui::core::msg::system::SystemMsg;
//! use mindtui::{update, AppState, Msg};
//!
//! let state = AppState::default();
//! let (state, _cmds) = update(Msg::System(SystemMsg::Quit), state);
//! assert!(state.system.should_quit);
//! ```

#![deny(warnings)]

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod integration;
pub mod presentation;
pub mod utils;

// Re-exports for convenience
pub use crate::core::cmd::Cmd;
pub use crate::core::msg::Msg;
pub use crate::core::raw_msg::RawMsg;
pub use crate::core::state::AppState;
pub use crate::core::translator::translate_raw_to_domain;
pub use crate::core::update::update;

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
