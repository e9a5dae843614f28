//! Infrastructure layer
//!
//! Everything that touches the outside world: the REST client and its
//! background service, terminal handling, configuration files, the
//! persisted session and the command line.

pub mod api;
pub mod api_service;
pub mod cli;
pub mod config;
pub mod session;
pub mod tui;
