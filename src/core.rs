//! Core Elm Architecture implementation
//!
//! This module contains the core components of the Elm architecture:
//! - Messages and raw messages
//! - Application state management, including the paged list slots
//! - Update logic, fetch triggering and mutation reconciliation
//! - Command execution and the message translation layer

pub mod cmd;
pub mod cmd_executor;
pub mod msg;
pub mod raw_msg;
pub mod reconcile;
pub mod state;
pub mod translator;
pub mod trigger;
pub mod update;
