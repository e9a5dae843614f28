//! Presentation layer: stateless components, render-only widgets and the
//! keybinding/style configuration they read.

pub mod components;
pub mod config;
pub mod widgets;
