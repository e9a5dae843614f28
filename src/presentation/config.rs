//! Presentation-side configuration: keybinding tables and style tables
//! deserialized from the user config file.

pub mod keybindings;
pub mod styles;
