use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};

/// Raw external events before translation into domain messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawMsg {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
    Error(String),
}
