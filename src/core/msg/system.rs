use serde::{Deserialize, Serialize};

/// Application-level control messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SystemMsg {
    Quit,
    Suspend,
    Resume,
    UpdateStatusMessage(String),
    ClearStatusMessage,
    ShowError(String),
}
