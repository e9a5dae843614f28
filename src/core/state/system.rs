use serde::{Deserialize, Serialize};

use crate::core::cmd::Cmd;
use crate::core::msg::system::SystemMsg;

/// Application-level control state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub should_quit: bool,
    pub should_suspend: bool,
    pub status_message: Option<String>,
    pub last_error: Option<String>,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, msg: SystemMsg) -> Vec<Cmd> {
        match msg {
            SystemMsg::Quit => {
                self.should_quit = true;
                vec![]
            }
            SystemMsg::Suspend => {
                self.should_suspend = true;
                vec![]
            }
            SystemMsg::Resume => {
                self.should_suspend = false;
                vec![]
            }
            SystemMsg::UpdateStatusMessage(message) => {
                self.status_message = Some(message);
                vec![]
            }
            SystemMsg::ClearStatusMessage => {
                self.status_message = None;
                vec![]
            }
            SystemMsg::ShowError(message) => {
                self.last_error = Some(message.clone());
                self.status_message = Some(message.clone());
                vec![Cmd::LogError { message }]
            }
        }
    }
}
