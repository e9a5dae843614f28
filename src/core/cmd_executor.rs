use color_eyre::eyre::Result;
use tokio::sync::mpsc;

use crate::core::cmd::{ApiRequest, Cmd};
use crate::core::msg::Msg;
use crate::infrastructure::session::SessionStore;

/// Bridges commands to the API service channel, the timer tasks and the
/// session store. Cloneable; every clone shares the same channel ends.
#[derive(Clone)]
pub struct CmdExecutor {
    api_sender: mpsc::UnboundedSender<ApiRequest>,
    msg_sender: mpsc::UnboundedSender<Msg>,
    session_store: SessionStore,
}

impl CmdExecutor {
    pub fn new(
        api_sender: mpsc::UnboundedSender<ApiRequest>,
        msg_sender: mpsc::UnboundedSender<Msg>,
        session_store: SessionStore,
    ) -> Self {
        Self {
            api_sender,
            msg_sender,
            session_store,
        }
    }

    pub fn execute_commands(&self, cmds: Vec<Cmd>) {
        for cmd in cmds {
            if let Err(error) = self.execute_command(&cmd) {
                log::error!("failed to execute {} command: {error}", cmd.name());
            }
        }
    }

    /// Execute a single command. Timer commands spawn a task that delivers
    /// the delayed message; everything stateful goes over a channel.
    pub fn execute_command(&self, cmd: &Cmd) -> Result<()> {
        match cmd {
            Cmd::None => {}

            Cmd::Api(request) => {
                self.api_sender.send(request.clone())?;
            }

            Cmd::Debounce {
                surface,
                generation,
                delay_ms,
            } => {
                let sender = self.msg_sender.clone();
                let msg = Msg::DebounceFired {
                    surface: *surface,
                    generation: *generation,
                };
                let delay = std::time::Duration::from_millis(*delay_ms);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = sender.send(msg);
                });
            }

            Cmd::ReleaseLatch { surface, delay_ms } => {
                let sender = self.msg_sender.clone();
                let msg = Msg::LatchReleased(*surface);
                let delay = std::time::Duration::from_millis(*delay_ms);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = sender.send(msg);
                });
            }

            Cmd::PersistSession(session) => {
                self.session_store.store(session)?;
            }

            Cmd::ClearSession => {
                self.session_store.clear()?;
            }

            Cmd::LogError { message } => {
                log::error!("{message}");
            }

            Cmd::LogInfo { message } => {
                log::info!("{message}");
            }

            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd)?;
                }
            }
        }
        Ok(())
    }
}
