//! Application runner
//!
//! Composition root and main loop. Terminal events become raw messages,
//! raw messages become domain messages, the update function folds them
//! into state and the executor carries the resulting commands out to the
//! API service, the timers and the session store.

use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::cmd_executor::CmdExecutor;
use crate::core::msg::auth::AuthMsg;
use crate::core::msg::system::SystemMsg;
use crate::core::msg::Msg;
use crate::core::raw_msg::RawMsg;
use crate::core::state::AppState;
use crate::core::translator::translate_raw_to_domain;
use crate::core::update::update;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api_service::ApiService;
use crate::infrastructure::config::Config;
use crate::infrastructure::session::SessionStore;
use crate::infrastructure::tui::{Event, Tui};
use crate::presentation::components::Components;

pub struct AppRunner {
    state: AppState,
    components: Components,
    executor: CmdExecutor,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    api_cancel: CancellationToken,
    tick_rate: f64,
    frame_rate: f64,
}

impl AppRunner {
    /// Build the whole stack: session store, API client and service,
    /// command executor and initial state.
    pub fn new(config: Config, tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let session_store = SessionStore::from_data_dir();
        let restored_session = session_store.load();

        let (msg_tx, msg_rx) = mpsc::unbounded_channel::<Msg>();

        let client = ApiClient::new(config.base_url.clone());
        let (api_tx, api_cancel, api_service) = ApiService::new(client, msg_tx.clone());
        api_service.run();

        let executor = CmdExecutor::new(api_tx, msg_tx, session_store);

        let mut state = AppState::new_with_config(config);

        // Replaying the login moves the restored session through the same
        // path a fresh one takes: token push, navigation and initial
        // fetches, or the verify gate when the account is still unverified.
        if let Some(session) = restored_session {
            log::info!("restored session for user {}", session.user.username);
            let (next, cmds) = update(Msg::Auth(AuthMsg::LoggedIn(session)), state);
            state = next;
            executor.execute_commands(cmds);
        }

        Ok(Self {
            state,
            components: Components::new(),
            executor,
            msg_rx,
            api_cancel,
            tick_rate,
            frame_rate,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        loop {
            if let Some(event) = tui.next().await {
                match event {
                    Event::Render => {
                        let state = &self.state;
                        let components = &mut self.components;
                        tui.draw(|frame| components.render(frame, state))?;
                    }
                    Event::Resize(width, height) => {
                        tui.resize(ratatui::prelude::Rect::new(0, 0, width, height))?;
                        self.handle_raw(RawMsg::Resize(width, height));
                    }
                    Event::Key(key) => self.handle_raw(RawMsg::Key(key)),
                    Event::Tick => self.handle_raw(RawMsg::Tick),
                    Event::Error => {
                        self.handle_raw(RawMsg::Error("terminal event error".to_string()));
                    }
                    Event::Quit => self.handle_msg(Msg::System(SystemMsg::Quit)),
                    _ => {}
                }
            }

            // outcomes reported by the API service and the timers
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.handle_msg(msg);
            }

            if self.state.system.should_suspend {
                tui.suspend()?;
                self.handle_msg(Msg::System(SystemMsg::Resume));
                tui = Tui::new()?
                    .tick_rate(self.tick_rate)
                    .frame_rate(self.frame_rate);
                tui.resume()?;
            }

            if self.state.system.should_quit {
                break;
            }
        }

        self.api_cancel.cancel();
        tui.exit()?;
        Ok(())
    }

    fn handle_raw(&mut self, raw: RawMsg) {
        for msg in translate_raw_to_domain(raw, &self.state) {
            self.handle_msg(msg);
        }
    }

    /// Fold one message into the state and carry out its commands
    fn handle_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, cmds) = update(msg, state);
        self.state = state;
        self.executor.execute_commands(cmds);
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &AppState {
        &self.state
    }
}
