use secrecy::{ExposeSecret, SecretString};

use crate::core::cmd::{ApiRequest, Cmd};
use crate::core::msg::auth::AuthMsg;
use crate::domain::session::Session;
use crate::domain::user::User;
use crate::domain::EntityId;

/// Authentication state: the token trio plus in-flight flags.
///
/// Tokens never leave this slice unwrapped except to rebuild a `Session`
/// for persistence or to hand the bearer token to the HTTP client.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    user: Option<User>,
    pub login_in_flight: bool,
    /// A verification token submission is in flight
    pub verify_waiting: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a persisted session at startup
    pub fn restored(session: Session) -> Self {
        let mut state = Self::new();
        state.install(session);
        state
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn current_user_id(&self) -> Option<EntityId> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn is_verified(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_verified)
    }

    pub fn access_token_value(&self) -> Option<String> {
        self.access_token
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }

    /// Rebuild the persistable session from the in-memory trio
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            access_token: self.access_token.as_ref()?.expose_secret().to_string(),
            refresh_token: self.refresh_token.as_ref()?.expose_secret().to_string(),
            user: self.user.clone()?,
        })
    }

    fn install(&mut self, session: Session) {
        self.access_token = Some(SecretString::from(session.access_token));
        self.refresh_token = Some(SecretString::from(session.refresh_token));
        self.user = Some(session.user);
    }

    /// The trio lives and dies together
    fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        self.login_in_flight = false;
        self.verify_waiting = false;
    }

    pub fn update(&mut self, msg: AuthMsg) -> Vec<Cmd> {
        match msg {
            AuthMsg::LoginSubmitted { email, password } => {
                self.login_in_flight = true;
                vec![Cmd::Api(ApiRequest::Login { email, password })]
            }
            AuthMsg::RegisterSubmitted {
                email,
                username,
                password,
            } => {
                self.login_in_flight = true;
                vec![Cmd::Api(ApiRequest::Register {
                    email,
                    username,
                    password,
                })]
            }
            AuthMsg::LoggedIn(session) => {
                let token = session.access_token.clone();
                self.install(session.clone());
                self.login_in_flight = false;
                vec![
                    Cmd::Api(ApiRequest::SetToken(Some(token))),
                    Cmd::PersistSession(session),
                ]
            }
            AuthMsg::VerifySubmitted { token } => {
                if self.verify_waiting {
                    return vec![];
                }
                self.verify_waiting = true;
                vec![Cmd::Api(ApiRequest::SubmitVerification { token })]
            }
            AuthMsg::AuthFailed { .. } => {
                self.login_in_flight = false;
                vec![]
            }
            AuthMsg::LoggedOut => {
                let mut cmds = vec![Cmd::ClearSession, Cmd::Api(ApiRequest::SetToken(None))];
                if self.verify_waiting {
                    cmds.push(Cmd::Api(ApiRequest::CancelVerification));
                }
                if self.is_authenticated() {
                    cmds.push(Cmd::Api(ApiRequest::Logout));
                }
                self.clear();
                cmds
            }
            AuthMsg::SessionExpired => {
                self.clear();
                vec![Cmd::ClearSession, Cmd::Api(ApiRequest::SetToken(None))]
            }
            AuthMsg::CurrentUserLoaded(user) | AuthMsg::ProfileSaved(user) => {
                self.user = Some(user);
                match self.session() {
                    Some(session) => vec![Cmd::PersistSession(session)],
                    None => vec![],
                }
            }
            AuthMsg::Verified(user) => {
                self.user = Some(user);
                self.verify_waiting = false;
                match self.session() {
                    Some(session) => vec![Cmd::PersistSession(session)],
                    None => vec![],
                }
            }
            AuthMsg::VerificationFailed { .. } => {
                self.verify_waiting = false;
                vec![]
            }
            AuthMsg::ResendRequested => {
                vec![Cmd::Api(ApiRequest::ResendVerification)]
            }
            AuthMsg::ResendCompleted | AuthMsg::ResendFailed { .. } => vec![],
            AuthMsg::AccountDeleted => {
                self.clear();
                vec![Cmd::ClearSession, Cmd::Api(ApiRequest::SetToken(None))]
            }
        }
    }
}
