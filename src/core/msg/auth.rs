use serde::{Deserialize, Serialize};

use crate::domain::session::Session;
use crate::domain::user::User;

/// Authentication lifecycle messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuthMsg {
    LoginSubmitted { email: String, password: String },
    RegisterSubmitted {
        email: String,
        username: String,
        password: String,
    },
    LoggedIn(Session),
    AuthFailed { message: String },
    LoggedOut,
    /// The server rejected the token; the session is gone for good
    SessionExpired,
    CurrentUserLoaded(User),
    /// The user typed the emailed token into the verify gate
    VerifySubmitted { token: String },
    /// The server accepted the verification token
    Verified(User),
    VerificationFailed { message: String },
    ResendRequested,
    ResendCompleted,
    ResendFailed { message: String },
    ProfileSaved(User),
    AccountDeleted,
}
