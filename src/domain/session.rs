use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// Authenticated session as returned by `POST /sessions` and persisted to
/// the data directory. Tokens travel as plain strings on the wire; the
/// in-memory state wraps them in `secrecy::SecretString`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}
