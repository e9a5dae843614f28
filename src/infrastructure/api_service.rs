//! Background API service
//!
//! Receives `ApiRequest`s from the update loop, performs them against the
//! REST client and reports outcomes back as domain messages. Requests run
//! in their own tasks so one slow call never blocks the rest; the
//! verification token submission additionally gets its own cancellation
//! handle so leaving the gate can abort it.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::cmd::ApiRequest;
use crate::core::msg::auth::AuthMsg;
use crate::core::msg::comments::CommentsMsg;
use crate::core::msg::posts::PostsMsg;
use crate::core::msg::system::SystemMsg;
use crate::core::msg::users::UsersMsg;
use crate::core::msg::Msg;
use crate::core::reconcile::Mutation;
use crate::domain::query::CommentQuery;
use crate::infrastructure::api::{ApiClient, ApiFailure, ErrorCode};

pub struct ApiService {
    client: ApiClient,
    request_rx: mpsc::UnboundedReceiver<ApiRequest>,
    cancel_token: CancellationToken,
    msg_tx: mpsc::UnboundedSender<Msg>,
    verify_token: Option<CancellationToken>,
}

pub type NewApiService = (
    mpsc::UnboundedSender<ApiRequest>,
    CancellationToken,
    ApiService,
);

impl ApiService {
    pub fn new(client: ApiClient, msg_tx: mpsc::UnboundedSender<Msg>) -> NewApiService {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        (
            request_tx,
            cancel_token.clone(),
            Self {
                client,
                request_rx,
                cancel_token,
                msg_tx,
                verify_token: None,
            },
        )
    }

    pub fn run(mut self) {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    request = self.request_rx.recv() => {
                        match request {
                            Some(request) => self.dispatch(request).await,
                            None => break,
                        }
                    }

                    _ = self.cancel_token.cancelled() => {
                        log::info!("api service received cancellation signal");
                        break;
                    }
                }
            }
        });
    }

    async fn dispatch(&mut self, request: ApiRequest) {
        // the two stateful requests are handled on the loop itself
        match request {
            ApiRequest::SetToken(token) => {
                self.client.set_token(token).await;
                return;
            }
            ApiRequest::SubmitVerification { token: verify } => {
                let cancel = self.cancel_token.child_token();
                self.verify_token = Some(cancel.clone());
                spawn_verification(self.client.clone(), self.msg_tx.clone(), verify, cancel);
                return;
            }
            ApiRequest::CancelVerification => {
                if let Some(token) = self.verify_token.take() {
                    token.cancel();
                }
                return;
            }
            _ => {}
        }

        let client = self.client.clone();
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            for msg in perform(client, msg_tx.clone(), request).await {
                let _ = msg_tx.send(msg);
            }
        });
    }
}

fn spawn_verification(
    client: ApiClient,
    msg_tx: mpsc::UnboundedSender<Msg>,
    verify: String,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        tokio::select! {
            result = client.verify(&verify) => {
                let msg = match result {
                    Ok(user) => Msg::Auth(AuthMsg::Verified(user)),
                    Err(failure) if failure.is_unauthorized() => {
                        Msg::Auth(AuthMsg::SessionExpired)
                    }
                    Err(failure) => Msg::Auth(AuthMsg::VerificationFailed {
                        message: failure.to_string(),
                    }),
                };
                let _ = msg_tx.send(msg);
            }
            _ = token.cancelled() => {
                log::debug!("verification submission cancelled");
            }
        }
    });
}

/// Perform one request and map its outcome to messages. Relation and delete
/// endpoints treat "already in that state" error codes as success so a
/// double keypress still converges.
async fn perform(
    client: ApiClient,
    msg_tx: mpsc::UnboundedSender<Msg>,
    request: ApiRequest,
) -> Vec<Msg> {
    match request {
        ApiRequest::SetToken(..)
        | ApiRequest::SubmitVerification { .. }
        | ApiRequest::CancelVerification => vec![],

        ApiRequest::Login { email, password } => match client.login(&email, &password).await {
            Ok(session) => vec![Msg::Auth(AuthMsg::LoggedIn(session))],
            Err(failure) => vec![Msg::Auth(AuthMsg::AuthFailed {
                message: failure.to_string(),
            })],
        },

        ApiRequest::Register {
            email,
            username,
            password,
        } => match client.register(&email, &username, &password).await {
            Ok(session) => vec![Msg::Auth(AuthMsg::LoggedIn(session))],
            Err(failure) => vec![Msg::Auth(AuthMsg::AuthFailed {
                message: failure.to_string(),
            })],
        },

        // logout is best effort, the local session is gone either way
        ApiRequest::Logout => {
            if let Err(failure) = client.logout().await {
                log::warn!("server logout failed: {failure}");
            }
            vec![]
        }

        ApiRequest::FetchCurrentUser => match client.current_user().await {
            Ok(user) => vec![Msg::Auth(AuthMsg::CurrentUserLoaded(user))],
            Err(failure) => vec![failure_msg(failure)],
        },

        ApiRequest::ResendVerification => match client.resend_verification().await {
            Ok(()) => vec![Msg::Auth(AuthMsg::ResendCompleted)],
            Err(failure) => vec![Msg::Auth(AuthMsg::ResendFailed {
                message: failure.to_string(),
            })],
        },

        ApiRequest::UpdateProfile {
            username,
            bio,
            avatar_path,
        } => {
            match client
                .update_profile(username.as_deref(), bio.as_deref(), avatar_path.as_deref())
                .await
            {
                Ok(user) => vec![Msg::Auth(AuthMsg::ProfileSaved(user))],
                Err(failure) => vec![failure_msg(failure)],
            }
        }

        ApiRequest::DeleteAccount => match client.delete_account().await {
            Ok(()) => vec![Msg::Auth(AuthMsg::AccountDeleted)],
            Err(failure) => vec![failure_msg(failure)],
        },

        ApiRequest::FetchPosts {
            query,
            offset,
            limit,
        } => match client.fetch_posts(&query, offset, limit).await {
            Ok(page) => vec![Msg::Posts(PostsMsg::PageLoaded { query, page })],
            Err(failure) if failure.is_unauthorized() => {
                vec![Msg::Auth(AuthMsg::SessionExpired)]
            }
            Err(failure) => vec![Msg::Posts(PostsMsg::PageFailed {
                query,
                offset,
                message: failure.to_string(),
            })],
        },

        ApiRequest::FetchPost { id } => match client.fetch_post(id).await {
            Ok(post) => vec![Msg::Posts(PostsMsg::DetailLoaded(post))],
            Err(failure) => vec![Msg::Posts(PostsMsg::DetailFailed {
                message: failure.to_string(),
            })],
        },

        ApiRequest::CreatePost {
            file_path,
            description,
        } => {
            let progress_tx = msg_tx.clone();
            let result = client
                .create_post(&file_path, description.as_deref(), move |percent| {
                    let _ = progress_tx.send(Msg::Posts(PostsMsg::UploadProgress(percent)));
                })
                .await;
            match result {
                Ok(post) => vec![
                    Msg::Posts(PostsMsg::UploadFinished),
                    Msg::Mutation(Mutation::PostCreated(post)),
                ],
                Err(failure) => vec![Msg::Posts(PostsMsg::UploadFinished), failure_msg(failure)],
            }
        }

        ApiRequest::UpdatePost { id, description } => {
            match client.update_post(id, description.as_deref()).await {
                Ok(post) => vec![Msg::Mutation(Mutation::PostUpdated(post))],
                Err(failure) => vec![failure_msg(failure)],
            }
        }

        ApiRequest::DeletePost { id } => match client.delete_post(id).await {
            Ok(()) => vec![Msg::Mutation(Mutation::PostDeleted { post_id: id })],
            Err(failure) if failure.code == Some(ErrorCode::NotFound) => {
                vec![Msg::Mutation(Mutation::PostDeleted { post_id: id })]
            }
            Err(failure) => vec![failure_msg(failure)],
        },

        ApiRequest::FetchComments {
            post_id,
            offset,
            limit,
        } => match client.fetch_comments(post_id, offset, limit).await {
            Ok(page) => vec![Msg::Comments(CommentsMsg::PageLoaded {
                post_id,
                query: CommentQuery,
                page,
            })],
            Err(failure) => vec![Msg::Comments(CommentsMsg::Failed {
                post_id,
                offset,
                message: failure.to_string(),
            })],
        },

        ApiRequest::CreateComment { post_id, content } => {
            match client.create_comment(post_id, &content).await {
                Ok(comment) => vec![Msg::Mutation(Mutation::CommentAdded { post_id, comment })],
                Err(failure) => vec![failure_msg(failure)],
            }
        }

        ApiRequest::DeleteComment {
            post_id,
            comment_id,
        } => match client.delete_comment(post_id, comment_id).await {
            Ok(()) => vec![Msg::Mutation(Mutation::CommentDeleted {
                post_id,
                comment_id,
            })],
            Err(failure) if failure.code == Some(ErrorCode::NotFound) => {
                vec![Msg::Mutation(Mutation::CommentDeleted {
                    post_id,
                    comment_id,
                })]
            }
            Err(failure) => vec![failure_msg(failure)],
        },

        ApiRequest::FetchUsers {
            query,
            offset,
            limit,
        } => match client.fetch_users(&query, offset, limit).await {
            Ok(page) => vec![Msg::Users(UsersMsg::DirectoryPageLoaded { query, page })],
            Err(failure) if failure.is_unauthorized() => {
                vec![Msg::Auth(AuthMsg::SessionExpired)]
            }
            Err(failure) => vec![Msg::Users(UsersMsg::DirectoryFailed {
                query,
                message: failure.to_string(),
            })],
        },

        ApiRequest::FetchUser { id } => match client.fetch_user(id).await {
            Ok(user) => vec![Msg::Users(UsersMsg::ProfileLoaded(user))],
            Err(failure) => vec![Msg::Users(UsersMsg::ProfileFailed {
                message: failure.to_string(),
            })],
        },

        ApiRequest::FetchBlacklist {
            query,
            offset,
            limit,
        } => match client.fetch_blacklist(&query, offset, limit).await {
            Ok(page) => vec![Msg::Users(UsersMsg::BlacklistPageLoaded { query, page })],
            Err(failure) => vec![Msg::Users(UsersMsg::BlacklistFailed {
                query,
                offset,
                message: failure.to_string(),
            })],
        },

        ApiRequest::FetchPeople {
            kind,
            user_id,
            query,
            offset,
            limit,
        } => match client.fetch_people(kind, user_id, &query, offset, limit).await {
            Ok(page) => vec![Msg::Users(UsersMsg::PeoplePageLoaded {
                kind,
                user_id,
                query,
                page,
            })],
            Err(failure) => vec![Msg::Users(UsersMsg::PeopleFailed {
                kind,
                user_id,
                query,
                offset,
                message: failure.to_string(),
            })],
        },

        ApiRequest::FetchBlockedMe => match client.fetch_blocked_me().await {
            Ok(ids) => vec![Msg::Users(UsersMsg::BlockedMeLoaded(ids))],
            Err(failure) => {
                log::warn!("failed to fetch blocked-me ids: {failure}");
                vec![]
            }
        },

        ApiRequest::FetchBlockedByMe => match client.fetch_blocked_by_me().await {
            Ok(ids) => vec![Msg::Users(UsersMsg::BlockedByMeLoaded(ids))],
            Err(failure) => {
                log::warn!("failed to fetch blocked-by-me ids: {failure}");
                vec![]
            }
        },

        ApiRequest::Follow { user_id } => relation_outcome(
            client.follow(user_id).await,
            ErrorCode::AlreadyFollowing,
            Mutation::Followed { user_id },
        ),

        ApiRequest::Unfollow { user_id } => relation_outcome(
            client.unfollow(user_id).await,
            ErrorCode::NotFollowing,
            Mutation::Unfollowed { user_id },
        ),

        ApiRequest::Block { user_id } => relation_outcome(
            client.block(user_id).await,
            ErrorCode::AlreadyBlocked,
            Mutation::Blocked { user_id },
        ),

        ApiRequest::Unblock { user_id } => relation_outcome(
            client.unblock(user_id).await,
            ErrorCode::NotBlocked,
            Mutation::Unblocked { user_id },
        ),
    }
}

/// Map a relation call result: the "already in that state" code confirms
/// the mutation just as a success does.
fn relation_outcome(
    result: Result<(), ApiFailure>,
    idempotent_code: ErrorCode,
    mutation: Mutation,
) -> Vec<Msg> {
    match result {
        Ok(()) => vec![Msg::Mutation(mutation)],
        Err(failure) if failure.code == Some(idempotent_code) => {
            vec![Msg::Mutation(mutation)]
        }
        Err(failure) => vec![failure_msg(failure)],
    }
}

fn failure_msg(failure: ApiFailure) -> Msg {
    if failure.is_unauthorized() {
        Msg::Auth(AuthMsg::SessionExpired)
    } else {
        Msg::System(SystemMsg::ShowError(failure.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_relation_outcome_success() {
        let msgs = relation_outcome(Ok(()), ErrorCode::AlreadyFollowing, Mutation::Followed {
            user_id: 3,
        });
        assert_eq!(msgs, vec![Msg::Mutation(Mutation::Followed { user_id: 3 })]);
    }

    #[test]
    fn test_relation_outcome_idempotent_code_confirms() {
        let failure = ApiFailure {
            status: Some(409),
            code: Some(ErrorCode::AlreadyFollowing),
            message: "already following".to_string(),
        };
        let msgs = relation_outcome(Err(failure), ErrorCode::AlreadyFollowing, Mutation::Followed {
            user_id: 3,
        });
        assert_eq!(msgs, vec![Msg::Mutation(Mutation::Followed { user_id: 3 })]);
    }

    #[test]
    fn test_relation_outcome_other_error_surfaces() {
        let failure = ApiFailure {
            status: Some(500),
            code: None,
            message: "boom".to_string(),
        };
        let msgs = relation_outcome(Err(failure), ErrorCode::NotBlocked, Mutation::Unblocked {
            user_id: 3,
        });
        assert_eq!(
            msgs,
            vec![Msg::System(SystemMsg::ShowError("boom (500)".to_string()))]
        );
    }

    #[test]
    fn test_failure_msg_unauthorized_expires_session() {
        let failure = ApiFailure {
            status: Some(401),
            code: None,
            message: "token expired".to_string(),
        };
        assert_eq!(failure_msg(failure), Msg::Auth(AuthMsg::SessionExpired));
    }
}
