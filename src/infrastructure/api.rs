//! REST client for the Share Your Mind API
//!
//! Thin wrapper over reqwest. Knows URLs, verbs and auth headers; all
//! decisions about what to fetch and when stay in the update layer. The
//! bearer token lives behind a lock so `SetToken` can swap it while
//! requests are in flight.

use std::path::Path;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::query::{
    BlacklistQuery, Page, PeopleKind, PeopleQuery, PostQuery, UserQuery,
};
use crate::domain::session::Session;
use crate::domain::user::User;
use crate::domain::EntityId;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Machine-readable error codes the server attaches to failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AlreadyFollowing,
    NotFollowing,
    AlreadyBlocked,
    NotBlocked,
    Unauthorized,
    NotVerified,
    NotFound,
    Validation,
}

/// A failed API call: transport errors carry no status, HTTP errors carry
/// the status and whatever the server put in the error body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub code: Option<ErrorCode>,
    pub message: String,
}

impl ApiFailure {
    fn transport(error: reqwest::Error) -> Self {
        Self {
            status: None,
            code: None,
            message: error.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401) || self.code == Some(ErrorCode::Unauthorized)
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiFailure {}

/// Error body shape: `{"message": "...", "code": "ALREADY_FOLLOWING"}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<ErrorCode>,
}

/// Listing envelope returned by every collection endpoint
#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: Vec<T>,
    count: u32,
}

impl<T> Listing<T> {
    /// Attach the offset and limit the request was made with; the server
    /// does not echo them back.
    fn into_page(self, offset: u32, limit: u32) -> Page<T> {
        Page {
            items: self.data,
            total_count: self.count,
            offset,
            limit,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = self.token.read().await.as_ref() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiFailure> {
        let response = builder.send().await.map_err(ApiFailure::transport)?;
        let response = check_status(response).await?;
        response.json().await.map_err(ApiFailure::transport)
    }

    async fn execute_empty(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiFailure> {
        let response = builder.send().await.map_err(ApiFailure::transport)?;
        check_status(response).await?;
        Ok(())
    }

    // --- auth ---

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiFailure> {
        let builder = self
            .request(reqwest::Method::POST, "/auth/login")
            .await
            .json(&serde_json::json!({ "email": email, "password": password }));
        self.execute(builder).await
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, ApiFailure> {
        let builder = self.request(reqwest::Method::POST, "/auth/register").await.json(
            &serde_json::json!({ "email": email, "username": username, "password": password }),
        );
        self.execute(builder).await
    }

    pub async fn logout(&self) -> Result<(), ApiFailure> {
        let builder = self.request(reqwest::Method::POST, "/auth/logout").await;
        self.execute_empty(builder).await
    }

    pub async fn current_user(&self) -> Result<User, ApiFailure> {
        self.execute(self.get("/users/me").await).await
    }

    /// Submit the token the server emailed at registration
    pub async fn verify(&self, token: &str) -> Result<User, ApiFailure> {
        let builder = self
            .request(reqwest::Method::PUT, "/users/verify")
            .await
            .json(&serde_json::json!({ "token": token }));
        self.execute(builder).await
    }

    pub async fn resend_verification(&self) -> Result<(), ApiFailure> {
        let builder = self
            .request(reqwest::Method::POST, "/users/resend-verification-email")
            .await;
        self.execute_empty(builder).await
    }

    /// Multipart update: text fields plus an optional avatar file
    pub async fn update_profile(
        &self,
        username: Option<&str>,
        bio: Option<&str>,
        avatar_path: Option<&str>,
    ) -> Result<User, ApiFailure> {
        let mut form = reqwest::multipart::Form::new();
        if let Some(username) = username {
            form = form.text("username", username.to_string());
        }
        if let Some(bio) = bio {
            form = form.text("bio", bio.to_string());
        }
        if let Some(avatar_path) = avatar_path {
            let bytes = tokio::fs::read(avatar_path).await.map_err(|error| ApiFailure {
                status: None,
                code: None,
                message: format!("cannot read {avatar_path}: {error}"),
            })?;
            let file_name = Path::new(avatar_path)
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "avatar".to_string());
            form = form.part("avatar", reqwest::multipart::Part::bytes(bytes).file_name(file_name));
        }

        let builder = self
            .request(reqwest::Method::PUT, "/users")
            .await
            .multipart(form);
        self.execute(builder).await
    }

    pub async fn delete_account(&self) -> Result<(), ApiFailure> {
        let builder = self.request(reqwest::Method::DELETE, "/users").await;
        self.execute_empty(builder).await
    }

    // --- posts ---

    pub async fn fetch_posts(
        &self,
        query: &PostQuery,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Post>, ApiFailure> {
        let path = posts_path(query, offset, limit);
        let listing: Listing<Post> = self.execute(self.get(&path).await).await?;
        Ok(listing.into_page(offset, limit))
    }

    pub async fn fetch_post(&self, id: EntityId) -> Result<Post, ApiFailure> {
        self.execute(self.get(&format!("/posts/{id}")).await).await
    }

    /// Multipart upload. `on_progress` is called with 0..=100 as the file
    /// body is streamed out.
    pub async fn create_post(
        &self,
        file_path: &str,
        description: Option<&str>,
        on_progress: impl Fn(u8) + Send + Sync + 'static,
    ) -> Result<Post, ApiFailure> {
        let file_name = Path::new(file_path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let file = tokio::fs::File::open(file_path).await.map_err(|error| ApiFailure {
            status: None,
            code: None,
            message: format!("cannot open {file_path}: {error}"),
        })?;
        let total = file
            .metadata()
            .await
            .map_err(|error| ApiFailure {
                status: None,
                code: None,
                message: format!("cannot stat {file_path}: {error}"),
            })?
            .len();

        let stream = progress_stream(file, total, on_progress);
        let part = reqwest::multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(stream),
            total,
        )
        .file_name(file_name);

        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }

        let builder = self
            .request(reqwest::Method::POST, "/posts")
            .await
            .multipart(form);
        self.execute(builder).await
    }

    pub async fn update_post(
        &self,
        id: EntityId,
        description: Option<&str>,
    ) -> Result<Post, ApiFailure> {
        let builder = self
            .request(reqwest::Method::PUT, &format!("/posts/{id}"))
            .await
            .json(&serde_json::json!({ "description": description }));
        self.execute(builder).await
    }

    pub async fn delete_post(&self, id: EntityId) -> Result<(), ApiFailure> {
        let builder = self
            .request(reqwest::Method::DELETE, &format!("/posts/{id}"))
            .await;
        self.execute_empty(builder).await
    }

    // --- comments ---

    pub async fn fetch_comments(
        &self,
        post_id: EntityId,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Comment>, ApiFailure> {
        let path = format!("/posts/{post_id}/comments?offset={offset}&limit={limit}");
        let listing: Listing<Comment> = self.execute(self.get(&path).await).await?;
        Ok(listing.into_page(offset, limit))
    }

    pub async fn create_comment(
        &self,
        post_id: EntityId,
        content: &str,
    ) -> Result<Comment, ApiFailure> {
        let builder = self
            .request(reqwest::Method::POST, &format!("/posts/{post_id}/comments"))
            .await
            .json(&serde_json::json!({ "content": content }));
        self.execute(builder).await
    }

    pub async fn delete_comment(
        &self,
        post_id: EntityId,
        comment_id: EntityId,
    ) -> Result<(), ApiFailure> {
        let builder = self
            .request(
                reqwest::Method::DELETE,
                &format!("/posts/{post_id}/comments/{comment_id}"),
            )
            .await;
        self.execute_empty(builder).await
    }

    // --- users ---

    pub async fn fetch_users(
        &self,
        query: &UserQuery,
        offset: u32,
        limit: u32,
    ) -> Result<Page<User>, ApiFailure> {
        let path = users_path(query, offset, limit);
        let listing: Listing<User> = self.execute(self.get(&path).await).await?;
        Ok(listing.into_page(offset, limit))
    }

    pub async fn fetch_user(&self, id: EntityId) -> Result<User, ApiFailure> {
        self.execute(self.get(&format!("/users/{id}")).await).await
    }

    pub async fn fetch_blacklist(
        &self,
        query: &BlacklistQuery,
        offset: u32,
        limit: u32,
    ) -> Result<Page<User>, ApiFailure> {
        let path = format!(
            "/users/blacklist?query={}&offset={offset}&limit={limit}",
            encode(&query.query)
        );
        let listing: Listing<User> = self.execute(self.get(&path).await).await?;
        Ok(listing.into_page(offset, limit))
    }

    pub async fn fetch_people(
        &self,
        kind: PeopleKind,
        user_id: EntityId,
        query: &PeopleQuery,
        offset: u32,
        limit: u32,
    ) -> Result<Page<User>, ApiFailure> {
        let path = format!(
            "/users/{user_id}/{kind}?query={}&offset={offset}&limit={limit}",
            encode(&query.query)
        );
        let listing: Listing<User> = self.execute(self.get(&path).await).await?;
        Ok(listing.into_page(offset, limit))
    }

    pub async fn fetch_blocked_me(&self) -> Result<Vec<EntityId>, ApiFailure> {
        self.execute(self.get("/users/blocked-me").await).await
    }

    pub async fn fetch_blocked_by_me(&self) -> Result<Vec<EntityId>, ApiFailure> {
        self.execute(self.get("/users/blocked-by-me").await).await
    }

    // --- relations ---

    pub async fn follow(&self, user_id: EntityId) -> Result<(), ApiFailure> {
        let builder = self
            .request(reqwest::Method::POST, &format!("/users/{user_id}/follow"))
            .await;
        self.execute_empty(builder).await
    }

    pub async fn unfollow(&self, user_id: EntityId) -> Result<(), ApiFailure> {
        let builder = self
            .request(reqwest::Method::DELETE, &format!("/users/{user_id}/follow"))
            .await;
        self.execute_empty(builder).await
    }

    pub async fn block(&self, user_id: EntityId) -> Result<(), ApiFailure> {
        let builder = self
            .request(reqwest::Method::POST, &format!("/users/{user_id}/block"))
            .await;
        self.execute_empty(builder).await
    }

    pub async fn unblock(&self, user_id: EntityId) -> Result<(), ApiFailure> {
        let builder = self
            .request(reqwest::Method::DELETE, &format!("/users/{user_id}/block"))
            .await;
        self.execute_empty(builder).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await.unwrap_or_default();
    let failure = match serde_json::from_str::<ErrorBody>(&raw) {
        Ok(body) => ApiFailure {
            status: Some(status.as_u16()),
            code: body.code,
            message: body.message,
        },
        Err(_) => ApiFailure {
            status: Some(status.as_u16()),
            code: None,
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
        },
    };
    Err(failure)
}

/// Stream file chunks, reporting cumulative progress after each one
fn progress_stream(
    file: tokio::fs::File,
    total: u64,
    on_progress: impl Fn(u8) + Send + Sync + 'static,
) -> impl futures::Stream<Item = Result<Vec<u8>, std::io::Error>> + Send {
    futures::stream::unfold((file, 0u64, on_progress), move |(mut file, sent, on_progress)| {
        async move {
            let mut chunk = vec![0u8; UPLOAD_CHUNK_SIZE];
            match file.read(&mut chunk).await {
                Ok(0) => None,
                Ok(n) => {
                    chunk.truncate(n);
                    let sent = sent + n as u64;
                    let percent = if total == 0 {
                        100
                    } else {
                        ((sent * 100) / total).min(100) as u8
                    };
                    on_progress(percent);
                    Some((Ok(chunk), (file, sent, on_progress)))
                }
                Err(error) => Some((Err(error), (file, sent, on_progress))),
            }
        }
    })
}

fn posts_path(query: &PostQuery, offset: u32, limit: u32) -> String {
    let mut path = format!(
        "/posts?offset={offset}&limit={limit}&orderBy={}&orderDirection={}",
        query.order_by, query.order_direction
    );
    match query.user_id {
        Some(user_id) => path.push_str(&format!("&userId={user_id}")),
        None if query.is_feed => path.push_str("&feed=true"),
        None => {}
    }
    path
}

fn users_path(query: &UserQuery, offset: u32, limit: u32) -> String {
    format!(
        "/users?query={}&offset={offset}&limit={limit}&orderBy={}&orderDirection={}",
        encode(&query.query),
        query.order_by,
        query.order_direction
    )
}

/// Query-string escaping for user-supplied search terms
fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}
