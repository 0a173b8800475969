//! REST
//!
//! Client for the hosted backend (database, authentication and file storage) and the chat
//! completion API. The authentication session is only kept in memory.

use std::{cell::RefCell, rc::Rc};

use chrono::Utc;
use gloo_net::http::{Request, RequestBuilder, Response};
use log::{debug, warn};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use vibefit_domain as domain;

use crate::config::Config;

const PROFILE_PICTURE_BUCKET: &str = "profile-pictures";
const PUBLIC_PROFILE_COLUMNS: &str =
    "id,username,sex,date_of_birth,weight,weight_unit,height,height_unit,fitness_goals";

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub sender: S,
    pub config: Config,
    session: Rc<RefCell<Option<AuthSession>>>,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_sender(GlooNetSendRequest, config)
    }
}

impl<S: SendRequest> REST<S> {
    pub fn with_sender(sender: S, config: Config) -> Self {
        Self {
            sender,
            config,
            session: Rc::default(),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        self.session.borrow().clone()
    }

    pub fn set_session(&self, session: Option<AuthSession>) {
        *self.session.borrow_mut() = session;
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .borrow()
            .as_ref()
            .map_or_else(|| self.config.backend_key.clone(), |s| s.access_token.clone());
        builder
            .header("apikey", &self.config.backend_key)
            .header("Authorization", &format!("Bearer {token}"))
    }

    async fn send(&self, request: Result<Request, gloo_net::Error>) -> Result<Response, Error> {
        let request = request.map_err(|err| Error::Request(err.to_string()))?;
        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|err| {
                debug!("request failed: {err}");
                Error::NoConnection
            })?;
        match response.status() {
            200..=299 => Ok(response),
            401 => Err(Error::NoSession),
            409 => Err(Error::Conflict),
            status => Err(Error::Status {
                status,
                message: error_message(&response).await,
            }),
        }
    }

    /// Send a request to the backend, dropping the session if it has expired.
    async fn backend(&self, request: Result<Request, gloo_net::Error>) -> Result<Response, Error> {
        self.send(request).await.inspect_err(|err| {
            if matches!(err, Error::NoSession) && self.session.borrow().is_some() {
                warn!("session expired");
                self.set_session(None);
            }
        })
    }

    async fn fetch<T>(&self, request: Result<Request, gloo_net::Error>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.backend(request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| Error::Response(err.to_string()))
    }

    async fn fetch_first<T>(&self, request: Result<Request, gloo_net::Error>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.fetch::<Vec<T>>(request)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NotFound)
    }

    async fn fetch_no_content(&self, request: Result<Request, gloo_net::Error>) -> Result<(), Error> {
        self.backend(request).await.map(|_| ())
    }

    async fn call(&self, function: &str, arguments: &serde_json::Value) -> Result<(), Error> {
        self.fetch_no_content(
            self.authorize(Request::post(
                &self.config.rest_url(&format!("rpc/{function}")),
            ))
            .json(arguments),
        )
        .await
    }
}

impl<S: SendRequest> domain::SessionRepository for REST<S> {
    async fn sign_up(
        &self,
        email: &str,
        password: &domain::Password,
        username: &domain::Username,
    ) -> Result<domain::User, domain::CreateError> {
        let response: SignUpResponse = self
            .fetch(
                Request::post(&self.config.auth_url("signup"))
                    .header("apikey", &self.config.backend_key)
                    .json(&json!({
                        "email": email,
                        "password": password.expose(),
                        "data": { "username": username },
                    })),
            )
            .await?;
        Ok(match response {
            SignUpResponse::Session(session) => {
                let user = session.user.clone();
                self.set_session(Some(session));
                user.into()
            }
            SignUpResponse::User(user) => {
                debug!("sign up of {email} awaits confirmation");
                user.into()
            }
        })
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &domain::Password,
    ) -> Result<domain::User, domain::ReadError> {
        let session: AuthSession = self
            .fetch(
                Request::post(&self.config.auth_url("token"))
                    .query([("grant_type", "password")])
                    .header("apikey", &self.config.backend_key)
                    .json(&json!({ "email": email, "password": password.expose() })),
            )
            .await?;
        let user = session.user.clone();
        self.set_session(Some(session));
        Ok(user.into())
    }

    /// The local session is dropped even if the backend cannot be reached.
    async fn sign_out(&self) -> Result<(), domain::DeleteError> {
        if self.session.borrow().is_none() {
            return Ok(());
        }
        let result = self
            .fetch_no_content(self.authorize(Request::post(&self.config.auth_url("logout"))).build())
            .await;
        self.set_session(None);
        match result {
            Ok(()) | Err(Error::NoSession) => Ok(()),
            Err(Error::NoConnection) => {
                debug!("signed out without reaching the backend");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn read_session(&self) -> Result<domain::User, domain::ReadError> {
        self.session()
            .map(|session| session.user.into())
            .ok_or(domain::ReadError::Storage(domain::StorageError::NoSession))
    }
}

impl<S: SendRequest> domain::ProfileRepository for REST<S> {
    async fn read_profile(
        &self,
        id: domain::UserID,
    ) -> Result<domain::UserProfile, domain::ReadError> {
        let id = format!("eq.{id}");
        Ok(self
            .fetch_first(
                self.authorize(Request::get(&self.config.rest_url("profiles")))
                    .query([("select", "*"), ("id", id.as_str())])
                    .build(),
            )
            .await?)
    }

    async fn read_profile_by_username(
        &self,
        username: &domain::Username,
    ) -> Result<Option<domain::UserProfile>, domain::ReadError> {
        let username = format!("eq.{username}");
        let profiles: Vec<domain::UserProfile> = self
            .fetch(
                self.authorize(Request::get(&self.config.rest_url("profiles")))
                    .query([("select", "*"), ("username", username.as_str())])
                    .build(),
            )
            .await?;
        Ok(profiles.into_iter().next())
    }

    async fn replace_profile(
        &self,
        profile: domain::UserProfile,
    ) -> Result<domain::UserProfile, domain::UpdateError> {
        let id = format!("eq.{}", profile.id);
        Ok(self
            .fetch_first(
                self.authorize(Request::patch(&self.config.rest_url("profiles")))
                    .query([("id", id.as_str())])
                    .header("Prefer", "return=representation")
                    .json(&profile),
            )
            .await?)
    }

    async fn upload_profile_picture(
        &self,
        id: domain::UserID,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<String, domain::UpdateError> {
        if let Err(err) = domain::ProfileRepository::delete_profile_picture(self, id).await {
            warn!("failed to delete previous profile picture: {err}");
        }
        let path = format!(
            "{PROFILE_PICTURE_BUCKET}/{id}/profile-picture-{}.{}",
            Utc::now().timestamp_millis(),
            file_extension(content_type)
        );
        let body: wasm_bindgen::JsValue = js_sys::Uint8Array::from(image.as_slice()).into();
        self.fetch_no_content(
            self.authorize(Request::post(
                &self.config.storage_url(&format!("object/{path}")),
            ))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(body),
        )
        .await?;
        Ok(self.config.storage_url(&format!("object/public/{path}")))
    }

    async fn delete_profile_picture(&self, id: domain::UserID) -> Result<(), domain::DeleteError> {
        let objects: Vec<StoredObject> = self
            .fetch(
                self.authorize(Request::post(
                    &self
                        .config
                        .storage_url(&format!("object/list/{PROFILE_PICTURE_BUCKET}")),
                ))
                .json(&json!({ "prefix": id.to_string(), "limit": 100 })),
            )
            .await?;
        if objects.is_empty() {
            return Ok(());
        }
        let prefixes = objects
            .iter()
            .map(|object| format!("{id}/{}", object.name))
            .collect::<Vec<_>>();
        Ok(self
            .fetch_no_content(
                self.authorize(Request::delete(
                    &self
                        .config
                        .storage_url(&format!("object/{PROFILE_PICTURE_BUCKET}")),
                ))
                .json(&json!({ "prefixes": prefixes })),
            )
            .await?)
    }
}

impl<S: SendRequest> domain::WorkoutHistoryRepository for REST<S> {
    async fn read_workouts(
        &self,
        user: domain::UserID,
    ) -> Result<Vec<domain::WorkoutHistory>, domain::ReadError> {
        let user = format!("eq.{user}");
        Ok(self
            .fetch(
                self.authorize(Request::get(&self.config.rest_url("workout_history")))
                    .query([
                        ("select", "*"),
                        ("user_id", user.as_str()),
                        ("order", "created_at.desc"),
                    ])
                    .build(),
            )
            .await?)
    }

    async fn create_workout(
        &self,
        user: domain::UserID,
        params: domain::WorkoutParams,
        workout: domain::WorkoutPlan,
    ) -> Result<domain::WorkoutHistory, domain::CreateError> {
        Ok(self
            .fetch_first(
                self.authorize(Request::post(&self.config.rest_url("workout_history")))
                    .header("Prefer", "return=representation")
                    .json(&NewWorkout {
                        user_id: user,
                        params: &params,
                        workout_data: &workout,
                        completed: false,
                    }),
            )
            .await?)
    }

    async fn complete_workout(
        &self,
        id: domain::WorkoutID,
        user: domain::UserID,
        rating: Option<domain::Rating>,
    ) -> Result<domain::WorkoutHistory, domain::UpdateError> {
        let id = format!("eq.{id}");
        let user = format!("eq.{user}");
        Ok(self
            .fetch_first(
                self.authorize(Request::patch(&self.config.rest_url("workout_history")))
                    .query([("id", id.as_str()), ("user_id", user.as_str())])
                    .header("Prefer", "return=representation")
                    .json(&json!({ "completed": true, "rating": rating })),
            )
            .await?)
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
        user: domain::UserID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        let id = format!("eq.{id}");
        let user = format!("eq.{user}");
        let deleted: IdRow<domain::WorkoutID> = self
            .fetch_first(
                self.authorize(Request::delete(&self.config.rest_url("workout_history")))
                    .query([
                        ("id", id.as_str()),
                        ("user_id", user.as_str()),
                        ("select", "id"),
                    ])
                    .header("Prefer", "return=representation")
                    .build(),
            )
            .await?;
        Ok(deleted.id)
    }

    async fn read_completed_workouts(
        &self,
        user: domain::UserID,
        limit: usize,
    ) -> Result<Vec<domain::WorkoutHistory>, domain::ReadError> {
        let user = format!("eq.{user}");
        let limit = limit.to_string();
        Ok(self
            .fetch(
                self.authorize(Request::get(&self.config.rest_url("workout_history")))
                    .query([
                        ("select", "*"),
                        ("user_id", user.as_str()),
                        ("completed", "is.true"),
                        ("order", "created_at.desc"),
                        ("limit", limit.as_str()),
                    ])
                    .build(),
            )
            .await?)
    }
}

impl<S: SendRequest> domain::FriendRepository for REST<S> {
    async fn search_profiles(
        &self,
        query: &str,
        exclude: domain::UserID,
        limit: usize,
    ) -> Result<Vec<domain::FriendProfile>, domain::ReadError> {
        let pattern = like_pattern(query);
        if pattern.is_empty() {
            return Ok(vec![]);
        }
        let username = format!("ilike.*{pattern}*");
        let exclude = format!("neq.{exclude}");
        let limit = limit.to_string();
        Ok(self
            .fetch(
                self.authorize(Request::get(&self.config.rest_url("profiles")))
                    .query([
                        ("select", PUBLIC_PROFILE_COLUMNS),
                        ("username", username.as_str()),
                        ("id", exclude.as_str()),
                        ("limit", limit.as_str()),
                    ])
                    .build(),
            )
            .await?)
    }

    async fn read_friend_requests(
        &self,
        user: domain::UserID,
    ) -> Result<Vec<domain::FriendRequest>, domain::ReadError> {
        let select = format!("*,sender_profile:profiles!sender_id({PUBLIC_PROFILE_COLUMNS})");
        let involved = format!("(sender_id.eq.{user},receiver_id.eq.{user})");
        Ok(self
            .fetch(
                self.authorize(Request::get(&self.config.rest_url("friend_requests")))
                    .query([
                        ("select", select.as_str()),
                        ("or", involved.as_str()),
                        ("order", "created_at.desc"),
                    ])
                    .build(),
            )
            .await?)
    }

    async fn create_friend_request(
        &self,
        sender: domain::UserID,
        receiver: domain::UserID,
    ) -> Result<domain::FriendRequest, domain::CreateError> {
        Ok(self
            .fetch_first(
                self.authorize(Request::post(&self.config.rest_url("friend_requests")))
                    .header("Prefer", "return=representation")
                    .json(&json!({ "sender_id": sender, "receiver_id": receiver })),
            )
            .await?)
    }

    async fn accept_friend_request(
        &self,
        id: domain::FriendRequestID,
    ) -> Result<domain::FriendRequestID, domain::UpdateError> {
        self.call("accept_friend_request", &json!({ "request_id": id }))
            .await?;
        Ok(id)
    }

    async fn decline_friend_request(
        &self,
        id: domain::FriendRequestID,
    ) -> Result<domain::FriendRequestID, domain::UpdateError> {
        self.call("decline_friend_request", &json!({ "request_id": id }))
            .await?;
        Ok(id)
    }

    async fn read_friendships(
        &self,
        user: domain::UserID,
    ) -> Result<Vec<domain::Friendship>, domain::ReadError> {
        let select = format!("*,friend_profile:profiles!friend_id({PUBLIC_PROFILE_COLUMNS})");
        let user = format!("eq.{user}");
        Ok(self
            .fetch(
                self.authorize(Request::get(&self.config.rest_url("friendships")))
                    .query([
                        ("select", select.as_str()),
                        ("user_id", user.as_str()),
                        ("order", "created_at.desc"),
                    ])
                    .build(),
            )
            .await?)
    }

    async fn delete_friendship(
        &self,
        friend: domain::UserID,
    ) -> Result<domain::UserID, domain::DeleteError> {
        self.call("remove_friendship", &json!({ "friend_user_id": friend }))
            .await?;
        Ok(friend)
    }
}

impl<S: SendRequest> domain::CompletionRepository for REST<S> {
    async fn complete(
        &self,
        request: domain::CompletionRequest,
    ) -> Result<String, domain::ReadError> {
        let response = self
            .send(
                Request::post(&self.config.chat_completions_url())
                    .header(
                        "Authorization",
                        &format!("Bearer {}", self.config.completion_key),
                    )
                    .json(&chat_completion_body(&request)),
            )
            .await
            .map_err(|err| match err {
                Error::NoSession => Error::Status {
                    status: 401,
                    message: "invalid completion API key".to_string(),
                },
                err => err,
            })?;
        let completion = response
            .json::<ChatCompletion>()
            .await
            .map_err(|err| Error::Response(err.to_string()))?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no connection")]
    NoConnection,
    #[error("no session")]
    NoSession,
    #[error("conflict")]
    Conflict,
    #[error("not found")]
    NotFound,
    #[error("{status} {message}")]
    Status { status: u16, message: String },
    #[error("invalid request: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    Response(String),
}

impl From<Error> for domain::StorageError {
    fn from(value: Error) -> Self {
        match value {
            Error::NoConnection => domain::StorageError::NoConnection,
            Error::NoSession => domain::StorageError::NoSession,
            err => domain::StorageError::Other(Box::new(err)),
        }
    }
}

impl From<Error> for domain::ReadError {
    fn from(value: Error) -> Self {
        domain::ReadError::Storage(value.into())
    }
}

impl From<Error> for domain::CreateError {
    fn from(value: Error) -> Self {
        match value {
            Error::Conflict => domain::CreateError::Conflict,
            err => domain::CreateError::Storage(err.into()),
        }
    }
}

impl From<Error> for domain::UpdateError {
    fn from(value: Error) -> Self {
        match value {
            Error::Conflict => domain::UpdateError::Conflict,
            err => domain::UpdateError::Storage(err.into()),
        }
    }
}

impl From<Error> for domain::DeleteError {
    fn from(value: Error) -> Self {
        domain::DeleteError::Storage(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: uuid::Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<AuthUser> for domain::User {
    fn from(value: AuthUser) -> Self {
        domain::User {
            id: value.id.into(),
            email: value.email.unwrap_or_default(),
        }
    }
}

/// Without email confirmation the backend returns a session, otherwise only the new user.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

#[derive(Serialize)]
struct NewWorkout<'a> {
    user_id: domain::UserID,
    #[serde(flatten)]
    params: &'a domain::WorkoutParams,
    workout_data: &'a domain::WorkoutPlan,
    completed: bool,
}

#[derive(Deserialize)]
struct IdRow<T> {
    id: T,
}

#[derive(Deserialize)]
struct StoredObject {
    name: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "msg", alias = "error_description")]
    message: String,
}

fn chat_completion_body(request: &domain::CompletionRequest) -> serde_json::Value {
    json!({
        "model": request.model,
        "messages": [
            { "role": "system", "content": request.system_prompt },
            { "role": "user", "content": request.prompt },
        ],
        "response_format": {
            "type": if request.json_response { "json_object" } else { "text" }
        },
    })
}

async fn error_message(response: &Response) -> String {
    match response.text().await {
        Ok(text) => parse_error_message(&text).unwrap_or_else(|| response.status_text()),
        Err(_) => response.status_text(),
    }
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.message)
}

/// Characters with a special meaning in filter expressions are dropped.
fn like_pattern(query: &str) -> String {
    query
        .trim()
        .chars()
        .filter(|c| !matches!(c, '*' | '%' | ',' | '(' | ')' | '.' | ':'))
        .collect()
}

fn file_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}
