//! Portal API gateway.
//!
//! [`ApiGateway`] is the seam between application state and the network;
//! [`HttpApi`] implements it over `reqwest::blocking`. Calls are expected to
//! run on a worker thread (see `app::worker`), never on the UI thread.

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use crate::error::ApiError;
use crate::form::UserDraft;
use crate::model::{Credentials, ImageFile, LoginResponse, Registration, UserRecord};

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const USERS_PATH: &str = "/api/items/users";
pub const ADD_USER_PATH: &str = "/api/items/adduser";

/// Operations the portal exposes.
pub trait ApiGateway: Send + Sync {
    fn register(&self, registration: &Registration) -> Result<(), ApiError>;
    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    fn list_users(&self) -> Result<Vec<UserRecord>, ApiError>;
    fn create_user(&self, draft: &UserDraft, image: &ImageFile) -> Result<(), ApiError>;
    fn fetch_user(&self, id: &str) -> Result<UserRecord, ApiError>;
    fn update_user(&self, user: &UserRecord, image: Option<&ImageFile>) -> Result<(), ApiError>;
    fn delete_user(&self, id: &str) -> Result<(), ApiError>;

    /// Attach (or drop) the bearer token sent with subsequent requests.
    fn set_token(&self, _token: Option<String>) {}
}

/// Connection settings for [`HttpApi`].
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error body shape used by the portal API.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP implementation of [`ApiGateway`].
#[derive(Debug)]
pub struct HttpApi {
    base_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn user_url(&self, id: &str) -> String {
        self.url(&format!("{USERS_PATH}/{id}"))
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let req = self.client.request(method, url);
        let token = self.token.read().unwrap_or_else(|e| e.into_inner());
        match token.as_deref() {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    fn send(&self, req: RequestBuilder, what: &str) -> Result<Response, ApiError> {
        let resp = req.send().inspect_err(|e| warn!(%e, op = what, "request failed"))?;
        let status = resp.status();
        debug!(op = what, %status, "response");
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message);
        warn!(op = what, %status, message = ?message, "server rejected request");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let text = resp.text()?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn image_part(image: &ImageFile) -> Result<multipart::Part, ApiError> {
    Ok(multipart::Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(image.mime)?)
}

fn user_fields(user: &UserRecord) -> [(&'static str, String); 7] {
    [
        ("username", user.username.clone()),
        ("firstName", user.first_name.clone()),
        ("lastName", user.last_name.clone()),
        ("department", user.department.as_str().to_string()),
        ("userRole", user.user_role.as_str().to_string()),
        ("status", user.status.as_str().to_string()),
        ("dob", user.dob.clone()),
    ]
}

impl ApiGateway for HttpApi {
    fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, self.url(REGISTER_PATH))
            .json(registration);
        self.send(req, "register")?;
        info!(email = %registration.email, "registered");
        Ok(())
    }

    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let req = self
            .request(Method::POST, self.url(LOGIN_PATH))
            .json(credentials);
        let resp = self.send(req, "login")?;
        let body: LoginResponse = Self::json(resp)?;
        info!(user_id = %body.user_id, "logged in");
        Ok(body)
    }

    fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        let resp = self.send(self.request(Method::GET, self.url(USERS_PATH)), "list users")?;
        let raw: Vec<serde_json::Value> = Self::json(resp)?;
        let total = raw.len();
        // one record the client cannot represent must not hide the rest
        let users: Vec<UserRecord> = raw
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<UserRecord>(v) {
                Ok(u) => Some(u),
                Err(e) => {
                    warn!(error = %e, "skipping malformed user record");
                    None
                }
            })
            .collect();
        debug!(count = users.len(), skipped = total - users.len(), "fetched users");
        Ok(users)
    }

    fn create_user(&self, draft: &UserDraft, image: &ImageFile) -> Result<(), ApiError> {
        let mut form = multipart::Form::new().part("profileImage", image_part(image)?);
        for (k, v) in draft.form_fields() {
            form = form.text(k, v);
        }
        let req = self
            .request(Method::POST, self.url(ADD_USER_PATH))
            .multipart(form);
        self.send(req, "create user")?;
        info!(username = %draft.username, "user created");
        Ok(())
    }

    fn fetch_user(&self, id: &str) -> Result<UserRecord, ApiError> {
        let resp = self.send(self.request(Method::GET, self.user_url(id)), "fetch user")?;
        Self::json(resp)
    }

    fn update_user(&self, user: &UserRecord, image: Option<&ImageFile>) -> Result<(), ApiError> {
        let mut form = multipart::Form::new();
        for (k, v) in user_fields(user) {
            form = form.text(k, v);
        }
        if let Some(img) = image {
            form = form.part("profileImage", image_part(img)?);
        }
        let req = self
            .request(Method::PUT, self.user_url(&user.id))
            .multipart(form);
        self.send(req, "update user")?;
        info!(id = %user.id, "user updated");
        Ok(())
    }

    fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, self.user_url(id)), "delete user")?;
        info!(%id, "user deleted");
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = token;
    }
}
