//! Runs API calls off the UI thread.
//!
//! Each dispatched [`Request`] gets its own short-lived thread; the result
//! comes back as a [`Response`] on a channel the event loop drains every
//! tick. Requests cannot be cancelled once dispatched.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use crate::api::{ApiError, ApiGateway};
use crate::form::{NewUser, UserUpdate};
use crate::model::{Credentials, LoginResponse, Registration, UserRecord};

#[derive(Debug)]
pub enum Request {
    Login(Credentials),
    Register(Registration),
    ListUsers,
    CreateUser(NewUser),
    FetchUser(String),
    UpdateUser(UserUpdate),
    DeleteUser(String),
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Request::Login(_) => "login",
            Request::Register(_) => "register",
            Request::ListUsers => "list users",
            Request::CreateUser(_) => "create user",
            Request::FetchUser(_) => "fetch user",
            Request::UpdateUser(_) => "update user",
            Request::DeleteUser(_) => "delete user",
        }
    }
}

#[derive(Debug)]
pub enum Response {
    Login(Result<LoginResponse, ApiError>),
    Register(Result<(), ApiError>),
    Users(Result<Vec<UserRecord>, ApiError>),
    Created(Result<(), ApiError>),
    Fetched {
        id: String,
        result: Result<UserRecord, ApiError>,
    },
    Updated {
        id: String,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: String,
        result: Result<(), ApiError>,
    },
}

/// Execute a request synchronously against `api`.
pub fn execute(api: &dyn ApiGateway, req: Request) -> Response {
    match req {
        Request::Login(c) => Response::Login(api.login(&c)),
        Request::Register(r) => Response::Register(api.register(&r)),
        Request::ListUsers => Response::Users(api.list_users()),
        Request::CreateUser(n) => Response::Created(api.create_user(&n.draft, &n.image)),
        Request::FetchUser(id) => {
            let result = api.fetch_user(&id);
            Response::Fetched { id, result }
        }
        Request::UpdateUser(u) => {
            let result = api.update_user(&u.user, u.image.as_ref());
            Response::Updated {
                id: u.user.id,
                result,
            }
        }
        Request::DeleteUser(id) => {
            let result = api.delete_user(&id);
            Response::Deleted { id, result }
        }
    }
}

/// Dispatches requests and collects their responses.
pub struct Worker {
    api: Arc<dyn ApiGateway>,
    tx: Sender<Response>,
    rx: Receiver<Response>,
    inline: bool,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker").field("inline", &self.inline).finish()
    }
}

impl Worker {
    /// A worker that runs every request on its own thread.
    pub fn spawning(api: Arc<dyn ApiGateway>) -> Self {
        let (tx, rx) = channel();
        Self {
            api,
            tx,
            rx,
            inline: false,
        }
    }

    /// A worker that runs requests on the calling thread; responses are still
    /// queued and only seen on the next [`drain`](Self::drain).
    pub fn inline(api: Arc<dyn ApiGateway>) -> Self {
        Self {
            inline: true,
            ..Self::spawning(api)
        }
    }

    pub fn api(&self) -> &dyn ApiGateway {
        self.api.as_ref()
    }

    pub fn dispatch(&self, req: Request) {
        tracing::debug!(request = req.name(), "dispatch");
        if self.inline {
            let _ = self.tx.send(execute(self.api.as_ref(), req));
            return;
        }
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let resp = execute(api.as_ref(), req);
            // the receiver only goes away on shutdown
            let _ = tx.send(resp);
        });
    }

    /// All responses that have arrived so far.
    pub fn drain(&self) -> Vec<Response> {
        self.rx.try_iter().collect()
    }
}
