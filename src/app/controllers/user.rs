//! User resource actions.
//!
//! | Action       | Behaviour                                             |
//! |--------------|-------------------------------------------------------|
//! | `getUsers`   | list every user                                       |
//! | `getUser`    | one user by `:id`, 404 if absent                      |
//! | `saveUser`   | validate and create, 201 with a `Location` header     |
//! | `deleteUser` | remove by `:id`, 204 or 404                           |
//! | `test`       | echo the request timestamp set by `timestamp`         |

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts, Path},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::middlewares::RequestTimestamp;
use crate::app::store::{NewUser, UserError, UserStore};
use crate::routing::{Actions, Controller, ControllerContext};

#[derive(Default)]
pub struct UserController {
    store: Option<Arc<UserStore>>,
    base_url: String,
}

impl UserController {
    fn store(&self) -> Result<&UserStore, Response> {
        self.store
            .as_deref()
            .ok_or_else(|| message(StatusCode::SERVICE_UNAVAILABLE, "User store unavailable"))
    }

    async fn get_users(self: Arc<Self>, _request: Request<Body>) -> Response {
        match self.store() {
            Ok(store) => Json(store.list()).into_response(),
            Err(response) => response,
        }
    }

    async fn get_user(self: Arc<Self>, request: Request<Body>) -> Response {
        let id = match user_id(request).await {
            Ok(id) => id,
            Err(response) => return response,
        };
        let store = match self.store() {
            Ok(store) => store,
            Err(response) => return response,
        };

        match store.get(id) {
            Some(user) => Json(user).into_response(),
            None => message(StatusCode::NOT_FOUND, "User not found"),
        }
    }

    async fn save_user(self: Arc<Self>, request: Request<Body>) -> Response {
        let collection = request.uri().path().trim_end_matches('/').to_string();
        let Json(new_user) = match Json::<NewUser>::from_request(request, &()).await {
            Ok(body) => body,
            Err(rejection) => return rejection.into_response(),
        };
        let store = match self.store() {
            Ok(store) => store,
            Err(response) => return response,
        };

        match store.insert(new_user) {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "User created");
                let location = format!("{}{}/{}", self.base_url, collection, user.id);
                (StatusCode::CREATED, [(header::LOCATION, location)], Json(user)).into_response()
            }
            Err(e @ UserError::Duplicate(_)) => message(StatusCode::CONFLICT, &e.to_string()),
            Err(e) => message(StatusCode::BAD_REQUEST, &e.to_string()),
        }
    }

    async fn delete_user(self: Arc<Self>, request: Request<Body>) -> Response {
        let id = match user_id(request).await {
            Ok(id) => id,
            Err(response) => return response,
        };
        let store = match self.store() {
            Ok(store) => store,
            Err(response) => return response,
        };

        match store.remove(id) {
            Some(_) => {
                tracing::info!(user_id = id, "User deleted");
                StatusCode::NO_CONTENT.into_response()
            }
            None => message(StatusCode::NOT_FOUND, "User not found"),
        }
    }

    async fn test(self: Arc<Self>, request: Request<Body>) -> Response {
        match request.extensions().get::<RequestTimestamp>() {
            Some(RequestTimestamp(millis)) => millis.to_string().into_response(),
            None => message(StatusCode::INTERNAL_SERVER_ERROR, "Request timestamp missing"),
        }
    }
}

impl Controller for UserController {
    fn init(&mut self, ctx: &ControllerContext) {
        self.store = ctx.resource::<UserStore>();
        self.base_url = ctx.server.base_url.clone();
        if self.store.is_none() {
            tracing::warn!("UserController initialised without a user store");
        }
    }

    fn actions() -> Actions<Self> {
        Actions::new()
            .action("getUsers", Self::get_users)
            .action("getUser", Self::get_user)
            .action("saveUser", Self::save_user)
            .action("deleteUser", Self::delete_user)
            .action("test", Self::test)
    }
}

async fn user_id(request: Request<Body>) -> Result<u64, Response> {
    let (mut parts, _body) = request.into_parts();
    Path::<u64>::from_request_parts(&mut parts, &())
        .await
        .map(|Path(id)| id)
        .map_err(IntoResponse::into_response)
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
