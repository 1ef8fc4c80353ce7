use std::sync::Arc;

use axum::{body::Body, http::Request, response::Html};

use crate::routing::{Actions, Controller, ControllerContext};

/// Landing page.
#[derive(Debug, Default)]
pub struct HomeController {
    base_url: String,
}

impl HomeController {
    async fn index(self: Arc<Self>, _request: Request<Body>) -> Html<String> {
        Html(format!(
            "<!doctype html><title>webscaffold</title><h1>webscaffold</h1><p>API at <a href=\"{0}/api/users\">{0}/api/users</a></p>",
            self.base_url
        ))
    }
}

impl Controller for HomeController {
    fn init(&mut self, ctx: &ControllerContext) {
        self.base_url = ctx.server.base_url.clone();
    }

    fn actions() -> Actions<Self> {
        Actions::new().action("index", Self::index)
    }
}
