//! Route policy
//!
//! Which page may be shown for a given session. Unknown paths land on
//! registration.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Root,
    Register,
    Login,
    Todo,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Route::Root,
            "/register" => Route::Register,
            "/login" => Route::Login,
            "/todo" => Route::Todo,
            _ => Route::Register,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Register => "/register",
            Route::Login => "/login",
            Route::Todo => "/todo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session not known yet; render nothing
    Wait,
    Render(Route),
    /// Replace the current location with another route
    Redirect(Route),
}

pub fn resolve(route: Route, session: &SessionState) -> RouteDecision {
    if session.loading {
        return RouteDecision::Wait;
    }
    match route {
        Route::Root => RouteDecision::Redirect(Route::Register),
        Route::Register | Route::Login if session.logged_in => RouteDecision::Redirect(Route::Todo),
        Route::Todo if !session.logged_in => RouteDecision::Redirect(Route::Register),
        route => RouteDecision::Render(route),
    }
}
