//! Todo Lists Frontend App
//!
//! Wires the platform to the reactive store and routes between the pages,
//! applying the session policy before any page renders.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::{path, NavigateOptions};
use reactive_stores::Store;
use todo_core::route::{resolve, Route as AppRoute, RouteDecision};
use todo_core::session::{SessionMirror, SessionState};
use todo_core::TodoStore;

use crate::backend::Backend;
use crate::components::{LoginPage, RegisterPage, TodoPage};
use crate::context::AppContext;
use crate::store::{AppState, AppStateStoreFields, AppStore};

#[component]
pub fn App(backend: Backend) -> impl IntoView {
    let store = Store::new(AppState::new());
    provide_context(store);

    let todos = Rc::new(TodoStore::new(backend.documents.clone()));
    todos.observe(move |state| store.todos().set(state.clone()));

    // The only writer of the mirrored session
    let scoped = Rc::clone(&todos);
    let mirror = SessionMirror::attach(backend.identity.as_ref(), move |session: &SessionState| {
        scoped.set_owner(session.user.as_ref().map(|u| u.uid.clone()));
        store.session().set(session.clone());
    });
    let _mirror = StoredValue::new_local(mirror);

    let ctx = AppContext::new(&backend, todos, store);
    provide_context(ctx);

    spawn_local(async move {
        backend.start().await;
    });

    // Load profile and lists whenever a different user signs in
    let uid = Memo::new(move |_| {
        store
            .session()
            .with(|s| s.user.as_ref().map(|u| u.uid.clone()))
    });
    Effect::new(move |_| {
        let Some(uid) = uid.get() else {
            store.profile().set(None);
            return;
        };
        store.loading_todos().set(true);
        let todos = ctx.todos();
        spawn_local(async move {
            let profile = todos.load_profile().await.ok().flatten();
            if todos.owner().as_ref() != Some(&uid) {
                return;
            }
            store.profile().set(profile);
            let _ = todos.fetch_lists().await;
            if todos.owner().as_ref() == Some(&uid) {
                store.loading_todos().set(false);
            }
        });
    });

    view! {
        <Router>
            <SessionGate store=store>
                <Routes fallback=|| view! { <RegisterPage /> }>
                    // "/" always redirects; the gate never renders it
                    <Route path=path!("/") view=RegisterPage />
                    <Route path=path!("/register") view=RegisterPage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/todo") view=TodoPage />
                </Routes>
            </SessionGate>
        </Router>
    }
}

/// Renders its children only when the session policy allows the current
/// location, replacing the location otherwise
#[component]
fn SessionGate(store: AppStore, children: ChildrenFn) -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        let route = location.pathname.with(|path| AppRoute::from_path(path));
        store.session().with(|session| resolve(route, session))
    });

    Effect::new(move |_| {
        if let RouteDecision::Redirect(to) = decision.get() {
            log::debug!("Redirecting to {}", to.path());
            navigate(
                to.path(),
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    view! {
        <Show when=move || matches!(decision.get(), RouteDecision::Render(_))>
            {children()}
        </Show>
    }
}
