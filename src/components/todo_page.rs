//! Todo Page
//!
//! Greeting header, list selector and the active list's items.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::domain::UserProfile;

use crate::components::{ListBar, NewListForm, TodoPanel};
use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn TodoPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let greeting = move || {
        store
            .profile()
            .with(|p| format!("Hello, {}", UserProfile::display_name(p.as_ref())))
    };

    let sign_out = move |_| {
        let identity = ctx.identity();
        spawn_local(async move {
            if let Err(err) = identity.sign_out().await {
                log::error!("Error signing out: {err}");
            }
        });
    };

    view! {
        <div class="todo-page">
            <header class="todo-header">
                <h2>{greeting}</h2>
                <button class="sign-out-btn" on:click=sign_out>"Sign out"</button>
            </header>
            <Show
                when=move || !store.loading_todos().get()
                fallback=|| view! { <p class="loading">"Loading..."</p> }
            >
                <ListBar />
                <NewListForm />
                <TodoPanel />
            </Show>
        </div>
    }
}
