//! List Bar Component
//!
//! One chip per list: click to activate, hover to reveal delete.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::domain::TodoList;

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn ListBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    view! {
        <nav class="list-bar">
            <For
                each=move || store.todos().with(|s| s.lists.clone())
                key=|list| (list.id.clone(), list.name.clone())
                let:list
            >
                <ListChip list=list />
            </For>
        </nav>
    }
}

#[component]
fn ListChip(list: TodoList) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let id = list.id.clone();
    let is_active = {
        let id = id.clone();
        move || store.todos().with(|s| s.is_active(&id))
    };

    let select = {
        let id = id.clone();
        move |_| {
            let todos = ctx.todos();
            let id = id.clone();
            spawn_local(async move {
                let _ = todos.select_list(Some(id)).await;
            });
        }
    };

    let delete = move |ev: leptos::ev::MouseEvent| {
        // Keep the click from also selecting the list
        ev.stop_propagation();
        let todos = ctx.todos();
        let id = id.clone();
        spawn_local(async move {
            let _ = todos.delete_list(&id).await;
        });
    };

    view! {
        <div
            class=move || if is_active() { "list-chip active" } else { "list-chip" }
            on:click=select
        >
            <span class="list-name">{list.name}</span>
            <button class="delete-btn" title="Delete list" on:click=delete>"×"</button>
        </div>
    }
}

#[component]
pub fn NewListForm() -> impl IntoView {
    let ctx = use_app_context();
    let (name, set_name) = signal(String::new());

    let create_list = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let todos = ctx.todos();
        let text = name.get();
        spawn_local(async move {
            if let Ok(Some(_)) = todos.create_list(&text).await {
                set_name.set(String::new());
            }
        });
    };

    view! {
        <form class="new-list-form" on:submit=create_list>
            <input
                type="text"
                placeholder="New list..."
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <button type="submit">"Add list"</button>
        </form>
    }
}
