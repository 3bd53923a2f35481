//! Todo Panel Component
//!
//! The active list: its name, the add-item form and the items.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::TodoRow;
use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn TodoPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let active_name = move || {
        store
            .todos()
            .with(|s| s.active().map(|list| list.name.clone()))
    };

    view! {
        {move || match active_name() {
            None => view! { <p class="empty-hint">"Select or create a list"</p> }.into_any(),
            Some(name) => view! {
                <section class="todo-panel">
                    <h3>{name}</h3>
                    <NewTodoForm />
                    <ul class="todo-items">
                        <For
                            each=move || {
                                store.todos().with(|s| {
                                    s.items
                                        .iter()
                                        .map(|item| (item.clone(), s.is_editing(&item.id)))
                                        .collect::<Vec<_>>()
                                })
                            }
                            // Mutable fields are part of the key so edits re-render the row
                            key=|(item, editing)| {
                                (
                                    item.id.clone(),
                                    item.title.clone(),
                                    item.description.clone(),
                                    item.completed,
                                    *editing,
                                )
                            }
                            let:entry
                        >
                            <TodoRow item=entry.0 editing=entry.1 />
                        </For>
                    </ul>
                </section>
            }
            .into_any(),
        }}
    }
}

/// Title, description and submit
#[component]
fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());

    let add_item = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let todos = ctx.todos();
        let (text, desc) = (title.get(), description.get());
        spawn_local(async move {
            if let Ok(Some(_)) = todos.add_item(&text, &desc).await {
                set_title.set(String::new());
                set_description.set(String::new());
            }
        });
    };

    view! {
        <form class="new-todo-form" on:submit=add_item>
            <input
                type="text"
                placeholder="Title"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Description"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
