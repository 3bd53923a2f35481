//! Todo Row Component
//!
//! One item with completion toggle, edit toggle and delete. In edit mode
//! the title commits on Enter and the description on blur.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::domain::TodoItem;

use crate::context::use_app_context;

#[component]
pub fn TodoRow(item: TodoItem, editing: bool) -> impl IntoView {
    let ctx = use_app_context();

    let id = item.id.clone();
    let completed = item.completed;
    let (title, set_title) = signal(item.title.clone());
    let (description, set_description) = signal(item.description.clone());

    let commit = {
        let id = id.clone();
        move || {
            let todos = ctx.todos();
            let id = id.clone();
            let (text, desc) = (title.get_untracked(), description.get_untracked());
            spawn_local(async move {
                let _ = todos.update_item(&id, &text, &desc).await;
            });
        }
    };

    let toggle_complete = {
        let id = id.clone();
        move |_| {
            let todos = ctx.todos();
            let id = id.clone();
            spawn_local(async move {
                let _ = todos.toggle_complete(&id).await;
            });
        }
    };

    let toggle_edit = {
        let id = id.clone();
        move |_| ctx.todos().toggle_edit(&id)
    };

    let delete = move |_| {
        let todos = ctx.todos();
        let id = id.clone();
        spawn_local(async move {
            let _ = todos.delete_item(&id).await;
        });
    };

    let body = if editing {
        let on_enter = commit.clone();
        view! {
            <div class="todo-body editing">
                <input
                    type="text"
                    class="todo-title-input"
                    prop:value=move || title.get()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            on_enter();
                        }
                    }
                />
                <textarea
                    class="todo-description-input"
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                    on:blur=move |_| commit()
                />
            </div>
        }
        .into_any()
    } else {
        view! {
            <div class="todo-body">
                <span class="todo-title">{item.title}</span>
                <p class="todo-description">{item.description}</p>
            </div>
        }
        .into_any()
    };

    view! {
        <li class=if completed { "todo-row completed" } else { "todo-row" }>
            <input type="checkbox" checked=completed on:change=toggle_complete />
            {body}
            <button class="edit-btn" on:click=toggle_edit>
                {if editing { "Done" } else { "Edit" }}
            </button>
            <button class="delete-btn" title="Delete" on:click=delete>"×"</button>
        </li>
    }
}
