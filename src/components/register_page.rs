//! Registration Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use todo_core::forms::{RegisterOutcome, Registration};
use todo_core::route::Route;

use crate::context::use_app_context;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_app_context();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = Registration::new(name.get(), email.get(), password.get(), confirm.get());
        if let Err(invalid) = form.validate() {
            set_error.set(Some(invalid.to_string()));
            return;
        }
        set_error.set(None);

        let flow = ctx.register_flow();
        spawn_local(async move {
            // Success is picked up by the session listener, which redirects
            if let RegisterOutcome::Invalid(invalid) = flow.submit(&form).await {
                set_error.set(Some(invalid.to_string()));
            }
        });
    };

    view! {
        <div class="auth-page">
            <h1>"Register"</h1>
            <form on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <input
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Confirm password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                />
                {move || error.get().map(|msg| view! { <p class="form-error">{msg}</p> })}
                <button type="submit">"Register"</button>
            </form>
            <p>
                "Already have an account? "
                <A href=Route::Login.path()>"Log in"</A>
            </p>
        </div>
    }
}
