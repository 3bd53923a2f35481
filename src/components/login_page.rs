//! Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use todo_core::forms::LoginOutcome;
use todo_core::route::Route;

use crate::context::use_app_context;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let flow = ctx.login_flow();
        let (email, password) = (email.get(), password.get());
        spawn_local(async move {
            match flow.submit(&email, &password).await {
                LoginOutcome::Rejected(rejected) => set_error.set(Some(rejected.to_string())),
                LoginOutcome::SignedIn(_) => set_error.set(None),
                LoginOutcome::InFlight => {}
            }
        });
    };

    view! {
        <div class="auth-page">
            <h1>"Log in"</h1>
            <form on:submit=on_submit>
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
                {move || error.get().map(|msg| view! { <p class="form-error">{msg}</p> })}
                <button type="submit">"Log in"</button>
            </form>
            <p>
                "No account yet? "
                <A href=Route::Register.path()>"Register"</A>
            </p>
        </div>
    }
}
