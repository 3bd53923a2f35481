//! Todo Lists Frontend Entry Point

mod app;
mod backend;
mod components;
mod config;
mod context;
mod logger;
mod store;

use app::App;
use backend::Backend;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    logger::init(config.level());
    if let Some(err) = config_error {
        log::warn!("Invalid config/app.json, using defaults: {err}");
    }

    let backend = Backend::from_config(&config);
    mount_to_body(move || view! { <App backend=backend /> });
}
