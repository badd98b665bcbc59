use std::rc::Rc;

mod api;
mod components;
mod config;
mod error;
mod model;
mod platform;
mod state;
mod util;

use components::{App, AppProps};
use config::AppConfig;

fn main() {
    console_error_panic_hook::set_once();
    util::init_logging(log::LevelFilter::Info);
    let config = AppConfig::load();
    util::init_logging(config.log_level());
    log::info!("backend: {}", config.api_url(""));
    yew::Renderer::<App>::with_props(AppProps { config: Rc::new(config) }).render();
}
