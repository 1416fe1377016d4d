mod api;
mod app;
mod board;
mod config;
mod error;
mod logger;
mod model;
mod render;

use log::LevelFilter;

use app::{App, AppProps};
use config::BoardConfig;

fn main() {
    if let Err(e) = logger::init(LevelFilter::Info) {
        gloo::console::warn!(format!("console logger unavailable: {e}"));
    }

    let config = BoardConfig::from_dom();
    log::info!("activity board talking to '{}'", config.api_base);

    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
