use tracing::Level;
use dioxus::prelude::*;

mod components;
mod confetti;
mod config;
mod db;
mod error;
mod lightbox;
mod reveal;
mod typewriter;
mod utils;

use components::AppView;
use config::site;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialized: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "{site().title}" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1, viewport-fit=cover" }
        document::Meta { name: "theme-color", content: "#ff9a9e" }

        document::Stylesheet { href: APP_CSS }

        Router::<AppView> {}
    }
}
