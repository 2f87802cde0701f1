//! Defines the app's routes.

use crate::components::views::{GalleryView, HomeView, MessageView};
use crate::components::AppShell;
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
#[rustfmt::skip]
pub enum AppView {
    #[layout(AppShell)]
        #[route("/")]
        HomeView {},
        #[route("/gallery")]
        GalleryView {},
        #[route("/message")]
        MessageView {},
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::HomeView {} => "Home",
        AppView::GalleryView {} => "Memories",
        AppView::MessageView {} => "Letter",
    }
}
