//! The components module contains all shared components for our app.

mod app;
mod app_view;
mod icons;
mod music;
pub mod views;

pub use app::*;
pub use app_view::*;
pub use icons::*;
pub use music::{MusicController, MusicToggle, SoundOnSignal};
