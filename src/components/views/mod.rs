//! Page views, one per route.

mod gallery;
mod home;
mod message;

pub use gallery::GalleryView;
pub use home::HomeView;
pub use message::MessageView;
