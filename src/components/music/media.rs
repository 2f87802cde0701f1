//! Seams between the music session and the page: the audio element and the
//! on/off icon.

use futures_util::future::LocalBoxFuture;

/// How a request to start playback settled.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    Started,
    /// The browser refused, usually because the user has not interacted with
    /// the page yet.
    Rejected(String),
}

/// A single audio playback element.
pub trait MediaHandle {
    fn current_time(&self) -> f64;
    fn seek(&self, seconds: f64);
    /// NaN until metadata has loaded.
    fn duration(&self) -> f64;
    fn paused(&self) -> bool;
    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);
    /// Point the element at a new source. Loading starts asynchronously.
    fn load(&self, src: &str);
    fn pause(&self);
    fn play(&self) -> LocalBoxFuture<'static, PlayOutcome>;
}

/// The speaker icon on the music toggle.
pub trait MuteIndicator {
    fn show_sound_on(&self, sound_on: bool);
}
