//! Photo lightbox navigation state.

use crate::config::Photo;

/// Horizontal travel, in CSS pixels, that counts as a swipe.
pub const SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Lightbox {
    photos: Vec<Photo>,
    open: Option<usize>,
}

impl Lightbox {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self { photos, open: None }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn index(&self) -> Option<usize> {
        self.open
    }

    pub fn current(&self) -> Option<&Photo> {
        self.open.and_then(|index| self.photos.get(index))
    }

    /// Open on the photo with `label`; an unknown label opens the first photo.
    pub fn open_label(&mut self, label: &str) {
        if self.photos.is_empty() {
            return;
        }
        let index = self
            .photos
            .iter()
            .position(|photo| photo.label == label)
            .unwrap_or(0);
        self.open = Some(index);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Close => self.close(),
            KeyAction::Navigate(step) => self.navigate(step),
        }
    }

    /// Step forward (positive) or back (negative), wrapping at both ends.
    pub fn navigate(&mut self, step: isize) {
        let Some(index) = self.open else {
            return;
        };
        let len = self.photos.len() as isize;
        if len == 0 {
            return;
        }
        self.open = Some((index as isize + step).rem_euclid(len) as usize);
    }
}

/// What a key press does to an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Close,
    Navigate(isize),
}

impl KeyAction {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Close),
            "ArrowLeft" => Some(Self::Navigate(-1)),
            "ArrowRight" => Some(Self::Navigate(1)),
            _ => None,
        }
    }
}

/// Direction implied by a horizontal touch movement, if it was long enough.
/// Swiping left shows the next photo.
pub fn swipe_step(start_x: f64, end_x: f64) -> Option<isize> {
    let delta = end_x - start_x;
    if delta <= -SWIPE_THRESHOLD {
        Some(1)
    } else if delta >= SWIPE_THRESHOLD {
        Some(-1)
    } else {
        None
    }
}
