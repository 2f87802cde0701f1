//! In-memory stand-ins for the audio element and the icon.

use super::media::{MediaHandle, MuteIndicator, PlayOutcome};
use super::session::{MusicSession, PlayRequest, PlayerIo};
use crate::db::MemoryStore;
use futures_util::future::{self, LocalBoxFuture};
use futures_util::FutureExt;
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    Allow,
    Reject,
}

#[derive(Debug)]
pub struct FakeMedia {
    current_time: Cell<f64>,
    duration: Cell<f64>,
    paused: Cell<bool>,
    volume: Cell<f64>,
    src: RefCell<Option<String>>,
    seeks: RefCell<Vec<f64>>,
    play_calls: Cell<usize>,
    policy: Cell<Policy>,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            current_time: Cell::new(0.0),
            duration: Cell::new(f64::NAN),
            paused: Cell::new(true),
            volume: Cell::new(1.0),
            src: RefCell::new(None),
            seeks: RefCell::new(Vec::new()),
            play_calls: Cell::new(0),
            policy: Cell::new(Policy::Allow),
        }
    }
}

impl FakeMedia {
    pub fn set_policy(&self, policy: Policy) {
        self.policy.set(policy);
    }

    pub fn set_duration(&self, duration: f64) {
        self.duration.set(duration);
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.set(paused);
    }

    pub fn set_current_time(&self, seconds: f64) {
        self.current_time.set(seconds);
    }

    pub fn src(&self) -> Option<String> {
        self.src.borrow().clone()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.borrow().clone()
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls.get()
    }
}

impl MediaHandle for FakeMedia {
    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn seek(&self, seconds: f64) {
        self.seeks.borrow_mut().push(seconds);
        self.current_time.set(seconds);
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn paused(&self) -> bool {
        self.paused.get()
    }

    fn volume(&self) -> f64 {
        self.volume.get()
    }

    fn set_volume(&self, volume: f64) {
        self.volume.set(volume);
    }

    // Loading a new source stops playback, as an audio element does.
    fn load(&self, src: &str) {
        *self.src.borrow_mut() = Some(src.to_string());
        self.current_time.set(0.0);
        self.duration.set(f64::NAN);
        self.paused.set(true);
    }

    fn pause(&self) {
        self.paused.set(true);
    }

    fn play(&self) -> LocalBoxFuture<'static, PlayOutcome> {
        self.play_calls.set(self.play_calls.get() + 1);
        let outcome = match self.policy.get() {
            Policy::Allow => {
                self.paused.set(false);
                PlayOutcome::Started
            }
            Policy::Reject => PlayOutcome::Rejected("NotAllowedError".to_string()),
        };
        future::ready(outcome).boxed_local()
    }
}

#[derive(Debug, Default)]
pub struct FakeIndicator {
    shown: Cell<Option<bool>>,
}

impl FakeIndicator {
    pub fn shown(&self) -> Option<bool> {
        self.shown.get()
    }
}

impl MuteIndicator for FakeIndicator {
    fn show_sound_on(&self, sound_on: bool) {
        self.shown.set(Some(sound_on));
    }
}

pub type FakeIo = PlayerIo<FakeMedia, MemoryStore, FakeIndicator>;

pub fn fake_io() -> FakeIo {
    PlayerIo {
        media: FakeMedia::default(),
        store: MemoryStore::new("musicState"),
        indicator: FakeIndicator::default(),
    }
}

/// Resolve a fake play request and hand the outcome to the session.
pub fn settle_now(session: &mut MusicSession, request: PlayRequest, io: &FakeIo) {
    let PlayRequest { ticket, outcome } = request;
    let outcome = outcome
        .now_or_never()
        .expect("fake play resolves immediately");
    session.settle(ticket, outcome, io);
}
