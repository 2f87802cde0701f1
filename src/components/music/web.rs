//! Browser wiring for the music session: the `<audio>` element, local storage,
//! and the page events that drive saves and track changes.

use super::media::{MediaHandle, MuteIndicator, PlayOutcome};
use super::session::{MusicSession, PlayRequest, PlayerIo, Playlist, ResumePoint, Startup};
use crate::config::MusicConfig;
use crate::db::LocalStore;
use crate::error::{Result, SerenadeError};
use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;
use futures_util::future::{self, LocalBoxFuture};
use futures_util::FutureExt;
use gloo_timers::callback::{Interval, Timeout};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, AddEventListenerOptions, HtmlAudioElement};

const AUDIO_ELEMENT_ID: &str = "music-player";

/// Find the page's audio element, creating a hidden one if needed.
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(AUDIO_ELEMENT_ID) {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(AUDIO_ELEMENT_ID);
    audio.set_attribute("preload", "metadata").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

fn describe_js_error(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .unwrap_or_else(|| format!("{err:?}"))
}

pub struct WebAudio(HtmlAudioElement);

impl MediaHandle for WebAudio {
    fn current_time(&self) -> f64 {
        self.0.current_time()
    }

    fn seek(&self, seconds: f64) {
        self.0.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.0.duration()
    }

    fn paused(&self) -> bool {
        self.0.paused()
    }

    fn volume(&self) -> f64 {
        self.0.volume()
    }

    fn set_volume(&self, volume: f64) {
        self.0.set_volume(volume);
    }

    fn load(&self, src: &str) {
        self.0.set_src(src);
    }

    fn pause(&self) {
        if let Err(err) = self.0.pause() {
            tracing::debug!("pause failed: {}", describe_js_error(&err));
        }
    }

    fn play(&self) -> LocalBoxFuture<'static, PlayOutcome> {
        match self.0.play() {
            Ok(promise) => async move {
                match wasm_bindgen_futures::JsFuture::from(promise).await {
                    Ok(_) => PlayOutcome::Started,
                    Err(err) => PlayOutcome::Rejected(describe_js_error(&err)),
                }
            }
            .boxed_local(),
            Err(err) => future::ready(PlayOutcome::Rejected(describe_js_error(&err))).boxed_local(),
        }
    }
}

/// Mirrors the mute state into the toggle's signal.
pub struct SignalIndicator {
    sound_on: Signal<bool>,
    runtime: Rc<Runtime>,
}

impl MuteIndicator for SignalIndicator {
    fn show_sound_on(&self, sound_on: bool) {
        let _guard = RuntimeGuard::new(self.runtime.clone());
        let mut signal = self.sound_on;
        if *signal.peek() != sound_on {
            signal.set(sound_on);
        }
    }
}

/// A mounted music session and the browser handles it drives.
pub struct WebMusic {
    session: RefCell<MusicSession>,
    io: PlayerIo<WebAudio, LocalStore, SignalIndicator>,
}

impl WebMusic {
    /// Restore the session and attach every listener. Must run inside a
    /// component so the indicator can reach the Dioxus runtime.
    pub fn mount(config: &MusicConfig, playlist: Playlist, sound_on: Signal<bool>) -> Result<Rc<Self>> {
        let win = window().ok_or(SerenadeError::MissingDom("window"))?;
        let audio = get_or_create_audio_element().ok_or(SerenadeError::MissingDom("audio element"))?;

        let music = Rc::new(Self {
            session: RefCell::new(MusicSession::new(playlist, config)),
            io: PlayerIo {
                media: WebAudio(audio.clone()),
                store: LocalStore::new(config.storage_key.clone()),
                indicator: SignalIndicator {
                    sound_on,
                    runtime: Runtime::current(),
                },
            },
        });

        let startup = music.session.borrow_mut().initialize(&music.io);
        match startup {
            Startup::Autoplay { delay } => {
                let music = music.clone();
                Timeout::new(delay.as_millis() as u32, move || music.play()).forget();
            }
            Startup::Resume(point) => {
                let music = music.clone();
                let on_metadata = Closure::once(move || music.resume(point));
                let options = AddEventListenerOptions::new();
                options.set_once(true);
                let _ = audio.add_event_listener_with_callback_and_add_event_listener_options(
                    "loadedmetadata",
                    on_metadata.as_ref().unchecked_ref(),
                    &options,
                );
                on_metadata.forget();
            }
        }

        {
            let music = music.clone();
            let on_ended = Closure::wrap(Box::new(move || music.advance()) as Box<dyn FnMut()>);
            let _ = audio.add_event_listener_with_callback("ended", on_ended.as_ref().unchecked_ref());
            on_ended.forget();
        }

        {
            let music = music.clone();
            let interval_ms = config.save_interval.as_millis() as u32;
            Interval::new(interval_ms, move || music.session.borrow().save_if_playing(&music.io))
                .forget();
        }

        {
            let music = music.clone();
            let on_unload = Closure::wrap(Box::new(move || music.save()) as Box<dyn FnMut()>);
            let _ = win
                .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref());
            on_unload.forget();
        }

        tracing::debug!(
            "music mounted at track {}",
            music.session.borrow().track_index()
        );
        Ok(music)
    }

    fn drive(self: &Rc<Self>, request: Option<PlayRequest>) {
        let Some(PlayRequest { ticket, outcome }) = request else {
            return;
        };
        let music = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = outcome.await;
            music.session.borrow_mut().settle(ticket, outcome, &music.io);
        });
    }

    fn play(self: &Rc<Self>) {
        let request = self.session.borrow_mut().request_play(&self.io);
        self.drive(Some(request));
    }

    fn resume(self: &Rc<Self>, point: ResumePoint) {
        let request = self.session.borrow_mut().resume_at(point, &self.io);
        self.drive(request);
    }

    fn advance(self: &Rc<Self>) {
        let request = self.session.borrow_mut().advance(&self.io);
        self.drive(request);
    }

    pub fn toggle(self: &Rc<Self>) {
        let request = self.session.borrow_mut().toggle_mute(&self.io);
        self.drive(request);
    }

    fn save(&self) {
        self.session.borrow().save(&self.io);
    }
}
