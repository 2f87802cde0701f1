//! Background music: a session that survives reloads, the browser wiring that
//! drives it, and the toggle button.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod media;
mod session;
#[cfg(test)]
mod testing;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
use session::Playlist;

use crate::components::Icon;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::config::{site, MusicConfig};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// Whether the speaker icon shows sound on.
#[derive(Clone, Copy)]
pub struct SoundOnSignal(pub Signal<bool>);

#[cfg(target_arch = "wasm32")]
thread_local! {
    static MUSIC: RefCell<Option<Rc<web::WebMusic>>> = const { RefCell::new(None) };
}

/// Flip music on or off from anywhere in the UI.
#[cfg(target_arch = "wasm32")]
pub fn toggle_music() {
    let music = MUSIC.with(|slot| slot.borrow().clone());
    if let Some(music) = music {
        music.toggle();
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn toggle_music() {}

/// Mounts the music session once for the lifetime of the page.
#[cfg(target_arch = "wasm32")]
#[component]
pub fn MusicController() -> Element {
    let sound_on = use_context::<SoundOnSignal>().0;

    // Mounting writes the toggle's signal, so it runs after the first render.
    use_effect(move || {
        if MUSIC.with(|slot| slot.borrow().is_some()) {
            return;
        }
        let mounted = Playlist::new(site().track_urls())
            .and_then(|playlist| web::WebMusic::mount(&MusicConfig::default(), playlist, sound_on));
        match mounted {
            Ok(music) => MUSIC.with(|slot| *slot.borrow_mut() = Some(music)),
            Err(err) => tracing::info!("background music disabled: {err}"),
        }
    });

    rsx! {}
}

#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn MusicController() -> Element {
    rsx! {}
}

#[component]
pub fn MusicToggle() -> Element {
    let sound_on = use_context::<SoundOnSignal>().0;
    let label = if sound_on() { "Pause music" } else { "Play music" };

    rsx! {
        button {
            id: "music-toggle",
            r#type: "button",
            class: "music-toggle",
            aria_label: "{label}",
            title: "{label}",
            onclick: move |_| toggle_music(),
            if sound_on() {
                Icon { name: "sound-on".to_string(), class: "music-toggle__icon".to_string() }
            } else {
                Icon { name: "sound-off".to_string(), class: "music-toggle__icon".to_string() }
            }
        }
    }
}
