use crate::components::AppView;
use crate::config::site;
use crate::reveal::use_reveal_on_scroll;
use crate::typewriter::Typewriter;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
const TYPE_SPEED_MS: u32 = 30;

#[component]
pub fn MessageView() -> Element {
    #[cfg_attr(not(target_arch = "wasm32"), allow(unused_mut))]
    let mut typewriter = use_signal(|| {
        let mut typewriter = Typewriter::new(site().letter.clone());
        // No timers off the web; show the whole letter.
        if cfg!(not(target_arch = "wasm32")) {
            typewriter.reveal_all();
        }
        typewriter
    });

    #[cfg(target_arch = "wasm32")]
    use_future(move || async move {
        loop {
            gloo_timers::future::TimeoutFuture::new(TYPE_SPEED_MS).await;
            if !typewriter.write().tick() {
                break;
            }
        }
    });

    use_reveal_on_scroll();

    let typed = typewriter.read().visible().to_string();
    let done = typewriter.read().is_done();

    rsx! {
        section { class: "letter",
            article { class: "letter-card reveal",
                p { id: "love-letter", class: "letter-card__text", "{typed}" }
                if !done {
                    span { class: "letter-card__cursor", "|" }
                }
            }
            if done {
                Link { class: "primary-button fade-in", to: AppView::GalleryView {}, "See our memories" }
            }
        }
    }
}
