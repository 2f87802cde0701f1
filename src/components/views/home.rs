use crate::components::{use_document_keydown, use_scroll_lock, AppView, Icon};
use crate::config::site;
use dioxus::prelude::*;

const CONFETTI_CANVAS_ID: &str = "confetti-canvas";

#[component]
pub fn HomeView() -> Element {
    let config = site();
    let mut surprise_open = use_signal(|| false);

    rsx! {
        section { class: "hero",
            h1 { class: "hero__title fade-in", "{config.title}" }
            if !config.subtitle.is_empty() {
                p { class: "hero__subtitle fade-in", style: "animation-delay: 200ms", "{config.subtitle}" }
            }
            div { class: "hero__actions fade-in", style: "animation-delay: 400ms",
                Link { class: "primary-button", to: AppView::GalleryView {}, "Our memories" }
                Link { class: "primary-button", to: AppView::MessageView {}, "Read my letter" }
            }
            button {
                class: "surprise-button fade-in",
                style: "animation-delay: 600ms",
                r#type: "button",
                onclick: move |_| surprise_open.set(true),
                Icon { name: "gift".to_string(), class: "surprise-button__icon".to_string() }
                "A little surprise"
            }
        }

        if surprise_open() {
            SurpriseModal { on_close: move |_| surprise_open.set(false) }
        }
    }
}

#[component]
fn SurpriseModal(on_close: EventHandler<()>) -> Element {
    use_scroll_lock();
    use_document_keydown(move |key| {
        if key == "Escape" {
            on_close.call(());
        }
    });

    #[cfg(target_arch = "wasm32")]
    use_future(|| async {
        use crate::confetti::{canvas, ConfettiField, CONFETTI_COUNT};

        // Let the canvas reach the DOM first.
        gloo_timers::future::TimeoutFuture::new(0).await;
        let Some((element, ctx)) = canvas::context(CONFETTI_CANVAS_ID) else {
            tracing::debug!("confetti canvas missing");
            return;
        };
        let (width, height) = canvas::viewport_size().unwrap_or((800.0, 600.0));
        canvas::fit(&element, width, height);

        let mut rng = rand::thread_rng();
        let mut field = ConfettiField::new(&mut rng, width, height, CONFETTI_COUNT);
        loop {
            if let Some((width, height)) = canvas::viewport_size() {
                if width != field.width || height != field.height {
                    canvas::fit(&element, width, height);
                    field.resize(width, height);
                }
            }
            field.step(&mut rng);
            canvas::paint(&ctx, &field);
            gloo_timers::future::TimeoutFuture::new(16).await;
        }
    });

    rsx! {
        div {
            class: "modal modal--show",
            onclick: move |_| on_close.call(()),
            canvas { id: CONFETTI_CANVAS_ID, class: "confetti-canvas" }
            div {
                class: "modal__card surprise-card",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                button {
                    class: "close-modal",
                    r#type: "button",
                    aria_label: "Close",
                    onclick: move |_| on_close.call(()),
                    Icon { name: "close".to_string(), class: "close-modal__icon".to_string() }
                }
                Icon { name: "heart".to_string(), class: "surprise-card__heart".to_string() }
                h2 { class: "surprise-card__title", "I love you!" }
                p { class: "surprise-card__text", "Thank you for every single day." }
            }
        }
    }
}
