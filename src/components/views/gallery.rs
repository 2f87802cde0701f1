use crate::components::{use_document_keydown, use_scroll_lock, Icon};
use crate::config::{site, Photo};
use crate::lightbox::{swipe_step, KeyAction, Lightbox};
use crate::reveal::use_reveal_on_scroll;
use crate::utils::slugify;
use dioxus::prelude::*;

/// Delay between successive cards fading in.
const FADE_STAGGER_MS: usize = 200;

#[component]
pub fn GalleryView() -> Element {
    let config = site();
    let mut lightbox = use_signal(|| Lightbox::new(config.gallery_photos()));
    use_reveal_on_scroll();
    let cards: Vec<(usize, String, Photo)> = lightbox
        .read()
        .photos()
        .iter()
        .enumerate()
        .map(|(index, photo)| (index * FADE_STAGGER_MS, config.photo_url(photo), photo.clone()))
        .collect();

    rsx! {
        section { class: "gallery",
            h1 { class: "page-title fade-in", "Our Memories" }
            div { class: "photo-grid",
                for (delay_ms, src, photo) in cards {
                    button {
                        key: "{delay_ms}-{slugify(&photo.label)}",
                        class: "photo-card reveal",
                        style: "transition-delay: {delay_ms}ms",
                        r#type: "button",
                        onclick: {
                            let label = photo.label.clone();
                            move |_| lightbox.write().open_label(&label)
                        },
                        img {
                            class: "photo-img",
                            src: "{src}",
                            alt: "{photo.label}",
                            loading: "lazy",
                        }
                        span { class: "photo-label", "{photo.label}" }
                    }
                }
            }
        }

        if lightbox.read().is_open() {
            PhotoModal { lightbox }
        }
    }
}

#[component]
fn PhotoModal(lightbox: Signal<Lightbox>) -> Element {
    use_scroll_lock();
    use_document_keydown(move |key| {
        if let Some(action) = KeyAction::from_key(key) {
            lightbox.write().apply(action);
        }
    });
    let mut swipe_start = use_signal(|| None::<f64>);
    // A swipe ends with a click on the backdrop that must not close the modal.
    let mut just_swiped = use_signal(|| false);

    let Some(photo) = lightbox.read().current().cloned() else {
        return rsx! {};
    };
    let src = site().photo_url(&photo);

    rsx! {
        div {
            id: "photo-modal",
            class: "modal modal--show",
            onclick: move |_| {
                if just_swiped() {
                    just_swiped.set(false);
                } else {
                    lightbox.write().close();
                }
            },
            onpointerdown: move |evt: PointerEvent| {
                just_swiped.set(false);
                swipe_start.set(Some(evt.client_coordinates().x));
            },
            onpointerup: move |evt: PointerEvent| {
                let Some(start) = swipe_start() else {
                    return;
                };
                swipe_start.set(None);
                if let Some(step) = swipe_step(start, evt.client_coordinates().x) {
                    just_swiped.set(true);
                    lightbox.write().navigate(step);
                }
            },
            onpointerleave: move |_| swipe_start.set(None),

            button {
                class: "close-modal",
                r#type: "button",
                aria_label: "Close",
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    lightbox.write().close();
                },
                Icon { name: "close".to_string(), class: "close-modal__icon".to_string() }
            }
            button {
                class: "modal__nav modal__nav--prev",
                r#type: "button",
                aria_label: "Previous photo",
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    lightbox.write().navigate(-1);
                },
                Icon { name: "chevron-left".to_string(), class: "modal__nav-icon".to_string() }
            }
            figure {
                class: "modal__figure",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                img { id: "modal-image", class: "modal__image", src: "{src}", alt: "{photo.label}", draggable: "false" }
                figcaption { id: "modal-caption", class: "modal__caption", "{photo.label} ❤️" }
            }
            button {
                class: "modal__nav modal__nav--next",
                r#type: "button",
                aria_label: "Next photo",
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    lightbox.write().navigate(1);
                },
                Icon { name: "chevron-right".to_string(), class: "modal__nav-icon".to_string() }
            }
        }
    }
}
