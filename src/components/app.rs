use crate::components::{view_label, AppView, Icon, MusicController, MusicToggle, SoundOnSignal};
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

/// Set while a modal is open so the page behind it stops scrolling.
#[derive(Clone, Copy)]
pub struct ScrollLockSignal(pub Signal<bool>);

const NAV_ITEMS: [AppView; 3] = [
    AppView::HomeView {},
    AppView::GalleryView {},
    AppView::MessageView {},
];

/// Locks page scrolling for as long as the calling component is mounted.
pub fn use_scroll_lock() {
    let mut locked = use_context::<ScrollLockSignal>().0;
    use_effect(move || locked.set(true));
    use_drop(move || locked.set(false));
}

/// A `keydown` listener on the whole document, removed when dropped.
#[cfg(target_arch = "wasm32")]
struct DocumentKeydown {
    document: web_sys::Document,
    callback: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl DocumentKeydown {
    fn attach(mut on_key: impl FnMut(&str) + 'static) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let runtime = Runtime::current();
        let callback = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let _guard = RuntimeGuard::new(runtime.clone());
            on_key(&evt.key());
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);
        document
            .add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { document, callback })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for DocumentKeydown {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("keydown", self.callback.as_ref().unchecked_ref());
    }
}

/// Hears every key pressed on the page while the calling component is
/// mounted, wherever focus is.
pub fn use_document_keydown(on_key: impl FnMut(&str) + 'static) {
    #[cfg(target_arch = "wasm32")]
    use_hook(move || {
        let listener = DocumentKeydown::attach(on_key);
        if listener.is_none() {
            tracing::debug!("document keydown listener not attached");
        }
        Rc::new(listener)
    });

    #[cfg(not(target_arch = "wasm32"))]
    let _ = on_key;
}

#[component]
pub fn AppShell() -> Element {
    let sound_on = use_signal(|| true);
    let scroll_locked = use_signal(|| false);
    let current_view = use_route::<AppView>();

    use_context_provider(|| SoundOnSignal(sound_on));
    use_context_provider(|| ScrollLockSignal(scroll_locked));

    rsx! {
        div { class: if scroll_locked() { "app-shell app-shell--locked" } else { "app-shell" },
            header { class: "site-nav",
                Link { class: "site-nav__brand", to: AppView::HomeView {},
                    Icon { name: "heart".to_string(), class: "site-nav__heart".to_string() }
                }
                nav { class: "site-nav__links",
                    for view in NAV_ITEMS {
                        Link {
                            key: "{view_label(&view)}",
                            class: if view == current_view { "site-nav__link site-nav__link--active" } else { "site-nav__link" },
                            to: view.clone(),
                            "{view_label(&view)}"
                        }
                    }
                }
                MusicToggle {}
            }

            main { class: "page-shell", Outlet::<AppView> {} }

            footer { class: "site-footer", "Made with love" }
        }

        // Music lives in the layout so it keeps playing across routes
        MusicController {}
    }
}
