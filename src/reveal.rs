//! Scroll-triggered reveal for cards: they start hidden and fade up the first
//! time they scroll into view.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

#[cfg(target_arch = "wasm32")]
use dioxus::prelude::*;

/// Class carried by every element that fades in on scroll.
pub const REVEAL_CLASS: &str = "reveal";
/// Added once the element has been seen.
pub const VISIBLE_CLASS: &str = "reveal--visible";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    pub selector: &'static str,
    /// Fraction of the element that must be on screen
    pub threshold: f64,
    /// Shrinks the viewport's bottom edge so cards reveal a little late.
    pub root_margin: &'static str,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal",
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px",
        }
    }
}

/// Watches the page's `.reveal` elements while the calling component is
/// mounted. Elements must already be in the DOM after the first render.
pub fn use_reveal_on_scroll() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::cell::RefCell;
        use std::rc::Rc;

        let observer = use_hook(|| Rc::new(RefCell::new(None::<web::RevealObserver>)));
        use_effect(move || {
            if observer.borrow().is_some() {
                return;
            }
            let attached = web::RevealObserver::attach(&RevealConfig::default());
            if attached.is_none() {
                tracing::debug!("reveal observer not attached");
            }
            *observer.borrow_mut() = attached;
        });
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{RevealConfig, VISIBLE_CLASS};
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};
    use web_sys::{
        window, Element, IntersectionObserver, IntersectionObserverEntry,
        IntersectionObserverInit,
    };

    type Callback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

    pub struct RevealObserver {
        observer: IntersectionObserver,
        _callback: Callback,
    }

    impl RevealObserver {
        pub fn attach(config: &RevealConfig) -> Option<Self> {
            let document = window()?.document()?;

            let callback = Closure::wrap(Box::new(
                |entries: js_sys::Array, observer: IntersectionObserver| {
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                            continue;
                        };
                        if entry.is_intersecting() {
                            let target = entry.target();
                            let _ = target.class_list().add_1(VISIBLE_CLASS);
                            observer.unobserve(&target);
                        }
                    }
                },
            )
                as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(config.threshold));
            options.set_root_margin(config.root_margin);
            let observer = IntersectionObserver::new_with_options(
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .ok()?;

            let nodes = document.query_selector_all(config.selector).ok()?;
            for i in 0..nodes.length() {
                if let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    observer.observe(&element);
                }
            }

            Some(Self {
                observer,
                _callback: callback,
            })
        }
    }

    impl Drop for RevealObserver {
        fn drop(&mut self) {
            self.observer.disconnect();
        }
    }
}
