//! Browser event wiring
//!
//! Thin helpers over `addEventListener`. Closures are leaked with
//! `forget()`: they live as long as the page.

use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, EventTarget, KeyboardEvent};

/// Attach `handler` to `event` on `target`
pub fn listen<E, F>(target: &EventTarget, event: &str, passive: bool, handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let mut handler = handler;
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });

    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    if target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .is_err()
    {
        log::warn!("Failed to listen for {}", event);
    }
    closure.forget();
}

/// Wire an on-screen button for touch and mouse.
///
/// `on_press` runs on touchstart/mousedown; `on_release` (if any) on
/// touchend/touchcancel/mouseup/mouseleave. Touch defaults are suppressed so
/// a held button does not scroll or zoom the page.
pub fn add_control<P, R>(document: &Document, id: &str, on_press: P, on_release: Option<R>)
where
    P: Fn() + 'static,
    R: Fn() + 'static,
{
    let Some(button) = document.get_element_by_id(id) else {
        log::warn!("Control #{} not found, skipping", id);
        return;
    };
    let target: &EventTarget = button.as_ref();

    let on_press = std::rc::Rc::new(on_press);
    {
        let on_press = on_press.clone();
        listen(target, "touchstart", false, move |e: web_sys::TouchEvent| {
            e.prevent_default();
            on_press();
        });
    }
    listen(target, "mousedown", true, move |_: web_sys::MouseEvent| on_press());

    let Some(on_release) = on_release else { return };
    let on_release = std::rc::Rc::new(on_release);
    for event in ["touchend", "touchcancel"] {
        let on_release = on_release.clone();
        listen(target, event, false, move |e: web_sys::TouchEvent| {
            e.prevent_default();
            on_release();
        });
    }
    for event in ["mouseup", "mouseleave"] {
        let on_release = on_release.clone();
        listen(target, event, true, move |_: web_sys::MouseEvent| on_release());
    }
}

/// Forward keydown/keyup `key` values to `handler(key, pressed)`
pub fn on_keys<F>(target: &EventTarget, handler: F)
where
    F: Fn(&str, bool) + 'static,
{
    let handler = std::rc::Rc::new(handler);
    {
        let handler = handler.clone();
        listen(target, "keydown", true, move |e: KeyboardEvent| {
            handler(&e.key(), true);
        });
    }
    listen(target, "keyup", true, move |e: KeyboardEvent| {
        handler(&e.key(), false);
    });
}
