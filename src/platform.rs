//! Browser capabilities behind small traits so state code can run against
//! in-memory fakes: key/value storage, the OS color-scheme signal and the
//! clipboard.

use crate::error::AppError;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaQueryList, MediaQueryListEvent};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Keeps a listener registered until dropped.
pub struct Subscription(Option<Box<dyn FnOnce()>>);

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(unsubscribe)))
    }

    pub fn noop() -> Self {
        Self(None)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

/// OS-level "prefers dark" signal.
pub trait ThemeSignal {
    fn prefers_dark(&self) -> bool;
    fn subscribe(&self, on_change: Box<dyn Fn(bool)>) -> Subscription;
}

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), AppError>;
}

// --- web-sys implementations ---

pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, AppError> {
        web_sys::window()
            .ok_or_else(|| AppError::Browser("no window".into()))?
            .local_storage()
            .map_err(AppError::from_js)?
            .ok_or_else(|| AppError::Browser("localStorage disabled".into()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        Self::storage()?.set_item(key, value).map_err(AppError::from_js)
    }
}

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// `matchMedia("(prefers-color-scheme: dark)")`; reports light when the
/// query is unavailable.
pub struct MediaQueryThemeSignal {
    query: Option<MediaQueryList>,
}

impl MediaQueryThemeSignal {
    pub fn new() -> Self {
        let query = web_sys::window().and_then(|w| w.match_media(DARK_SCHEME_QUERY).ok().flatten());
        if query.is_none() {
            log::warn!("matchMedia unavailable, assuming light color scheme");
        }
        Self { query }
    }
}

impl ThemeSignal for MediaQueryThemeSignal {
    fn prefers_dark(&self) -> bool {
        self.query.as_ref().map(|q| q.matches()).unwrap_or(false)
    }

    fn subscribe(&self, on_change: Box<dyn Fn(bool)>) -> Subscription {
        let Some(query) = self.query.clone() else {
            return Subscription::noop();
        };
        let closure = Closure::<dyn Fn(MediaQueryListEvent)>::new(move |e: MediaQueryListEvent| {
            on_change(e.matches())
        });
        if let Err(e) =
            query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            log::warn!("color-scheme listener not installed: {:?}", e);
            return Subscription::noop();
        }
        Subscription::new(move || {
            let handler = closure.as_ref().unchecked_ref();
            let _ = query.remove_event_listener_with_callback("change", handler);
        })
    }
}

pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    fn write_text(&self, text: &str) -> Result<(), AppError> {
        let window = web_sys::window().ok_or_else(|| AppError::Browser("no window".into()))?;
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::error!("clipboard write failed: {:?}", e);
            }
        });
        Ok(())
    }
}

/// Adds or removes the `dark` class on `<html>`.
pub fn apply_dark_class(dark: bool) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let classes = root.class_list();
    let res = if dark { classes.add_1("dark") } else { classes.remove_1("dark") };
    if let Err(e) = res {
        log::warn!("could not update theme class: {:?}", e);
    }
}

pub fn alert(message: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.alert_with_message(message);
    }
}
