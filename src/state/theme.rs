use crate::platform::{KeyValueStore, ThemeSignal};

pub const DARK_MODE_KEY: &str = "darkMode";

/// Dark-mode preference. The stored value wins at startup; later OS
/// changes overwrite both the live and the stored value.
pub struct ThemeStore {
    store: Box<dyn KeyValueStore>,
    dark: bool,
}

impl ThemeStore {
    pub fn load(store: Box<dyn KeyValueStore>, signal: &dyn ThemeSignal) -> Self {
        let dark = match store.get(DARK_MODE_KEY).as_deref() {
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                log::warn!("ignoring stored {}={:?}", DARK_MODE_KEY, other);
                signal.prefers_dark()
            }
            None => signal.prefers_dark(),
        };
        Self { store, dark }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn toggle(&mut self) -> bool {
        self.set(!self.dark);
        self.dark
    }

    /// OS color scheme changed.
    pub fn apply_signal(&mut self, dark: bool) {
        self.set(dark);
    }

    fn set(&mut self, dark: bool) {
        self.dark = dark;
        if let Err(e) = self.store.set(DARK_MODE_KEY, if dark { "true" } else { "false" }) {
            log::warn!("theme preference not persisted: {}", e);
        }
    }
}
