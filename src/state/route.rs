// Client-side routes and History API navigation

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Create,
    Profile { id: String },
    NotFound,
}

impl AppRoute {
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => AppRoute::Home,
            ["create"] => AppRoute::Create,
            ["profile", id] => AppRoute::Profile { id: (*id).to_string() },
            _ => AppRoute::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Create => "/create".to_string(),
            AppRoute::Profile { id } => format!("/profile/{}", id),
            AppRoute::NotFound => "/404".to_string(),
        }
    }

    /// Route of the page currently loaded in the window.
    pub fn current() -> Self {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .map(|p| Self::from_path(&p))
            .unwrap_or(AppRoute::Home)
    }

    /// Pushes this route onto the session history.
    pub fn push(&self) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            log::warn!("history unavailable, cannot push {}", self.to_path());
            return;
        };
        let path = self.to_path();
        if let Err(e) = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path)) {
            log::warn!("pushState failed: {:?}", e);
        }
    }
}
