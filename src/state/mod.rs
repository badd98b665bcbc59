pub mod capture;
pub mod composer;
pub mod route;
pub mod session;
pub mod theme;
pub mod viewer;

pub use capture::{ImageCapture, PickedFile};
pub use composer::{ComposerAction, ProfileComposer, TextField};
pub use route::AppRoute;
pub use session::CreationSession;
pub use theme::ThemeStore;
pub use viewer::{ViewStatus, ViewerAction, ViewerState};
