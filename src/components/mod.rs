pub mod app;
pub mod create_profile;
pub mod header;
pub mod home;
pub mod image_upload_form;
pub mod nav_link;
pub mod not_found;
pub mod profile_form;
pub mod profile_view;

pub use app::{App, AppProps};
