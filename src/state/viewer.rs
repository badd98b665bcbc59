//! Read-only profile page state.
//!
//! Each fetch is tagged with a request number; results for anything but the
//! latest request are dropped, so a slow response for a previous id can
//! never overwrite the current page.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::Profile;
use crate::platform::Clipboard;
use std::rc::Rc;
use yew::Reducible;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewStatus {
    Loading,
    Loaded(Profile),
    NotFound,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerState {
    pub id: String,
    pub request: u64,
    pub status: ViewStatus,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self { id: String::new(), request: 0, status: ViewStatus::Loading }
    }
}

pub enum ViewerAction {
    Begin { id: String, request: u64 },
    Finished { request: u64, result: Result<Profile, AppError> },
}

impl Reducible for ViewerState {
    type Action = ViewerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ViewerAction::Begin { id, request } => Rc::new(ViewerState {
                id,
                request,
                status: ViewStatus::Loading,
            }),
            ViewerAction::Finished { request, .. } if request != self.request => {
                log::debug!("dropping stale profile response #{}", request);
                self
            }
            ViewerAction::Finished { result, .. } => {
                let status = match result {
                    Ok(profile) => ViewStatus::Loaded(profile),
                    Err(e) if e.is_not_found() => ViewStatus::NotFound,
                    Err(e) => ViewStatus::Failed(e.to_string()),
                };
                Rc::new(ViewerState { status, ..(*self).clone() })
            }
        }
    }
}

/// One labelled block of the profile page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileSection {
    pub label: &'static str,
    pub value: String,
    /// Multi-line text rendered as a paragraph rather than inline.
    pub paragraph: bool,
}

/// Sections for every non-empty optional field, in display order. Name and
/// image are rendered separately.
pub fn sections(profile: &Profile) -> Vec<ProfileSection> {
    let d = &profile.details;
    let mut out = Vec::new();
    if let Some(date) = profile.birth_date() {
        out.push(ProfileSection { label: "Birthday", value: date, paragraph: false });
    }
    let optional = [
        ("Career", &d.career, true),
        ("MBTI", &d.mbti, false),
        ("Hobbies & skills", &d.hobbies, true),
        ("Remarks", &d.remarks, true),
    ];
    for (label, value, paragraph) in optional {
        if !value.is_empty() {
            out.push(ProfileSection { label, value: value.clone(), paragraph });
        }
    }
    out
}

/// Copies the canonical share URL of `id`; works whether or not the profile
/// has loaded.
pub fn copy_share_url(
    clipboard: &dyn Clipboard,
    config: &AppConfig,
    id: &str,
) -> Result<String, AppError> {
    let url = config.share_url(id);
    clipboard.write_text(&url)?;
    Ok(url)
}

/// "Copied!" feedback, bound to the profile it was given for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyFeedback {
    copied_id: Option<String>,
}

impl CopyFeedback {
    pub fn copied(id: &str) -> Self {
        Self { copied_id: Some(id.to_string()) }
    }

    pub fn shows_for(&self, id: &str) -> bool {
        self.copied_id.as_deref() == Some(id)
    }
}
