use crate::api::ProfileApi;
use crate::error::AppError;
use crate::model::{LimitedField, Mbti, ProfileDetails};
use crate::state::route::AppRoute;
use crate::state::session::CreationSession;
use std::rc::Rc;
use yew::Reducible;

/// Text inputs of the profile form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    Name,
    BirthYear,
    BirthMonth,
    BirthDay,
    Career,
    Hobbies,
    Remarks,
}

/// Everything the user typed, minus the image (that lives in the session).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileComposer {
    pub name: String,
    pub birth_year: String,
    pub birth_month: String,
    pub birth_day: String,
    pub career: String,
    pub mbti: Option<Mbti>,
    pub hobbies: String,
    pub remarks: String,
    /// A create request is in flight.
    pub submitting: bool,
    /// Last submission failure, shown inline.
    pub error: Option<String>,
}

pub enum ComposerAction {
    Set(TextField, String),
    SetMbti(Option<Mbti>),
    SubmitStarted,
    SubmitFailed(String),
    SubmitFinished,
}

impl Reducible for ProfileComposer {
    type Action = ComposerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use ComposerAction::*;
        let mut new = (*self).clone();
        match action {
            Set(field, value) => *new.field_mut(field) = value,
            SetMbti(m) => new.mbti = m,
            SubmitStarted => {
                new.submitting = true;
                new.error = None;
            }
            SubmitFailed(msg) => {
                new.submitting = false;
                new.error = Some(msg);
            }
            SubmitFinished => new.submitting = false,
        }
        Rc::new(new)
    }
}

impl ProfileComposer {
    pub fn field(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::BirthYear => &self.birth_year,
            TextField::BirthMonth => &self.birth_month,
            TextField::BirthDay => &self.birth_day,
            TextField::Career => &self.career,
            TextField::Hobbies => &self.hobbies,
            TextField::Remarks => &self.remarks,
        }
    }

    fn field_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Name => &mut self.name,
            TextField::BirthYear => &mut self.birth_year,
            TextField::BirthMonth => &mut self.birth_month,
            TextField::BirthDay => &mut self.birth_day,
            TextField::Career => &mut self.career,
            TextField::Hobbies => &mut self.hobbies,
            TextField::Remarks => &mut self.remarks,
        }
    }

    pub fn warning(&self, field: LimitedField) -> Option<String> {
        let value = match field {
            LimitedField::Name => &self.name,
            LimitedField::Career => &self.career,
            LimitedField::Hobbies => &self.hobbies,
            LimitedField::Remarks => &self.remarks,
        };
        field.warning(value)
    }

    /// Create payload. The image URL is empty if no upload completed.
    pub fn payload(&self, session: &CreationSession) -> ProfileDetails {
        ProfileDetails {
            name: self.name.clone(),
            image_url: session.image_url().unwrap_or_default(),
            birth_year: self.birth_year.clone(),
            birth_month: self.birth_month.clone(),
            birth_day: self.birth_day.clone(),
            career: self.career.clone(),
            mbti: self.mbti.map(|m| m.code().to_string()).unwrap_or_default(),
            hobbies: self.hobbies.clone(),
            remarks: self.remarks.clone(),
        }
    }

    /// Creates the profile and returns the route of its view page. Length
    /// warnings do not stop submission.
    pub async fn submit(
        &self,
        api: &dyn ProfileApi,
        session: &CreationSession,
    ) -> Result<AppRoute, AppError> {
        let id = api.create_profile(&self.payload(session)).await?;
        log::info!("profile created: {}", id);
        Ok(AppRoute::Profile { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fakes::FakeApi;
    use futures::executor::block_on;

    fn with_name(name: &str) -> ProfileComposer {
        ProfileComposer { name: name.into(), ..Default::default() }
    }

    #[test]
    fn reducer_sets_fields() {
        let c = Rc::new(ProfileComposer::default());
        let c = c.reduce(ComposerAction::Set(TextField::Career, "Engineer".into()));
        let c = c.reduce(ComposerAction::Set(TextField::BirthMonth, "04".into()));
        let c = c.reduce(ComposerAction::SetMbti(Some(Mbti::Entp)));
        assert_eq!(c.field(TextField::Career), "Engineer");
        assert_eq!(c.birth_month, "04");
        assert_eq!(c.mbti, Some(Mbti::Entp));
    }

    #[test]
    fn submit_lifecycle_tracks_flight_and_errors() {
        let c = Rc::new(ProfileComposer::default()).reduce(ComposerAction::SubmitStarted);
        assert!(c.submitting);
        let c = c.reduce(ComposerAction::SubmitFailed("offline".into()));
        assert!(!c.submitting);
        assert_eq!(c.error.as_deref(), Some("offline"));
        let c = c.reduce(ComposerAction::SubmitStarted);
        assert_eq!(c.error, None);
    }

    #[test]
    fn payload_carries_session_image_and_mbti_code() {
        let session = CreationSession::new();
        session.publish_image_url("https://img.example.com/me.png".into());
        let mut c = with_name("Aiko");
        c.mbti = Some(Mbti::Isfj);
        let p = c.payload(&session);
        assert_eq!(p.image_url, "https://img.example.com/me.png");
        assert_eq!(p.mbti, "ISFJ");
        assert_eq!(p.name, "Aiko");
    }

    #[test]
    fn payload_without_upload_has_empty_image() {
        let p = ProfileComposer::default().payload(&CreationSession::new());
        assert_eq!(p.image_url, "");
        assert_eq!(p.mbti, "");
    }

    #[test]
    fn created_id_becomes_view_route() {
        let api = FakeApi::assigning("abc123");
        let route = block_on(with_name("Aiko").submit(&api, &CreationSession::new())).unwrap();
        assert_eq!(route, AppRoute::Profile { id: "abc123".into() });
        assert_eq!(route.to_path(), "/profile/abc123");
    }

    #[test]
    fn thirty_char_name_submits_without_warning_past_limit() {
        let api = FakeApi::assigning("n30");
        let name = "a".repeat(30);
        assert!(block_on(with_name(&name).submit(&api, &CreationSession::new())).is_ok());
        assert_eq!(api.created.borrow()[0].name, name);
    }

    #[test]
    fn thirty_one_char_name_warns_but_still_submits() {
        let api = FakeApi::assigning("n31");
        let c = with_name(&"a".repeat(31));
        assert!(c.warning(LimitedField::Name).is_some());
        assert!(block_on(c.submit(&api, &CreationSession::new())).is_ok());
        assert_eq!(api.created.borrow().len(), 1);
    }

    #[test]
    fn failed_create_reports_error_and_keeps_fields() {
        let api = FakeApi::failing(AppError::Server { status: 500, message: "boom".into() });
        let c = with_name("Aiko");
        let err = block_on(c.submit(&api, &CreationSession::new())).unwrap_err();
        assert!(matches!(err, AppError::Server { status: 500, .. }));
        assert_eq!(c.name, "Aiko");
    }
}
