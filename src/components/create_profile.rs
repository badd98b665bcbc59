use super::profile_form::ProfileForm;
use crate::state::CreationSession;
use yew::prelude::*;

/// Owns the creation session for as long as the page is mounted.
#[function_component(CreateProfile)]
pub fn create_profile() -> Html {
    let session = use_memo((), |_| CreationSession::new());
    html! {
        <ContextProvider<CreationSession> context={(*session).clone()}>
            <ProfileForm />
        </ContextProvider<CreationSession>>
    }
}
