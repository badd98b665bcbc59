use super::app::AppServices;
use crate::state::viewer::{CopyFeedback, copy_share_url, sections};
use crate::state::{ViewStatus, ViewerAction, ViewerState};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ProfileViewProps {
    pub id: String,
}

#[function_component(ProfileView)]
pub fn profile_view(props: &ProfileViewProps) -> Html {
    let services = use_context::<AppServices>();
    let state = use_reducer(ViewerState::default);
    let next_request = use_mut_ref(|| 0_u64);

    // One fetch per id
    {
        let state = state.clone();
        let services = services.clone();
        use_effect_with(props.id.clone(), move |id| {
            let request = {
                let mut n = next_request.borrow_mut();
                *n += 1;
                *n
            };
            state.dispatch(ViewerAction::Begin { id: id.clone(), request });
            match services {
                Some(services) => {
                    let id = id.clone();
                    spawn_local(async move {
                        let result = services.api.fetch_profile(&id).await;
                        if let Err(e) = &result {
                            log::error!("fetching profile {} failed: {}", id, e);
                        }
                        state.dispatch(ViewerAction::Finished { request, result });
                    });
                }
                None => log::error!("profile view rendered without services"),
            }
            || ()
        });
    }

    let body = match &state.status {
        _ if state.id != props.id => html! { <div class="loading">{"Loading..."}</div> },
        ViewStatus::Loading => html! { <div class="loading">{"Loading..."}</div> },
        ViewStatus::NotFound => html! {
            <div class="card">
                <p>{"This profile does not exist."}</p>
            </div>
        },
        ViewStatus::Failed(reason) => html! {
            <div class="card">
                <p class="warning">{"The profile could not be loaded. Please reload the page."}</p>
                <p class="detail">{ reason.clone() }</p>
            </div>
        },
        ViewStatus::Loaded(profile) => html! {
            <div class="card profile">
                <img class="avatar" src={profile.details.image_url.clone()}
                    alt={profile.details.name.clone()} />
                <h2>{ profile.details.name.clone() }</h2>
                { for sections(profile).into_iter().map(|s| html! {
                    <div class="section">
                        <strong>{ format!("{}:", s.label) }</strong>
                        if s.paragraph {
                            <p>{ s.value }</p>
                        } else {
                            <span>{" "}{ s.value }</span>
                        }
                    </div>
                }) }
            </div>
        },
    };

    // Copy works in every state
    html! {
        <>
            { body }
            <CopyButton id={props.id.clone()} />
        </>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct CopyButtonProps {
    pub id: String,
}

#[function_component(CopyButton)]
pub fn copy_button(props: &CopyButtonProps) -> Html {
    let services = use_context::<AppServices>();
    let feedback = use_state_eq(CopyFeedback::default);
    let onclick = {
        let id = props.id.clone();
        let feedback = feedback.clone();
        Callback::from(move |_| {
            let Some(services) = &services else { return };
            match copy_share_url(services.clipboard.as_ref(), &services.config, &id) {
                Ok(url) => {
                    log::debug!("copied {}", url);
                    feedback.set(CopyFeedback::copied(&id));
                }
                Err(e) => log::error!("copy failed: {}", e),
            }
        })
    };
    html! {
        <div class="copy-row">
            <button class="button-link" {onclick}>
                { if feedback.shows_for(&props.id) { "Copied!" } else { "Copy URL" } }
            </button>
        </div>
    }
}
