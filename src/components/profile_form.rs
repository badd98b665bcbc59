use super::app::AppServices;
use super::image_upload_form::ImageUploadForm;
use crate::model::{LimitedField, Mbti, birth_days, birth_months, birth_years};
use crate::state::{ComposerAction, CreationSession, ProfileComposer, TextField};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

fn target_value(e: &Event) -> String {
    let Some(target) = e.target() else { return String::new() };
    if let Some(el) = target.dyn_ref::<HtmlInputElement>() {
        return el.value();
    }
    if let Some(el) = target.dyn_ref::<HtmlTextAreaElement>() {
        return el.value();
    }
    if let Some(el) = target.dyn_ref::<HtmlSelectElement>() {
        return el.value();
    }
    String::new()
}

fn select_options(placeholder: &str, values: Vec<String>, selected: &str) -> Html {
    html! {
        <>
            <option value="" selected={selected.is_empty()}>{ placeholder.to_string() }</option>
            { for values.into_iter().map(|v| {
                let is_selected = v == selected;
                let label = v.trim_start_matches('0').to_string();
                html! { <option value={v} selected={is_selected}>{ label }</option> }
            }) }
        </>
    }
}

fn warning(composer: &ProfileComposer, field: LimitedField) -> Html {
    match composer.warning(field) {
        Some(msg) => html! { <p class="warning">{ msg }</p> },
        None => html! {},
    }
}

#[function_component(ProfileForm)]
pub fn profile_form() -> Html {
    let services = use_context::<AppServices>();
    let session = use_context::<CreationSession>();
    let composer = use_reducer(ProfileComposer::default);
    let refresh = use_force_update();

    // Re-render when the uploaded image URL arrives
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            if let Some(session) = &session {
                session.watch(move || refresh.force_update());
            }
            move || {
                if let Some(session) = session {
                    session.unwatch();
                }
            }
        });
    }

    let on_input = |field: TextField| {
        let composer = composer.clone();
        Callback::from(move |e: InputEvent| {
            composer.dispatch(ComposerAction::Set(field, target_value(&e)))
        })
    };
    let on_change = |field: TextField| {
        let composer = composer.clone();
        Callback::from(move |e: Event| {
            composer.dispatch(ComposerAction::Set(field, target_value(&e)))
        })
    };

    let onsubmit = {
        let composer = composer.clone();
        let services = services.clone();
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if composer.submitting {
                return;
            }
            let (Some(services), Some(session)) = (services.clone(), session.clone()) else {
                log::error!("profile form rendered outside the create page");
                return;
            };
            let snapshot = (*composer).clone();
            composer.dispatch(ComposerAction::SubmitStarted);
            let composer = composer.clone();
            spawn_local(async move {
                match snapshot.submit(services.api.as_ref(), &session).await {
                    Ok(route) => {
                        composer.dispatch(ComposerAction::SubmitFinished);
                        services.navigate.emit(route);
                    }
                    Err(e) => {
                        log::error!("creating profile failed: {}", e);
                        composer.dispatch(ComposerAction::SubmitFailed(
                            "Could not create the profile. Please try again.".into(),
                        ));
                    }
                }
            });
        })
    };

    let mbti_buttons = Mbti::ALL.iter().map(|m| {
        let m = *m;
        let selected = composer.mbti == Some(m);
        let onclick = {
            let composer = composer.clone();
            // clicking the active code clears it
            Callback::from(move |_| {
                composer.dispatch(ComposerAction::SetMbti(if selected { None } else { Some(m) }))
            })
        };
        html! {
            <button type="button" {onclick}
                class={classes!("mbti", selected.then_some("selected"))}>
                { m.code() }
            </button>
        }
    });

    let image_url = session.as_ref().and_then(|s| s.image_url());
    let this_year = js_sys::Date::new_0().get_full_year();

    html! {
        <div class="card">
            <h2>{"Create your profile"}</h2>
            <div class="field">
                <label>{"Profile image (required)"}</label>
                if let Some(url) = image_url {
                    <img class="uploaded" src={url} alt="Profile image" />
                }
                <ImageUploadForm />
            </div>
            <form {onsubmit}>
                <div class="field">
                    <label for="name">{"Name (required)"}</label>
                    <input type="text" id="name" required=true maxlength="30"
                        value={composer.field(TextField::Name).to_string()}
                        oninput={on_input(TextField::Name)} />
                    { warning(&composer, LimitedField::Name) }
                </div>
                <div class="field">
                    <label>{"Birthday"}</label>
                    <div class="row">
                        <select onchange={on_change(TextField::BirthYear)}>
                            { select_options("Year", birth_years(this_year), &composer.birth_year) }
                        </select>
                        <select onchange={on_change(TextField::BirthMonth)}>
                            { select_options("Month", birth_months(), &composer.birth_month) }
                        </select>
                        <select onchange={on_change(TextField::BirthDay)}>
                            { select_options("Day", birth_days(), &composer.birth_day) }
                        </select>
                    </div>
                </div>
                <div class="field">
                    <label for="career">{"Career"}</label>
                    <textarea id="career" maxlength="300"
                        value={composer.field(TextField::Career).to_string()}
                        oninput={on_input(TextField::Career)} />
                    { warning(&composer, LimitedField::Career) }
                </div>
                <div class="field">
                    <label>{"MBTI"}</label>
                    <div class="mbti-grid">{ for mbti_buttons }</div>
                </div>
                <div class="field">
                    <label for="hobbies">{"Hobbies & skills"}</label>
                    <textarea id="hobbies" maxlength="1000"
                        value={composer.field(TextField::Hobbies).to_string()}
                        oninput={on_input(TextField::Hobbies)} />
                    { warning(&composer, LimitedField::Hobbies) }
                </div>
                <div class="field">
                    <label for="remarks">{"Remarks"}</label>
                    <textarea id="remarks" maxlength="1000"
                        value={composer.field(TextField::Remarks).to_string()}
                        oninput={on_input(TextField::Remarks)} />
                    { warning(&composer, LimitedField::Remarks) }
                </div>
                if let Some(err) = composer.error.clone() {
                    <p class="warning">{ err }</p>
                }
                <button type="submit" class="button" disabled={composer.submitting}>
                    {"Generate my profile URL"}
                </button>
            </form>
        </div>
    }
}
