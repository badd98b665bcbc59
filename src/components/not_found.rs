use super::nav_link::NavLink;
use crate::state::AppRoute;
use yew::prelude::*;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class="card">
            <h2>{"Page not found"}</h2>
            <NavLink to={AppRoute::Home}>{"Back to the start page"}</NavLink>
        </div>
    }
}
