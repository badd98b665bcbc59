use super::nav_link::NavLink;
use crate::state::AppRoute;
use yew::prelude::*;

#[function_component(Home)]
pub fn home() -> Html {
    html! {
        <div class="home">
            <h2>{"Profile Card Generator"}</h2>
            <p>{"Fill in your profile and get a page you can share with a single link."}</p>
            <NavLink to={AppRoute::Create} class="button button-large">
                {"Create a profile"}
            </NavLink>
        </div>
    }
}
