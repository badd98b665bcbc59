use super::nav_link::NavLink;
use crate::state::AppRoute;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HeaderProps {
    pub dark: bool,
    pub on_toggle_theme: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let toggle_cb = {
        let cb = props.on_toggle_theme.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let (icon, title) = if props.dark {
        ("\u{2600}", "Switch to light mode")
    } else {
        ("\u{263E}", "Switch to dark mode")
    };
    html! {
        <header class="site-header">
            <div class="container header-row">
                <NavLink to={AppRoute::Home} class="brand">{"Profile Card Generator"}</NavLink>
                <nav>
                    <ul class="nav-links">
                        <li><NavLink to={AppRoute::Home}>{"Home"}</NavLink></li>
                        <li><NavLink to={AppRoute::Create}>{"Create"}</NavLink></li>
                        <li>
                            <button class="theme-toggle" {title} onclick={toggle_cb}>
                                { icon }
                            </button>
                        </li>
                    </ul>
                </nav>
            </div>
        </header>
    }
}
