use super::app::AppServices;
use crate::state::AppRoute;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct NavLinkProps {
    pub to: AppRoute,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Children,
}

/// Anchor that navigates through the History API instead of reloading.
#[function_component(NavLink)]
pub fn nav_link(props: &NavLinkProps) -> Html {
    let services = use_context::<AppServices>();
    let onclick = {
        let to = props.to.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(services) = &services {
                e.prevent_default();
                services.navigate.emit(to.clone());
            }
        })
    };
    html! {
        <a href={props.to.to_path()} class={props.class.clone()} {onclick}>
            { for props.children.iter() }
        </a>
    }
}
