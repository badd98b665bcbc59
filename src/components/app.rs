use super::{
    create_profile::CreateProfile, header::Header, home::Home, not_found::NotFound,
    profile_view::ProfileView,
};
use crate::api::{HttpProfileApi, ProfileApi};
use crate::config::AppConfig;
use crate::platform::{
    BrowserClipboard, Clipboard, LocalStorageStore, MediaQueryThemeSignal, ThemeSignal,
    apply_dark_class,
};
use crate::state::{AppRoute, ThemeStore};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

// Injected services (so pages can reach the API, clipboard and router without prop drilling)
#[derive(Clone)]
pub struct AppServices {
    pub config: Rc<AppConfig>,
    pub api: Rc<dyn ProfileApi>,
    pub clipboard: Rc<dyn Clipboard>,
    pub navigate: Callback<AppRoute>,
}

impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
            && Rc::ptr_eq(&self.api, &other.api)
            && Rc::ptr_eq(&self.clipboard, &other.clipboard)
            && self.navigate == other.navigate
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let route = use_state(AppRoute::current);
    let dark = use_state(|| false);
    let theme = use_mut_ref(|| None::<ThemeStore>);

    let services = {
        let route = route.clone();
        let config = props.config.clone();
        use_memo((), move |_| AppServices {
            api: Rc::new(HttpProfileApi::new((*config).clone())),
            clipboard: Rc::new(BrowserClipboard),
            config,
            navigate: Callback::from(move |next: AppRoute| {
                next.push();
                route.set(next);
            }),
        })
    };

    // Load the theme preference, then follow OS color-scheme changes
    {
        let dark = dark.clone();
        let theme = theme.clone();
        use_effect_with((), move |_| {
            let signal = MediaQueryThemeSignal::new();
            let store = ThemeStore::load(Box::new(LocalStorageStore), &signal);
            dark.set(store.is_dark());
            *theme.borrow_mut() = Some(store);
            let subscription = {
                let theme = theme.clone();
                signal.subscribe(Box::new(move |matches| {
                    if let Some(store) = theme.borrow_mut().as_mut() {
                        store.apply_signal(matches);
                    }
                    dark.set(matches);
                }))
            };
            move || drop(subscription)
        });
    }
    use_effect_with(*dark, |dark| {
        apply_dark_class(*dark);
        || ()
    });

    // Back/forward buttons
    {
        let route = route.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|win| {
                let closure = Closure::<dyn Fn(web_sys::PopStateEvent)>::new(
                    move |_: web_sys::PopStateEvent| route.set(AppRoute::current()),
                );
                let handler = closure.as_ref().unchecked_ref();
                if let Err(e) = win.add_event_listener_with_callback("popstate", handler) {
                    log::warn!("popstate listener not installed: {:?}", e);
                }
                (win, closure)
            });
            move || {
                if let Some((win, closure)) = listener {
                    let handler = closure.as_ref().unchecked_ref();
                    let _ = win.remove_event_listener_with_callback("popstate", handler);
                }
            }
        });
    }

    let toggle_theme = {
        let theme = theme.clone();
        let dark = dark.clone();
        Callback::from(move |_: ()| {
            if let Some(store) = theme.borrow_mut().as_mut() {
                dark.set(store.toggle());
            }
        })
    };

    let content = match &*route {
        AppRoute::Home => html! { <Home /> },
        AppRoute::Create => html! { <CreateProfile /> },
        AppRoute::Profile { id } => html! { <ProfileView id={id.clone()} /> },
        AppRoute::NotFound => html! { <NotFound /> },
    };

    html! {
        <ContextProvider<AppServices> context={(*services).clone()}>
            <div class="page">
                <Header dark={*dark} on_toggle_theme={toggle_theme} />
                <main class="container">{ content }</main>
            </div>
        </ContextProvider<AppServices>>
    }
}
