use leptos::prelude::*;

use super::context::use_auth;

/// Renders children only when a token is present
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().is_authenticated()
            fallback=|| view! { <div class="alert alert--warning">"Not authenticated. Please sign in."</div> }
        >
            {children()}
        </Show>
    }
}
