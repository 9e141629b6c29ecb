use leptos::prelude::*;

use crate::shared::config::app_name;
use crate::system::auth::context::AuthProvider;
use crate::system::auth::guard::RequireAuth;
use crate::system::users::ui::list::UsersPage;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <AuthProvider>
            <div class="app">
                <header class="app__header">
                    <span class="app__title">{app_name()}</span>
                </header>
                <main class="app__main">
                    <RequireAuth>
                        <UsersPage />
                    </RequireAuth>
                </main>
            </div>
        </AuthProvider>
    }
}
