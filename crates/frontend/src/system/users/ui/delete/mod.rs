use contracts::system::users::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::async_action::{dispatch_logged, AsyncCallback};
use crate::shared::icons::icon;
use crate::shared::modal_frame::ModalFrame;

/// Runs the confirm action unless a delete is already in flight.
/// A rejection is logged and swallowed.
pub async fn confirm_delete(is_loading: bool, on_confirm: &AsyncCallback<()>) -> bool {
    dispatch_logged(is_loading, on_confirm, (), "Error deleting user").await
}

pub fn confirmation_text(user: &User) -> String {
    format!(
        "Are you sure you want to delete \"{}\"? This action cannot be undone.",
        user.display_name()
    )
}

#[component]
pub fn DeleteUserDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] user: Signal<Option<User>>,
    on_close: Callback<()>,
    on_confirm: AsyncCallback<()>,
    #[prop(into)] is_loading: Signal<bool>,
) -> impl IntoView {
    let on_confirm = StoredValue::new_local(on_confirm);

    let handle_confirm = move |_| {
        let busy = is_loading.get_untracked();
        let action = on_confirm.get_value();
        spawn_local(async move {
            confirm_delete(busy, &action).await;
        });
    };

    move || {
        user.get().filter(|_| open.get()).map(|user| {
            view! {
                <ModalFrame
                    on_close=on_close
                    title=Signal::derive(|| "Delete user".to_string())
                    modal_class="user-delete-dialog"
                >
                    <div class="alert alert--warning">
                        {icon("alert-triangle")}
                        <span>{confirmation_text(&user)}</span>
                    </div>

                    <div class="modal-footer">
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| on_close.run(())
                            disabled=is_loading
                        >
                            "Cancel"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Primary
                            class="button--danger"
                            on_click=handle_confirm
                            disabled=is_loading
                        >
                            {move || if is_loading.get() {
                                view! { {icon("loader")} " Deleting..." }.into_any()
                            } else {
                                view! { {icon("trash")} " Delete" }.into_any()
                            }}
                        </Button>
                    </div>
                </ModalFrame>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::async_action::async_callback;
    use std::cell::Cell;
    use std::rc::Rc;

    fn user(full_name: Option<&str>) -> User {
        serde_json::from_value(serde_json::json!({
            "id": 5,
            "username": "cashier_01",
            "email": "c@store.com",
            "fullName": full_name,
            "roleId": 2,
            "roleName": "pos",
            "isActive": true,
            "createdAt": "2024-01-01T00:00:00"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_confirm_delete_swallows_rejection() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let rejecting: AsyncCallback<()> = async_callback(move |_| {
            let counter = counter.clone();
            async move {
                counter.set(counter.get() + 1);
                Err("Failed to delete user: Forbidden".to_string())
            }
        });

        assert!(!confirm_delete(false, &rejecting).await);
        assert_eq!(calls.get(), 1);

        let accepting: AsyncCallback<()> = async_callback(|_| async { Ok(()) });
        assert!(confirm_delete(false, &accepting).await);
    }

    #[tokio::test]
    async fn test_confirm_ignored_while_deleting() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let on_confirm: AsyncCallback<()> = async_callback(move |_| {
            let counter = counter.clone();
            async move {
                counter.set(counter.get() + 1);
                Ok(())
            }
        });

        assert!(!confirm_delete(true, &on_confirm).await);
        assert!(!confirm_delete(true, &on_confirm).await);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_confirmation_names_user() {
        assert!(confirmation_text(&user(Some("Sara Ali"))).contains("\"Sara Ali\""));
        assert!(confirmation_text(&user(None)).contains("\"cashier_01\""));
    }
}
