use contracts::system::users::{ChangePasswordDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::async_action::{run_logged, should_dispatch, AsyncCallback};
use crate::shared::icons::icon;
use crate::shared::modal_frame::ModalFrame;
use crate::system::users::ui::form::validation::{
    FieldErrors, PASSWORD_MIN_LEN, PASSWORD_TOO_SHORT,
};

pub const CURRENT_REQUIRED: &str = "Current password is required";
pub const NEW_REQUIRED: &str = "New password is required";
pub const CONFIRM_MISMATCH: &str = "Passwords do not match";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordField {
    Current,
    New,
    Confirm,
}

pub fn validate_password_change(dto: &ChangePasswordDto) -> FieldErrors<PasswordField> {
    let mut errors = FieldErrors::default();

    if dto.current_password.trim().is_empty() {
        errors.set(PasswordField::Current, CURRENT_REQUIRED);
    }
    if dto.new_password.trim().is_empty() {
        errors.set(PasswordField::New, NEW_REQUIRED);
    } else if dto.new_password.chars().count() < PASSWORD_MIN_LEN {
        errors.set(PasswordField::New, PASSWORD_TOO_SHORT);
    }
    if dto.confirm_password != dto.new_password {
        errors.set(PasswordField::Confirm, CONFIRM_MISMATCH);
    }

    errors
}

/// Change-password dialog for one user. `on_save` performs the request.
#[component]
pub fn ChangePasswordDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] user: Signal<Option<User>>,
    on_close: Callback<()>,
    on_save: AsyncCallback<ChangePasswordDto>,
    #[prop(into)] is_loading: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let dto = RwSignal::new(ChangePasswordDto::default());
    let errors = RwSignal::new(FieldErrors::<PasswordField>::default());
    let on_save = StoredValue::new_local(on_save);

    Effect::new(move |_| {
        open.track();
        user.track();
        dto.set(ChangePasswordDto::default());
        errors.set(FieldErrors::default());
    });

    let handle_submit = move || {
        if !should_dispatch(is_loading.get_untracked()) {
            return;
        }
        let value = dto.get_untracked();
        let found = validate_password_change(&value);
        let valid = found.is_empty();
        errors.set(found);
        if !valid {
            return;
        }
        let action = on_save.get_value();
        spawn_local(async move {
            run_logged(&action, value, "Error changing password").await;
        });
    };

    let field = move |which: PasswordField, label: &'static str| {
        let error = move || errors.with(|e| e.get(which).map(str::to_string));
        let current = move || {
            dto.with(|d| match which {
                PasswordField::Current => d.current_password.clone(),
                PasswordField::New => d.new_password.clone(),
                PasswordField::Confirm => d.confirm_password.clone(),
            })
        };
        view! {
            <div class="form__group">
                <label class="form__label">{label}</label>
                <input
                    type="password"
                    class=move || if error().is_some() { "form__input form__input--error" } else { "form__input" }
                    prop:value=current
                    disabled=move || is_loading.get()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        dto.update(|d| match which {
                            PasswordField::Current => d.current_password = value,
                            PasswordField::New => d.new_password = value,
                            PasswordField::Confirm => d.confirm_password = value,
                        });
                        errors.update(|e| e.clear(which));
                    }
                />
                {move || error().map(|e| view! { <span class="form__error">{e}</span> })}
            </div>
        }
    };

    move || {
        user.get().filter(|_| open.get()).map(|user| {
            let title = format!("Change password: {}", user.username);
            view! {
                <ModalFrame
                    on_close=on_close
                    title=Signal::derive(move || title.clone())
                    modal_class="user-password-dialog"
                >
                    <form
                        class="form"
                        on:submit=move |ev| {
                            ev.prevent_default();
                            handle_submit();
                        }
                    >
                        {move || error.get().map(|e| view! {
                            <div class="alert alert--error">
                                {icon("alert-circle")}
                                <span>{e}</span>
                            </div>
                        })}

                        {field(PasswordField::Current, "Current password *")}
                        {field(PasswordField::New, "New password *")}
                        {field(PasswordField::Confirm, "Confirm new password *")}

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
                                on_click=move |_| handle_submit()
                                disabled=is_loading
                            >
                                {move || if is_loading.get() {
                                    view! { {icon("loader")} " Saving..." }.into_any()
                                } else {
                                    view! { {icon("key")} " Change password" }.into_any()
                                }}
                            </Button>
                        </div>
                    </form>
                </ModalFrame>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(current: &str, new: &str, confirm: &str) -> ChangePasswordDto {
        ChangePasswordDto {
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_change() {
        assert!(validate_password_change(&dto("old-pass", "secret1", "secret1")).is_empty());
    }

    #[test]
    fn test_empty_dto_flags_required_fields() {
        let errors = validate_password_change(&ChangePasswordDto::default());
        assert_eq!(errors.get(PasswordField::Current), Some(CURRENT_REQUIRED));
        assert_eq!(errors.get(PasswordField::New), Some(NEW_REQUIRED));
        assert_eq!(errors.get(PasswordField::Confirm), None);
    }

    #[test]
    fn test_short_and_mismatched() {
        let errors = validate_password_change(&dto("old", "abc", "abd"));
        assert_eq!(errors.get(PasswordField::New), Some(PASSWORD_TOO_SHORT));
        assert_eq!(errors.get(PasswordField::Confirm), Some(CONFIRM_MISMATCH));
        assert_eq!(errors.len(), 2);
    }
}
