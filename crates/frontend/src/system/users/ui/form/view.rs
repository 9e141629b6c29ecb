use contracts::system::users::{Role, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::state::{TextField, UserFormState, UserPayload};
use crate::shared::async_action::{run_logged, AsyncCallback};
use crate::shared::icons::icon;
use crate::shared::modal_frame::ModalFrame;

/// Create/edit dialog. The page owns the request and its error.
#[component]
pub fn UserFormDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] user: Signal<Option<User>>,
    on_close: Callback<()>,
    on_save: AsyncCallback<UserPayload>,
    #[prop(into)] is_loading: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let state = RwSignal::new(UserFormState::default());
    let on_save = StoredValue::new_local(on_save);

    // Re-initialise on every open and on every change of the edited user.
    Effect::new(move |_| {
        let is_open = open.get();
        let current = user.get();
        state.update(|s| s.sync(is_open, current.as_ref()));
    });

    let is_edit = Signal::derive(move || state.with(|s| s.is_edit_mode()));

    let handle_submit = move || {
        let busy = is_loading.get_untracked();
        let Some(payload) = state.try_update(|s| s.submit_unless_loading(busy)).flatten() else {
            return;
        };
        let action = on_save.get_value();
        spawn_local(async move {
            run_logged(&action, payload, "Error saving user").await;
        });
    };

    let title = Signal::derive(move || {
        if is_edit.get() {
            "Edit user".to_string()
        } else {
            "Add new user".to_string()
        }
    });

    view! {
        <Show when=move || open.get()>
            <ModalFrame on_close=on_close title=title modal_class="user-form-dialog">
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

                    <Show when=move || !is_edit.get()>
                        <FormTextField
                            state=state
                            field=TextField::Username
                            label="Username *"
                            input_type="text"
                            placeholder="e.g. cashier_01"
                            disabled=is_loading
                        />
                    </Show>

                    <FormTextField
                        state=state
                        field=TextField::Email
                        label="Email *"
                        input_type="email"
                        placeholder="name@example.com"
                        disabled=is_loading
                    />

                    <Show when=move || !is_edit.get()>
                        <FormTextField
                            state=state
                            field=TextField::Password
                            label="Password *"
                            input_type="password"
                            placeholder="At least 6 characters"
                            disabled=is_loading
                        />
                    </Show>

                    <FormTextField
                        state=state
                        field=TextField::FullName
                        label="Full name"
                        input_type="text"
                        placeholder=""
                        disabled=is_loading
                    />

                    <FormTextField
                        state=state
                        field=TextField::PhoneNumber
                        label="Phone number"
                        input_type="tel"
                        placeholder="+966 50 000 0000"
                        disabled=is_loading
                    />

                    <div class="form__group">
                        <label class="form__label" for="user-form-role">"Role"</label>
                        <select
                            id="user-form-role"
                            class="form__select"
                            prop:value=move || state.with(|s| s.draft.role_id.to_string())
                            disabled=move || is_loading.get()
                            on:change=move |ev| {
                                if let Ok(id) = event_target_value(&ev).parse::<i32>() {
                                    state.update(|s| s.set_role(id));
                                }
                            }
                        >
                            {Role::ALL
                                .iter()
                                .map(|role| view! {
                                    <option value=role.id().to_string()>{role.label()}</option>
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="form__group form__group--inline">
                        <label class="form__checkbox">
                            <input
                                type="checkbox"
                                prop:checked=move || state.with(|s| s.draft.is_active)
                                disabled=move || is_loading.get()
                                on:change=move |ev| {
                                    let checked = event_target_checked(&ev);
                                    state.update(|s| s.set_active(checked));
                                }
                            />
                            " Active account"
                        </label>
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
                            on_click=move |_| handle_submit()
                            disabled=is_loading
                        >
                            {move || if is_loading.get() {
                                view! { {icon("loader")} " Saving..." }.into_any()
                            } else if is_edit.get() {
                                view! { {icon("edit")} " Save changes" }.into_any()
                            } else {
                                view! { {icon("user-plus")} " Add user" }.into_any()
                            }}
                        </Button>
                    </div>
                </form>
            </ModalFrame>
        </Show>
    }
}

#[component]
fn FormTextField(
    state: RwSignal<UserFormState>,
    field: TextField,
    label: &'static str,
    input_type: &'static str,
    placeholder: &'static str,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let error = move || state.with(|s| s.errors.get(field).map(str::to_string));
    let id = format!("user-form-{:?}", field).to_lowercase();

    view! {
        <div class="form__group">
            <label class="form__label" for=id.clone()>{label}</label>
            <input
                id=id
                type=input_type
                placeholder=placeholder
                class=move || if error().is_some() { "form__input form__input--error" } else { "form__input" }
                prop:value=move || state.with(|s| s.draft.text(field).to_string())
                disabled=move || disabled.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    state.update(|s| s.set_field(field, value));
                }
            />
            {move || error().map(|e| view! { <span class="form__error">{e}</span> })}
        </div>
    }
}
