use contracts::system::users::{Role, User};
use leptos::prelude::*;
use thaw::*;

use crate::shared::date_utils::format_long_datetime;
use crate::shared::icons::icon;
use crate::shared::modal_frame::ModalFrame;

/// Avatar text: first letter of every word of the full name, or of the username.
pub fn user_initials(full_name: Option<&str>, username: &str) -> String {
    let source = full_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(username);

    source
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSpec {
    pub label: &'static str,
    /// CSS modifier, rendered as `badge--{variant}`.
    pub variant: &'static str,
    pub icon: &'static str,
}

impl BadgeSpec {
    pub fn class(&self) -> String {
        format!("badge badge--{}", self.variant)
    }
}

pub fn role_badge(role_name: &str) -> BadgeSpec {
    match Role::from_name(role_name) {
        Some(Role::Admin) => BadgeSpec {
            label: Role::Admin.label(),
            variant: "warning",
            icon: "shield",
        },
        _ => BadgeSpec {
            label: Role::Pos.label(),
            variant: "primary",
            icon: "user",
        },
    }
}

pub fn status_badge(is_active: bool) -> BadgeSpec {
    if is_active {
        BadgeSpec {
            label: "Active",
            variant: "success",
            icon: "user-check",
        }
    } else {
        BadgeSpec {
            label: "Inactive",
            variant: "neutral",
            icon: "user-x",
        }
    }
}

/// Renders a [`BadgeSpec`] the same way in the table and in dialogs.
pub fn badge_view(spec: BadgeSpec) -> impl IntoView {
    view! {
        <span class=spec.class()>
            {icon(spec.icon)}
            <span>{spec.label}</span>
        </span>
    }
}

/// Read-only view of one user.
#[component]
pub fn UserDetailsDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] user: Signal<Option<User>>,
    on_close: Callback<()>,
) -> impl IntoView {
    let shown = move || user.get().filter(|_| open.get());

    move || {
        shown().map(|user| {
            let initials = user_initials(user.full_name.as_deref(), &user.username);
            let role_label = Role::from_name(&user.role_name)
                .map(|r| r.label().to_string())
                .unwrap_or_else(|| user.role_name.clone());
            let created = format_long_datetime(&user.created_at);
            let last_login = user.last_login_at.as_deref().map(format_long_datetime);
            let permissions = user.permissions.clone();

            view! {
                <ModalFrame
                    on_close=on_close
                    title=Signal::derive(|| "User details".to_string())
                    modal_class="user-details-dialog"
                >
                    <div class="user-details__header">
                        <div class="user-details__avatar">{initials}</div>
                        <div class="user-details__identity">
                            <h3 class="user-details__name">{user.display_name().to_string()}</h3>
                            <div class="user-details__email">
                                {icon("mail")}
                                <span>{user.email.clone()}</span>
                            </div>
                            <div class="user-details__badges">
                                {badge_view(role_badge(&user.role_name))}
                                {badge_view(status_badge(user.is_active))}
                            </div>
                        </div>
                    </div>

                    <div class="user-details__grid">
                        {user.phone_number.clone().map(|phone| view! {
                            <DetailRow icon_name="phone" label="Phone number" value=phone />
                        })}
                        <DetailRow icon_name="user" label="Username" value=user.username.clone() />
                        <DetailRow icon_name="shield" label="Role" value=role_label />
                        <DetailRow icon_name="calendar" label="Created" value=created />
                        {last_login.map(|value| view! {
                            <DetailRow icon_name="clock" label="Last login" value=value />
                        })}
                    </div>

                    {(!permissions.is_empty()).then(|| view! {
                        <div class="user-details__permissions">
                            <Label>"Permissions"</Label>
                            <Flex gap=FlexGap::Small style="flex-wrap: wrap;">
                                {permissions
                                    .into_iter()
                                    .map(|p| view! { <Badge>{p}</Badge> })
                                    .collect_view()}
                            </Flex>
                        </div>
                    })}

                    <div class="modal-footer">
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| on_close.run(())
                        >
                            "Close"
                        </Button>
                    </div>
                </ModalFrame>
            }
        })
    }
}

#[component]
fn DetailRow(icon_name: &'static str, label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="user-details__row">
            <span class="user-details__row-icon">{icon(icon_name)}</span>
            <span class="user-details__row-label">{label}</span>
            <span class="user-details__row-value">{value}</span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_initials() {
        assert_eq!(user_initials(Some("Ali Hassan"), "ali99"), "AH");
        assert_eq!(user_initials(None, "ali99"), "A");
        assert_eq!(user_initials(Some("   "), "ali99"), "A");
        assert_eq!(user_initials(Some("mohammed  al  saud"), "m"), "MAS");
    }

    #[test]
    fn test_role_badge_matches_case_insensitively() {
        assert_eq!(role_badge("Admin"), role_badge("admin"));
        assert_eq!(role_badge("ADMIN").variant, "warning");
        assert_eq!(role_badge("pos").label, Role::Pos.label());
        assert_eq!(role_badge("cashier").label, Role::Pos.label());
    }

    #[test]
    fn test_status_badge() {
        assert_eq!(status_badge(true).label, "Active");
        assert_eq!(status_badge(false).class(), "badge badge--neutral");
    }
}
