mod state;

pub use state::{StatusFilter, UsersListState, UsersQuery};

use contracts::system::users::{ChangePasswordDto, Role, User, UsersSummary};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::async_action::async_callback;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::table::SortableHeaderCell;
use crate::shared::date_utils::format_short_datetime;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use crate::system::users::api::users_api;
use crate::system::users::ui::delete::DeleteUserDialog;
use crate::system::users::ui::details::{badge_view, role_badge, status_badge, UserDetailsDialog};
use crate::system::users::ui::form::{UserFormDialog, UserPayload};
use crate::system::users::ui::password::ChangePasswordDialog;
use state::{create_state, PAGE_SIZE_OPTIONS};

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|win| win.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Users management page: summary, filters, table and every user dialog.
#[component]
pub fn UsersPage() -> impl IntoView {
    let (_, set_auth_state) = use_auth();
    let state = create_state();
    let all_users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let summary: RwSignal<Option<UsersSummary>> = RwSignal::new(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    // Responses of superseded list requests are dropped.
    let request_seq = StoredValue::new(0u64);

    // Dialog state
    let form_open = RwSignal::new(false);
    let form_user: RwSignal<Option<User>> = RwSignal::new(None);
    let form_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);
    let details_user: RwSignal<Option<User>> = RwSignal::new(None);
    let delete_target: RwSignal<Option<User>> = RwSignal::new(None);
    let deleting = RwSignal::new(false);
    let password_user: RwSignal<Option<User>> = RwSignal::new(None);
    let password_error: RwSignal<Option<String>> = RwSignal::new(None);
    let changing_password = RwSignal::new(false);
    let busy_row: RwSignal<Option<i64>> = RwSignal::new(None);

    let refresh_view = move || {
        all_users.with_untracked(|all| state.update(|s| s.rebuild(all)));
    };

    let load_users = move || {
        let query = state.with_untracked(|s| s.query());
        let seq = request_seq.get_value() + 1;
        request_seq.set_value(seq);
        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            let result = query.fetch(&users_api()).await;
            if request_seq.get_value() != seq {
                return;
            }
            match result {
                Ok(users) => {
                    all_users.set(users);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => {
                    log::error!("Failed to load users: {}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    let load_summary = move || {
        spawn_local(async move {
            match users_api().get_users_summary().await {
                Ok(data) => summary.set(Some(data)),
                Err(e) => log::warn!("Failed to load users summary: {}", e),
            }
        });
    };

    let reload = move || {
        load_users();
        load_summary();
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            reload();
        }
    });

    let search_signal = RwSignal::new(String::new());

    let apply_filters = move || {
        state.update(|s| {
            s.search_query = search_signal.get_untracked();
            s.page = 0;
        });
        load_users();
    };

    let reset_filters = move || {
        search_signal.set(String::new());
        state.update(|s| s.reset_filters());
        load_users();
    };

    let toggle_sort = move |field: String| {
        state.update(|s| s.toggle_sort(&field));
        refresh_view();
    };

    let go_to_page = move |page: usize| {
        state.update(|s| s.page = page);
        refresh_view();
    };

    let change_page_size = move |size: usize| {
        state.update(|s| s.set_page_size(size));
        refresh_view();
    };

    // Form dialog
    let open_create = move || {
        form_error.set(None);
        form_user.set(None);
        form_open.set(true);
    };
    let open_edit = move |user: User| {
        form_error.set(None);
        form_user.set(Some(user));
        form_open.set(true);
    };
    let close_form = Callback::new(move |_| {
        form_open.set(false);
        form_user.set(None);
    });

    let on_save = async_callback(move |payload: UserPayload| async move {
        saving.set(true);
        form_error.set(None);
        let api = users_api();
        let result = match payload {
            UserPayload::Create(dto) => api.create_user(&dto).await.map(|_| ()),
            UserPayload::Update { id, dto } => api.update_user(id, &dto).await.map(|_| ()),
        };
        saving.set(false);

        match result {
            Ok(()) => {
                form_open.set(false);
                form_user.set(None);
                reload();
                Ok(())
            }
            Err(e) => {
                form_error.set(Some(e.to_string()));
                Err(e.to_string())
            }
        }
    });

    // Delete dialog
    let close_delete = Callback::new(move |_| delete_target.set(None));
    let on_delete = async_callback(move |_: ()| async move {
        let Some(user) = delete_target.get_untracked() else {
            return Ok(());
        };
        deleting.set(true);
        let result = users_api().delete_user(user.id).await;
        deleting.set(false);

        match result {
            Ok(()) => {
                delete_target.set(None);
                set_notice.set(Some(format!("User \"{}\" was deleted", user.display_name())));
                reload();
                Ok(())
            }
            Err(e) => {
                set_error.set(Some(e.to_string()));
                Err(e.to_string())
            }
        }
    });

    // Password dialog
    let close_password = Callback::new(move |_| {
        password_user.set(None);
        password_error.set(None);
    });
    let on_change_password = async_callback(move |dto: ChangePasswordDto| async move {
        let Some(user) = password_user.get_untracked() else {
            return Ok(());
        };
        changing_password.set(true);
        password_error.set(None);
        let result = users_api().change_password(user.id, &dto).await;
        changing_password.set(false);

        match result {
            Ok(()) => {
                password_user.set(None);
                set_notice.set(Some(format!("Password changed for \"{}\"", user.username)));
                Ok(())
            }
            Err(e) => {
                password_error.set(Some(e.to_string()));
                Err(e.to_string())
            }
        }
    });

    // Row actions without a dialog
    let toggle_active = Callback::new(move |user: User| {
        if busy_row.get_untracked().is_some() {
            return;
        }
        busy_row.set(Some(user.id));
        set_error.set(None);
        spawn_local(async move {
            let api = users_api();
            let result = if user.is_active {
                api.deactivate_user(user.id).await
            } else {
                api.activate_user(user.id).await
            };
            busy_row.set(None);
            match result {
                Ok(()) => reload(),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    });

    let reset_password = Callback::new(move |user: User| {
        if busy_row.get_untracked().is_some() {
            return;
        }
        if !confirm(&format!(
            "Reset the password of \"{}\" to the default password?",
            user.username
        )) {
            return;
        }
        busy_row.set(Some(user.id));
        set_error.set(None);
        spawn_local(async move {
            let result = users_api().reset_password(user.id).await;
            busy_row.set(None);
            match result {
                Ok(()) => set_notice.set(Some(format!("Password reset for \"{}\"", user.username))),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    });

    let current_sort_field = Signal::derive(move || state.with(|s| s.sort_field.clone()));
    let sort_ascending = Signal::derive(move || state.with(|s| s.sort_ascending));
    let on_sort = Callback::new(toggle_sort);

    let stat = move |pick: fn(&UsersSummary) -> i64| {
        Signal::derive(move || summary.with(|s| s.as_ref().map(pick)))
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("users")}
                    <h1 class="page__title">"Users"</h1>
                    <Badge>{move || state.with(|s| s.total_count.to_string())}</Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_create()>
                        {icon("user-plus")}
                        " Add user"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| do_logout(set_auth_state)>
                        {icon("log-out")}
                        " Sign out"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! {
                    <div class="alert alert--error">
                        {icon("alert-circle")}
                        <span>{e}</span>
                    </div>
                })}
                {move || notice.get().map(|n| view! {
                    <div class="alert alert--success">
                        <span>{n}</span>
                        <button class="button button--ghost button--icon" on:click=move |_| set_notice.set(None)>
                            {icon("x")}
                        </button>
                    </div>
                })}

                <div class="stat-cards">
                    <StatCard label="Total users" icon_name="users" value=stat(|s| s.total_users) />
                    <StatCard label="Active" icon_name="user-check" value=stat(|s| s.active_users) tone="success" />
                    <StatCard label="Inactive" icon_name="user-x" value=stat(|s| s.inactive_users) tone="warning" />
                    <StatCard label="New this month" icon_name="calendar" value=stat(|s| s.new_users_this_month) />
                    <StatCard label="Logged in today" icon_name="clock" value=stat(|s| s.users_logged_in_today) />
                </div>

                {move || summary.get().filter(|s| !s.role_distribution.is_empty()).map(|s| view! {
                    <div class="role-distribution">
                        <Label>"Role distribution"</Label>
                        {s.role_distribution
                            .into_iter()
                            .map(|r| {
                                let width = format!("width: {:.1}%;", r.percentage.clamp(0.0, 100.0));
                                view! {
                                    <div class="role-distribution__row">
                                        {badge_view(role_badge(&r.role_name))}
                                        <div class="role-distribution__bar">
                                            <div class="role-distribution__fill" style=width></div>
                                        </div>
                                        <span class="role-distribution__value">
                                            {format!("{} ({:.1}%)", r.user_count, r.percentage)}
                                        </span>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("search")}
                            <span class="filter-panel__title">"Filters"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.with(|s| s.page))
                                total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                                total_count=Signal::derive(move || state.with(|s| s.total_count))
                                page_size=Signal::derive(move || state.with(|s| s.page_size))
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
                                page_size_options=PAGE_SIZE_OPTIONS.to_vec()
                            />
                        </div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search_signal placeholder="Username, name or email..." />
                            </div>
                            <select
                                class="form__select"
                                prop:value=move || state.with(|s| s.status_filter.key())
                                on:change=move |ev| {
                                    let filter = StatusFilter::from_key(&event_target_value(&ev));
                                    state.update(|s| {
                                        s.status_filter = filter;
                                        s.page = 0;
                                    });
                                    load_users();
                                }
                            >
                                {StatusFilter::ALL
                                    .into_iter()
                                    .map(|f| view! { <option value=f.key()>{f.label()}</option> })
                                    .collect_view()}
                            </select>
                            <select
                                class="form__select"
                                prop:value=move || state.with(|s| {
                                    s.role_filter.map(|r| r.id().to_string()).unwrap_or_default()
                                })
                                on:change=move |ev| {
                                    let role = event_target_value(&ev).parse::<i32>().ok().and_then(Role::from_id);
                                    state.update(|s| {
                                        s.role_filter = role;
                                        s.page = 0;
                                    });
                                    load_users();
                                }
                            >
                                <option value="">"All roles"</option>
                                {Role::ALL
                                    .into_iter()
                                    .map(|r| view! { <option value=r.id().to_string()>{r.label()}</option> })
                                    .collect_view()}
                            </select>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| apply_filters()
                                disabled=Signal::derive(move || loading.get())
                            >
                                "Search"
                            </Button>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset_filters()>
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortableHeaderCell label="Username" sort_field="username" current_sort_field=current_sort_field sort_ascending=sort_ascending on_sort=on_sort min_width=140.0 />
                                <SortableHeaderCell label="Full name" sort_field="full_name" current_sort_field=current_sort_field sort_ascending=sort_ascending on_sort=on_sort min_width=160.0 />
                                <SortableHeaderCell label="Email" sort_field="email" current_sort_field=current_sort_field sort_ascending=sort_ascending on_sort=on_sort min_width=180.0 />
                                <SortableHeaderCell label="Role" sort_field="role" current_sort_field=current_sort_field sort_ascending=sort_ascending on_sort=on_sort min_width=120.0 />
                                <SortableHeaderCell label="Status" sort_field="is_active" current_sort_field=current_sort_field sort_ascending=sort_ascending on_sort=on_sort min_width=90.0 />
                                <SortableHeaderCell label="Created" sort_field="created_at" current_sort_field=current_sort_field sort_ascending=sort_ascending on_sort=on_sort min_width=130.0 />
                                <SortableHeaderCell label="Last login" sort_field="last_login_at" current_sort_field=current_sort_field sort_ascending=sort_ascending on_sort=on_sort min_width=130.0 />
                                <TableHeaderCell resizable=false min_width=220.0>"Actions"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <Show when=move || state.with(|s| s.is_loaded && s.items.is_empty()) && !loading.get()>
                                <TableRow>
                                    <TableCell attr:colspan="8">
                                        <TableCellLayout>"No users found"</TableCellLayout>
                                    </TableCell>
                                </TableRow>
                            </Show>
                            <For
                                each=move || state.with(|s| s.items.clone())
                                key=|u| (u.id, u.is_active, u.email.clone(), u.role_id, u.full_name.clone())
                                children=move |user| {
                                    let user_id = user.id;
                                    let row_busy = Signal::derive(move || busy_row.get() == Some(user_id));
                                    let created = format_short_datetime(&user.created_at);
                                    let last_login = user
                                        .last_login_at
                                        .as_deref()
                                        .map(format_short_datetime)
                                        .unwrap_or_else(|| "-".to_string());
                                    let (toggle_icon, toggle_title) = if user.is_active {
                                        ("user-x", "Deactivate")
                                    } else {
                                        ("user-check", "Activate")
                                    };
                                    let for_details = user.clone();
                                    let for_edit = user.clone();
                                    let for_toggle = user.clone();
                                    let for_password = user.clone();
                                    let for_reset = user.clone();
                                    let for_delete = user.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{user.username.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {user.full_name.clone().unwrap_or_default()}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{user.email.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{badge_view(role_badge(&user.role_name))}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{badge_view(status_badge(user.is_active))}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{created}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{last_login}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Flex gap=FlexGap::Small>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| details_user.set(Some(for_details.clone()))
                                                        attr:title="Details"
                                                    >
                                                        {icon("eye")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| open_edit(for_edit.clone())
                                                        attr:title="Edit"
                                                    >
                                                        {icon("edit")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| toggle_active.run(for_toggle.clone())
                                                        disabled=row_busy
                                                        attr:title=toggle_title
                                                    >
                                                        {icon(toggle_icon)}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| {
                                                            password_error.set(None);
                                                            password_user.set(Some(for_password.clone()));
                                                        }
                                                        attr:title="Change password"
                                                    >
                                                        {icon("key")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| reset_password.run(for_reset.clone())
                                                        disabled=row_busy
                                                        attr:title="Reset password"
                                                    >
                                                        {icon("rotate-ccw")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| delete_target.set(Some(for_delete.clone()))
                                                        attr:title="Delete"
                                                    >
                                                        {icon("trash")}
                                                    </Button>
                                                </Flex>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>

            <UserFormDialog
                open=form_open
                user=form_user
                on_close=close_form
                on_save=on_save
                is_loading=saving
                error=form_error
            />
            <UserDetailsDialog
                open=Signal::derive(move || details_user.with(Option::is_some))
                user=details_user
                on_close=Callback::new(move |_| details_user.set(None))
            />
            <DeleteUserDialog
                open=Signal::derive(move || delete_target.with(Option::is_some))
                user=delete_target
                on_close=close_delete
                on_confirm=on_delete
                is_loading=deleting
            />
            <ChangePasswordDialog
                open=Signal::derive(move || password_user.with(Option::is_some))
                user=password_user
                on_close=close_password
                on_save=on_change_password
                is_loading=changing_password
                error=password_error
            />
        </div>
    }
}
