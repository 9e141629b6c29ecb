use crate::shared::list_utils::{get_sort_class, get_sort_indicator};
use leptos::prelude::*;
use thaw::*;

/// Clickable table header showing the sort direction (▲▼) of its column.
///
/// ```rust,ignore
/// <SortableHeaderCell
///     label="Username"
///     sort_field="username"
///     current_sort_field=Signal::derive(move || state.with(|s| s.sort_field.clone()))
///     sort_ascending=Signal::derive(move || state.with(|s| s.sort_ascending))
///     on_sort=Callback::new(move |field: String| toggle_sort(field))
/// />
/// ```
#[component]
pub fn SortableHeaderCell(
    label: &'static str,
    sort_field: &'static str,
    #[prop(into)]
    current_sort_field: Signal<String>,
    #[prop(into)]
    sort_ascending: Signal<bool>,
    on_sort: Callback<String>,
    #[prop(optional, default = 100.0)]
    min_width: f64,
) -> impl IntoView {
    view! {
        <TableHeaderCell resizable=false min_width=min_width>
            <div
                class="table__sortable-header"
                style="cursor: pointer;"
                on:click=move |_| on_sort.run(sort_field.to_string())
            >
                {label}
                <span class=move || get_sort_class(&current_sort_field.get(), sort_field)>
                    {move || get_sort_indicator(&current_sort_field.get(), sort_field, sort_ascending.get())}
                </span>
            </div>
        </TableHeaderCell>
    }
}
