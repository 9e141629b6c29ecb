use crate::shared::icons::icon;
use leptos::prelude::*;

/// Groups digits in threes with a non-breaking space.
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('\u{00a0}');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

#[component]
pub fn StatCard(
    /// Label displayed above the value
    label: &'static str,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    /// Value (None = loading/error)
    #[prop(into)]
    value: Signal<Option<i64>>,
    /// Modifier: "success", "error", "warning" or empty
    #[prop(optional)]
    tone: &'static str,
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let class = if tone.is_empty() {
        "stat-card".to_string()
    } else {
        format!("stat-card stat-card--{tone}")
    };

    view! {
        <div class=class>
            <div class="stat-card__header">
                <span class="stat-card__icon">{icon(icon_name)}</span>
                <span class="stat-card__label">{label}</span>
            </div>
            <div class="stat-card__value">
                {move || value.get().map(format_thousands).unwrap_or_else(|| "—".to_string())}
            </div>
            {move || subtitle.get().map(|s| view! { <div class="stat-card__subtitle">{s}</div> })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::format_thousands;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1234567), "1\u{00a0}234\u{00a0}567");
        assert_eq!(format_thousands(-1200), "-1\u{00a0}200");
    }
}
