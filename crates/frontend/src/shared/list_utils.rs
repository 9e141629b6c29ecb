//! Sorting helpers shared by list pages
use std::cmp::Ordering;

/// Trait for rows that can be sorted by a named column
pub trait Sortable {
    /// Compare two rows by the given column
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Stable sort by column and direction
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending { cmp } else { cmp.reverse() }
    });
}

/// Header indicator for the sort column
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending { " ▲" } else { " ▼" }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Case-insensitive comparison of optional text, `None` sorting first
pub fn cmp_text_opt(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.unwrap_or("")
        .to_lowercase()
        .cmp(&b.unwrap_or("").to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row(&'static str, u32);

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "n" => self.1.cmp(&other.1),
                _ => self.0.cmp(other.0),
            }
        }
    }

    #[test]
    fn test_sort_list_both_directions() {
        let mut rows = vec![Row("b", 1), Row("a", 3), Row("c", 2)];
        sort_list(&mut rows, "n", true);
        assert_eq!(rows, vec![Row("b", 1), Row("c", 2), Row("a", 3)]);
        sort_list(&mut rows, "name", false);
        assert_eq!(rows, vec![Row("c", 2), Row("b", 1), Row("a", 3)]);
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("email", "email", true), " ▲");
        assert_eq!(get_sort_indicator("email", "email", false), " ▼");
        assert_eq!(get_sort_indicator("email", "username", true), " ⇅");
    }

    #[test]
    fn test_cmp_text_opt() {
        assert_eq!(cmp_text_opt(Some("Ali"), Some("ali")), Ordering::Equal);
        assert_eq!(cmp_text_opt(None, Some("a")), Ordering::Less);
    }
}
