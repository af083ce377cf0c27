use crate::constants::{BUILTIN_PRESETS, OPTION_KV_SEPARATOR, PRESET_DELETED};

/// A single `key=value` filter criterion, kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterOption {
    value: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Split on the first `=` and lowercase both halves.
    ///
    /// Returns `None` for options that cannot filter anything: no `=`,
    /// or an empty key or value.
    pub fn criterion(&self) -> Option<(String, String)> {
        let (key, value) = self.value.split_once(OPTION_KV_SEPARATOR)?;
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some((key.to_lowercase(), value.to_lowercase()))
    }
}

impl From<&str> for FilterOption {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A named alert view with the options it starts out with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub options: Vec<FilterOption>,
}

impl Preset {
    pub fn new(name: impl Into<String>, options: Vec<FilterOption>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// The presets every installation has, without options.
    pub fn builtin() -> Vec<Preset> {
        BUILTIN_PRESETS
            .iter()
            .map(|name| Preset::new(*name, Vec::new()))
            .collect()
    }

    /// Row checkboxes are offered everywhere except in the deleted view.
    pub fn shows_checkboxes(&self) -> bool {
        self.name != PRESET_DELETED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_lowercases_both_sides() {
        let opt = FilterOption::new("Severity=HIGH");
        assert_eq!(
            opt.criterion(),
            Some(("severity".to_string(), "high".to_string()))
        );
    }

    #[test]
    fn criterion_splits_on_first_separator() {
        let opt = FilterOption::new("url=https://x?a=b");
        assert_eq!(
            opt.criterion(),
            Some(("url".to_string(), "https://x?a=b".to_string()))
        );
    }

    #[test]
    fn criterion_rejects_malformed() {
        assert_eq!(FilterOption::new("severity").criterion(), None);
        assert_eq!(FilterOption::new("=high").criterion(), None);
        assert_eq!(FilterOption::new("severity=").criterion(), None);
        assert_eq!(FilterOption::new("").criterion(), None);
    }

    #[test]
    fn builtin_presets_in_order() {
        let names: Vec<String> = Preset::builtin().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Feed", "Deleted", "Groups"]);
    }

    #[test]
    fn deleted_preset_hides_checkboxes() {
        assert!(!Preset::new("Deleted", vec![]).shows_checkboxes());
        assert!(Preset::new("Feed", vec![]).shows_checkboxes());
        assert!(Preset::new("deleted", vec![]).shows_checkboxes());
    }
}
