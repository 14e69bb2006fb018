//! Conversion between raw stored values and [`Settings`]
//!
//! Pattern lists are stored as newline-delimited strings, the way the
//! options form writes them.

use backsearch_core::*;
use serde_json::Value;
use std::collections::HashMap;

/// Raw values as returned by a settings store, keyed by storage name
pub type StoredValues = HashMap<String, Value>;

/// Split a newline-delimited value into trimmed, non-empty entries
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join entries back into the newline-delimited storage form
pub fn format_list(entries: &[String]) -> String {
    entries.join("\n")
}

/// Read a list setting; a missing or null key is an empty list
pub fn list_value(values: &StoredValues, key: SettingKey) -> Result<Vec<String>> {
    match values.get(key.as_str()) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) => Ok(parse_list(raw)),
        Some(other) => Err(invalid(key, format!("expected string, found {}", other))),
    }
}

/// Read a boolean setting, falling back to `default` when unset
pub fn bool_value(values: &StoredValues, key: SettingKey, default: bool) -> Result<bool> {
    match values.get(key.as_str()) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(invalid(key, format!("expected boolean, found {}", other))),
    }
}

/// Build settings from raw stored values
pub fn settings_from_values(values: &StoredValues) -> Result<Settings> {
    Ok(Settings {
        custom_search_patterns: list_value(values, SettingKey::CustomSearchPatterns)?,
        exclude_domains: list_value(values, SettingKey::ExcludeDomains)?,
        icon_click_enabled: bool_value(
            values,
            SettingKey::IconClickEnabled,
            DEFAULT_ICON_CLICK_ENABLED,
        )?,
    })
}

/// Build settings key by key, keeping `current`'s value for any key whose
/// stored value is invalid
///
/// Returns the merged settings and one error per rejected key.
pub fn merge_settings_from_values(
    values: &StoredValues,
    current: &Settings,
) -> (Settings, Vec<BackSearchError>) {
    let mut rejected = Vec::new();
    let mut keep = |result: Result<Vec<String>>, cached: &[String]| match result {
        Ok(list) => list,
        Err(e) => {
            rejected.push(e);
            cached.to_vec()
        }
    };

    let custom_search_patterns = keep(
        list_value(values, SettingKey::CustomSearchPatterns),
        &current.custom_search_patterns,
    );
    let exclude_domains = keep(
        list_value(values, SettingKey::ExcludeDomains),
        &current.exclude_domains,
    );
    let icon_click_enabled = match bool_value(
        values,
        SettingKey::IconClickEnabled,
        DEFAULT_ICON_CLICK_ENABLED,
    ) {
        Ok(flag) => flag,
        Err(e) => {
            rejected.push(e);
            current.icon_click_enabled
        }
    };

    (
        Settings {
            custom_search_patterns,
            exclude_domains,
            icon_click_enabled,
        },
        rejected,
    )
}

/// Convert settings into the values a store would hold
pub fn settings_to_values(settings: &Settings) -> Vec<(SettingKey, Value)> {
    vec![
        (
            SettingKey::CustomSearchPatterns,
            Value::String(format_list(&settings.custom_search_patterns)),
        ),
        (
            SettingKey::ExcludeDomains,
            Value::String(format_list(&settings.exclude_domains)),
        ),
        (
            SettingKey::IconClickEnabled,
            Value::Bool(settings.icon_click_enabled),
        ),
    ]
}

/// Check that `value` has the type expected for `key`
pub fn validate_value(key: SettingKey, value: &Value) -> Result<()> {
    let valid = match key {
        SettingKey::CustomSearchPatterns | SettingKey::ExcludeDomains => {
            matches!(value, Value::String(_) | Value::Null)
        }
        SettingKey::IconClickEnabled => matches!(value, Value::Bool(_) | Value::Null),
    };

    if valid {
        Ok(())
    } else {
        Err(invalid(key, format!("unexpected value {}", value)))
    }
}

fn invalid(key: SettingKey, reason: String) -> BackSearchError {
    SettingsError::InvalidValue {
        key: key.as_str().to_string(),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, Value)]) -> StoredValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_list_trims_and_drops_blank_lines() {
        assert_eq!(
            parse_list("  kagi.com/search \n\n\t\nsearx.example\r\n"),
            vec!["kagi.com/search", "searx.example"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_list_keeps_order_and_repeats() {
        assert_eq!(parse_list("b\na\nb"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_settings_from_empty_values() {
        let settings = settings_from_values(&StoredValues::new()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_from_values() {
        let settings = settings_from_values(&values(&[
            ("customSearchPatterns", json!("kagi.com/search\n")),
            ("excludeDomains", json!("images.google.com")),
            ("iconClickEnabled", json!(false)),
        ]))
        .unwrap();

        assert_eq!(settings.custom_search_patterns, vec!["kagi.com/search"]);
        assert_eq!(settings.exclude_domains, vec!["images.google.com"]);
        assert!(!settings.icon_click_enabled);
    }

    #[test]
    fn test_wrong_type_is_invalid_value() {
        let err = settings_from_values(&values(&[("excludeDomains", json!(42))])).unwrap_err();
        assert!(matches!(
            err,
            BackSearchError::Settings {
                source: SettingsError::InvalidValue { .. }
            }
        ));
    }

    #[test]
    fn test_merge_keeps_valid_keys_beside_an_invalid_one() {
        let current = Settings {
            exclude_domains: vec!["maps.google.com".to_string()],
            icon_click_enabled: false,
            ..Settings::default()
        };

        let (settings, rejected) = merge_settings_from_values(
            &values(&[
                ("customSearchPatterns", json!("kagi.com/search")),
                ("excludeDomains", json!(7)),
                ("iconClickEnabled", json!("yes")),
            ]),
            &current,
        );

        assert_eq!(settings.custom_search_patterns, vec!["kagi.com/search"]);
        assert_eq!(settings.exclude_domains, vec!["maps.google.com"]);
        assert!(!settings.icon_click_enabled);
        assert_eq!(rejected.len(), 2);
    }

    #[test]
    fn test_validate_value() {
        assert!(validate_value(SettingKey::IconClickEnabled, &json!(true)).is_ok());
        assert!(validate_value(SettingKey::IconClickEnabled, &json!("yes")).is_err());
        assert!(validate_value(SettingKey::ExcludeDomains, &json!("a\nb")).is_ok());
        assert!(validate_value(SettingKey::ExcludeDomains, &json!(["a"])).is_err());
    }

    #[test]
    fn test_settings_to_values_joins_lists() {
        let settings = Settings {
            custom_search_patterns: vec!["a".to_string(), "b".to_string()],
            ..Settings::default()
        };
        let stored = settings_to_values(&settings);
        assert_eq!(stored[0], (SettingKey::CustomSearchPatterns, json!("a\nb")));
        assert_eq!(stored[2], (SettingKey::IconClickEnabled, json!(true)));
    }
}
