//! Collected answers and their projection onto external configuration keys

use std::collections::{BTreeMap, HashMap};
use zeroize::Zeroize;

/// Field identifiers containing this (case-insensitively) are displayed masked
const MASKED_FIELD_MARKER: &str = "password";

/// One collected answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveOption {
    field_name: String,
    external_key: String,
    value: String,
    /// Sequence number of the last write, used to order colliding keys
    revision: u64,
}

impl InteractiveOption {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn external_key(&self) -> &str {
        &self.external_key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value as it may be shown on screen
    pub fn display_value(&self) -> String {
        display_value(&self.field_name, &self.value)
    }

    /// `--<externalKey>=<displayValue>`, the form used when listing options
    pub fn display_line(&self) -> String {
        format!("--{}={}", self.external_key, self.display_value())
    }
}

impl Drop for InteractiveOption {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

/// Whether a field identifier names a password-like value
pub fn is_masked_field(field_name: &str) -> bool {
    field_name.to_lowercase().contains(MASKED_FIELD_MARKER)
}

/// A run of asterisks as long as `value`
pub fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Value for display: masked when `name` is password-like, literal otherwise
pub fn display_value(name: &str, value: &str) -> String {
    if is_masked_field(name) {
        mask(value)
    } else {
        value.to_string()
    }
}

/// Options recorded during a session, in insertion order
#[derive(Debug, Default)]
pub struct OptionStore {
    options: Vec<InteractiveOption>,
    index: HashMap<String, usize>,
    next_revision: u64,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.index.contains_key(field_name)
    }

    #[cfg(test)]
    fn get(&self, field_name: &str) -> Option<&InteractiveOption> {
        self.index.get(field_name).map(|&i| &self.options[i])
    }

    /// Replace the value of an already recorded field
    ///
    /// Returns `false` without touching the store when the field is unknown.
    pub fn update(&mut self, field_name: &str, value: String) -> bool {
        let Some(&i) = self.index.get(field_name) else {
            return false;
        };

        let revision = self.bump_revision();
        let option = &mut self.options[i];
        option.value.zeroize();
        option.value = value;
        option.revision = revision;
        true
    }

    /// Record a new field with its already resolved external key
    ///
    /// Falls back to [`update`](Self::update) when the field exists, so the
    /// external key of a field never changes once recorded.
    pub fn insert(&mut self, field_name: &str, external_key: String, value: String) {
        if self.contains(field_name) {
            self.update(field_name, value);
            return;
        }

        let revision = self.bump_revision();
        self.index.insert(field_name.to_string(), self.options.len());
        self.options.push(InteractiveOption {
            field_name: field_name.to_string(),
            external_key,
            value,
            revision,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractiveOption> {
        self.options.iter()
    }

    /// External key to value; when keys collide the most recently written value wins
    pub fn to_external_map(&self) -> BTreeMap<String, String> {
        let mut latest: BTreeMap<&str, &InteractiveOption> = BTreeMap::new();
        for option in &self.options {
            let newer = latest
                .get(option.external_key.as_str())
                .map_or(true, |current| option.revision > current.revision);
            if newer {
                latest.insert(option.external_key.as_str(), option);
            }
        }

        latest
            .into_iter()
            .map(|(key, option)| (key.to_string(), option.value.clone()))
            .collect()
    }

    fn bump_revision(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masking_matches_field_name_case_insensitively() {
        assert!(is_masked_field("password1"));
        assert!(is_masked_field("hubPassword"));
        assert!(is_masked_field("PROXY_PASSWORD"));
        assert!(!is_masked_field("hubUsername"));
        assert!(!is_masked_field("passwd"));
    }

    #[test]
    fn test_mask_has_same_length_as_value() {
        assert_eq!(mask("secret"), "******");
        assert_eq!(mask(""), "");
        assert_eq!(mask("pässwörd"), "********");
    }

    #[test]
    fn test_display_line() {
        let mut store = OptionStore::new();
        store.insert("password1", "app.password".to_string(), "secret".to_string());
        store.insert("hubUrl", "hub.url".to_string(), "https://hub".to_string());

        let lines: Vec<String> = store.iter().map(|o| o.display_line()).collect();
        assert_eq!(lines, vec!["--app.password=******", "--hub.url=https://hub"]);

        // Display never touches the stored value
        assert_eq!(store.get("password1").unwrap().value(), "secret");
    }

    #[test]
    fn test_insert_existing_field_keeps_key() {
        let mut store = OptionStore::new();
        store.insert("hubUrl", "hub.url".to_string(), "first".to_string());
        store.insert("hubUrl", "other.key".to_string(), "second".to_string());

        assert_eq!(store.len(), 1);
        let option = store.get("hubUrl").unwrap();
        assert_eq!(option.external_key(), "hub.url");
        assert_eq!(option.value(), "second");
    }

    #[test]
    fn test_update_unknown_field_is_noop() {
        let mut store = OptionStore::new();
        assert!(!store.update("missing", "value".to_string()));
        assert!(store.is_empty());
        assert!(!store.contains("missing"));
    }

    #[test]
    fn test_colliding_keys_keep_latest_write() {
        let mut store = OptionStore::new();
        store.insert("first", "shared.key".to_string(), "one".to_string());
        store.insert("second", "shared.key".to_string(), "two".to_string());

        let map = store.to_external_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["shared.key"], "two");

        // Rewriting the earlier field makes it the latest again
        store.update("first", "three".to_string());
        assert_eq!(store.to_external_map()["shared.key"], "three");
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut store = OptionStore::new();
        for name in ["c", "a", "b"] {
            store.insert(name, format!("key.{name}"), name.to_string());
        }

        let names: Vec<&str> = store.iter().map(|o| o.field_name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
