use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    pub value: String,
}

impl CustomField {
    pub fn new<T: Into<String>, U: Into<String>>(name: T, value: U) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A test case declared in the test-management system for the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTestCase {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl CatalogTestCase {
    pub fn new<T: Into<String>>(id: i32, name: T) -> Self {
        Self {
            id,
            name: name.into(),
            custom_fields: Vec::new(),
        }
    }

    pub fn with_custom_field(mut self, custom_field: CustomField) -> Self {
        self.custom_fields.push(custom_field);
        self
    }

    /// First custom field called `field_name`.
    pub fn custom_field(&self, field_name: &str) -> Option<&CustomField> {
        self.custom_fields
            .iter()
            .find(|custom_field| custom_field.name == field_name)
    }
}

/// Lookup from key custom field value to catalog entry, built once per scan.
#[derive(Debug, Clone)]
pub struct KeyIndex<'a> {
    by_key: HashMap<&'a str, &'a CatalogTestCase>,
}

impl<'a> KeyIndex<'a> {
    /// Entries without a `key_custom_field` are left out. When several entries share a key
    /// value, the first one in catalog order wins.
    pub fn build(catalog: &'a [CatalogTestCase], key_custom_field: &str) -> Self {
        let mut by_key = HashMap::with_capacity(catalog.len());
        for test_case in catalog {
            if let Some(custom_field) = test_case.custom_field(key_custom_field) {
                by_key
                    .entry(custom_field.value.as_str())
                    .or_insert(test_case);
            }
        }
        Self { by_key }
    }

    /// Exact, case-sensitive match.
    pub fn find(&self, key: &str) -> Option<&'a CatalogTestCase> {
        self.by_key.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// One-off lookup without an index.
pub fn find_catalog_entry<'a>(
    catalog: &'a [CatalogTestCase],
    key_custom_field: &str,
    key: &str,
) -> Option<&'a CatalogTestCase> {
    catalog.iter().find(|test_case| {
        test_case
            .custom_field(key_custom_field)
            .is_some_and(|custom_field| custom_field.value == key)
    })
}
