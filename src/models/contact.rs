use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::conversation::normalize_phone_number;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photo_uri: String,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
}

/// Resolved contact data keyed by normalized phone number. Produced by an
/// external contacts provider and only used to decorate conversations.
#[derive(Debug, Clone, Default)]
pub struct ContactBook {
    entries: HashMap<String, Contact>,
}

impl ContactBook {
    pub fn from_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
        let mut entries = HashMap::new();
        for contact in contacts {
            for number in &contact.phone_numbers {
                let number = normalize_phone_number(number);
                if number.is_empty() {
                    continue;
                }
                entries.entry(number).or_insert_with(|| contact.clone());
            }
        }
        Self { entries }
    }

    pub fn lookup(&self, phone_number: &str) -> Option<&Contact> {
        self.entries.get(&normalize_phone_number(phone_number))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
