//! Family members and categories.
//!
//! Both collections share one `{ label, value }` shape: `label` is the display
//! form (usually prefixed with a pictograph), `value` is the identifier tasks
//! refer to.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pictographs offered when adding a family member.
pub const MEMBER_PICTOGRAPHS: &[&str] = &["👨", "👩", "🧒", "👵", "👴", "🐶", "🐱"];

/// Display label plus stable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledEntry {
    pub label: String,
    pub value: String,
}

/// A family member tasks can be assigned to.
pub type Person = LabeledEntry;

/// A task category.
pub type Category = LabeledEntry;

impl LabeledEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterValidationError {
    EmptyValue,
    DuplicateValue(String),
}

impl Display for RosterValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue => write!(f, "entry value cannot be empty"),
            Self::DuplicateValue(value) => write!(f, "entry value already exists: `{value}`"),
        }
    }
}

impl Error for RosterValidationError {}

/// Seed written the first time `people` is read.
pub fn default_people() -> Vec<Person> {
    ["👨 Dad", "👩 Mom", "🧒 Kids"]
        .into_iter()
        .map(|name| Person::new(name, name))
        .collect()
}

/// Seed written the first time `categories` is read.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("🧹 Chores", "chores"),
        Category::new("🛒 Shopping", "shopping"),
        Category::new("⏰ Reminders", "reminders"),
    ]
}

/// Checks that every entry has a non-empty, unique `value`.
pub fn validate_entries(entries: &[LabeledEntry]) -> Result<(), RosterValidationError> {
    check_unique(entries, str::to_string)
}

/// Like `validate_entries`, but values differing only in case collide,
/// since category filtering ignores case.
pub fn validate_categories(entries: &[Category]) -> Result<(), RosterValidationError> {
    check_unique(entries, str::to_lowercase)
}

/// Whether `pictograph` is one of the offered member pictographs.
pub fn is_member_pictograph(pictograph: &str) -> bool {
    MEMBER_PICTOGRAPHS.contains(&pictograph)
}

fn check_unique(
    entries: &[LabeledEntry],
    fold: fn(&str) -> String,
) -> Result<(), RosterValidationError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.value.trim().is_empty() {
            return Err(RosterValidationError::EmptyValue);
        }
        if !seen.insert(fold(&entry.value)) {
            return Err(RosterValidationError::DuplicateValue(entry.value.clone()));
        }
    }
    Ok(())
}

/// Resolves a task assignee to what the board shows.
///
/// A removed member is not cascaded into tasks; such a dangling reference
/// renders as the raw stored identifier.
pub fn assignee_label(assignee: Option<&str>, people: &[Person]) -> Option<String> {
    let value = assignee?;
    let label = people
        .iter()
        .find(|person| person.value == value)
        .map_or(value, |person| person.label.as_str());
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        assignee_label, default_categories, default_people, is_member_pictograph,
        validate_categories, validate_entries, Category, Person, RosterValidationError,
    };

    #[test]
    fn seeds_are_valid_and_have_three_entries() {
        assert_eq!(default_people().len(), 3);
        assert_eq!(default_categories().len(), 3);
        assert!(validate_entries(&default_people()).is_ok());
        assert!(validate_categories(&default_categories()).is_ok());
    }

    #[test]
    fn validate_entries_rejects_duplicates() {
        let mut people = default_people();
        people.push(Person::new("Dad again", "👨 Dad"));
        assert_eq!(
            validate_entries(&people),
            Err(RosterValidationError::DuplicateValue("👨 Dad".to_string()))
        );
    }

    #[test]
    fn category_values_collide_ignoring_case() {
        let mut categories = default_categories();
        categories.push(Category::new("🛒 Big Shop", "Shopping"));
        assert_eq!(
            validate_categories(&categories),
            Err(RosterValidationError::DuplicateValue("Shopping".to_string()))
        );
        assert!(validate_entries(&categories).is_ok());
    }

    #[test]
    fn only_offered_pictographs_are_accepted() {
        assert!(is_member_pictograph("🐶"));
        assert!(!is_member_pictograph("🦖"));
        assert!(!is_member_pictograph(""));
    }

    #[test]
    fn assignee_label_falls_back_to_raw_identifier() {
        let people = vec![Person::new("👵 Grandma Rose", "grandma")];
        assert_eq!(
            assignee_label(Some("grandma"), &people).as_deref(),
            Some("👵 Grandma Rose")
        );
        assert_eq!(
            assignee_label(Some("👴 Grandpa"), &people).as_deref(),
            Some("👴 Grandpa")
        );
        assert_eq!(assignee_label(None, &people), None);
    }
}
