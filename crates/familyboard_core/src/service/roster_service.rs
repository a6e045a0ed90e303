//! Family member and category management.
//!
//! # Invariants
//! - Entry `value` stays unique within each collection.
//! - Removing a person never rewrites tasks that reference it.
//! - Reads fall back to the seed lists when storage fails.

use crate::model::roster::{
    default_categories, default_people, is_member_pictograph, validate_categories,
    validate_entries, Category, LabeledEntry, Person, RosterValidationError,
};
use crate::store::{CategoryCollection, Collection, PeopleCollection, PersistenceStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// A required input field is blank.
    MissingField(&'static str),
    /// Pictograph is not one of `MEMBER_PICTOGRAPHS`.
    UnknownPictograph(String),
    /// Entry would break collection invariants.
    Validation(RosterValidationError),
    /// No entry with this value exists.
    EntryNotFound(String),
    /// Persistence-layer failure; nothing was written.
    Store(StoreError),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} cannot be empty"),
            Self::UnknownPictograph(value) => write!(f, "unsupported pictograph `{value}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryNotFound(value) => write!(f, "entry not found: `{value}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl RosterError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::UnknownPictograph(_) => "unknown_pictograph",
            Self::Validation(_) => "validation_failed",
            Self::EntryNotFound(_) => "entry_not_found",
            Self::Store(err) => err.code(),
        }
    }
}

impl From<RosterValidationError> for RosterError {
    fn from(value: RosterValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RosterError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Service over the `people` and `categories` collections.
#[derive(Clone)]
pub struct RosterService {
    store: PersistenceStore,
}

impl RosterService {
    pub fn new(store: PersistenceStore) -> Self {
        Self { store }
    }

    /// Family members, seeding the defaults on first read.
    pub async fn list_people(&self) -> Vec<Person> {
        self.list_entries::<PeopleCollection>(default_people).await
    }

    /// Adds `"<pictograph> <name>"` as both label and value.
    pub async fn add_person(&self, pictograph: &str, name: &str) -> RosterResult<Person> {
        let pictograph = pictograph.trim();
        let name = name.trim();
        if pictograph.is_empty() {
            return Err(RosterError::MissingField("pictograph"));
        }
        if !is_member_pictograph(pictograph) {
            return Err(RosterError::UnknownPictograph(pictograph.to_string()));
        }
        if name.is_empty() {
            return Err(RosterError::MissingField("name"));
        }
        let display = format!("{pictograph} {name}");
        let person = Person::new(display.clone(), display);
        self.add_entry::<PeopleCollection>(person, validate_entries)
            .await
    }

    /// Removes the member with `value`; tasks assigned to it keep the value.
    pub async fn remove_person(&self, value: &str) -> RosterResult<Vec<Person>> {
        self.remove_entry::<PeopleCollection>(value).await
    }

    /// Categories, seeding the defaults on first read.
    pub async fn list_categories(&self) -> Vec<Category> {
        self.list_entries::<CategoryCollection>(default_categories)
            .await
    }

    /// Adds a user-defined category.
    pub async fn add_category(&self, label: &str, value: &str) -> RosterResult<Category> {
        let label = label.trim();
        let value = value.trim();
        if label.is_empty() {
            return Err(RosterError::MissingField("label"));
        }
        if value.is_empty() {
            return Err(RosterError::MissingField("value"));
        }
        let category = Category::new(label, value);
        self.add_entry::<CategoryCollection>(category, validate_categories)
            .await
    }

    pub async fn remove_category(&self, value: &str) -> RosterResult<Vec<Category>> {
        self.remove_entry::<CategoryCollection>(value).await
    }

    async fn list_entries<C>(&self, fallback: fn() -> Vec<LabeledEntry>) -> Vec<LabeledEntry>
    where
        C: Collection<Record = LabeledEntry>,
    {
        match self.store.load_or_seed::<C>().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "event=roster_load module=service status=fallback key={} error_code={} error={}",
                    C::KEY,
                    err.code(),
                    err
                );
                fallback()
            }
        }
    }

    async fn add_entry<C>(
        &self,
        entry: LabeledEntry,
        validate: fn(&[LabeledEntry]) -> Result<(), RosterValidationError>,
    ) -> RosterResult<LabeledEntry>
    where
        C: Collection<Record = LabeledEntry>,
    {
        let result = self
            .store
            .update::<C, _, RosterError, _>(|entries| {
                entries.push(entry.clone());
                validate(entries)?;
                Ok(entry)
            })
            .await;
        log_outcome::<C, _>("roster_add", &result);
        result
    }

    async fn remove_entry<C>(&self, value: &str) -> RosterResult<Vec<LabeledEntry>>
    where
        C: Collection<Record = LabeledEntry>,
    {
        let result = self
            .store
            .update::<C, _, RosterError, _>(|entries| {
                let before = entries.len();
                entries.retain(|entry| entry.value != value);
                if entries.len() == before {
                    return Err(RosterError::EntryNotFound(value.to_string()));
                }
                Ok(entries.clone())
            })
            .await;
        log_outcome::<C, _>("roster_remove", &result);
        result
    }
}

fn log_outcome<C: Collection, T>(event: &str, result: &RosterResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok key={}", C::KEY),
        Err(RosterError::Store(err)) => error!(
            "event={event} module=service status=error key={} error_code={} error={}",
            C::KEY,
            err.code(),
            err
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected key={} error_code={}",
            C::KEY,
            err.code()
        ),
    }
}
