//! Editor for the repeated sections (experience, education).
//!
//! Every operation consumes the current list and returns the next one; the
//! caller swaps its held copy. Lists never drop below [`MIN_ENTRIES`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::editor::EditError;
use crate::models::resume::{EducationEntry, ExperienceEntry, SectionEntry};

pub const MIN_ENTRIES: usize = 1;

/// A single text field of an entry of type `E`.
pub trait EntryField<E> {
    fn slot(self, entry: &mut E) -> &mut String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceField {
    Title,
    Company,
    Duration,
    Description,
}

impl EntryField<ExperienceEntry> for ExperienceField {
    fn slot(self, entry: &mut ExperienceEntry) -> &mut String {
        match self {
            ExperienceField::Title => &mut entry.title,
            ExperienceField::Company => &mut entry.company,
            ExperienceField::Duration => &mut entry.duration,
            ExperienceField::Description => &mut entry.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationField {
    Degree,
    Institution,
    Year,
}

impl EntryField<EducationEntry> for EducationField {
    fn slot(self, entry: &mut EducationEntry) -> &mut String {
        match self {
            EducationField::Degree => &mut entry.degree,
            EducationField::Institution => &mut entry.institution,
            EducationField::Year => &mut entry.year,
        }
    }
}

/// Appends a blank entry.
pub fn add<E: SectionEntry>(mut entries: Vec<E>) -> Vec<E> {
    entries.push(E::default());
    entries
}

/// Removes the entry at `index`, keeping the relative order of the rest.
///
/// Refused (returns the list unchanged) when only [`MIN_ENTRIES`] remain.
pub fn remove<E: SectionEntry>(mut entries: Vec<E>, index: usize) -> Result<Vec<E>, EditError> {
    if entries.len() <= MIN_ENTRIES {
        debug!("Refusing to remove entry {index}: list holds {} entries", entries.len());
        return Ok(entries);
    }
    if index >= entries.len() {
        return Err(EditError::IndexOutOfRange {
            index,
            len: entries.len(),
        });
    }
    entries.remove(index);
    Ok(entries)
}

/// Replaces one field of the entry at `index`. All other entries and fields
/// are left as they were.
pub fn update<E, F>(
    mut entries: Vec<E>,
    index: usize,
    field: F,
    value: String,
) -> Result<Vec<E>, EditError>
where
    E: SectionEntry,
    F: EntryField<E>,
{
    let len = entries.len();
    let entry = entries
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { index, len })?;
    *field.slot(entry) = value;
    Ok(entries)
}
