use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "My Resume";

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────
//
// The `sections` JSON shape is camelCase so that documents written by the
// browser client round-trip without a mapping layer.

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    /// Free text, e.g. "Jan 2020 - Present".
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// An entry of a repeated section. The identity fields decide whether the
/// entry shows up in the preview at all.
pub trait SectionEntry: Clone + Default {
    fn has_identity(&self) -> bool;
}

impl SectionEntry for ExperienceEntry {
    fn has_identity(&self) -> bool {
        !self.title.is_empty() || !self.company.is_empty()
    }
}

impl SectionEntry for EducationEntry {
    fn has_identity(&self) -> bool {
        !self.degree.is_empty() || !self.institution.is_empty()
    }
}

/// One resume being edited.
///
/// `experience` and `education` never hold zero entries. `Default` seeds one
/// blank entry in each and [`ResumeDocument::normalized`] restores the
/// invariant for documents that come from outside (request bodies, stored
/// records).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            experience: vec![ExperienceEntry::default()],
            education: vec![EducationEntry::default()],
            skills: Vec::new(),
        }
    }
}

impl ResumeDocument {
    pub fn normalized(mut self) -> Self {
        if self.experience.is_empty() {
            self.experience.push(ExperienceEntry::default());
        }
        if self.education.is_empty() {
            self.education.push(EducationEntry::default());
        }
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Persisted form
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub sections: Json<ResumeDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub sections: ResumeDocument,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            sections: row.sections.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Listing entry for the "my resumes" overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&ResumeRecord> for ResumeSummary {
    fn from(record: &ResumeRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            updated_at: record.updated_at,
        }
    }
}

/// Fields supplied by the caller when a record is first created.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub owner_id: Uuid,
    pub title: String,
    pub sections: ResumeDocument,
}
