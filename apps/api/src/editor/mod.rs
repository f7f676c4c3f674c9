// Section editors: pure (section data, action) -> section data transforms.
// The document owner swaps in the returned value; nothing is mutated in place.

pub mod handlers;
pub mod list;
pub mod personal;
pub mod skills;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::ResumeDocument;

pub use list::{EducationField, ExperienceField};
pub use personal::PersonalField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("index {index} is out of range for a section of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One user edit against one section of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    UpdatePersonal {
        field: PersonalField,
        value: String,
    },
    AddExperience,
    RemoveExperience {
        index: usize,
    },
    UpdateExperience {
        index: usize,
        field: ExperienceField,
        value: String,
    },
    AddEducation,
    RemoveEducation {
        index: usize,
    },
    UpdateEducation {
        index: usize,
        field: EducationField,
        value: String,
    },
    AddSkill {
        skill: String,
    },
    RemoveSkill {
        index: usize,
    },
    UpdateSkill {
        index: usize,
        value: String,
    },
}

/// Applies `action` to `document`, returning the next document.
///
/// Consumes the document. Callers that must keep the previous state when an
/// action is rejected apply it to a clone.
pub fn apply_action(
    document: ResumeDocument,
    action: EditAction,
) -> Result<ResumeDocument, EditError> {
    let ResumeDocument {
        personal_info,
        experience,
        education,
        skills: skill_list,
    } = document;

    let next = match action {
        EditAction::UpdatePersonal { field, value } => ResumeDocument {
            personal_info: personal::update(personal_info, field, value),
            experience,
            education,
            skills: skill_list,
        },
        EditAction::AddExperience => ResumeDocument {
            experience: list::add(experience),
            personal_info,
            education,
            skills: skill_list,
        },
        EditAction::RemoveExperience { index } => ResumeDocument {
            experience: list::remove(experience, index)?,
            personal_info,
            education,
            skills: skill_list,
        },
        EditAction::UpdateExperience {
            index,
            field,
            value,
        } => ResumeDocument {
            experience: list::update(experience, index, field, value)?,
            personal_info,
            education,
            skills: skill_list,
        },
        EditAction::AddEducation => ResumeDocument {
            education: list::add(education),
            personal_info,
            experience,
            skills: skill_list,
        },
        EditAction::RemoveEducation { index } => ResumeDocument {
            education: list::remove(education, index)?,
            personal_info,
            experience,
            skills: skill_list,
        },
        EditAction::UpdateEducation {
            index,
            field,
            value,
        } => ResumeDocument {
            education: list::update(education, index, field, value)?,
            personal_info,
            experience,
            skills: skill_list,
        },
        EditAction::AddSkill { skill } => ResumeDocument {
            skills: skills::add(skill_list, &skill),
            personal_info,
            experience,
            education,
        },
        EditAction::RemoveSkill { index } => ResumeDocument {
            skills: skills::remove(skill_list, index)?,
            personal_info,
            experience,
            education,
        },
        EditAction::UpdateSkill { index, value } => ResumeDocument {
            skills: skills::update(skill_list, index, value)?,
            personal_info,
            experience,
            education,
        },
    };
    Ok(next)
}
