//! Skills editor. Unlike the repeated sections the list may become empty,
//! and duplicates are accepted as entered.

use crate::editor::EditError;

/// Appends `skill` after trimming it. Blank input is ignored.
pub fn add(mut skills: Vec<String>, skill: &str) -> Vec<String> {
    let skill = skill.trim();
    if !skill.is_empty() {
        skills.push(skill.to_string());
    }
    skills
}

pub fn remove(mut skills: Vec<String>, index: usize) -> Result<Vec<String>, EditError> {
    if index >= skills.len() {
        return Err(EditError::IndexOutOfRange {
            index,
            len: skills.len(),
        });
    }
    skills.remove(index);
    Ok(skills)
}

pub fn update(mut skills: Vec<String>, index: usize, value: String) -> Result<Vec<String>, EditError> {
    let len = skills.len();
    let slot = skills
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { index, len })?;
    *slot = value;
    Ok(skills)
}
