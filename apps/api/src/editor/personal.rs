use serde::{Deserialize, Serialize};

use crate::models::resume::PersonalInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    Summary,
}

/// Replaces one field of the personal info block.
pub fn update(mut info: PersonalInfo, field: PersonalField, value: String) -> PersonalInfo {
    let slot = match field {
        PersonalField::FullName => &mut info.full_name,
        PersonalField::Email => &mut info.email,
        PersonalField::Phone => &mut info.phone,
        PersonalField::Location => &mut info.location,
        PersonalField::Summary => &mut info.summary,
    };
    *slot = value;
    info
}
