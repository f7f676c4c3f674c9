//! Editing session, the single owner of the document being edited.
//!
//! The browser holds the session snapshot between requests and posts it back
//! with each batch of actions; the server rebuilds the session, applies the
//! batch through the section editors and the customization resolver, and
//! returns the new snapshot together with the derived style and preview.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::editor::{apply_action, EditAction, EditError};
use crate::layout::preview::{render_preview, LayoutMode, PreviewLayout};
use crate::layout::style::{
    apply_customization, resolve, CustomizationAction, CustomizationOptions, DerivedStyle,
};
use crate::models::resume::{ResumeDocument, ResumeRecord, DEFAULT_TITLE};
use crate::models::user::CurrentUser;
use crate::store::SaveRequest;

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// Editor panels shown for a layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorSection {
    PersonalInfo,
    Experience,
    Education,
    Skills,
    Customization,
}

pub fn visible_sections(mode: LayoutMode) -> Vec<EditorSection> {
    match mode {
        LayoutMode::Header => vec![EditorSection::PersonalInfo, EditorSection::Customization],
        LayoutMode::Full => vec![
            EditorSection::PersonalInfo,
            EditorSection::Experience,
            EditorSection::Education,
            EditorSection::Skills,
            EditorSection::Customization,
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionCommand {
    SetTitle { title: String },
}

const CUSTOMIZATION_TAGS: [&str; 4] = [
    "set_color_scheme",
    "set_font_family",
    "set_font_size",
    "set_spacing",
];
const SESSION_TAGS: [&str; 1] = ["set_title"];

/// Anything the editor page can send: a section edit, a style change or a
/// session-level command. All three share the `action` tag namespace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionAction {
    Edit(EditAction),
    Customize(CustomizationAction),
    Session(SessionCommand),
}

// The `action` tag picks the family first, so a bad field inside a known
// action reports that field instead of a generic variant mismatch.
impl<'de> Deserialize<'de> for SessionAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let tag = value
            .get("action")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| de::Error::missing_field("action"))?;

        let parsed = if CUSTOMIZATION_TAGS.contains(&tag.as_str()) {
            CustomizationAction::deserialize(value).map(SessionAction::Customize)
        } else if SESSION_TAGS.contains(&tag.as_str()) {
            SessionCommand::deserialize(value).map(SessionAction::Session)
        } else {
            EditAction::deserialize(value).map(SessionAction::Edit)
        };
        parsed.map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub document: ResumeDocument,
    #[serde(default)]
    pub customization: CustomizationOptions,
    #[serde(default)]
    pub mode: LayoutMode,
}

/// What the editor page needs to redraw after any change.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session: SessionSnapshot,
    pub user_email: Option<String>,
    pub sections: Vec<EditorSection>,
    pub style: DerivedStyle,
    pub preview: PreviewLayout,
}

#[derive(Debug, Clone)]
pub struct EditingSession {
    user: CurrentUser,
    id: Option<Uuid>,
    title: String,
    document: ResumeDocument,
    customization: CustomizationOptions,
    mode: LayoutMode,
}

impl EditingSession {
    /// A blank document, not yet persisted.
    pub fn new(user: CurrentUser, mode: LayoutMode) -> Self {
        Self {
            user,
            id: None,
            title: default_title(),
            document: ResumeDocument::default(),
            customization: CustomizationOptions::default(),
            mode,
        }
    }

    pub fn from_record(user: CurrentUser, record: ResumeRecord, mode: LayoutMode) -> Self {
        Self {
            user,
            id: Some(record.id),
            title: record.title,
            document: record.sections.normalized(),
            customization: CustomizationOptions::default(),
            mode,
        }
    }

    /// Rebuilds a session from a client-held snapshot, restoring invariants
    /// the client may not have kept.
    pub fn from_snapshot(user: CurrentUser, snapshot: SessionSnapshot) -> Self {
        Self {
            user,
            id: snapshot.id,
            title: snapshot.title,
            document: snapshot.document.normalized(),
            customization: snapshot.customization.normalized(),
            mode: snapshot.mode,
        }
    }

    #[cfg(test)]
    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    #[cfg(test)]
    pub fn customization(&self) -> &CustomizationOptions {
        &self.customization
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Applies a batch of actions. The batch is all-or-nothing: if any action
    /// is rejected the session is left exactly as it was.
    pub fn apply_all(
        &mut self,
        actions: impl IntoIterator<Item = SessionAction>,
    ) -> Result<(), EditError> {
        let mut document = self.document.clone();
        let mut customization = self.customization.clone();
        let mut title = self.title.clone();

        for action in actions {
            match action {
                SessionAction::Edit(edit) => document = apply_action(document, edit)?,
                SessionAction::Customize(change) => {
                    customization = apply_customization(customization, change)
                }
                SessionAction::Session(SessionCommand::SetTitle { title: new_title }) => {
                    title = new_title
                }
            }
        }

        self.document = document;
        self.customization = customization;
        self.title = title;
        Ok(())
    }

    pub fn style(&self) -> DerivedStyle {
        resolve(&self.customization)
    }

    /// Snapshot handed to the persistence gateway.
    pub fn save_request(&self) -> SaveRequest {
        SaveRequest {
            id: self.id,
            title: self.title.clone(),
            sections: self.document.clone(),
        }
    }

    /// Adopts the id assigned on first save. Local edits are kept as they are.
    pub fn record_saved(&mut self, record: &ResumeRecord) {
        self.id = Some(record.id);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            title: self.title.clone(),
            document: self.document.clone(),
            customization: self.customization.clone(),
            mode: self.mode,
        }
    }

    pub fn view(&self) -> SessionView {
        let style = self.style();
        let preview = render_preview(&self.document, &style, self.mode);
        SessionView {
            session: self.snapshot(),
            user_email: self.user.email.clone(),
            sections: visible_sections(self.mode),
            style,
            preview,
        }
    }
}
