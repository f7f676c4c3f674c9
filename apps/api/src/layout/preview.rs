//! Preview renderer: pure (document, derived style, layout mode) to layout tree.
//!
//! The tree is what the browser paints into the preview pane. Every text node
//! carries its resolved pixel size so the client does no style math of its own.
//!
//! # Layout modes
//! - `header`: name + inline summary + up to 8 skill tags, then an experience
//!   card grid (max 4, descriptions cut at 120 chars), education chips and
//!   the full skill tag list.
//! - `full`: name + contacts, then a 5/12 | 7/12 split. Left: profile,
//!   skills grid, education. Right: experience timeline.
//!
//! Experience/education entries without an identity field (title/company,
//! degree/institution) are never rendered.

use serde::{Deserialize, Serialize};

use crate::layout::style::DerivedStyle;
use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeDocument, SectionEntry};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const HEADER_SKILL_LIMIT: usize = 8;
pub const HEADER_EXPERIENCE_LIMIT: usize = 4;
pub const DESCRIPTION_CUTOFF: usize = 120;
pub const ELLIPSIS: &str = "...";

const LEFT_SPAN: u8 = 5;
const RIGHT_SPAN: u8 = 7;

// ────────────────────────────────────────────────────────────────────────────
// Layout mode
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Header,
    #[default]
    Full,
}

impl LayoutMode {
    /// Parses the `type` navigation parameter. Anything but `header` is `full`.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("header") => LayoutMode::Header,
            _ => LayoutMode::Full,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    pub size: u8,
}

impl Text {
    fn new(text: impl Into<String>, size: u8) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Email,
    Phone,
    Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLine {
    pub kind: ContactKind,
    pub text: Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionIcon {
    Profile,
    Skills,
    Education,
    Experience,
    TechnicalSkills,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagList {
    pub tags: Vec<Text>,
    pub color: String,
    pub border_color: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceCard {
    pub title: Text,
    pub company: Text,
    pub duration: Text,
    pub description: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub degree: Text,
    pub institution: Text,
    pub year: Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub card: ExperienceCard,
    /// Draw a connector line down to the next item.
    pub connector: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Width in twelfths of the content area.
    pub span: u8,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header {
        name: Text,
        placeholder: bool,
        summary: Option<Text>,
        contacts: Vec<ContactLine>,
        tags: Option<TagList>,
        margin_bottom: f32,
    },
    Section {
        title: Text,
        icon: SectionIcon,
        color: String,
        border_color: String,
        gap: f32,
        body: Vec<Block>,
    },
    Paragraph {
        text: Text,
    },
    Tags {
        list: TagList,
    },
    CardGrid {
        columns: u8,
        gap: f32,
        accent: String,
        cards: Vec<ExperienceCard>,
    },
    Chips {
        border_color: String,
        chips: Vec<EducationItem>,
    },
    BulletGrid {
        columns: u8,
        gap: f32,
        bullet_color: String,
        items: Vec<Text>,
    },
    EducationList {
        gap: f32,
        items: Vec<EducationItem>,
    },
    Timeline {
        node_color: String,
        connector_color: String,
        items: Vec<TimelineItem>,
    },
    Columns {
        gap: f32,
        columns: Vec<Column>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewLayout {
    pub mode: LayoutMode,
    pub font_family: String,
    pub body_size: u8,
    pub line_height: f32,
    pub letter_spacing: String,
    pub blocks: Vec<Block>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders the preview layout. Pure: no I/O, no mutation of the inputs.
pub fn render_preview(
    document: &ResumeDocument,
    style: &DerivedStyle,
    mode: LayoutMode,
) -> PreviewLayout {
    let mut blocks = vec![header_block(document, style, mode)];
    match mode {
        LayoutMode::Header => blocks.extend(header_mode_sections(document, style)),
        LayoutMode::Full => blocks.push(full_mode_columns(document, style)),
    }

    PreviewLayout {
        mode,
        font_family: style.font_family_css.clone(),
        body_size: style.fonts.body,
        line_height: style.line_height,
        letter_spacing: style.letter_spacing.clone(),
        blocks,
    }
}

/// Keeps entries with a non-empty identity field, in list order.
pub fn visible_entries<E: SectionEntry>(entries: &[E]) -> Vec<&E> {
    entries.iter().filter(|e| e.has_identity()).collect()
}

/// Cuts `text` at exactly [`DESCRIPTION_CUTOFF`] characters, ignoring word
/// boundaries, and appends the ellipsis marker.
pub fn truncate_description(text: &str) -> String {
    let mut cut: String = text.chars().take(DESCRIPTION_CUTOFF).collect();
    cut.push_str(ELLIPSIS);
    cut
}

fn header_block(document: &ResumeDocument, style: &DerivedStyle, mode: LayoutMode) -> Block {
    let info = &document.personal_info;
    let fonts = &style.fonts;

    let placeholder = info.full_name.is_empty();
    let name = if placeholder {
        NAME_PLACEHOLDER
    } else {
        info.full_name.as_str()
    };

    let summary = (mode == LayoutMode::Header && !info.summary.is_empty())
        .then(|| Text::new(&info.summary, fonts.small));

    let contacts = [
        (ContactKind::Email, &info.email),
        (ContactKind::Phone, &info.phone),
        (ContactKind::Location, &info.location),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(kind, value)| ContactLine {
        kind,
        text: Text::new(value.as_str(), fonts.micro),
    })
    .collect();

    let tags = (mode == LayoutMode::Header && !document.skills.is_empty()).then(|| {
        tag_list(
            document.skills.iter().take(HEADER_SKILL_LIMIT),
            style,
            style.tints.tag_border.clone(),
        )
    });

    Block::Header {
        name: Text::new(name, fonts.name),
        placeholder,
        summary,
        contacts,
        tags,
        margin_bottom: style.spacing.section,
    }
}

fn header_mode_sections(document: &ResumeDocument, style: &DerivedStyle) -> Vec<Block> {
    let fonts = &style.fonts;
    let mut sections = Vec::new();

    let experience = visible_entries(&document.experience);
    if !experience.is_empty() {
        let cards = experience
            .into_iter()
            .take(HEADER_EXPERIENCE_LIMIT)
            .map(|exp| ExperienceCard {
                title: Text::new(&exp.title, fonts.small),
                company: Text::new(&exp.company, fonts.micro),
                duration: Text::new(&exp.duration, fonts.micro),
                description: (!exp.description.is_empty())
                    .then(|| Text::new(truncate_description(&exp.description), fonts.small)),
            })
            .collect();
        sections.push(section(
            "Experience",
            SectionIcon::Experience,
            style,
            vec![Block::CardGrid {
                columns: 2,
                gap: style.spacing.subsection,
                accent: style.accent_color.clone(),
                cards,
            }],
        ));
    }

    let education = visible_entries(&document.education);
    if !education.is_empty() {
        let chips = education
            .into_iter()
            .map(|edu| education_item(edu, fonts.micro, fonts.micro))
            .collect();
        sections.push(section(
            "Education",
            SectionIcon::Education,
            style,
            vec![Block::Chips {
                border_color: style.tints.header_border.clone(),
                chips,
            }],
        ));
    }

    if !document.skills.is_empty() {
        let list = tag_list(
            document.skills.iter(),
            style,
            style.tints.header_border.clone(),
        );
        sections.push(section(
            "Technical Skills",
            SectionIcon::TechnicalSkills,
            style,
            vec![Block::Tags { list }],
        ));
    }

    sections
}

fn full_mode_columns(document: &ResumeDocument, style: &DerivedStyle) -> Block {
    let fonts = &style.fonts;
    let mut left = Vec::new();

    let summary = &document.personal_info.summary;
    if !summary.is_empty() {
        left.push(section(
            "Profile",
            SectionIcon::Profile,
            style,
            vec![Block::Paragraph {
                text: Text::new(summary.as_str(), fonts.small),
            }],
        ));
    }

    if !document.skills.is_empty() {
        left.push(section(
            "Skills",
            SectionIcon::Skills,
            style,
            vec![Block::BulletGrid {
                columns: 2,
                gap: style.spacing.item,
                bullet_color: style.accent_color.clone(),
                items: document
                    .skills
                    .iter()
                    .map(|skill| Text::new(skill.as_str(), fonts.small))
                    .collect(),
            }],
        ));
    }

    let education = visible_entries(&document.education);
    if !education.is_empty() {
        left.push(section(
            "Education",
            SectionIcon::Education,
            style,
            vec![Block::EducationList {
                gap: style.spacing.subsection,
                items: education
                    .into_iter()
                    .map(|edu| education_item(edu, fonts.small, fonts.micro))
                    .collect(),
            }],
        ));
    }

    let mut right = Vec::new();
    let experience = visible_entries(&document.experience);
    if !experience.is_empty() {
        let last = experience.len() - 1;
        let items = experience
            .into_iter()
            .enumerate()
            .map(|(i, exp)| TimelineItem {
                card: timeline_card(exp, style),
                connector: i < last,
            })
            .collect();
        right.push(section(
            "Experience",
            SectionIcon::Experience,
            style,
            vec![Block::Timeline {
                node_color: style.accent_color.clone(),
                connector_color: style.tints.connector.clone(),
                items,
            }],
        ));
    }

    Block::Columns {
        gap: style.spacing.section,
        columns: vec![
            Column {
                span: LEFT_SPAN,
                blocks: left,
            },
            Column {
                span: RIGHT_SPAN,
                blocks: right,
            },
        ],
    }
}

fn section(title: &str, icon: SectionIcon, style: &DerivedStyle, body: Vec<Block>) -> Block {
    Block::Section {
        title: Text::new(title, style.fonts.section),
        icon,
        color: style.accent_color.clone(),
        border_color: style.tints.header_border.clone(),
        gap: style.spacing.subsection,
        body,
    }
}

fn tag_list<'a>(
    skills: impl Iterator<Item = &'a String>,
    style: &DerivedStyle,
    border_color: String,
) -> TagList {
    TagList {
        tags: skills
            .map(|skill| Text::new(skill.as_str(), style.fonts.micro))
            .collect(),
        color: style.accent_color.clone(),
        border_color,
        background: style.tints.tag_background.clone(),
    }
}

fn education_item(edu: &EducationEntry, degree_size: u8, detail_size: u8) -> EducationItem {
    EducationItem {
        degree: Text::new(edu.degree.as_str(), degree_size),
        institution: Text::new(edu.institution.as_str(), detail_size),
        year: Text::new(edu.year.as_str(), detail_size),
    }
}

fn timeline_card(exp: &ExperienceEntry, style: &DerivedStyle) -> ExperienceCard {
    let fonts = &style.fonts;
    ExperienceCard {
        title: Text::new(exp.title.as_str(), fonts.small),
        company: Text::new(exp.company.as_str(), fonts.micro),
        duration: Text::new(exp.duration.as_str(), fonts.micro),
        description: (!exp.description.is_empty())
            .then(|| Text::new(exp.description.as_str(), fonts.small)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
