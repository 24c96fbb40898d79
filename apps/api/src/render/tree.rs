//! Render tree produced by the document renderer.
//!
//! `header` and `sections` never depend on the target; `style` and
//! `page_breaks` are the only target-specific parts.

use serde::{Deserialize, Serialize};

use crate::coverage::highlighter::{plain_text, Coverage, RenderNode};
use crate::render::styles::DocumentStyle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTarget {
    /// Styled on-screen / print layout.
    #[default]
    Screen,
    /// Downloadable paginated document.
    Portable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub target: RenderTarget,
    pub title: String,
    pub header: Header,
    pub sections: Vec<Section>,
    pub style: DocumentStyle,
    pub page_breaks: Vec<PageBreak>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Uppercased display name, or the placeholder.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// `location • phone • email • LinkedIn: <url>`, absent parts omitted.
    pub contact_line: String,
}

/// Sections in their fixed render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    PersonalHighlights,
    ProfessionalSummary,
    EmploymentHistory,
    Education,
    AdditionalInformation,
}

impl SectionKind {
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::PersonalHighlights => "Personal Highlights",
            SectionKind::ProfessionalSummary => "Professional Summary",
            SectionKind::EmploymentHistory => "Employment History",
            SectionKind::Education => "Education",
            SectionKind::AdditionalInformation => "Additional Information",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub blocks: Vec<Block>,
}

/// Rich text: plain text or coverage-tagged spans.
pub type Inline = Vec<RenderNode>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        content: Inline,
    },
    BulletList {
        items: Vec<Inline>,
    },
    Entry(EntryBlock),
    Skills {
        label: String,
        chips: Vec<SkillChip>,
    },
    Languages {
        label: String,
        items: Vec<String>,
    },
    WorkingRights {
        label: String,
        text: String,
    },
}

/// One job or education entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBlock {
    /// Job title or degree.
    pub heading: String,
    /// Company or institution.
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    pub bullets: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillChip {
    pub text: String,
    /// `None` is neutral: no coverage review or no related keyword.
    pub status: Option<Coverage>,
}

/// Position of a block inside `RenderedDocument::sections`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRef {
    pub section: usize,
    pub block: usize,
}

/// A page starts before `before`. `page` is the 1-based number of the new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageBreak {
    pub before: BlockRef,
    pub page: u32,
}

impl Block {
    /// All visible text of the block, one string per line of content.
    pub fn text_lines(&self) -> Vec<String> {
        match self {
            Block::Paragraph { content } => vec![plain_text(content)],
            Block::BulletList { items } => items.iter().map(|i| plain_text(i)).collect(),
            Block::Entry(entry) => {
                let mut lines = vec![entry.heading.clone()];
                let mut org = entry.organization.clone();
                if let Some(location) = &entry.location {
                    org = format!("{org}, {location}");
                }
                lines.push(org);
                lines.extend(entry.dates.clone());
                lines.extend(entry.bullets.iter().map(|b| plain_text(b)));
                lines
            }
            Block::Skills { label, chips } => {
                let skills: Vec<&str> = chips.iter().map(|c| c.text.as_str()).collect();
                vec![format!("{label}: {}", skills.join(", "))]
            }
            Block::Languages { label, items } => vec![format!("{label}: {}", items.join(", "))],
            Block::WorkingRights { label, text } => vec![format!("{label}: {text}")],
        }
    }
}
