//! Concrete typography per render target.
//!
//! This is the only place the two targets differ: fonts, units, spacing,
//! how skills are laid out, and (portable only) page geometry.
//!
//! Glyph widths are a single average in em units. That is an approximation;
//! it is good enough to decide block-level page breaks, not line breaks.

use serde::Serialize;

use crate::render::tree::RenderTarget;

/// Points per inch.
const PT_PER_IN: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Px,
    Pt,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Pt => "pt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SkillsLayout {
    /// One discrete chip element per skill.
    Chips,
    /// A single line, skills joined by `separator`.
    Inline { separator: String },
}

/// Paper size and margins, in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub paper: String,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Average glyph advance in em, used by the pagination estimate.
    pub average_glyph_em: f32,
}

impl PageGeometry {
    /// A4 with 0.7" margins.
    pub fn a4() -> Self {
        Self {
            paper: "A4".to_string(),
            width: 595.28,
            height: 841.89,
            margin: 0.7 * PT_PER_IN,
            average_glyph_em: 0.5,
        }
    }

    pub fn text_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn text_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

/// Typography and spacing. All lengths are in `unit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    pub unit: Unit,
    pub body_font: String,
    pub heading_font: String,
    pub name_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    pub section_gap: f32,
    pub entry_gap: f32,
    pub bullet_indent: f32,
    pub accent_color: String,
    pub skills_layout: SkillsLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageGeometry>,
}

pub fn style_for(target: RenderTarget) -> DocumentStyle {
    match target {
        RenderTarget::Screen => DocumentStyle {
            unit: Unit::Px,
            body_font: "Inter, 'Helvetica Neue', Arial, sans-serif".to_string(),
            heading_font: "Inter, 'Helvetica Neue', Arial, sans-serif".to_string(),
            name_size: 28.0,
            heading_size: 16.0,
            body_size: 14.0,
            line_height: 1.5,
            section_gap: 24.0,
            entry_gap: 12.0,
            bullet_indent: 20.0,
            accent_color: "#1f3a5f".to_string(),
            skills_layout: SkillsLayout::Chips,
            page: None,
        },
        RenderTarget::Portable => DocumentStyle {
            unit: Unit::Pt,
            body_font: "Helvetica, Arial, sans-serif".to_string(),
            heading_font: "Helvetica, Arial, sans-serif".to_string(),
            name_size: 20.0,
            heading_size: 12.0,
            body_size: 10.5,
            line_height: 1.35,
            section_gap: 14.0,
            entry_gap: 8.0,
            bullet_indent: 14.0,
            accent_color: "#1f3a5f".to_string(),
            skills_layout: SkillsLayout::Inline {
                separator: " • ".to_string(),
            },
            page: Some(PageGeometry::a4()),
        },
    }
}
