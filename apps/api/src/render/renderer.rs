//! Document Renderer: maps the canonical resume model to a render tree.
//!
//! Header and sections are built without looking at the target, so both
//! targets always agree on section order, inclusion and text. The target only
//! selects the style and whether pagination runs.

use std::collections::HashSet;

use crate::bullets::normalizer::{normalize_highlights, normalize_list, normalize_text, BulletInput};
use crate::coverage::highlighter::{CoverageHighlighter, RenderNode};
use crate::coverage::matcher::normalize_keyword;
use crate::models::{CoverageReview, EducationEntry, JobEntry, Language, Profile, ResumeDocumentModel};
use crate::render::pagination::paginate;
use crate::render::styles::style_for;
use crate::render::tree::{
    Block, EntryBlock, Header, Inline, RenderTarget, RenderedDocument, Section, SectionKind,
    SkillChip,
};

pub const PLACEHOLDER_NAME: &str = "Your Name";
pub const PLACEHOLDER_TITLE: &str = "Resume";
pub const PRESENT: &str = "Present";
pub const CONTACT_SEPARATOR: &str = " • ";

/// Renders `model` for `target`, overlaying `coverage` when supplied.
///
/// Total: every model renders, however sparse. `model` is only read.
pub fn render_resume(
    model: &ResumeDocumentModel,
    coverage: Option<&CoverageReview>,
    target: RenderTarget,
) -> RenderedDocument {
    let highlighter = coverage
        .filter(|c| !c.is_empty())
        .map(|c| CoverageHighlighter::new(&c.covered, &c.missing));
    let ctx = RenderContext {
        highlighter: highlighter.as_ref(),
    };

    let header = build_header(&model.profile, model.linkedin.as_deref());
    let sections = build_sections(model, &ctx);
    let style = style_for(target);
    let page_breaks = paginate(&header, &sections, &style);

    RenderedDocument {
        target,
        title: document_title(&model.profile),
        header,
        sections,
        style,
        page_breaks,
    }
}

struct RenderContext<'a> {
    highlighter: Option<&'a CoverageHighlighter>,
}

impl RenderContext<'_> {
    fn inline(&self, text: &str) -> Inline {
        match self.highlighter {
            Some(h) => h.highlight(text),
            None => vec![RenderNode::text(text)],
        }
    }

    fn bullets(&self, bullets: &[String]) -> Vec<Inline> {
        bullets.iter().map(|b| self.inline(b)).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

fn display_name(profile: &Profile) -> Option<&str> {
    profile.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
}

pub fn document_title(profile: &Profile) -> String {
    match display_name(profile) {
        Some(name) => format!("{name} {PLACEHOLDER_TITLE}"),
        None => PLACEHOLDER_TITLE.to_string(),
    }
}

fn build_header(profile: &Profile, linkedin: Option<&str>) -> Header {
    let name = display_name(profile).unwrap_or(PLACEHOLDER_NAME).to_uppercase();

    let mut contact: Vec<String> = [&profile.location, &profile.phone, &profile.email]
        .into_iter()
        .filter_map(|part| non_blank(part.as_deref()))
        .collect();
    if let Some(url) = non_blank(linkedin) {
        contact.push(format!("LinkedIn: {url}"));
    }

    Header {
        name,
        subtitle: non_blank(profile.title.as_deref()),
        contact_line: contact.join(CONTACT_SEPARATOR),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn build_sections(model: &ResumeDocumentModel, ctx: &RenderContext<'_>) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut push = |kind: SectionKind, blocks: Vec<Block>| {
        if !blocks.is_empty() {
            sections.push(Section {
                kind,
                heading: kind.heading().to_string(),
                blocks,
            });
        }
    };

    let highlights = normalize_highlights(BulletInput::Text(&model.personal_highlights));
    push(
        SectionKind::PersonalHighlights,
        if highlights.is_empty() {
            Vec::new()
        } else {
            vec![Block::Paragraph {
                content: ctx.inline(&highlights),
            }]
        },
    );

    let summary = normalize_list(&model.summary);
    push(
        SectionKind::ProfessionalSummary,
        if summary.is_empty() {
            Vec::new()
        } else {
            vec![Block::BulletList {
                items: ctx.bullets(&summary),
            }]
        },
    );

    push(
        SectionKind::EmploymentHistory,
        model
            .experience
            .iter()
            .filter_map(|job| job_block(job, ctx))
            .collect(),
    );

    push(
        SectionKind::Education,
        model
            .education
            .iter()
            .filter_map(|edu| education_block(edu, ctx))
            .collect(),
    );

    push(SectionKind::AdditionalInformation, additional_blocks(model, ctx));

    sections
}

fn job_block(job: &JobEntry, ctx: &RenderContext<'_>) -> Option<Block> {
    entry_block(
        &job.title,
        &job.company,
        job.location.as_deref(),
        date_range(job.start_date.as_deref(), job.end_date.as_deref(), Some(PRESENT)),
        entry_bullets(&job.bullets, job.fallback_text()),
        ctx,
    )
}

fn education_block(edu: &EducationEntry, ctx: &RenderContext<'_>) -> Option<Block> {
    entry_block(
        &edu.degree,
        &edu.institution,
        edu.location.as_deref(),
        date_range(edu.start_date.as_deref(), edu.end_date.as_deref(), None),
        entry_bullets(&edu.bullets, edu.fallback_text()),
        ctx,
    )
}

/// `None` for an entry with nothing to show.
fn entry_block(
    heading: &str,
    organization: &str,
    location: Option<&str>,
    dates: Option<String>,
    bullets: Vec<String>,
    ctx: &RenderContext<'_>,
) -> Option<Block> {
    let heading = heading.trim();
    let organization = organization.trim();
    if heading.is_empty() && organization.is_empty() && bullets.is_empty() && dates.is_none() {
        return None;
    }

    Some(Block::Entry(EntryBlock {
        heading: heading.to_string(),
        organization: organization.to_string(),
        location: non_blank(location),
        dates,
        bullets: ctx.bullets(&bullets),
    }))
}

/// Explicit bullets win; otherwise the fallback text is normalized into bullets.
fn entry_bullets(bullets: &[String], fallback: Option<&str>) -> Vec<String> {
    let explicit = normalize_list(bullets);
    if !explicit.is_empty() {
        return explicit;
    }
    fallback.map(normalize_text).unwrap_or_default()
}

/// `start - end`. A missing end takes `default_end` when there is a start.
pub fn date_range(start: Option<&str>, end: Option<&str>, default_end: Option<&str>) -> Option<String> {
    let start = non_blank(start);
    let end = non_blank(end);
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{start} - {end}")),
        (Some(start), None) => Some(match default_end {
            Some(default_end) => format!("{start} - {default_end}"),
            None => start,
        }),
        (None, end) => end,
    }
}

fn additional_blocks(model: &ResumeDocumentModel, ctx: &RenderContext<'_>) -> Vec<Block> {
    let mut blocks = Vec::new();

    let skills = dedup_skills(&model.skills);
    if !skills.is_empty() {
        let chips = skills
            .into_iter()
            .map(|text| SkillChip {
                status: ctx.highlighter.and_then(|h| h.classify(&text)),
                text,
            })
            .collect();
        blocks.push(Block::Skills {
            label: "Skills".to_string(),
            chips,
        });
    }

    let languages = dedup_languages(&model.languages);
    if !languages.is_empty() {
        blocks.push(Block::Languages {
            label: "Languages".to_string(),
            items: languages.iter().map(Language::display).collect(),
        });
    }

    let rights = [
        ("Working Rights (Australia)", &model.working_rights_au),
        ("Working Rights (Other)", &model.working_rights_other),
    ];
    for (label, value) in rights {
        if let Some(text) = non_blank(value.as_deref()) {
            blocks.push(Block::WorkingRights {
                label: label.to_string(),
                text,
            });
        }
    }

    blocks
}

/// Drops repeats by normalized form; the first spelling and position win.
pub fn dedup_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(normalize_keyword(s)))
        .map(String::from)
        .collect()
}

/// Drops repeated (language, level) pairs, compared case-insensitively.
pub fn dedup_languages(languages: &[Language]) -> Vec<Language> {
    let mut seen = HashSet::new();
    languages
        .iter()
        .filter(|l| !l.language.trim().is_empty())
        .filter(|l| {
            let key = (
                normalize_keyword(&l.language),
                l.level.as_deref().map(normalize_keyword),
            );
            seen.insert(key)
        })
        .cloned()
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
