//! Resume edits as values: each edit takes the current model and returns a new one.
//!
//! There is no "currently editing" pointer anywhere; the caller owns the model
//! and passes it back in with the next edit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::resume::{EducationEntry, JobEntry, Language, Profile, ResumeDocumentModel};
use super::text_or_list::{summary_entries, TextOrList};
use crate::bullets::normalizer::normalize_highlights;
use crate::coverage::matcher::normalize_keyword;

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("{section} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        section: &'static str,
        index: usize,
        len: usize,
    },
}

/// A single edit descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ResumeEdit {
    SetProfile { profile: Profile },
    SetSummary { summary: TextOrList },
    SetPersonalHighlights { highlights: TextOrList },
    AddExperience { entry: JobEntry },
    UpdateExperience { index: usize, entry: JobEntry },
    RemoveExperience { index: usize },
    MoveExperience { from: usize, to: usize },
    AddEducation { entry: EducationEntry },
    UpdateEducation { index: usize, entry: EducationEntry },
    RemoveEducation { index: usize },
    SetSkills { skills: Vec<String> },
    AddSkill { skill: String },
    RemoveSkill { skill: String },
    SetLanguages { languages: Vec<Language> },
    SetWorkingRights {
        #[serde(default)]
        au: Option<String>,
        #[serde(default)]
        other: Option<String>,
    },
    SetLinkedin {
        #[serde(default)]
        url: Option<String>,
    },
}

/// Applies `edit` to a copy of `model`.
pub fn apply_edit(
    model: &ResumeDocumentModel,
    edit: ResumeEdit,
) -> Result<ResumeDocumentModel, EditError> {
    let mut next = model.clone();

    match edit {
        ResumeEdit::SetProfile { profile } => next.profile = profile,
        ResumeEdit::SetSummary { summary } => next.summary = summary_entries(&summary),
        ResumeEdit::SetPersonalHighlights { highlights } => {
            next.personal_highlights = normalize_highlights(highlights.as_input())
        }
        ResumeEdit::AddExperience { entry } => next.experience.push(entry),
        ResumeEdit::UpdateExperience { index, entry } => {
            *slot_mut(&mut next.experience, index, "experience")? = entry
        }
        ResumeEdit::RemoveExperience { index } => {
            check_index(&next.experience, index, "experience")?;
            next.experience.remove(index);
        }
        ResumeEdit::MoveExperience { from, to } => {
            check_index(&next.experience, from, "experience")?;
            check_index(&next.experience, to, "experience")?;
            let entry = next.experience.remove(from);
            next.experience.insert(to, entry);
        }
        ResumeEdit::AddEducation { entry } => next.education.push(entry),
        ResumeEdit::UpdateEducation { index, entry } => {
            *slot_mut(&mut next.education, index, "education")? = entry
        }
        ResumeEdit::RemoveEducation { index } => {
            check_index(&next.education, index, "education")?;
            next.education.remove(index);
        }
        ResumeEdit::SetSkills { skills } => {
            next.skills = skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }
        ResumeEdit::AddSkill { skill } => {
            let skill = skill.trim();
            if !skill.is_empty() {
                next.skills.push(skill.to_string());
            }
        }
        ResumeEdit::RemoveSkill { skill } => {
            let target = normalize_keyword(&skill);
            next.skills.retain(|s| normalize_keyword(s) != target);
        }
        ResumeEdit::SetLanguages { languages } => next.languages = languages,
        ResumeEdit::SetWorkingRights { au, other } => {
            next.working_rights_au = non_blank(au);
            next.working_rights_other = non_blank(other);
        }
        ResumeEdit::SetLinkedin { url } => next.linkedin = non_blank(url),
    }

    Ok(next)
}

fn check_index<T>(items: &[T], index: usize, section: &'static str) -> Result<(), EditError> {
    if index >= items.len() {
        return Err(EditError::IndexOutOfRange {
            section,
            index,
            len: items.len(),
        });
    }
    Ok(())
}

fn slot_mut<'a, T>(
    items: &'a mut [T],
    index: usize,
    section: &'static str,
) -> Result<&'a mut T, EditError> {
    let len = items.len();
    items.get_mut(index).ok_or(EditError::IndexOutOfRange {
        section,
        index,
        len,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
