//! Keyword Matcher: finds keyword occurrences in free text.
//!
//! Every keyword is expanded into surface forms (itself, aliases, simple
//! morphological variants). Each form becomes one case-insensitive pattern:
//! - single-word forms must sit on word boundaries (never inside a larger word);
//! - multi-word forms match as literal substrings, any whitespace run between words.
//!
//! Scanning repeatedly takes the earliest occurrence in the unconsumed tail,
//! preferring the longest candidate on ties. Offsets always refer to the
//! original text, so the caller's casing and formatting survive.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

use crate::coverage::aliases::{expand_keyword, normalize_term};

/// Normalized form used for keyword equality and containment checks.
/// Never used for slicing.
pub fn normalize_keyword(s: &str) -> String {
    normalize_term(s)
}

/// One keyword occurrence. `start..end` is a byte range into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// The keyword as the caller supplied it.
    pub keyword: String,
    /// Normalized keyword.
    pub canonical: String,
    /// The matched slice of the original text.
    pub matched: String,
    /// Index of the keyword group this match came from (see [`KeywordMatcher::add_group`]).
    #[serde(skip)]
    pub group: usize,
}

/// A piece of scanned text: untouched plain text or a keyword occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Keyword(Match),
}

struct Candidate {
    pattern: Regex,
    bounded: bool,
    form_len: usize,
    keyword: String,
    canonical: String,
    group: usize,
}

impl Candidate {
    /// Earliest acceptable occurrence at or after `from`.
    fn find_from(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let mut at = from;
        while at < text.len() {
            let m = self.pattern.find_at(text, at)?;
            if !self.bounded || on_word_boundaries(text, m.start(), m.end()) {
                return Some((m.start(), m.end()));
            }
            at = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

/// A reusable matcher built from one or more keyword groups.
///
/// A keyword (or surface form) claimed by an earlier group is skipped by later
/// groups, so group order decides which group wins a shared term.
#[derive(Default)]
pub struct KeywordMatcher {
    candidates: Vec<Candidate>,
    seen_keywords: HashSet<String>,
    seen_forms: HashSet<String>,
    groups: usize,
}

impl KeywordMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keywords(keywords: &[String]) -> Self {
        let mut matcher = Self::new();
        matcher.add_group(keywords);
        matcher
    }

    /// Adds a keyword group and returns its index.
    pub fn add_group(&mut self, keywords: &[String]) -> usize {
        let group = self.groups;
        self.groups += 1;

        for keyword in keywords {
            let canonical = normalize_keyword(keyword);
            if canonical.is_empty() || !self.seen_keywords.insert(canonical.clone()) {
                continue;
            }

            for form in expand_keyword(keyword) {
                let normalized_form = normalize_term(&form);
                if !self.seen_forms.insert(normalized_form.clone()) {
                    continue;
                }
                let Some(pattern) = build_pattern(&normalized_form) else {
                    continue;
                };
                self.candidates.push(Candidate {
                    pattern,
                    bounded: !normalized_form.contains(' '),
                    form_len: normalized_form.chars().count(),
                    keyword: keyword.trim().to_string(),
                    canonical: canonical.clone(),
                    group,
                });
            }
        }

        // Longest first, so a compound term is never shadowed by a shorter
        // form it contains. Stable: equal lengths keep insertion order.
        self.candidates.sort_by(|a, b| b.form_len.cmp(&a.form_len));
        group
    }

    /// All non-overlapping keyword occurrences, in text order.
    ///
    /// Each candidate's next acceptable occurrence is cached and only looked
    /// up again once the scan position has moved past it, so every candidate
    /// walks the text once.
    pub fn find_matches(&self, text: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut next: Vec<Option<(usize, usize)>> = self
            .candidates
            .iter()
            .map(|candidate| candidate.find_from(text, 0))
            .collect();
        let mut pos = 0;

        while pos < text.len() {
            let mut best: Option<(usize, usize, usize)> = None;

            for (i, candidate) in self.candidates.iter().enumerate() {
                if matches!(next[i], Some((start, _)) if start < pos) {
                    next[i] = candidate.find_from(text, pos);
                }
                let Some((start, end)) = next[i] else {
                    continue;
                };
                let better = match best {
                    None => true,
                    Some((best_start, best_end, _)) => {
                        start < best_start
                            || (start == best_start && end - start > best_end - best_start)
                    }
                };
                if better {
                    best = Some((start, end, i));
                }
            }

            let Some((start, end, i)) = best else {
                break;
            };
            let candidate = &self.candidates[i];
            matches.push(Match {
                start,
                end,
                keyword: candidate.keyword.clone(),
                canonical: candidate.canonical.clone(),
                matched: text[start..end].to_string(),
                group: candidate.group,
            });
            pos = end;
        }

        matches
    }

    /// Splits `text` into plain and keyword segments. Concatenating the
    /// segment texts gives back `text` exactly.
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for m in self.find_matches(text) {
            if m.start > cursor {
                segments.push(Segment::Plain(&text[cursor..m.start]));
            }
            cursor = m.end;
            segments.push(Segment::Keyword(m));
        }
        if cursor < text.len() {
            segments.push(Segment::Plain(&text[cursor..]));
        }
        segments
    }
}

/// Convenience wrapper: one keyword group, one scan.
pub fn find_matches(text: &str, keywords: &[String]) -> Vec<Match> {
    if keywords.is_empty() {
        return Vec::new();
    }
    KeywordMatcher::from_keywords(keywords).find_matches(text)
}

/// Case-insensitive pattern; words joined by any whitespace run.
fn build_pattern(normalized_form: &str) -> Option<Regex> {
    let body = normalized_form
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!("(?i){body}")).ok()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn on_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn kws(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn matched(text: &str, keywords: &[&str]) -> Vec<String> {
        find_matches(text, &kws(keywords))
            .into_iter()
            .map(|m| m.matched)
            .collect()
    }

    #[test]
    fn test_empty_keywords_return_no_matches() {
        assert!(find_matches("SQL everywhere", &[]).is_empty());
        assert!(find_matches("SQL everywhere", &kws(&["  "])).is_empty());
    }

    #[test]
    fn test_case_insensitive_and_offsets_point_at_original_text() {
        let text = "Wrote sql daily";
        let matches = find_matches(text, &kws(&["SQL"]));
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(&text[m.start..m.end], "sql");
        assert_eq!(m.matched, "sql");
        assert_eq!(m.keyword, "SQL");
        assert_eq!(m.canonical, "sql");
    }

    #[test]
    fn test_single_word_respects_word_boundaries() {
        assert!(matched("Used NoSQLite and JavaScript", &["SQL", "Java"]).is_empty());
        assert_eq!(matched("Java, SQL.", &["SQL", "Java"]), vec!["Java", "SQL"]);
    }

    #[test]
    fn test_multi_word_matches_as_literal_substring() {
        assert_eq!(matched("SuperPower BIx", &["Power BI"]), vec!["Power BI"]);
        assert_eq!(matched("Power \n  BI dashboards", &["power bi"]), vec!["Power \n  BI"]);
    }

    #[test]
    fn test_longest_match_wins_at_same_position() {
        assert_eq!(matched("Ran SQL Server", &["SQL", "SQL Server"]), vec!["SQL Server"]);
        assert_eq!(matched("Power BI skills", &["Power", "Power BI"]), vec!["Power BI"]);
    }

    #[test]
    fn test_dotnet_is_not_preempted_by_net() {
        let matches = find_matches("Built .NET apps", &kws(&["net", ".NET"]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, ".NET");
        assert_eq!(matches[0].keyword, ".NET");
    }

    #[test]
    fn test_alias_matches_report_the_supplied_keyword() {
        let matches = find_matches("Deployed k8s clusters on AWS", &kws(&["Kubernetes", "Amazon Web Services"]));
        let pairs: Vec<(&str, &str)> = matches
            .iter()
            .map(|m| (m.matched.as_str(), m.keyword.as_str()))
            .collect();
        assert_eq!(pairs, vec![("k8s", "Kubernetes"), ("AWS", "Amazon Web Services")]);
    }

    #[test]
    fn test_morphological_variant_preferred_over_bounded_stem() {
        assert_eq!(matched("Built scalable APIs", &["API"]), vec!["APIs"]);
    }

    #[test]
    fn test_scans_all_occurrences_in_order() {
        let matches = find_matches("SQL first, then Excel, then sql again", &kws(&["Excel", "SQL"]));
        let found: Vec<&str> = matches.iter().map(|m| m.matched.as_str()).collect();
        assert_eq!(found, vec!["SQL", "Excel", "sql"]);
        assert!(matches.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_duplicate_keywords_are_collapsed() {
        let matches = find_matches("SQL", &kws(&["SQL", "sql", " SQL "]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].keyword, "SQL");
    }

    #[test]
    fn test_segments_reconstruct_text() {
        let matcher = KeywordMatcher::from_keywords(&kws(&["SQL", "C#"]));
        let text = "Wrote C# and SQL, loved SQL";
        let segments = matcher.segments(text);
        let rebuilt: String = segments
            .iter()
            .map(|s| match s {
                Segment::Plain(p) => *p,
                Segment::Keyword(m) => m.matched.as_str(),
            })
            .collect();
        assert_eq!(rebuilt, text);
        assert!(matches!(segments.last(), Some(Segment::Keyword(_))));
    }

    #[test]
    fn test_earlier_group_claims_shared_keyword() {
        let mut matcher = KeywordMatcher::new();
        let first = matcher.add_group(&kws(&["SQL"]));
        let second = matcher.add_group(&kws(&["sql", "Excel"]));
        let groups: Vec<usize> = matcher
            .find_matches("SQL and Excel")
            .iter()
            .map(|m| m.group)
            .collect();
        assert_eq!(groups, vec![first, second]);
    }

    #[test]
    fn test_large_input_scans_in_linear_time() {
        let text = "sql ".repeat(50_000);
        let started = Instant::now();
        let matches = find_matches(&text, &kws(&["SQL", "Excel", "Power BI"]));
        let elapsed = started.elapsed();

        assert_eq!(matches.len(), 50_000);
        assert_eq!((matches[1].start, matches[1].end), (4, 7));
        assert!(elapsed < Duration::from_secs(10), "scan took {elapsed:?}");
    }

    #[test]
    fn test_cached_occurrence_does_not_change_leftmost_longest() {
        let text = "Power BI, SQL Server, SQL and Power users";
        let found = matched(text, &["SQL", "SQL Server", "Power", "Power BI"]);
        assert_eq!(found, vec!["Power BI", "SQL Server", "SQL", "Power"]);
    }

    #[test]
    fn test_unicode_text_offsets_stay_on_char_boundaries() {
        let text = "Équipe gérée — utilisé SQL über";
        let matches = find_matches(text, &kws(&["SQL", "über"]));
        assert_eq!(matches.len(), 2);
        for m in matches {
            assert_eq!(&text[m.start..m.end], m.matched);
        }
    }
}
