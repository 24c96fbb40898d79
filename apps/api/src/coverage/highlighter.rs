//! Coverage Highlighter: classifies sentences and keyword spans for display.
//!
//! A sentence is wrapped in a sentence highlight when its normalized text
//! contains any normalized covered/missing keyword, or when the matcher finds
//! an alias of one inside it. Inside a highlighted sentence each keyword
//! occurrence becomes a keyword emphasis tagged `missing` or `covered`.
//! A keyword listed in both sets counts as missing.
//!
//! Input text is never modified: flattening the output nodes gives it back.

use serde::{Deserialize, Serialize};

use crate::coverage::aliases::{expand_keyword, normalize_term};
use crate::coverage::matcher::{normalize_keyword, KeywordMatcher, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Covered,
    Missing,
}

/// Display-ready node. Plain text or a tagged span for the renderer to style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RenderNode {
    Text {
        text: String,
    },
    SentenceHighlight {
        children: Vec<RenderNode>,
    },
    KeywordEmphasis {
        category: Coverage,
        text: String,
        keyword: String,
    },
}

impl RenderNode {
    pub fn text(s: impl Into<String>) -> Self {
        RenderNode::Text { text: s.into() }
    }

    /// Concatenated text content, markup dropped.
    pub fn plain_text(&self) -> String {
        match self {
            RenderNode::Text { text } | RenderNode::KeywordEmphasis { text, .. } => text.clone(),
            RenderNode::SentenceHighlight { children } => plain_text(children),
        }
    }
}

pub fn plain_text(nodes: &[RenderNode]) -> String {
    nodes.iter().map(RenderNode::plain_text).collect()
}

/// A sentence and the whitespace that followed it in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub separator: &'a str,
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
///
/// The whitespace run becomes the separator. Concatenating `text + separator`
/// over all sentences reconstructs the input exactly.
pub fn segment_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(ws_start, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        let mut ws_end = ws_start;
        while let Some(&(i, c)) = chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            ws_end = i + c.len_utf8();
            chars.next();
        }

        sentences.push(Sentence {
            text: &text[start..ws_start],
            separator: &text[ws_start..ws_end],
        });
        start = ws_end;
    }

    if start < text.len() {
        sentences.push(Sentence {
            text: &text[start..],
            separator: "",
        });
    }
    sentences
}

/// Reusable highlighter for one covered/missing review.
pub struct CoverageHighlighter {
    matcher: KeywordMatcher,
    missing_group: usize,
    missing: Vec<String>,
    covered: Vec<String>,
}

impl CoverageHighlighter {
    pub fn new(covered: &[String], missing: &[String]) -> Self {
        let mut matcher = KeywordMatcher::new();
        // Missing first: a keyword in both sets is claimed by the missing group.
        let missing_group = matcher.add_group(missing);
        matcher.add_group(covered);

        Self {
            matcher,
            missing_group,
            missing: normalized_set(missing),
            covered: normalized_set(covered),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.covered.is_empty()
    }

    pub fn highlight(&self, text: &str) -> Vec<RenderNode> {
        if self.is_empty() {
            return vec![RenderNode::text(text)];
        }

        let mut nodes = Vec::new();
        for sentence in segment_sentences(text) {
            let segments = self.matcher.segments(sentence.text);
            let has_keyword = segments.iter().any(|s| matches!(s, Segment::Keyword(_)));

            if has_keyword || self.mentions_keyword(sentence.text) {
                let children = segments
                    .into_iter()
                    .map(|segment| match segment {
                        Segment::Plain(p) => RenderNode::text(p),
                        Segment::Keyword(m) => RenderNode::KeywordEmphasis {
                            category: self.category_of(m.group),
                            text: m.matched,
                            keyword: m.keyword,
                        },
                    })
                    .collect();
                nodes.push(RenderNode::SentenceHighlight { children });
            } else {
                push_text(&mut nodes, sentence.text);
            }
            push_text(&mut nodes, sentence.separator);
        }
        nodes
    }

    /// Coverage status of a short term such as a skill chip.
    ///
    /// A term is missing/covered when its normalized text and a normalized
    /// keyword contain one another, or when the term contains an alias of the
    /// keyword. Missing wins.
    pub fn classify(&self, term: &str) -> Option<Coverage> {
        let normalized = normalize_keyword(term);
        if normalized.is_empty() || self.is_empty() {
            return None;
        }

        if self.missing.iter().any(|kw| contains_either(&normalized, kw)) {
            Some(Coverage::Missing)
        } else if self.covered.iter().any(|kw| contains_either(&normalized, kw)) {
            Some(Coverage::Covered)
        } else {
            None
        }
    }

    fn mentions_keyword(&self, sentence: &str) -> bool {
        let normalized = normalize_keyword(sentence);
        self.missing
            .iter()
            .chain(&self.covered)
            .any(|kw| normalized.contains(kw.as_str()))
    }

    fn category_of(&self, group: usize) -> Coverage {
        if group == self.missing_group {
            Coverage::Missing
        } else {
            Coverage::Covered
        }
    }
}

/// `highlight(text, covered, missing)` for one-off calls.
pub fn highlight_coverage(text: &str, covered: &[String], missing: &[String]) -> Vec<RenderNode> {
    CoverageHighlighter::new(covered, missing).highlight(text)
}

fn normalized_set(keywords: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for kw in keywords {
        let normalized = normalize_keyword(kw);
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

fn contains_either(term: &str, keyword: &str) -> bool {
    term.contains(keyword)
        || keyword.contains(term)
        || expand_keyword(keyword)
            .iter()
            .any(|form| term.contains(normalize_term(form).as_str()))
}

/// Appends plain text, merging into a preceding text node.
fn push_text(nodes: &mut Vec<RenderNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(RenderNode::Text { text: prev }) = nodes.last_mut() {
        prev.push_str(text);
        return;
    }
    nodes.push(RenderNode::text(text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kws(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sentence_with_missing_and_covered_keywords() {
        let nodes = highlight_coverage(
            "Built scalable APIs using .NET and SQL.",
            &kws(&["SQL"]),
            &kws(&[".NET"]),
        );

        assert_eq!(nodes.len(), 1);
        let RenderNode::SentenceHighlight { children } = &nodes[0] else {
            panic!("expected sentence highlight, got {:?}", nodes[0]);
        };
        assert_eq!(
            children,
            &vec![
                RenderNode::text("Built scalable APIs using "),
                RenderNode::KeywordEmphasis {
                    category: Coverage::Missing,
                    text: ".NET".to_string(),
                    keyword: ".NET".to_string(),
                },
                RenderNode::text(" and "),
                RenderNode::KeywordEmphasis {
                    category: Coverage::Covered,
                    text: "SQL".to_string(),
                    keyword: "SQL".to_string(),
                },
                RenderNode::text("."),
            ]
        );
    }

    #[test]
    fn test_no_keywords_is_pass_through() {
        let text = "Anything at all. Even this!";
        assert_eq!(highlight_coverage(text, &[], &[]), vec![RenderNode::text(text)]);
        assert_eq!(
            highlight_coverage(text, &kws(&[" "]), &[]),
            vec![RenderNode::text(text)]
        );
    }

    #[test]
    fn test_only_sentences_with_keywords_are_highlighted() {
        let nodes = highlight_coverage(
            "Led a team of five. Automated reporting in Python.  Won an award!",
            &[],
            &kws(&["python"]),
        );
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], RenderNode::text("Led a team of five. "));
        assert!(matches!(nodes[1], RenderNode::SentenceHighlight { .. }));
        assert_eq!(nodes[2], RenderNode::text("  Won an award!"));
    }

    #[test]
    fn test_substring_rule_highlights_without_emphasis() {
        // "net" is a normalized substring of "internet" but not a bounded match.
        let nodes = highlight_coverage("Scaled internet services.", &kws(&["net"]), &[]);
        let RenderNode::SentenceHighlight { children } = &nodes[0] else {
            panic!("expected sentence highlight");
        };
        assert_eq!(children, &vec![RenderNode::text("Scaled internet services.")]);
    }

    #[test]
    fn test_keyword_in_both_sets_counts_as_missing() {
        let nodes = highlight_coverage("Knows SQL", &kws(&["SQL"]), &kws(&["sql"]));
        let RenderNode::SentenceHighlight { children } = &nodes[0] else {
            panic!("expected sentence highlight");
        };
        assert!(children.iter().any(|n| matches!(
            n,
            RenderNode::KeywordEmphasis {
                category: Coverage::Missing,
                ..
            }
        )));
    }

    #[test]
    fn test_segmentation_is_lossless() {
        let samples = [
            "",
            "One sentence",
            "Ends with stop. ",
            "  Leading space. Two!\n\nThree?   Four.",
            "Version 2.0 shipped. e.g.this stays",
            "Émigré. Naïve?\tDone…",
        ];
        for text in samples {
            let rebuilt: String = segment_sentences(text)
                .iter()
                .map(|s| format!("{}{}", s.text, s.separator))
                .collect();
            assert_eq!(rebuilt, text);
        }
    }

    #[test]
    fn test_segmentation_boundaries() {
        let sentences = segment_sentences("A. B!  C?\nD");
        let texts: Vec<&str> = sentences.iter().map(|s| s.text).collect();
        let seps: Vec<&str> = sentences.iter().map(|s| s.separator).collect();
        assert_eq!(texts, vec!["A.", "B!", "C?", "D"]);
        assert_eq!(seps, vec![" ", "  ", "\n", ""]);
    }

    #[test]
    fn test_highlight_output_flattens_to_input() {
        let text = "Used SQL daily.  Shipped .NET apps!\nMentored juniors. Loved Excel";
        let nodes = highlight_coverage(text, &kws(&["Excel"]), &kws(&[".NET", "SQL"]));
        assert_eq!(plain_text(&nodes), text);
    }

    #[test]
    fn test_classify_skill_terms() {
        let highlighter = CoverageHighlighter::new(&kws(&["Python"]), &kws(&["Advanced Excel", ".NET"]));
        assert_eq!(highlighter.classify("Excel"), Some(Coverage::Missing));
        assert_eq!(highlighter.classify("ASP.NET Core"), Some(Coverage::Missing));
        assert_eq!(highlighter.classify("dotnet"), Some(Coverage::Missing));
        assert_eq!(highlighter.classify("python"), Some(Coverage::Covered));
        assert_eq!(highlighter.classify("Python 3"), Some(Coverage::Covered));
        assert_eq!(highlighter.classify("R"), None);
        assert_eq!(highlighter.classify(""), None);
    }

    #[test]
    fn test_classify_uses_normalized_containment() {
        let highlighter = CoverageHighlighter::new(&[], &kws(&["Excel"]));
        assert_eq!(highlighter.classify("ExcelVBA"), Some(Coverage::Missing));
        assert_eq!(highlighter.classify("  ms   EXCEL "), Some(Coverage::Missing));
        assert_eq!(highlighter.classify("Word"), None);

        let highlighter = CoverageHighlighter::new(&kws(&["SQL Server"]), &[]);
        assert_eq!(highlighter.classify("sql"), Some(Coverage::Covered));
    }

    const TERMS: [&str; 8] = ["SQL", ".NET", "Power BI", "k8s", "net", "Excel", "C#", "APIs"];

    fn terms() -> impl Strategy<Value = Vec<String>> {
        prop::sample::subsequence(TERMS.to_vec(), 0..=4)
            .prop_map(|picked| picked.into_iter().map(String::from).collect())
    }

    proptest! {
        #[test]
        fn prop_segmentation_is_lossless(text in "(\\PC|[\n\t .!?])*") {
            let rebuilt: String = segment_sentences(&text)
                .iter()
                .map(|s| format!("{}{}", s.text, s.separator))
                .collect();
            prop_assert_eq!(rebuilt, text);
        }

        #[test]
        fn prop_highlight_never_alters_text(
            text in "(\\PC|[\n .!?]|SQL|\\.NET|Power BI|k8s)*",
            covered in terms(),
            missing in terms()
        ) {
            let nodes = highlight_coverage(&text, &covered, &missing);
            prop_assert_eq!(plain_text(&nodes), text);
        }
    }
}
