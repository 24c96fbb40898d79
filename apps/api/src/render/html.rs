//! Print-ready HTML for a rendered document.
//!
//! The markup is identical across targets except for the stylesheet, the
//! skills layout and page-break markers, mirroring the render tree itself.

use std::collections::HashSet;

use crate::coverage::highlighter::{Coverage, RenderNode};
use crate::render::styles::{DocumentStyle, SkillsLayout};
use crate::render::tree::{Block, BlockRef, EntryBlock, RenderTarget, RenderedDocument, SkillChip};

pub fn to_html(doc: &RenderedDocument) -> String {
    let breaks: HashSet<(usize, usize)> = doc
        .page_breaks
        .iter()
        .map(|b| (b.before.section, b.before.block))
        .collect();
    let breaks_before = |at: BlockRef| breaks.contains(&(at.section, at.block));

    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(&doc.title)));
    out.push_str(&format!("<style>\n{}</style>\n", stylesheet(&doc.style)));
    out.push_str("</head>\n");
    out.push_str(&format!(
        "<body class=\"target-{}\">\n<main class=\"resume\">\n",
        target_name(doc.target)
    ));

    // Header
    out.push_str("<header class=\"resume-header\">\n");
    out.push_str(&format!("<h1 class=\"name\">{}</h1>\n", escape_html(&doc.header.name)));
    if let Some(subtitle) = &doc.header.subtitle {
        out.push_str(&format!("<p class=\"subtitle\">{}</p>\n", escape_html(subtitle)));
    }
    if !doc.header.contact_line.is_empty() {
        out.push_str(&format!(
            "<p class=\"contact\">{}</p>\n",
            escape_html(&doc.header.contact_line)
        ));
    }
    out.push_str("</header>\n");

    for (section_idx, section) in doc.sections.iter().enumerate() {
        // A break before the first block moves the whole section, heading included.
        let section_break = breaks_before(BlockRef {
            section: section_idx,
            block: 0,
        });
        out.push_str(&format!(
            "<section class=\"section {}{}\">\n<h2>{}</h2>\n",
            section_class(section.kind.heading()),
            if section_break { " page-break" } else { "" },
            escape_html(&section.heading)
        ));

        for (block_idx, block) in section.blocks.iter().enumerate() {
            let page_break = block_idx > 0
                && breaks_before(BlockRef {
                    section: section_idx,
                    block: block_idx,
                });
            write_block(&mut out, block, &doc.style.skills_layout, page_break);
        }
        out.push_str("</section>\n");
    }

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn write_block(out: &mut String, block: &Block, skills_layout: &SkillsLayout, page_break: bool) {
    let brk = if page_break { " page-break" } else { "" };
    match block {
        Block::Paragraph { content } => {
            out.push_str(&format!("<p class=\"paragraph{brk}\">{}</p>\n", inline_html(content)));
        }
        Block::BulletList { items } => {
            out.push_str(&format!("<ul class=\"bullets{brk}\">\n"));
            for item in items {
                out.push_str(&format!("<li>{}</li>\n", inline_html(item)));
            }
            out.push_str("</ul>\n");
        }
        Block::Entry(entry) => write_entry(out, entry, brk),
        Block::Skills { label, chips } => write_skills(out, label, chips, skills_layout, brk),
        Block::Languages { label, items } => {
            let items: Vec<String> = items.iter().map(|i| escape_html(i)).collect();
            out.push_str(&format!(
                "<p class=\"languages{brk}\"><strong>{}:</strong> {}</p>\n",
                escape_html(label),
                items.join(", ")
            ));
        }
        Block::WorkingRights { label, text } => {
            out.push_str(&format!(
                "<p class=\"working-rights{brk}\"><strong>{}:</strong> {}</p>\n",
                escape_html(label),
                escape_html(text)
            ));
        }
    }
}

fn write_entry(out: &mut String, entry: &EntryBlock, brk: &str) {
    out.push_str(&format!("<div class=\"entry{brk}\">\n<div class=\"entry-head\">"));
    out.push_str(&format!(
        "<span class=\"entry-title\">{}</span>",
        escape_html(&entry.heading)
    ));
    if let Some(dates) = &entry.dates {
        out.push_str(&format!("<span class=\"entry-dates\">{}</span>", escape_html(dates)));
    }
    out.push_str("</div>\n<div class=\"entry-org\">");
    out.push_str(&format!(
        "<span class=\"organization\">{}</span>",
        escape_html(&entry.organization)
    ));
    if let Some(location) = &entry.location {
        out.push_str(&format!("<span class=\"location\">{}</span>", escape_html(location)));
    }
    out.push_str("</div>\n");

    if !entry.bullets.is_empty() {
        out.push_str("<ul class=\"bullets\">\n");
        for bullet in &entry.bullets {
            out.push_str(&format!("<li>{}</li>\n", inline_html(bullet)));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</div>\n");
}

fn write_skills(out: &mut String, label: &str, chips: &[SkillChip], layout: &SkillsLayout, brk: &str) {
    match layout {
        SkillsLayout::Chips => {
            out.push_str(&format!(
                "<div class=\"skills{brk}\"><strong>{}:</strong>\n<ul class=\"chips\">\n",
                escape_html(label)
            ));
            for chip in chips {
                out.push_str(&format!(
                    "<li class=\"chip{}\">{}</li>\n",
                    status_class(chip.status),
                    escape_html(&chip.text)
                ));
            }
            out.push_str("</ul>\n</div>\n");
        }
        SkillsLayout::Inline { separator } => {
            let skills: Vec<String> = chips
                .iter()
                .map(|chip| {
                    format!(
                        "<span class=\"skill{}\">{}</span>",
                        status_class(chip.status),
                        escape_html(&chip.text)
                    )
                })
                .collect();
            out.push_str(&format!(
                "<p class=\"skills{brk}\"><strong>{}:</strong> {}</p>\n",
                escape_html(label),
                skills.join(&escape_html(separator))
            ));
        }
    }
}

pub fn inline_html(nodes: &[RenderNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            RenderNode::Text { text } => out.push_str(&escape_html(text)),
            RenderNode::SentenceHighlight { children } => {
                out.push_str("<span class=\"sentence-highlight\">");
                out.push_str(&inline_html(children));
                out.push_str("</span>");
            }
            RenderNode::KeywordEmphasis {
                category,
                text,
                keyword,
            } => out.push_str(&format!(
                "<mark class=\"keyword-emphasis{}\" data-keyword=\"{}\">{}</mark>",
                status_class(Some(*category)),
                escape_html(keyword),
                escape_html(text)
            )),
        }
    }
    out
}

fn status_class(status: Option<Coverage>) -> &'static str {
    match status {
        Some(Coverage::Covered) => " covered",
        Some(Coverage::Missing) => " missing",
        None => "",
    }
}

fn target_name(target: RenderTarget) -> &'static str {
    match target {
        RenderTarget::Screen => "screen",
        RenderTarget::Portable => "portable",
    }
}

fn section_class(heading: &str) -> String {
    heading.to_lowercase().replace(' ', "-")
}

fn stylesheet(style: &DocumentStyle) -> String {
    let u = style.unit.suffix();
    let mut css = String::new();

    if let Some(page) = &style.page {
        css.push_str(&format!(
            "@page {{ size: {}; margin: {}{u}; }}\n",
            page.paper, page.margin
        ));
    }
    css.push_str(&format!(
        "body {{ font-family: {}; font-size: {}{u}; line-height: {}; color: #222; margin: 0; }}\n",
        style.body_font, style.body_size, style.line_height
    ));
    css.push_str(&format!(
        ".resume-header {{ text-align: center; margin-bottom: {}{u}; }}\n",
        style.section_gap
    ));
    css.push_str(&format!(
        ".name {{ font-family: {}; font-size: {}{u}; letter-spacing: 0.04em; margin: 0; }}\n",
        style.heading_font, style.name_size
    ));
    css.push_str(".subtitle, .contact { margin: 0; }\n");
    css.push_str(&format!(
        ".section {{ margin-top: {}{u}; }}\n.section h2 {{ font-family: {}; font-size: {}{u}; color: {}; border-bottom: 1px solid {}; margin: 0 0 {}{u}; }}\n",
        style.section_gap,
        style.heading_font,
        style.heading_size,
        style.accent_color,
        style.accent_color,
        style.entry_gap / 2.0
    ));
    css.push_str(&format!(
        ".entry {{ margin-bottom: {}{u}; }}\n.entry-head {{ display: flex; justify-content: space-between; }}\n",
        style.entry_gap
    ));
    css.push_str(".entry-title, .organization { font-weight: bold; }\n");
    css.push_str(".location { font-style: italic; margin-left: 0.5em; }\n");
    css.push_str(&format!(
        ".bullets {{ margin: 0; padding-left: {}{u}; }}\n",
        style.bullet_indent
    ));
    css.push_str(".chips { list-style: none; display: flex; flex-wrap: wrap; gap: 0.4em; padding: 0; margin: 0.3em 0 0; }\n");
    css.push_str(".chip { border: 1px solid #bbb; border-radius: 1em; padding: 0.1em 0.7em; }\n");
    css.push_str(".sentence-highlight { background: #fff6d5; }\n");
    css.push_str(".keyword-emphasis { background: none; font-weight: bold; }\n");
    css.push_str(".keyword-emphasis.covered, .chip.covered, .skill.covered { color: #1b7a3a; }\n");
    css.push_str(".keyword-emphasis.missing, .chip.missing, .skill.missing { color: #b3261e; }\n");
    css.push_str(".chip.covered { border-color: #1b7a3a; }\n.chip.missing { border-color: #b3261e; }\n");
    if style.page.is_some() {
        css.push_str(".page-break { break-before: page; }\n");
        css.push_str(".entry, .section h2 { break-inside: avoid; }\n");
    }
    css
}

/// Escape special HTML characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoverageReview, JobEntry, ResumeDocumentModel};
    use crate::render::renderer::render_resume;
    use serde_json::json;

    fn model() -> ResumeDocumentModel {
        serde_json::from_value(json!({
            "profile": {"name": "Jane <Doe>", "email": "jane@example.com"},
            "summary": ["Shipped .NET & SQL tooling"],
            "skills": ["SQL", "Excel"]
        }))
        .unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\" 'd'"), "a &lt; b &amp; &quot;c&quot; &#39;d&#39;");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = to_html(&render_resume(&model(), None, RenderTarget::Screen));
        assert!(html.contains("<h1 class=\"name\">JANE &lt;DOE&gt;</h1>"));
        assert!(html.contains("Shipped .NET &amp; SQL tooling"));
        assert!(!html.contains("<DOE>"));
    }

    #[test]
    fn test_coverage_classes() {
        let review = CoverageReview {
            covered: vec!["SQL".to_string()],
            missing: vec![".NET".to_string()],
        };
        let html = to_html(&render_resume(&model(), Some(&review), RenderTarget::Screen));
        assert!(html.contains("<span class=\"sentence-highlight\">"));
        assert!(html.contains("<mark class=\"keyword-emphasis missing\" data-keyword=\".NET\">.NET</mark>"));
        assert!(html.contains("<mark class=\"keyword-emphasis covered\" data-keyword=\"SQL\">SQL</mark>"));
        assert!(html.contains("<li class=\"chip covered\">SQL</li>"));
        assert!(html.contains("<li class=\"chip\">Excel</li>"));
    }

    #[test]
    fn test_portable_skills_inline_and_page_rules() {
        let html = to_html(&render_resume(&model(), None, RenderTarget::Portable));
        assert!(html.contains("@page { size: A4;"));
        assert!(html.contains("<span class=\"skill\">SQL</span> • <span class=\"skill\">Excel</span>"));
        assert!(!html.contains("class=\"chips\""));
    }

    #[test]
    fn test_portable_page_breaks_are_marked() {
        let mut model = model();
        model.experience = (0..30)
            .map(|i| JobEntry {
                title: format!("Role {i}"),
                company: "Acme".to_string(),
                bullets: vec!["Delivered a measurable improvement to the team".to_string(); 4],
                ..Default::default()
            })
            .collect();

        let doc = render_resume(&model, None, RenderTarget::Portable);
        assert!(!doc.page_breaks.is_empty());
        let html = to_html(&doc);
        assert!(html.contains(".page-break { break-before: page; }"));
        assert!(html.contains("class=\"entry page-break\""));

        let screen = to_html(&render_resume(&model, None, RenderTarget::Screen));
        assert!(!screen.contains("page-break"));
    }
}
