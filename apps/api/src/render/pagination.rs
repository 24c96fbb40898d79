//! Pagination estimate for the portable target.
//!
//! Every block is measured by greedy word-wrap against an average glyph
//! width, then blocks are packed onto pages in order. A block is never split;
//! a section heading stays with its first block. The result is a list of
//! block-level page breaks, not exact line positions.

use crate::render::styles::{DocumentStyle, PageGeometry};
use crate::render::tree::{Block, BlockRef, Header, PageBreak, Section};

// ────────────────────────────────────────────────────────────────────────────
// Word-wrap
// ────────────────────────────────────────────────────────────────────────────

/// Average-width text metrics at one font size, in points.
#[derive(Debug, Clone, Copy)]
pub struct WrapMetrics {
    pub glyph_width: f32,
    pub space_width: f32,
}

impl WrapMetrics {
    pub fn new(font_size: f32, average_glyph_em: f32) -> Self {
        let glyph_width = font_size * average_glyph_em;
        Self {
            glyph_width,
            space_width: glyph_width,
        }
    }

    fn measure(&self, word: &str) -> f32 {
        word.chars().count() as f32 * self.glyph_width
    }
}

/// Number of lines `text` occupies when greedily wrapped at `max_width`.
/// Empty or whitespace-only text takes no lines.
pub fn wrap_lines(text: &str, max_width: f32, metrics: &WrapMetrics) -> u32 {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return 0;
    };

    let mut lines = 1u32;
    let mut current_width = metrics.measure(first);

    for word in words {
        let word_w = metrics.measure(word);
        if current_width + metrics.space_width + word_w > max_width {
            lines += 1;
            current_width = word_w;
        } else {
            current_width += metrics.space_width + word_w;
        }
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Page packing
// ────────────────────────────────────────────────────────────────────────────

struct Measure<'a> {
    style: &'a DocumentStyle,
    page: &'a PageGeometry,
    body: WrapMetrics,
}

impl Measure<'_> {
    fn line(&self, size: f32) -> f32 {
        size * self.style.line_height
    }

    fn text(&self, text: &str, indent: f32) -> f32 {
        let width = self.page.text_width() - indent;
        wrap_lines(text, width, &self.body) as f32 * self.line(self.style.body_size)
    }

    fn header(&self, header: &Header) -> f32 {
        let mut height = self.line(self.style.name_size);
        if header.subtitle.is_some() {
            height += self.line(self.style.heading_size);
        }
        height + self.text(&header.contact_line, 0.0)
    }

    fn section_heading(&self) -> f32 {
        self.style.section_gap + self.line(self.style.heading_size)
    }

    fn block(&self, block: &Block) -> f32 {
        let indent = self.style.bullet_indent;
        match block {
            Block::Entry(entry) => {
                // Heading line, organization/date line, then the bullets.
                let bullets: f32 = block
                    .text_lines()
                    .iter()
                    .skip(2 + usize::from(entry.dates.is_some()))
                    .map(|b| self.text(b, indent))
                    .sum();
                2.0 * self.line(self.style.body_size) + bullets + self.style.entry_gap
            }
            Block::BulletList { .. } => block
                .text_lines()
                .iter()
                .map(|item| self.text(item, indent))
                .sum(),
            _ => block
                .text_lines()
                .iter()
                .map(|line| self.text(line, 0.0))
                .sum(),
        }
    }
}

/// Block-level page breaks for a paginated style. Unpaginated styles have none.
pub fn paginate(header: &Header, sections: &[Section], style: &DocumentStyle) -> Vec<PageBreak> {
    let Some(page) = &style.page else {
        return Vec::new();
    };
    let measure = Measure {
        style,
        page,
        body: WrapMetrics::new(style.body_size, page.average_glyph_em),
    };

    let available = page.text_height();
    let mut used = measure.header(header);
    let mut page_number = 1u32;
    let mut breaks = Vec::new();

    for (section_idx, section) in sections.iter().enumerate() {
        for (block_idx, block) in section.blocks.iter().enumerate() {
            let mut height = measure.block(block);
            if block_idx == 0 {
                height += measure.section_heading();
            }

            if used > 0.0 && used + height > available {
                page_number += 1;
                breaks.push(PageBreak {
                    before: BlockRef {
                        section: section_idx,
                        block: block_idx,
                    },
                    page: page_number,
                });
                used = 0.0;
            }
            used += height;
        }
    }

    breaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::highlighter::RenderNode;
    use crate::render::styles::style_for;
    use crate::render::tree::{EntryBlock, RenderTarget, SectionKind};

    fn metrics() -> WrapMetrics {
        WrapMetrics::new(10.0, 0.5)
    }

    fn header() -> Header {
        Header {
            name: "JANE DOE".to_string(),
            subtitle: None,
            contact_line: "Sydney • jane@example.com".to_string(),
        }
    }

    fn entry(bullets: usize) -> Block {
        Block::Entry(EntryBlock {
            heading: "Analyst".to_string(),
            organization: "Acme".to_string(),
            location: None,
            dates: Some("2020 - Present".to_string()),
            bullets: (0..bullets)
                .map(|i| vec![RenderNode::text(format!("Delivered outcome number {i} for the team"))])
                .collect(),
        })
    }

    fn employment(entries: usize) -> Section {
        Section {
            kind: SectionKind::EmploymentHistory,
            heading: SectionKind::EmploymentHistory.heading().to_string(),
            blocks: (0..entries).map(|_| entry(4)).collect(),
        }
    }

    #[test]
    fn test_wrap_lines_empty_returns_zero() {
        assert_eq!(wrap_lines("", 100.0, &metrics()), 0);
        assert_eq!(wrap_lines("   \n", 100.0, &metrics()), 0);
    }

    #[test]
    fn test_wrap_lines_single_word_one_line() {
        // A word wider than the line still occupies exactly one line.
        assert_eq!(wrap_lines("Supercalifragilistic", 10.0, &metrics()), 1);
    }

    #[test]
    fn test_wrap_lines_greedy() {
        // 5pt per glyph and per space: "aaaa bbbb" is 45pt wide.
        assert_eq!(wrap_lines("aaaa bbbb", 45.0, &metrics()), 1);
        assert_eq!(wrap_lines("aaaa bbbb", 44.0, &metrics()), 2);
        assert_eq!(wrap_lines("aaaa bbbb cccc", 50.0, &metrics()), 2);
    }

    #[test]
    fn test_screen_style_has_no_page_breaks() {
        let sections = vec![employment(40)];
        assert!(paginate(&header(), &sections, &style_for(RenderTarget::Screen)).is_empty());
    }

    #[test]
    fn test_short_document_fits_one_page() {
        let sections = vec![employment(2)];
        assert!(paginate(&header(), &sections, &style_for(RenderTarget::Portable)).is_empty());
    }

    #[test]
    fn test_long_document_breaks_between_blocks() {
        let sections = vec![employment(30)];
        let breaks = paginate(&header(), &sections, &style_for(RenderTarget::Portable));

        assert!(!breaks.is_empty());
        assert_eq!(breaks[0].page, 2);
        for pair in breaks.windows(2) {
            assert_eq!(pair[1].page, pair[0].page + 1);
            assert!(pair[1].before.block > pair[0].before.block);
        }
        assert!(breaks.iter().all(|b| b.before.block > 0));
    }
}
