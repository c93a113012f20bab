//! Paragraph and run level compaction

use crate::constants::{pt_to_half_points, pt_to_twips};
use crate::docx::Element;
use crate::options::LayoutOptions;

/// Child sequence of `w:pPr`
const P_PR_ORDER: &[&str] = &[
    "w:pStyle",
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:framePr",
    "w:widowControl",
    "w:numPr",
    "w:suppressLineNumbers",
    "w:pBdr",
    "w:shd",
    "w:tabs",
    "w:suppressAutoHyphens",
    "w:kinsoku",
    "w:wordWrap",
    "w:overflowPunct",
    "w:topLinePunct",
    "w:autoSpaceDE",
    "w:autoSpaceDN",
    "w:bidi",
    "w:adjustRightInd",
    "w:snapToGrid",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:mirrorIndents",
    "w:suppressOverlap",
    "w:jc",
    "w:textDirection",
    "w:textAlignment",
    "w:textboxTightWrap",
    "w:outlineLvl",
    "w:divId",
    "w:cnfStyle",
    "w:rPr",
    "w:sectPr",
    "w:pPrChange",
];

/// Child sequence of `w:rPr`
const R_PR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
    "w:rPrChange",
];

/// Elements that make a paragraph worth keeping even without text
const EMBEDDED_CONTENT: &[&str] = &["w:drawing", "w:pict", "w:object", "m:oMath", "m:oMathPara"];

/// Spacing attributes that would override explicit before/after values
const AUTO_SPACING: &[&str] = &[
    "w:beforeAutospacing",
    "w:afterAutospacing",
    "w:beforeLines",
    "w:afterLines",
];

/// Indent attributes replaced by the minimal indent
const INDENT_OVERRIDES: &[&str] = &[
    "w:start",
    "w:end",
    "w:hanging",
    "w:leftChars",
    "w:rightChars",
    "w:startChars",
    "w:endChars",
    "w:hangingChars",
    "w:firstLineChars",
];

pub(crate) fn has_picture(paragraph: &Element) -> bool {
    ["w:drawing", "w:pict"]
        .iter()
        .any(|name| paragraph.contains(name))
}

fn is_blank(paragraph: &Element) -> bool {
    paragraph.text_of("w:t").trim().is_empty()
        && !EMBEDDED_CONTENT.iter().any(|name| paragraph.contains(name))
        // Section breaks ride on paragraph properties
        && !paragraph.contains("w:sectPr")
}

/// Delete top-level body paragraphs with no visible text and no embedded
/// content. Table cells are left alone: each needs at least one paragraph.
pub fn remove_blank_paragraphs(body: &mut Element) -> usize {
    body.retain_elements(|el| !(el.name == "w:p" && is_blank(el)))
}

/// Zero paragraph spacing and apply the tight line pitch
pub(crate) fn compact_paragraphs(body: &mut Element, layout: &LayoutOptions) {
    let line = pt_to_twips(layout.line_spacing_pt);
    let indent = layout.paragraph_indent_pt.map(pt_to_twips);

    body.for_each_mut("w:p", &mut |paragraph| {
        // Exact pitch would clip pictures
        let rule = if has_picture(paragraph) {
            "atLeast"
        } else {
            "exact"
        };

        let p_pr = paragraph.ensure_first_child("w:pPr");

        let spacing = p_pr.ensure_child("w:spacing", P_PR_ORDER);
        for attr in AUTO_SPACING {
            spacing.remove_attr(attr);
        }
        spacing.set_attr("w:before", 0);
        spacing.set_attr("w:after", 0);
        spacing.set_attr("w:line", line);
        spacing.set_attr("w:lineRule", rule);

        if let Some(indent) = indent {
            let ind = p_pr.ensure_child("w:ind", P_PR_ORDER);
            for attr in INDENT_OVERRIDES {
                ind.remove_attr(attr);
            }
            ind.set_attr("w:left", indent);
            ind.set_attr("w:right", indent);
            ind.set_attr("w:firstLine", 0);
        }
    });
}

/// Cap run font sizes and strip run styles. Returns how many runs had their
/// size lowered or pinned.
pub(crate) fn cap_runs(body: &mut Element, layout: &LayoutOptions) -> usize {
    let cap = pt_to_half_points(layout.max_font_size_pt);
    let cjk_cap = layout.cjk_max_font_size_pt.map(pt_to_half_points);
    let cjk_font = layout.cjk_font.as_deref();

    let mut capped = 0;
    body.for_each_mut("w:r", &mut |run| {
        let has_cjk = run.text_of("w:t").chars().any(is_cjk);
        let limit = match cjk_cap {
            Some(cjk) if has_cjk => cjk.min(cap),
            _ => cap,
        };

        let r_pr = run.ensure_first_child("w:rPr");
        r_pr.remove_children("w:rStyle");

        // Without an explicit size the run inherits one we can't see
        let mut changed = false;
        for name in ["w:sz", "w:szCs"] {
            let size = r_pr.ensure_child(name, R_PR_ORDER);
            let current = size
                .attr("w:val")
                .and_then(|val| val.trim().parse::<u32>().ok());
            if current.is_none_or(|half_points| half_points > limit) {
                size.set_attr("w:val", limit);
                changed = true;
            }
        }

        if let (true, Some(font)) = (has_cjk, cjk_font) {
            let fonts = r_pr.ensure_child("w:rFonts", R_PR_ORDER);
            fonts.remove_attr("w:eastAsiaTheme");
            fonts.set_attr("w:eastAsia", font);
        }

        if changed {
            capped += 1;
        }
    });
    capped
}

/// Whether `c` is a Chinese, Japanese or Korean character
pub fn is_cjk(c: char) -> bool {
    matches!(
        c,
        '\u{3040}'..='\u{30FF}'     // Hiragana, Katakana
            | '\u{3400}'..='\u{4DBF}' // CJK Extension A
            | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
            | '\u{AC00}'..='\u{D7AF}' // Hangul syllables
            | '\u{F900}'..='\u{FAFF}' // CJK Compatibility Ideographs
            | '\u{FF00}'..='\u{FFEF}' // Half/full-width forms
            | '\u{20000}'..='\u{2FA1F}'
    )
}
