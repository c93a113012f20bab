//! Section page setup: orientation, margins, columns and the resulting
//! per-column text width

use crate::constants::*;
use crate::docx::Element;
use crate::options::LayoutOptions;
use crate::types::{Orientation, Strategy};

/// Child sequence of `w:sectPr`
const SECT_PR_ORDER: &[&str] = &[
    "w:headerReference",
    "w:footerReference",
    "w:footnotePr",
    "w:endnotePr",
    "w:type",
    "w:pgSz",
    "w:pgMar",
    "w:paperSrc",
    "w:pgBorders",
    "w:lnNumType",
    "w:pgNumType",
    "w:cols",
    "w:formProt",
    "w:vAlign",
    "w:noEndnote",
    "w:titlePg",
    "w:textDirection",
    "w:bidi",
    "w:rtlGutter",
    "w:docGrid",
    "w:printerSettings",
    "w:sectPrChange",
];

pub(crate) fn apply_page_setup(
    body: &mut Element,
    strategy: Strategy,
    landscape: bool,
    columns: bool,
    layout: &LayoutOptions,
) {
    if !landscape && !columns {
        return;
    }

    // A body without section properties uses Word's defaults; give it a
    // final section so there is something to edit
    if !body.contains("w:sectPr") {
        body.ensure_child("w:sectPr", &[]);
    }

    body.for_each_outermost_mut("w:sectPr", &mut |sect| {
        if landscape {
            set_landscape(sect, layout);
        }
        if columns {
            set_columns(sect, strategy.columns(), layout);
        }
    });
}

fn set_landscape(sect: &mut Element, layout: &LayoutOptions) {
    let (width_mm, height_mm) = layout
        .paper
        .dimensions_with_orientation(Orientation::Landscape);

    let pg_sz = sect.ensure_child("w:pgSz", SECT_PR_ORDER);
    pg_sz.set_attr("w:w", mm_to_twips(width_mm));
    pg_sz.set_attr("w:h", mm_to_twips(height_mm));
    pg_sz.set_attr("w:orient", "landscape");
    // Printer paper code no longer matches the size
    pg_sz.remove_attr("w:code");

    let margin = mm_to_twips(layout.margin_mm);
    let pg_mar = sect.ensure_child("w:pgMar", SECT_PR_ORDER);
    for side in ["w:top", "w:right", "w:bottom", "w:left"] {
        pg_mar.set_attr(side, margin);
    }
    for distance in ["w:header", "w:footer"] {
        if pg_mar.attr(distance).is_none() {
            pg_mar.set_attr(distance, DEFAULT_HEADER_FOOTER_TWIPS);
        }
    }
    if pg_mar.attr("w:gutter").is_none() {
        pg_mar.set_attr("w:gutter", 0);
    }
}

fn set_columns(sect: &mut Element, columns: u8, layout: &LayoutOptions) {
    sect.remove_children("w:cols");

    let cols = sect.ensure_child("w:cols", SECT_PR_ORDER);
    cols.set_attr("w:num", columns);
    cols.set_attr("w:space", pt_to_twips(layout.column_gap_pt));
    if layout.equal_width_columns {
        cols.set_attr("w:equalWidth", 1);
    }
}

/// Text width of one section in twips (page width minus side margins)
fn content_width_twips(sect: &Element) -> i64 {
    let page_width = sect
        .child("w:pgSz")
        .and_then(|sz| sz.attr_i64("w:w"))
        .unwrap_or(WORD_DEFAULT_PAGE_WIDTH_TWIPS);
    let margins = sect.child("w:pgMar");
    let left = margins
        .and_then(|mar| mar.attr_i64("w:left"))
        .unwrap_or(WORD_DEFAULT_MARGIN_TWIPS);
    let right = margins
        .and_then(|mar| mar.attr_i64("w:right"))
        .unwrap_or(WORD_DEFAULT_MARGIN_TWIPS);

    (page_width - left - right).max(0)
}

/// Width available to one column, in EMU
///
/// `(page_width - left_margin - right_margin) / max(columns, 1)`, taken from
/// the narrowest section so content fits wherever it lands.
pub fn column_width_emu(body: &Element, columns: u8) -> i64 {
    let mut sections = Vec::new();
    body.find_outermost("w:sectPr", &mut sections);

    let content_twips = sections
        .iter()
        .map(|sect| content_width_twips(sect))
        .min()
        .unwrap_or(WORD_DEFAULT_PAGE_WIDTH_TWIPS - 2 * WORD_DEFAULT_MARGIN_TWIPS);

    twips_to_emu(content_twips) / i64::from(columns.max(1))
}
