//! Scale drawings down to the column width

use crate::docx::Element;

/// Shrink every inline or anchored drawing wider than `max_width_emu`,
/// preserving aspect ratio. Returns the number of drawings resized.
pub(crate) fn fit_images(body: &mut Element, max_width_emu: i64) -> usize {
    if max_width_emu <= 0 {
        return 0;
    }

    let mut resized = 0;
    for container in ["wp:inline", "wp:anchor"] {
        body.for_each_mut(container, &mut |drawing| {
            if fit_drawing(drawing, max_width_emu) {
                resized += 1;
            }
        });
    }
    resized
}

fn fit_drawing(drawing: &mut Element, max_width: i64) -> bool {
    let Some(extent) = drawing.child_mut("wp:extent") else {
        return false;
    };
    let (Some(cx), Some(cy)) = (extent.attr_i64("cx"), extent.attr_i64("cy")) else {
        return false;
    };
    if cx <= max_width {
        return false;
    }

    let new_cy = (cy as f64 * max_width as f64 / cx as f64).round() as i64;
    extent.set_attr("cx", max_width);
    extent.set_attr("cy", new_cy);

    // The picture's own transform has to agree with the frame
    drawing.for_each_mut("pic:spPr", &mut |shape| {
        if let Some(ext) = shape
            .child_mut("a:xfrm")
            .and_then(|xfrm| xfrm.child_mut("a:ext"))
        {
            ext.set_attr("cx", max_width);
            ext.set_attr("cy", new_cy);
        }
    });

    true
}
