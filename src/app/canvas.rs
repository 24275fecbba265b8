use std::cell::RefCell;
use std::rc::Rc;

use gtk4::cairo;
use gtk4::gdk::prelude::GdkCairoContextExt;
use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::prelude::*;
use gtk4::DrawingArea;

use crate::geometry::{CanvasPoint, SquareSelection};
use crate::session::{CropPhase, CropSession};
use crate::ui::{OverlayColor, OverlayPalette, StyleTokens};

/// Installs the canvas draw function: the staged image painted 1:1 at the
/// origin, with guide or selection overlays derived from the session phase.
/// Overlays are transient: "clearing" them is just a redraw with an empty
/// phase.
pub(super) fn configure_canvas_draw(
    canvas: &DrawingArea,
    session: Rc<RefCell<CropSession>>,
    pixbuf: Rc<RefCell<Option<Pixbuf>>>,
    palette: OverlayPalette,
    tokens: StyleTokens,
) {
    canvas.set_draw_func(move |_, context, width, height| {
        if width <= 0 || height <= 0 {
            return;
        }

        if let Some(pixbuf) = pixbuf.borrow().as_ref() {
            context.set_source_pixbuf(pixbuf, 0.0, 0.0);
            context.paint().ok();
        }

        match session.borrow().phase() {
            CropPhase::Empty => {}
            CropPhase::HasUpperLeft { upper_left } => {
                draw_guides(context, upper_left, width, height, palette, tokens);
            }
            CropPhase::HasBothPoints { selection } => {
                draw_selection(context, selection, palette, tokens);
            }
        }
    });
}

fn set_color(context: &cairo::Context, color: OverlayColor) {
    context.set_source_rgb(color.r, color.g, color.b);
}

fn draw_guides(
    context: &cairo::Context,
    origin: CanvasPoint,
    width: i32,
    height: i32,
    palette: OverlayPalette,
    tokens: StyleTokens,
) {
    context.set_line_width(tokens.guide_line_width);

    set_color(context, palette.axis_guide);
    context.move_to(origin.x, origin.y);
    context.line_to(f64::from(width), origin.y);
    context.move_to(origin.x, origin.y);
    context.line_to(origin.x, f64::from(height));
    context.stroke().ok();

    // The diagonal the second click will snap onto.
    set_color(context, palette.snap_guide);
    let reach = f64::from(width + height);
    context.move_to(origin.x, origin.y);
    context.line_to(origin.x + reach, origin.y + reach);
    context.stroke().ok();
}

fn draw_selection(
    context: &cairo::Context,
    selection: SquareSelection,
    palette: OverlayPalette,
    tokens: StyleTokens,
) {
    context.set_line_width(tokens.selection_line_width);
    set_color(context, palette.selection);
    context.rectangle(
        selection.upper_left.x,
        selection.upper_left.y,
        selection.side(),
        selection.side(),
    );
    context.stroke().ok();
}
