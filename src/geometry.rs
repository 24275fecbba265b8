/// Shared geometric primitives for canvas clicks and square crop selections.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Projects a free-form second click onto the slope-1 diagonal through
/// `upper_left`, yielding the lower-right corner of a true square: the
/// derived point satisfies `x - upper_left.x == y - upper_left.y` no matter
/// where the click actually landed.
pub fn snap_lower_right(upper_left: CanvasPoint, click: CanvasPoint) -> CanvasPoint {
    let dx = click.x - upper_left.x;
    let dy = click.y - upper_left.y;
    let y = upper_left.y + (dx + dy) / 2.0;
    let x = y + upper_left.x - upper_left.y;
    CanvasPoint::new(x, y)
}

/// A two-click crop selection in canvas coordinates. The lower-right corner
/// is always the snapped projection of the second click, so the selection is
/// a true square by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareSelection {
    pub upper_left: CanvasPoint,
    pub lower_right: CanvasPoint,
}

impl SquareSelection {
    pub fn from_clicks(upper_left: CanvasPoint, second_click: CanvasPoint) -> Self {
        Self {
            upper_left,
            lower_right: snap_lower_right(upper_left, second_click),
        }
    }

    pub fn side(&self) -> f64 {
        self.lower_right.x - self.upper_left.x
    }

    /// Materializes the selection as a pixel rectangle, clamped to the image
    /// bounds. Returns `None` when no usable part of the square lies inside
    /// the image (including reversed-click selections with negative extent).
    pub fn to_pixel_rect(&self, image_width: u32, image_height: u32) -> Option<PixelRect> {
        let left = self.upper_left.x.max(0.0);
        let top = self.upper_left.y.max(0.0);
        let right = self.lower_right.x.min(f64::from(image_width));
        let bottom = self.lower_right.y.min(f64::from(image_height));

        if right - left < 1.0 || bottom - top < 1.0 {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rect = PixelRect::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        );
        Some(rect)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_keeps_click_on_the_diagonal_unchanged() {
        let upper_left = CanvasPoint::new(10.0, 10.0);
        let click = CanvasPoint::new(60.0, 60.0);
        assert_eq!(snap_lower_right(upper_left, click), click);
    }

    #[test]
    fn snap_projects_off_diagonal_clicks_onto_the_diagonal() {
        let upper_left = CanvasPoint::new(10.0, 10.0);
        let click = CanvasPoint::new(110.0, 60.0);
        let lower_right = snap_lower_right(upper_left, click);

        // lr.y = ul.y + (dx + dy) / 2, lr.x = lr.y + ul.x - ul.y
        assert_eq!(lower_right, CanvasPoint::new(85.0, 85.0));
    }

    #[test]
    fn snapped_corner_always_forms_a_true_square() {
        let upper_left = CanvasPoint::new(25.0, 40.0);
        let clicks = [
            CanvasPoint::new(125.0, 90.0),
            CanvasPoint::new(90.0, 125.0),
            CanvasPoint::new(25.0, 300.0),
            CanvasPoint::new(300.0, 40.0),
            CanvasPoint::new(0.0, 0.0),
        ];

        for click in clicks {
            let lower_right = snap_lower_right(upper_left, click);
            assert_eq!(
                lower_right.x - upper_left.x,
                lower_right.y - upper_left.y,
                "click {click:?} did not snap to a square"
            );
            let dx = click.x - upper_left.x;
            let dy = click.y - upper_left.y;
            assert_eq!(lower_right.y, upper_left.y + (dx + dy) / 2.0);
        }
    }

    #[test]
    fn selection_side_matches_snapped_extent() {
        let selection = SquareSelection::from_clicks(
            CanvasPoint::new(10.0, 10.0),
            CanvasPoint::new(60.0, 60.0),
        );
        assert_eq!(selection.side(), 50.0);
    }

    #[test]
    fn pixel_rect_is_exact_for_in_bounds_selections() {
        let selection = SquareSelection::from_clicks(
            CanvasPoint::new(10.0, 10.0),
            CanvasPoint::new(60.0, 60.0),
        );
        let rect = selection
            .to_pixel_rect(500, 500)
            .expect("in-bounds selection should materialize");
        assert_eq!(rect, PixelRect::new(10, 10, 50, 50));
    }

    #[test]
    fn pixel_rect_clamps_overhang_to_image_bounds() {
        let selection = SquareSelection::from_clicks(
            CanvasPoint::new(450.0, 450.0),
            CanvasPoint::new(550.0, 550.0),
        );
        let rect = selection
            .to_pixel_rect(500, 500)
            .expect("partially visible selection should materialize");
        assert_eq!(rect, PixelRect::new(450, 450, 50, 50));
    }

    #[test]
    fn pixel_rect_rejects_reversed_selections() {
        let selection = SquareSelection::from_clicks(
            CanvasPoint::new(100.0, 100.0),
            CanvasPoint::new(40.0, 40.0),
        );
        assert_eq!(selection.to_pixel_rect(500, 500), None);
    }

    #[test]
    fn pixel_rect_rejects_selections_fully_outside_the_image() {
        let selection = SquareSelection::from_clicks(
            CanvasPoint::new(600.0, 600.0),
            CanvasPoint::new(700.0, 700.0),
        );
        assert_eq!(selection.to_pixel_rect(500, 500), None);
    }
}
