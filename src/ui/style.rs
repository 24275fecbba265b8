/// Compile-time layout tokens; these are not user-overridable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleTokens {
    pub spacing_8: i32,
    pub spacing_12: i32,
    /// Canvas size before the first image is loaded; afterwards the canvas
    /// tracks the staged image so clicks map 1:1 to image pixels.
    pub canvas_size: i32,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub guide_line_width: f64,
    pub selection_line_width: f64,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_8: 8,
    spacing_12: 12,
    canvas_size: 600,
    window_default_width: 660,
    window_default_height: 720,
    guide_line_width: 1.0,
    selection_line_width: 2.0,
};

/// Cairo RGB in unit range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl OverlayColor {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPalette {
    /// Horizontal and vertical guides from the first click.
    pub axis_guide: OverlayColor,
    /// The slope-1 diagonal the second click snaps onto.
    pub snap_guide: OverlayColor,
    pub selection: OverlayColor,
}

pub const OVERLAY_PALETTE: OverlayPalette = OverlayPalette {
    axis_guide: OverlayColor::new(1.0, 0.9, 0.2),
    snap_guide: OverlayColor::new(0.9, 0.15, 0.15),
    selection: OverlayColor::new(1.0, 0.9, 0.2),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_tokens_keep_the_classic_canvas_size() {
        assert_eq!(LAYOUT_TOKENS.canvas_size, 600);
    }

    #[test]
    fn window_defaults_leave_room_for_the_canvas() {
        assert!(LAYOUT_TOKENS.window_default_width >= LAYOUT_TOKENS.canvas_size);
        assert!(LAYOUT_TOKENS.window_default_height >= LAYOUT_TOKENS.canvas_size);
    }

    #[test]
    fn snap_guide_is_visually_distinct_from_axis_guides() {
        assert_ne!(OVERLAY_PALETTE.snap_guide, OVERLAY_PALETTE.axis_guide);
    }
}
