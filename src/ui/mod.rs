mod style;

pub use style::{OverlayColor, OverlayPalette, StyleTokens, LAYOUT_TOKENS, OVERLAY_PALETTE};
