use crate::geometry::{CanvasPoint, SquareSelection};

/// Selection progress for the image currently on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropPhase {
    #[default]
    Empty,
    HasUpperLeft {
        upper_left: CanvasPoint,
    },
    HasBothPoints {
        selection: SquareSelection,
    },
}

impl CropPhase {
    pub fn upper_left(&self) -> Option<CanvasPoint> {
        match self {
            Self::Empty => None,
            Self::HasUpperLeft { upper_left } => Some(*upper_left),
            Self::HasBothPoints { selection } => Some(selection.upper_left),
        }
    }

    pub fn selection(&self) -> Option<SquareSelection> {
        match self {
            Self::HasBothPoints { selection } => Some(*selection),
            _ => None,
        }
    }
}
