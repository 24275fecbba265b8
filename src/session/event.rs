use crate::geometry::{CanvasPoint, SquareSelection};

/// Closed set of operator inputs the session dispatcher understands. Every
/// UI event (button click, key press, canvas click) maps to exactly one of
/// these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    CanvasClick(CanvasPoint),
    Accept,
    Clear,
    Skip,
    Rotate,
    Help,
    Exit,
}

/// The single side-effecting action the viewer must execute for a
/// transition. The session machine itself never touches the filesystem or
/// the toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEffect {
    /// First click landed: draw the axis guides and the snap diagonal.
    ShowGuides { origin: CanvasPoint },
    /// Second click landed: replace the guides with the snapped selection.
    ShowSelection { selection: SquareSelection },
    SaveCropAndAdvance { selection: SquareSelection },
    SkipAndAdvance,
    RotateImage,
    ClearOverlays,
    ShowHelp,
    Quit,
    /// Event not meaningful in the current phase.
    Ignored,
}
