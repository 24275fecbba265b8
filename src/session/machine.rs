use super::{CropPhase, SessionEffect, SessionEvent};
use crate::geometry::{CanvasPoint, SquareSelection};

/// Two-click crop state machine, independent of the GUI toolkit. Phases run
/// `Empty -> HasUpperLeft -> HasBothPoints`; accept, skip, clear, and rotate
/// all fall back to `Empty`.
#[derive(Debug, Default)]
pub struct CropSession {
    phase: CropPhase,
}

impl CropSession {
    pub fn new() -> Self {
        Self {
            phase: CropPhase::Empty,
        }
    }

    pub fn phase(&self) -> CropPhase {
        self.phase
    }

    /// Applies one event and returns the effect the viewer must execute.
    pub fn handle(&mut self, event: SessionEvent) -> SessionEffect {
        tracing::debug!(phase = ?self.phase, event = ?event, "session event");
        match event {
            SessionEvent::CanvasClick(point) => self.handle_click(point),
            SessionEvent::Accept => match self.phase {
                CropPhase::HasBothPoints { selection } => {
                    self.phase = CropPhase::Empty;
                    SessionEffect::SaveCropAndAdvance { selection }
                }
                // Accept without a complete selection is ignored, not surfaced.
                _ => SessionEffect::Ignored,
            },
            SessionEvent::Clear => {
                self.phase = CropPhase::Empty;
                SessionEffect::ClearOverlays
            }
            SessionEvent::Skip => {
                self.phase = CropPhase::Empty;
                SessionEffect::SkipAndAdvance
            }
            SessionEvent::Rotate => {
                // Points are no longer valid once the image geometry changes.
                self.phase = CropPhase::Empty;
                SessionEffect::RotateImage
            }
            SessionEvent::Help => SessionEffect::ShowHelp,
            SessionEvent::Exit => SessionEffect::Quit,
        }
    }

    pub fn reset(&mut self) {
        self.phase = CropPhase::Empty;
    }

    fn handle_click(&mut self, point: CanvasPoint) -> SessionEffect {
        match self.phase {
            CropPhase::Empty => {
                self.phase = CropPhase::HasUpperLeft { upper_left: point };
                SessionEffect::ShowGuides { origin: point }
            }
            CropPhase::HasUpperLeft { upper_left } => {
                let selection = SquareSelection::from_clicks(upper_left, point);
                self.phase = CropPhase::HasBothPoints { selection };
                SessionEffect::ShowSelection { selection }
            }
            CropPhase::HasBothPoints { .. } => SessionEffect::Ignored,
        }
    }
}
