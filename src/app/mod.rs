use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::glib::Propagation;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, DrawingArea,
    EventControllerKey, GestureClick, Label, Orientation,
};

use crate::batch::{BatchError, BatchTracker};
use crate::error::AppResult;
use crate::geometry::{CanvasPoint, SquareSelection};
use crate::imgproc;
use crate::input::{resolve_shortcut, ShortcutAction, ShortcutKey};
use crate::prepare::prepare_staging;
use crate::session::{CropSession, SessionEffect, SessionEvent};
use crate::ui::{LAYOUT_TOKENS, OVERLAY_PALETTE};
use crate::workspace::Workspace;

mod bootstrap;
mod canvas;

use self::bootstrap::{bootstrap_app_runtime, gtk_launch_args};
use self::canvas::configure_canvas_draw;

const APP_ID: &str = "io.github.squarecrop";
const HELP_TEXT: &str = "Click the upper-left corner of the crop area, then the lower-right. \
The red diagonal shows where the second click snaps to keep the crop square. \
Accept (a) saves the crop, Clear (c) unselects the points, Skip (q) moves on \
without saving, Rotate (r) turns the photo 90 degrees clockwise, Escape exits.";

pub struct App {
    session: CropSession,
}

impl App {
    pub fn new() -> Self {
        Self {
            session: CropSession::new(),
        }
    }

    pub fn start(&mut self) -> AppResult<()> {
        let bootstrap = bootstrap_app_runtime();
        bootstrap.workspace.ensure_directories()?;

        let report = prepare_staging(&bootstrap.workspace, bootstrap.prepare_options)?;
        tracing::info!(
            staged = report.staged,
            skipped = report.skipped_existing,
            unreadable = report.unreadable,
            "staging pass complete"
        );

        let tracker = BatchTracker::scan(
            bootstrap.workspace.staging_dir(),
            bootstrap.workspace.output_dir(),
            bootstrap.startup.redo_crop,
        )?;
        if tracker.is_empty() {
            tracing::info!("no pending images to crop");
            return Ok(());
        }

        let shared_session = Rc::new(RefCell::new(std::mem::take(&mut self.session)));
        let shared_tracker = Rc::new(RefCell::new(tracker));
        let workspace = Rc::new(bootstrap.workspace);

        tracing::info!("starting gtk runtime");
        let application = Application::new(Some(APP_ID), gtk4::gio::ApplicationFlags::NON_UNIQUE);

        let session_for_activate = shared_session.clone();
        let tracker_for_activate = shared_tracker.clone();
        let activate_once = Rc::new(Cell::new(false));
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            build_viewer_window(
                app,
                session_for_activate.clone(),
                tracker_for_activate.clone(),
                workspace.clone(),
            );
        });

        let gtk_args = gtk_launch_args();
        application.run_with_args(&gtk_args);

        self.session = std::mem::take(&mut *shared_session.borrow_mut());
        Ok(())
    }

    pub fn session(&self) -> &CropSession {
        &self.session
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handles for everything an event handler may touch. Cloning is
/// cheap; all mutable state lives behind `Rc<RefCell<...>>`.
#[derive(Clone)]
struct ViewerRuntime {
    session: Rc<RefCell<CropSession>>,
    tracker: Rc<RefCell<BatchTracker>>,
    workspace: Rc<Workspace>,
    pixbuf: Rc<RefCell<Option<Pixbuf>>>,
    canvas: DrawingArea,
    progress_label: Label,
    status_label: Label,
    window: ApplicationWindow,
}

impl ViewerRuntime {
    /// One UI event in, one session transition, one effect out.
    fn dispatch(&self, event: SessionEvent) {
        let effect = self.session.borrow_mut().handle(event);
        self.execute(effect);
    }

    fn execute(&self, effect: SessionEffect) {
        match effect {
            SessionEffect::ShowGuides { .. }
            | SessionEffect::ShowSelection { .. }
            | SessionEffect::ClearOverlays => self.canvas.queue_draw(),
            SessionEffect::SaveCropAndAdvance { selection } => self.save_crop(selection),
            SessionEffect::SkipAndAdvance => {
                self.set_status("Skipped without cropping");
                self.advance_batch();
            }
            SessionEffect::RotateImage => self.rotate_current(),
            SessionEffect::ShowHelp => {
                tracing::info!("{HELP_TEXT}");
                self.set_status(HELP_TEXT);
            }
            SessionEffect::Quit => self.window.close(),
            SessionEffect::Ignored => {}
        }
    }

    fn set_status(&self, message: &str) {
        self.status_label.set_text(message);
    }

    fn current_entry(&self) -> Option<std::path::PathBuf> {
        self.tracker.borrow().current().map(Path::to_path_buf)
    }

    fn save_crop(&self, selection: SquareSelection) {
        let Some(staged) = self.current_entry() else {
            self.window.close();
            return;
        };
        let dimensions = self
            .pixbuf
            .borrow()
            .as_ref()
            .map(|pixbuf| (pixbuf.width(), pixbuf.height()));
        let Some((width, height)) = dimensions else {
            tracing::warn!("accept with no image loaded; ignoring");
            return;
        };

        let rect = selection.to_pixel_rect(width.max(0) as u32, height.max(0) as u32);
        let Some(rect) = rect else {
            tracing::warn!(?selection, "selection lies outside the image; not saved");
            self.set_status("Selection lies outside the image; click again");
            self.canvas.queue_draw();
            return;
        };

        let output = self.workspace.output_path_for(&staged);
        match imgproc::crop_to_file(&staged, &output, rect) {
            Ok((width, height)) => {
                let name = staged.file_name().unwrap_or_default().to_string_lossy();
                self.set_status(&format!("Saved {name} ({width}x{height})"));
                self.advance_batch();
            }
            Err(err) => {
                tracing::error!(%err, "failed to save crop");
                self.set_status("Failed to save crop, see log");
                self.canvas.queue_draw();
            }
        }
    }

    fn rotate_current(&self) {
        let Some(staged) = self.current_entry() else {
            return;
        };
        match imgproc::rotate_in_place(&staged) {
            Ok((width, height)) => {
                self.set_status(&format!("Rotated to {width}x{height}"));
                self.show_image(&staged);
            }
            Err(err) => {
                tracing::error!(%err, "failed to rotate image");
                self.set_status("Failed to rotate image, see log");
            }
        }
    }

    fn advance_batch(&self) {
        let next = {
            let mut tracker = self.tracker.borrow_mut();
            match tracker.advance() {
                Ok(path) => Some(path.to_path_buf()),
                Err(BatchError::EndOfBatch) => None,
                Err(err) => {
                    tracing::error!(%err, "batch advance failed");
                    None
                }
            }
        };

        match next {
            Some(path) => self.show_image(&path),
            None => {
                tracing::info!("batch complete");
                self.update_progress();
                self.window.close();
            }
        }
    }

    /// Loads a staged image and resizes the canvas content to match, keeping
    /// the 1:1 mapping between canvas clicks and image pixels.
    fn show_image(&self, staged: &Path) {
        match Pixbuf::from_file(staged) {
            Ok(loaded) => {
                self.canvas.set_content_width(loaded.width());
                self.canvas.set_content_height(loaded.height());
                *self.pixbuf.borrow_mut() = Some(loaded);
            }
            Err(err) => {
                tracing::error!(path = %staged.display(), %err, "failed to load staged image");
                self.set_status("Failed to load staged image, see log");
                *self.pixbuf.borrow_mut() = None;
            }
        }
        self.update_progress();
        self.canvas.queue_draw();
    }

    fn update_progress(&self) {
        let (done, total) = self.tracker.borrow().progress();
        self.progress_label.set_text(&format!("{done} of {total}"));
    }
}

fn build_viewer_window(
    app: &Application,
    session: Rc<RefCell<CropSession>>,
    tracker: Rc<RefCell<BatchTracker>>,
    workspace: Rc<Workspace>,
) {
    let tokens = LAYOUT_TOKENS;

    let window = ApplicationWindow::new(app);
    window.set_title(Some("squarecrop"));
    window.set_default_size(tokens.window_default_width, tokens.window_default_height);

    let root = GtkBox::new(Orientation::Vertical, tokens.spacing_8);
    root.set_margin_top(tokens.spacing_12);
    root.set_margin_bottom(tokens.spacing_12);
    root.set_margin_start(tokens.spacing_12);
    root.set_margin_end(tokens.spacing_12);

    let progress_label = Label::new(Some("0 of 0"));
    progress_label.set_halign(Align::Start);

    let canvas = DrawingArea::new();
    canvas.set_content_width(tokens.canvas_size);
    canvas.set_content_height(tokens.canvas_size);
    canvas.set_halign(Align::Start);
    canvas.set_valign(Align::Start);

    let button_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    let accept_button = session_button("Accept");
    let rotate_button = session_button("Rotate");
    let clear_button = session_button("Clear");
    let skip_button = session_button("Skip");
    let help_button = session_button("Help");
    let exit_button = session_button("Exit");
    for button in [
        &accept_button,
        &rotate_button,
        &clear_button,
        &skip_button,
        &help_button,
        &exit_button,
    ] {
        button_row.append(button);
    }

    let status_label = Label::new(Some("Click the upper-left corner to begin (h for help)"));
    status_label.set_halign(Align::Start);
    status_label.set_wrap(true);

    root.append(&progress_label);
    root.append(&canvas);
    root.append(&button_row);
    root.append(&status_label);
    window.set_child(Some(&root));

    let pixbuf = Rc::new(RefCell::new(None::<Pixbuf>));
    configure_canvas_draw(
        &canvas,
        session.clone(),
        pixbuf.clone(),
        OVERLAY_PALETTE,
        tokens,
    );

    let runtime = ViewerRuntime {
        session,
        tracker,
        workspace,
        pixbuf,
        canvas: canvas.clone(),
        progress_label,
        status_label,
        window: window.clone(),
    };

    connect_session_button(&accept_button, &runtime, SessionEvent::Accept);
    connect_session_button(&rotate_button, &runtime, SessionEvent::Rotate);
    connect_session_button(&clear_button, &runtime, SessionEvent::Clear);
    connect_session_button(&skip_button, &runtime, SessionEvent::Skip);
    connect_session_button(&help_button, &runtime, SessionEvent::Help);
    connect_session_button(&exit_button, &runtime, SessionEvent::Exit);

    let click_gesture = GestureClick::new();
    click_gesture.set_button(gtk4::gdk::BUTTON_PRIMARY);
    {
        let runtime = runtime.clone();
        click_gesture.connect_pressed(move |_, _, x, y| {
            runtime.dispatch(SessionEvent::CanvasClick(CanvasPoint::new(x, y)));
        });
    }
    canvas.add_controller(click_gesture);

    let key_controller = EventControllerKey::new();
    {
        let runtime = runtime.clone();
        key_controller.connect_key_pressed(move |_, keyval, _, _| {
            let action = shortcut_key_from_gdk(keyval).and_then(resolve_shortcut);
            match action {
                Some(action) => {
                    runtime.dispatch(session_event_for(action));
                    Propagation::Stop
                }
                None => Propagation::Proceed,
            }
        });
    }
    window.add_controller(key_controller);

    if let Some(first) = runtime.current_entry() {
        runtime.show_image(&first);
    }
    window.present();
}

fn session_button(label: &str) -> Button {
    let button = Button::with_label(label);
    button.set_focus_on_click(false);
    button
}

fn connect_session_button(button: &Button, runtime: &ViewerRuntime, event: SessionEvent) {
    let runtime = runtime.clone();
    button.connect_clicked(move |_| runtime.dispatch(event));
}

const fn session_event_for(action: ShortcutAction) -> SessionEvent {
    match action {
        ShortcutAction::Accept => SessionEvent::Accept,
        ShortcutAction::Rotate => SessionEvent::Rotate,
        ShortcutAction::Clear => SessionEvent::Clear,
        ShortcutAction::Skip => SessionEvent::Skip,
        ShortcutAction::Help => SessionEvent::Help,
        ShortcutAction::Exit => SessionEvent::Exit,
    }
}

fn shortcut_key_from_gdk(key: gtk4::gdk::Key) -> Option<ShortcutKey> {
    if key == gtk4::gdk::Key::Escape {
        return Some(ShortcutKey::Escape);
    }
    if key == gtk4::gdk::Key::F1 {
        return Some(ShortcutKey::F1);
    }
    key.to_unicode()
        .filter(|character| !character.is_control())
        .map(|character| ShortcutKey::Character(character.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shortcut_action_maps_to_a_session_event() {
        assert_eq!(
            session_event_for(ShortcutAction::Accept),
            SessionEvent::Accept
        );
        assert_eq!(
            session_event_for(ShortcutAction::Rotate),
            SessionEvent::Rotate
        );
        assert_eq!(session_event_for(ShortcutAction::Clear), SessionEvent::Clear);
        assert_eq!(session_event_for(ShortcutAction::Skip), SessionEvent::Skip);
        assert_eq!(session_event_for(ShortcutAction::Help), SessionEvent::Help);
        assert_eq!(session_event_for(ShortcutAction::Exit), SessionEvent::Exit);
    }

    #[test]
    fn gdk_keys_normalize_to_shortcut_keys() {
        assert_eq!(
            shortcut_key_from_gdk(gtk4::gdk::Key::Escape),
            Some(ShortcutKey::Escape)
        );
        assert_eq!(
            shortcut_key_from_gdk(gtk4::gdk::Key::F1),
            Some(ShortcutKey::F1)
        );
        assert_eq!(
            shortcut_key_from_gdk(gtk4::gdk::Key::a),
            Some(ShortcutKey::Character('a'))
        );
        // Uppercase input folds to the lowercase binding.
        assert_eq!(
            shortcut_key_from_gdk(gtk4::gdk::Key::A),
            Some(ShortcutKey::Character('a'))
        );
    }
}
