pub mod app;
pub mod batch;
mod config;
pub mod error;
pub mod geometry;
pub mod imgproc;
pub mod input;
pub mod logging;
pub mod prepare;
pub mod session;
pub mod ui;
pub mod workspace;

pub use error::{AppError, AppResult};

/// Entrypoint used by the CLI binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting squarecrop");

    let mut app = app::App::new();
    app.start()?;

    tracing::info!("session finished with phase={:?}", app.session().phase());
    Ok(())
}
