use std::path::PathBuf;

use crate::config::{
    load_app_config, DEFAULT_INPUT_DIR, DEFAULT_MAX_PIXEL_AREA, DEFAULT_OUTPUT_DIR,
    DEFAULT_STAGING_DIR,
};
use crate::prepare::PrepareOptions;
use crate::workspace::Workspace;

/// Process-argument flags. Everything else about the session comes from
/// `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct StartupConfig {
    /// Re-crop staged files that already have an output.
    pub(super) redo_crop: bool,
    /// Re-stage input files that already have a staged copy.
    pub(super) force_restage: bool,
    pub(super) workdir: Option<PathBuf>,
}

impl StartupConfig {
    pub(super) fn from_args() -> Self {
        Self::from_iter(std::env::args().skip(1))
    }

    fn from_iter(mut args: impl Iterator<Item = String>) -> Self {
        let mut config = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--redo" => config.redo_crop = true,
                "--restage" => config.force_restage = true,
                "--workdir" => match args.next() {
                    Some(value) => config.workdir = Some(PathBuf::from(value)),
                    None => tracing::warn!("--workdir requires a path argument"),
                },
                other => tracing::warn!(flag = other, "ignoring unknown startup flag"),
            }
        }
        config
    }
}

pub(super) struct AppBootstrap {
    pub(super) startup: StartupConfig,
    pub(super) workspace: Workspace,
    pub(super) prepare_options: PrepareOptions,
}

pub(super) fn bootstrap_app_runtime() -> AppBootstrap {
    let startup = StartupConfig::from_args();
    let config = load_app_config();

    let root = startup
        .workdir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let workspace = Workspace::under_root(
        &root,
        config.input_dir.as_deref().unwrap_or(DEFAULT_INPUT_DIR),
        config.staging_dir.as_deref().unwrap_or(DEFAULT_STAGING_DIR),
        config.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR),
    );

    let prepare_options = PrepareOptions {
        max_pixel_area: config.max_pixel_area.unwrap_or(DEFAULT_MAX_PIXEL_AREA),
        force_restage: startup.force_restage,
        filter: config.resize_filter.unwrap_or_default().to_filter_type(),
    };

    tracing::info!(
        input = %workspace.input_dir().display(),
        max_pixel_area = prepare_options.max_pixel_area,
        redo = startup.redo_crop,
        restage = startup.force_restage,
        "resolved session configuration"
    );

    AppBootstrap {
        startup,
        workspace,
        prepare_options,
    }
}

/// Pass only argv[0] to GTK so app-specific flags (e.g. `--redo`) do not
/// fail GTK's own argument parsing.
pub(super) fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}
