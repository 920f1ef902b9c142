#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;
pub mod config;
pub mod dates;
pub mod datetime;
pub mod dialog;
pub mod header;
pub mod label;
pub mod navigation;
pub mod picker;
#[cfg(feature = "cli")]
pub mod render;
pub mod view;

pub use dialog::DialogState;
pub use header::{
  Header,
  HeaderLayout,
  HeaderProps,
  NavigationHandler
};
pub use navigation::{
  Action,
  Bounds,
  Navigation
};
pub use picker::{
  PickerField,
  PickerSelection
};
pub use view::View;

#[cfg(feature = "cli")]
use std::ffi::OsString;

#[cfg(feature = "cli")]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  use clap::Parser;

  let cli = cli::GlobalCli::parse_from(
    raw_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  tracing::info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting calnav CLI"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .rc_overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  )?;
  tracing::debug!(
    files = ?cfg.loaded_files,
    "config ready"
  );

  let mut renderer =
    render::Renderer::new(
      &cfg, cli.json
    );

  commands::dispatch(
    &cfg,
    &mut renderer,
    cli.command
  )?;

  tracing::info!("done");
  Ok(())
}
