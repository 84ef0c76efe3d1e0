use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use litecode::config::Config;
use litecode::reactor::Reactor;
use litecode::shell::Session;
use litecode::shutdown::ShutdownCoordinator;
use litecode::ui::{self, EditorApp};
use litecode::workspace::Workspace;

/// Lightweight editor with an embedded shell.
#[derive(Debug, Parser)]
#[command(name = "litecode", version)]
struct Cli {
    /// Config file (default: <config dir>/litecode/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interpreter to embed, overriding `session.interpreter`.
    #[arg(long)]
    shell: Option<String>,

    /// Bytes read from the shell per readiness notification.
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Workspace directory (default: current directory).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Write logs to this file (logging is off otherwise).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Open FILE and run it in the shell right away.
    #[arg(long, value_name = "FILE")]
    run: Option<PathBuf>,

    /// File to open in the editor.
    file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(shell) = &self.shell {
            config.session.interpreter = shell.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            config.session.read_chunk_size = chunk_size;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid command line overrides")?;

    let log_file =
        litecode::logging::log_path(cli.log_file.as_deref(), config.logging.file.as_deref());
    litecode::logging::init_tracing(&config.logging.level, log_file.as_deref())
        .context("Failed to open log file")?;

    let shutdown = ShutdownCoordinator::new();
    shutdown
        .install_signal_handlers()
        .context("Failed to install signal handlers")?;

    let root = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let mut workspace = Workspace::new(root);
    if let Some(file) = cli.run.as_ref().or(cli.file.as_ref()) {
        workspace.open(file)?;
    }

    let session = Session::launch(&config.session)?;
    let mut app = EditorApp::new(session, workspace, &config);
    let mut reactor = Reactor::new();
    app.attach(&mut reactor)?;

    if cli.run.is_some() {
        // A failed write is already shown in the terminal.
        let _ = app.run_current_file();
    }

    let poll_interval = Duration::from_millis(config.frontend.poll_interval_ms);
    let status = ui::run(app, reactor, shutdown.handle(), poll_interval)?;
    tracing::info!(status = ?status, "Editor closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_session_settings() {
        let cli = Cli::try_parse_from(["litecode", "--shell", "/bin/bash", "--chunk-size", "1024"])
            .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.session.interpreter, "/bin/bash");
        assert_eq!(config.session.read_chunk_size, 1024);
        assert_eq!(config.run.interpreter, "python3");
    }

    #[test]
    fn cli_without_flags_keeps_config() {
        let cli = Cli::try_parse_from(["litecode", "main.py"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
        assert_eq!(cli.file, Some(PathBuf::from("main.py")));
        assert!(cli.run.is_none());
    }
}
