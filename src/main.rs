use std::path::PathBuf;

use clap::Parser;

use centerline::{logging, CenterError, EnvConfig};

#[derive(Debug, Parser)]
#[command(
    name = "centerline",
    version,
    about = "Show text centered in the terminal, re-centering on every resize"
)]
struct Cli {
    /// File to display. Reads standard input when omitted.
    path: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let config = EnvConfig::from_env();

    let code = match run(cli, &config) {
        Ok(code) => code,
        Err(err) => {
            let diagnostic = err.diagnostic();
            tracing::error!(error = %diagnostic, "fatal");
            eprintln!("centerline: {diagnostic}");
            libc::EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

#[cfg(unix)]
fn run(cli: Cli, config: &EnvConfig) -> Result<i32, CenterError> {
    use std::sync::mpsc;

    use centerline::{
        install_panic_hook, install_signal_events, CenterRuntime, HookTerminal, InputSource,
        ProcessTerminal, Terminal,
    };

    logging::init(config)?;
    let store = InputSource::from_arg(cli.path).load()?;

    // Triggers go in before the cursor is hidden; events queue until the first frame is out.
    let (events_tx, events_rx) = mpsc::channel();
    let probe = ProcessTerminal::new();
    let _signals = install_signal_events(events_tx, move || probe.size())?;
    install_panic_hook(|| HookTerminal::new().restore_cursor());

    let terminal = ProcessTerminal::new().with_write_log(config.write_log.clone());
    let mut runtime = CenterRuntime::new(terminal, store);
    runtime.start()?;
    runtime.run(&events_rx)
}

#[cfg(not(unix))]
fn run(_cli: Cli, config: &EnvConfig) -> Result<i32, CenterError> {
    logging::init(config)?;
    Err(CenterError::SignalRegistration(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "resize notifications require a Unix terminal",
    )))
}
