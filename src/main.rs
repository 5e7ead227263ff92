use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ipm::auth::Authenticator;
use ipm::cli::Cli;
use ipm::commands::Session;
use ipm::config::Config;
use ipm::credentials::KeyringStore;
use ipm::launcher::SystemLauncher;
use ipm::package::IpmFactory;
use ipm::prompt::TerminalPrompt;

fn init_tracing(verbose: bool) {
    let default = if verbose { "ipm=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    init_tracing(cli.verbose);

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{} {:#}, using defaults", "warning:".bright_yellow(), e);
        Config::default()
    });
    tracing::debug!(?config, "loaded configuration");

    let auth = Authenticator::new(
        KeyringStore::new(),
        TerminalPrompt,
        SystemLauncher,
        config.app.access_key_uri.clone(),
    );
    let session = Session::new(auth, IpmFactory::new(config, true));

    let mut stdout = std::io::stdout();
    session.run(cli.command, &mut stdout).await
}
