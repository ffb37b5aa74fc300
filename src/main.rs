use clap::Parser;
use lockandkey::cli::commands::{self, add::AddArgs, edit::EditArgs};
use lockandkey::cli::{output, Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Log filter variable; falls back to `log_level` from lak.toml.
const LOG_ENV: &str = "LAK_LOG";

fn init_logging() {
    let fallback = lockandkey::cli::settings()
        .map(|s| s.log_level)
        .unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Init { ref from } => commands::init::execute(&cli, from.as_deref()),
        Commands::Add {
            ref name,
            ref login,
            ref website,
            group,
            ref secret,
            generate,
        } => commands::add::execute(
            &cli,
            &AddArgs {
                name: name.as_str(),
                login: login.as_deref(),
                website: website.as_deref(),
                group,
                secret: secret.as_deref(),
                generate,
            },
        ),
        Commands::Edit {
            id,
            ref name,
            ref secret,
            generate,
            ref login,
            ref website,
            group,
            no_group,
        } => commands::edit::execute(
            &cli,
            id,
            &EditArgs {
                name: name.as_deref(),
                secret: secret.as_deref(),
                generate,
                login: login.as_deref(),
                website: website.as_deref(),
                group,
                no_group,
            },
        ),
        Commands::Show { id, reveal } => commands::show::execute(&cli, id, reveal),
        Commands::List {
            ref filter,
            group,
            json,
            reveal,
        } => commands::list::execute(&cli, filter.as_deref(), group, json, reveal),
        Commands::Delete { id, force } => commands::delete::execute(&cli, id, force),
        Commands::Group { ref action } => commands::group::execute(&cli, action),
        Commands::Export { ref file } => commands::export::execute(&cli, file),
        Commands::Import { ref file } => commands::import_cmd::execute(&cli, file),
        Commands::Generate { length, charset } => {
            commands::generate::execute(length, charset)
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
