use clap::Parser;
use credvault::cli::commands::{self, update::Changes};
use credvault::cli::{output, vault_path, Cli, Commands};
use credvault::errors::Result;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Version and completions never touch a vault, so the path is
    // resolved per arm.
    match cli.command {
        Commands::Version => commands::version::execute(),
        Commands::Completions { shell } => commands::completions::execute(shell),
        Commands::Init => commands::init::execute(&vault_path(cli)?),
        Commands::Add {
            ref fullname,
            ref comment,
            ref password,
        } => commands::add::execute(&vault_path(cli)?, fullname, comment, password.as_deref()),
        Commands::Get {
            ref fullname,
            show_password,
            clipboard,
        } => commands::get::execute(&vault_path(cli)?, fullname, show_password, clipboard),
        Commands::List { show_password } => commands::list::execute(&vault_path(cli)?, show_password),
        Commands::Search {
            ref pattern,
            show_password,
        } => commands::search::execute(&vault_path(cli)?, pattern, show_password),
        Commands::Update {
            ref fullname,
            ref name,
            ref login,
            ref comment,
            ref password,
            change_password,
        } => commands::update::execute(
            &vault_path(cli)?,
            fullname,
            &Changes {
                name: name.as_deref(),
                login: login.as_deref(),
                comment: comment.as_deref(),
                password: password.as_deref(),
                change_password,
            },
        ),
        Commands::Remove {
            ref fullname,
            force,
        } => commands::remove::execute(&vault_path(cli)?, fullname, force),
    }
}

/// Log to stderr, filtered by `CREDVAULT_LOG` (default: warnings only).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("CREDVAULT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("credvault=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
