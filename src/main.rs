//! Cadastre CLI - Case management for mining permits

use cadastre::cli::{commands, Cli, Commands};
use cadastre::errors::to_exit_code;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> cadastre::Result<()> {
    let cwd = cli.cwd.as_deref();
    match cli.command {
        Some(Commands::Init { force }) => commands::init::run(cwd, force).await,
        Some(Commands::Login { email, password }) => {
            commands::login::run(cwd, &email, &password).await
        }
        Some(Commands::Logout) => commands::login::logout(cwd).await,
        Some(Commands::Whoami) => commands::login::whoami(cwd).await,
        Some(Commands::Permits {
            code,
            entity,
            substance,
            status,
            from,
            to,
            json,
        }) => {
            let args = commands::permits::PermitArgs {
                code,
                entity,
                substance,
                status,
                from,
                to,
            };
            commands::permits::run(cwd, args, json).await
        }
        Some(Commands::Permit { code, json }) => commands::permits::show(cwd, &code, json).await,
        Some(Commands::Procedures {
            code,
            procedure_type,
            status,
            entity,
            json,
        }) => {
            commands::procedures::run(
                cwd,
                code,
                procedure_type.as_deref(),
                status.as_deref(),
                entity,
                json,
            )
            .await
        }
        Some(Commands::Procedure { code, json }) => {
            commands::procedures::show(cwd, &code, json).await
        }
        Some(Commands::Documents {
            search,
            status,
            doc_type,
            entity,
            json,
        }) => {
            commands::documents::run(
                cwd,
                search,
                status.as_deref(),
                doc_type.as_deref(),
                entity,
                json,
            )
            .await
        }
        Some(Commands::ValidateDocument {
            procedure,
            document,
            status,
            comment,
        }) => commands::documents::validate(cwd, &procedure, &document, &status, comment).await,
        Some(Commands::Step {
            procedure,
            step_id,
            outcome,
            comment,
        }) => commands::step::run(cwd, &procedure, &step_id, &outcome, comment).await,
        Some(Commands::Pending { json }) => commands::committee::pending(cwd, json).await,
        Some(Commands::Decide {
            procedure,
            decision,
            comment,
            note,
        }) => {
            commands::committee::decide(cwd, &procedure, decision.as_deref(), comment, note).await
        }
        Some(Commands::Suspend { procedure }) => commands::status::suspend(cwd, &procedure).await,
        Some(Commands::Resume { procedure }) => commands::status::resume(cwd, &procedure).await,
        Some(Commands::Apply { file }) => commands::apply::run(cwd, &file).await,
        Some(Commands::Stats { json }) => commands::stats::run(cwd, json).await,
        Some(Commands::Entities { json }) => commands::reference::entities(cwd, json).await,
        Some(Commands::Substances { json }) => commands::reference::substances(cwd, json).await,
        Some(Commands::Check) => commands::check::run(cwd).await,
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
