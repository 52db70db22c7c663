use std::fs::{File, OpenOptions};
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scoop::app::{context, AppContext};
use scoop::cli::{commands, Cli, Commands};
use scoop::config::Config;
use scoop::domain::FeedIdentity;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file.
    let log_file = match cli.command {
        Commands::Tui => Some(open_log_file()?),
        _ => None,
    };
    init_tracing(log_file);

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::News {
            category,
            search,
            pages,
        } => {
            let identity = match (category, search) {
                (Some(category), _) => FeedIdentity::category(category),
                (None, Some(query)) => FeedIdentity::search(query),
                (None, None) => FeedIdentity::all(),
            };
            commands::list_news(&ctx, identity, pages).await?;
        }
        Commands::ForYou { pages } => {
            commands::list_news(&ctx, FeedIdentity::personalized(), pages).await?;
        }
        Commands::Show { id } => {
            commands::show_article(&ctx, &id).await?;
        }
        Commands::Refresh => {
            commands::refresh(&ctx).await?;
        }
        Commands::Login { username, password } => {
            commands::login(&ctx, username, password).await?;
        }
        Commands::Signup {
            username,
            email,
            password,
        } => {
            commands::signup(&ctx, username, email, password).await?;
        }
        Commands::Logout => {
            commands::logout(&ctx).await?;
        }
        Commands::Status => {
            commands::status(&ctx).await?;
        }
        Commands::Profile {
            categories,
            sources,
        } => {
            commands::profile(&ctx, &categories, &sources).await?;
        }
        Commands::Tui => {
            scoop::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}

fn open_log_file() -> anyhow::Result<File> {
    let path = context::data_dir()?.join("scoop.log");
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn init_tracing(log_file: Option<File>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(file) => registry
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init(),
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
