pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scoop")]
#[command(about = "A terminal client for the DailyScoop news API", long_about = None)]
pub struct Cli {
    /// Server to talk to (overrides `[api] base_url` in the config file)
    #[arg(long, env = "SCOOP_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the latest news, optionally filtered
    News {
        /// Only show articles from this category
        #[arg(short, long, conflicts_with = "search")]
        category: Option<String>,

        /// Full-text search across titles and summaries
        #[arg(short, long)]
        search: Option<String>,

        /// Number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// List articles picked from your preferences
    ForYou {
        /// Number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one article, including its AI summary
    Show {
        /// Article id as printed by `news`
        id: String,
    },
    /// Ask the server to pull fresh articles from its sources
    Refresh,
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "SCOOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "SCOOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the saved session
    Logout,
    /// Show who is logged in
    Status,
    /// Show or change your feed preferences
    Profile {
        /// Toggle a preferred category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Toggle a preferred source (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,
    },
    /// Launch the TUI
    Tui,
}
