//! `Trustmark` - command-line host for sender whitelists
//!
//! Reads and edits the same per-account allow-lists and display settings the
//! in-page indicator uses, backed by a local `SQLite` database.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trustmark_core::{
    Flag, Identity, ListKind, Settings, SqliteStorage, WhitelistStore, config, domain,
};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "trustmark")]
#[command(about = "Manage sender whitelists for webmail trust indicators")]
struct Args {
    /// Account number, as in `/mail/u/<n>/`
    #[arg(short, long, value_name = "N", default_value = "0", conflicts_with = "url")]
    account: String,

    /// Resolve the account from a page URL instead
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Database path
    #[arg(short, long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show both lists of the account
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Tell whether a sender is whitelisted
    Check { email: String },
    /// Whitelist a whole domain
    AddDomain { domain: String },
    /// Whitelist a single address
    AddEmail { email: String },
    /// Remove a domain entry
    RemoveDomain { domain: String },
    /// Remove an address entry
    RemoveEmail { email: String },
    /// Apply the click-to-toggle policy to a sender
    Toggle { email: String },
    /// Empty both lists of the account
    Clear,
    /// Show display settings
    Settings,
    /// Change a display setting (icon, domain, highlight)
    Set { flag: String, value: Switch },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
}

impl Switch {
    const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let path = database_path(args.database)?;
    info!(database = %path.display(), "opening whitelist storage");
    let storage = SqliteStorage::new(&path.to_string_lossy())
        .await
        .context("failed to open database")?;

    let identity = match args.url {
        Some(url) => Identity::from_page_url(&url)?,
        None => Identity::new(args.account),
    };
    debug!(%identity, "resolved account");

    match args.command {
        Command::Settings => {
            let settings = Settings::load(&storage).await?;
            for flag in Flag::ALL {
                println!(
                    "{:<28} {}",
                    flag.display_name(),
                    if settings.flag(flag) { "on" } else { "off" }
                );
            }
        }
        Command::Set { flag, value } => {
            let Some(parsed) = Flag::parse(&flag) else {
                bail!("unknown setting '{flag}' (expected icon, domain or highlight)");
            };
            config::set_flag(&storage, parsed, value.enabled()).await?;
            println!(
                "{}: {}",
                parsed.display_name(),
                if value.enabled() { "on" } else { "off" }
            );
        }
        command => run_list_command(WhitelistStore::load(storage, identity).await?, command)
            .await?,
    }

    Ok(())
}

async fn run_list_command(
    mut store: WhitelistStore<SqliteStorage>,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::List { json } => {
            let lists = store.lists();
            if json {
                println!("{}", serde_json::to_string_pretty(lists)?);
            } else {
                println!("Domains:");
                for d in &lists.domains {
                    println!("  {d}");
                }
                println!("Emails:");
                for e in &lists.emails {
                    println!("  {e}");
                }
            }
        }
        Command::Check { email } => {
            let verdict = if store.is_allowed(&email) {
                "whitelisted"
            } else {
                "not whitelisted"
            };
            println!("{email} ({}): {verdict}", domain(&email)?);
        }
        Command::AddDomain { domain } => {
            println!("{}", store.add(ListKind::Domain, &domain).await?);
        }
        Command::AddEmail { email } => {
            println!("{}", store.add(ListKind::Email, &email).await?);
        }
        Command::RemoveDomain { domain } => remove(&mut store, ListKind::Domain, &domain).await?,
        Command::RemoveEmail { email } => remove(&mut store, ListKind::Email, &email).await?,
        Command::Toggle { email } => {
            println!("{}", store.toggle_sender(&email).await?);
        }
        Command::Clear => {
            store.clear().await?;
            println!("Cleared all whitelists for account {}", store.identity());
        }
        Command::Settings | Command::Set { .. } => {}
    }
    Ok(())
}

async fn remove(
    store: &mut WhitelistStore<SqliteStorage>,
    kind: ListKind,
    value: &str,
) -> anyhow::Result<()> {
    match store.remove(kind, value).await? {
        Some(change) => println!("{change}"),
        None => println!("{value} is not in the {} whitelist", kind.noun()),
    }
    Ok(())
}

fn database_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => dirs::data_dir()
            .context("no data directory for this platform; pass --database")?
            .join("trustmark")
            .join("trustmark.db"),
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(path)
}

fn setup_tracing(verbose: bool) {
    let default_filter = if verbose {
        "trustmark=debug,trustmark_core=debug"
    } else {
        "trustmark=info,trustmark_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
