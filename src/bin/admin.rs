//! CLI administration tool for link-tracker.
//!
//! Inspects links, corrects counters, reads daily rollups and provisions
//! accounts directly against the database, without the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show a link by id or alias
//! cargo run --bin admin -- links show spring
//!
//! # Correct counters after removing fraudulent clicks
//! cargo run --bin admin -- links adjust AbCdEfGhIjKl --clicks -12 --conversions -1
//!
//! # Daily totals for the last week
//! cargo run --bin admin -- stats daily --days 7
//!
//! # Create or update an account
//! cargo run --bin admin -- accounts provision --email ops@example.com --name Ops --role admin
//!
//! # List affiliates, deactivate one, remove one
//! cargo run --bin admin -- accounts list --role affiliate
//! cargo run --bin admin -- accounts status --email aff@example.com --status inactive
//! cargo run --bin admin -- accounts delete --email aff@example.com
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use link_tracker::application::services::{AccountService, CounterService, LinkService};
use link_tracker::config::{Config, mask_connection_string};
use link_tracker::domain::entities::{
    Account, AccountStatus, DailyStat, NewAccount, Role, TrackingLink,
};
use link_tracker::infrastructure::cache::NullCache;
use link_tracker::infrastructure::persistence::{
    PgAccountRepository, PgCounterRepository, PgLinkRepository,
};

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeDelta, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::sync::Arc;

/// CLI tool for managing link-tracker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and correct tracking links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },

    /// Manage admin and affiliate accounts
    Accounts {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show a link by id or alias
    Show {
        /// Link id or alias
        token: String,
    },

    /// Apply a signed correction to a link's counters
    Adjust {
        /// Link id
        id: String,

        /// Change to the click counter
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        clicks: i64,

        /// Change to the conversion counter
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        conversions: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum StatsAction {
    /// Per-day click and conversion totals (UTC days)
    Daily {
        /// Number of days to show, today included
        #[arg(short, long, default_value_t = 7)]
        days: i64,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account, or update name and role of an existing email
    Provision {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        name: String,

        /// `admin` or `affiliate`
        #[arg(short, long, default_value = "affiliate")]
        role: Role,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List accounts, optionally of one role
    List {
        /// `admin` or `affiliate`
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Activate or deactivate an account
    Status {
        #[arg(short, long)]
        email: String,

        /// `active` or `inactive`
        #[arg(short, long)]
        status: AccountStatus,
    },

    /// Remove an account; its links keep their affiliate email
    Delete {
        #[arg(short, long)]
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    match cli.command {
        Commands::Links { action } => {
            let pool = connect(&database_url).await?;
            handle_link_action(action, pool).await?;
        }
        Commands::Stats { action } => {
            let pool = connect(&database_url).await?;
            handle_stats_action(action, pool).await?;
        }
        Commands::Accounts { action } => {
            let pool = connect(&database_url).await?;
            handle_account_action(action, &database_url, pool).await?;
        }
        Commands::Db { action } => {
            let pool = connect(&database_url).await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<Arc<PgPool>> {
    let pool = PgPool::connect(database_url).await.with_context(|| {
        format!(
            "Failed to connect to {}",
            mask_connection_string(database_url)
        )
    })?;
    Ok(Arc::new(pool))
}

async fn handle_link_action(action: LinkAction, pool: Arc<PgPool>) -> Result<()> {
    match action {
        LinkAction::Show { token } => {
            let links = LinkService::new(
                Arc::new(PgLinkRepository::new(pool)),
                Arc::new(NullCache::new()),
                0,
            );
            let link = links
                .find(&token)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "🔗 Link".bright_blue().bold());
            println!();
            print_link(&link);
        }
        LinkAction::Adjust {
            id,
            clicks,
            conversions,
            yes,
        } => adjust_counters(pool, id, clicks, conversions, yes).await?,
    }

    Ok(())
}

/// Applies a counter correction after showing the before/after values.
async fn adjust_counters(
    pool: Arc<PgPool>,
    id: String,
    clicks: i64,
    conversions: i64,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "✏️  Adjust Counters".bright_blue().bold());
    println!();

    if clicks == 0 && conversions == 0 {
        println!("{}", "⚠️  Nothing to change".yellow());
        return Ok(());
    }

    let links = LinkService::new(
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(NullCache::new()),
        0,
    );
    let link = links.get(&id).await.map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Link:        {}", link.id.cyan());
    println!(
        "  Clicks:      {} → {}",
        link.clicks,
        (link.clicks + clicks).to_string().bright_white().bold()
    );
    println!(
        "  Conversions: {} → {}",
        link.conversions,
        (link.conversions + conversions).to_string().bright_white().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Apply this correction?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let counters = CounterService::new(Arc::new(PgCounterRepository::new(pool)));
    let updated = counters
        .adjust(&id, clicks, conversions)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to adjust counters: {}", e))?;

    println!();
    println!("{}", "✅ Counters updated".green().bold());
    println!(
        "  Clicks: {}  Conversions: {}",
        updated.clicks.to_string().bright_green(),
        updated.conversions.to_string().bright_green()
    );
    println!();

    Ok(())
}

/// Prints daily totals.
///
/// # Output Format
///
/// ```text
/// 📊 Daily Statistics
///
///   Date         Clicks   Conversions
///   ──────────────────────────────────
///   2026-05-01       42             2
/// ```
async fn handle_stats_action(action: StatsAction, pool: Arc<PgPool>) -> Result<()> {
    let StatsAction::Daily { days } = action;
    let (from, to) = daily_range(Utc::now().date_naive(), days)?;

    let counters = CounterService::new(Arc::new(PgCounterRepository::new(pool)));
    let stats = counters
        .daily_stats(from, to)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "📊 Daily Statistics".bright_blue().bold());
    println!();

    if stats.is_empty() {
        println!("{}", "  No clicks recorded in this range".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:>8} {:>13}",
        "Date".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Conversions".bright_white().bold()
    );
    println!("  {}", "─".repeat(35).bright_black());

    for DailyStat {
        date,
        clicks,
        conversions,
    } in &stats
    {
        println!("  {:<12} {:>8} {:>13}", date.to_string(), clicks, conversions);
    }

    let clicks: i64 = stats.iter().map(|s| s.clicks).sum();
    let conversions: i64 = stats.iter().map(|s| s.conversions).sum();
    println!("  {}", "─".repeat(35).bright_black());
    println!(
        "  {:<12} {:>8} {:>13}",
        "Total".bright_white().bold(),
        clicks.to_string().bright_green().bold(),
        conversions.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// The `days`-day window ending at `today`, both ends inclusive.
fn daily_range(today: NaiveDate, days: i64) -> Result<(NaiveDate, NaiveDate)> {
    anyhow::ensure!(days > 0, "--days must be greater than 0");

    let from = TimeDelta::try_days(days - 1)
        .and_then(|window| today.checked_sub_signed(window))
        .with_context(|| format!("--days {days} reaches before the earliest supported date"))?;

    Ok((from, today))
}

async fn handle_account_action(
    action: AccountAction,
    database_url: &str,
    pool: Arc<PgPool>,
) -> Result<()> {
    let options =
        PgConnectOptions::from_str(database_url).context("Invalid database connection string")?;
    let accounts = AccountService::new(options, Arc::new(PgAccountRepository::new(pool)));

    match action {
        AccountAction::Provision {
            email,
            name,
            role,
            yes,
        } => {
            println!("{}", "👤 Provision Account".bright_blue().bold());
            println!();
            println!("  Email: {}", email.cyan());
            println!("  Name:  {}", name.cyan());
            println!("  Role:  {}", role.to_string().cyan());
            println!();

            if !yes && !confirm("Provision this account?", true)? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            let account = accounts
                .provision(NewAccount { email, name, role })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to provision account: {}", e))?;

            println!("{}", "✅ Account provisioned".green().bold());
            println!("  UID: {}", account.uid.bright_yellow());
            println!();
        }
        AccountAction::List { role } => {
            let list = accounts
                .list(role)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "👥 Accounts".bright_blue().bold());
            println!();

            if list.is_empty() {
                println!("{}", "  No accounts found".yellow());
                return Ok(());
            }

            for account in &list {
                print_account(account);
            }
            println!();
            println!("  Total: {}", list.len().to_string().bright_green().bold());
            println!();
        }
        AccountAction::Status { email, status } => {
            let account = accounts
                .set_status(&email, status)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to change status: {}", e))?;

            println!("{}", "✅ Status updated".green().bold());
            print_account(&account);
            println!();
        }
        AccountAction::Delete { email, yes } => {
            println!("{}", "🗑️  Delete Account".bright_blue().bold());
            println!();
            println!("  Email: {}", email.cyan());
            println!();

            if !yes && !confirm("Delete this account?", false)? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            let account = accounts
                .delete(&email)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to delete account: {}", e))?;

            println!("{}", "✅ Account deleted".green().bold());
            println!("  UID: {}", account.uid.bright_yellow());
            println!();
        }
    }

    Ok(())
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn print_account(account: &Account) {
    let status = match account.status {
        AccountStatus::Active => account.status.to_string().green(),
        AccountStatus::Inactive => account.status.to_string().red(),
    };
    println!(
        "  {:<32} {:<10} {:<9} {}",
        account.email.cyan(),
        account.role.to_string(),
        status,
        account.name
    );
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}

fn print_link(link: &TrackingLink) {
    println!("  ID:          {}", link.id.cyan());
    println!("  Name:        {}", link.name);
    if let Some(alias) = &link.alias {
        println!("  Alias:       {}", alias.cyan());
    }
    println!(
        "  Destination: {}",
        link.original_url.as_deref().unwrap_or("(none)").bright_white()
    );
    if let Some(email) = &link.affiliate_email {
        println!("  Affiliate:   {email}");
    }
    println!(
        "  Policy:      CR {}–{}%, {} conversions / {} clicks",
        link.policy.min_cr,
        link.policy.max_cr,
        link.policy.target_conversions,
        link.policy.target_clicks
    );
    println!(
        "  Counters:    {} clicks, {} conversions ({:.2}%)",
        link.clicks.to_string().bright_green().bold(),
        link.conversions.to_string().bright_green().bold(),
        link.conversion_rate()
    );
    println!(
        "  Created:     {}",
        link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!();
}
