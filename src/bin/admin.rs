//! CLI administration tool for contacts-api.
//!
//! Manages user accounts and performs database checks without going through
//! the HTTP API. Typical use is bootstrapping the first admin account, since
//! roles cannot be changed over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (confirmed, interactive prompts for missing values)
//! cargo run --bin admin -- user create --username root --email root@example.com --role admin
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Confirm an email without the confirmation link
//! cargo run --bin admin -- user confirm alice@example.com
//!
//! # Change a role
//! cargo run --bin admin -- user role alice@example.com moderator
//!
//! # Show statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `REDIS_URL` or `REDIS_HOST`/`REDIS_PORT`/`REDIS_PASSWORD`/`REDIS_DB`: the
//!   service's user cache. `user confirm` and `user role` evict the account
//!   from it so the running service sees the change on the next request.

use contacts_api::application::services::UserService;
use contacts_api::config::Config;
use contacts_api::domain::entities::{NewUser, UserRole, normalize_email};
use contacts_api::domain::repositories::UserRepository;
use contacts_api::infrastructure::cache::{CacheService, NullCache, RedisCache};
use contacts_api::infrastructure::persistence::PgUserRepository;
use contacts_api::utils::gravatar::gravatar_url;
use contacts_api::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing contacts-api.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// List accounts
    List {
        #[arg(long, default_value_t = 0)]
        skip: i64,

        #[arg(long, default_value_t = 100)]
        limit: i64,
    },

    /// Create a confirmed account
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// user, moderator or admin
        #[arg(short, long, default_value = "user")]
        role: UserRole,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Mark an email as confirmed
    Confirm { email: String },

    /// Change an account's role
    Role { email: String, role: UserRole },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::List { skip, limit } => list_users(&repo, skip, limit).await,
        UserAction::Create {
            username,
            email,
            role,
            yes,
        } => create_user(&repo, username, email, role, yes).await,
        UserAction::Confirm { email } => {
            let service = UserService::new(Arc::new(repo), connect_cache().await?);
            confirm_user(&service, &normalize_email(&email)).await
        }
        UserAction::Role { email, role } => {
            let service = UserService::new(Arc::new(repo), connect_cache().await?);
            set_role(&service, &normalize_email(&email), role).await
        }
    }
}

/// Lists accounts ordered by ID.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   ID   Username             Email                          Role        Confirmed
///   ────────────────────────────────────────────────────────────────────────────────
///   1    root                 root@example.com               admin       yes
/// ```
async fn list_users(repo: &PgUserRepository, skip: i64, limit: i64) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = repo
        .list(skip, limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<30} {:<11} {}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Confirmed".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for user in &users {
        let confirmed = if user.confirmed {
            "yes".green()
        } else {
            "no".red()
        };

        println!(
            "  {:<4} {:<20} {:<30} {:<11} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            user.role.as_str(),
            confirmed
        );
    }

    println!();
    println!("  Shown: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Creates a confirmed account, prompting for anything not given as a flag.
///
/// The password is always read interactively so it never lands in shell history.
async fn create_user(
    repo: &PgUserRepository,
    username: Option<String>,
    email: Option<String>,
    role: UserRole,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = normalize_email(&email);

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if password.len() < 6 {
        anyhow::bail!("Password must be at least 6 characters");
    }

    println!();
    println!("  Username: {}", username.cyan());
    println!("  Email:    {}", email.cyan());
    println!("  Role:     {}", role.as_str().bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = repo
        .create(NewUser {
            username,
            avatar: Some(gravatar_url(&email)),
            email,
            hashed_password: hash_password(&password)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?,
            confirmed: true,
            role,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ User created with ID".green().bold(),
        user.id.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Opens the service's Redis cache, or a no-op cache when none is configured.
///
/// An unreachable Redis is an error: the account would stay cached with its
/// old role or confirmation state.
async fn connect_cache() -> Result<Arc<dyn CacheService>> {
    match Config::load_redis_url() {
        Some(url) => {
            let cache = RedisCache::connect(&url, 1)
                .await
                .context("Redis is configured but unreachable; cached users cannot be evicted")?;
            Ok(Arc::new(cache))
        }
        None => Ok(Arc::new(NullCache::new())),
    }
}

async fn confirm_user(service: &UserService<PgUserRepository>, email: &str) -> Result<()> {
    service
        .confirm_account(email)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to confirm {}: {}", email, e))?;

    println!("{} {}", "✅ Email confirmed:".green().bold(), email.cyan());
    Ok(())
}

async fn set_role(
    service: &UserService<PgUserRepository>,
    email: &str,
    role: UserRole,
) -> Result<()> {
    let user = service
        .change_role(email, role)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to change role of {}: {}", email, e))?;

    println!(
        "{} {} → {}",
        "✅ Role updated:".green().bold(),
        user.email.cyan(),
        user.role.as_str().bright_yellow()
    );
    Ok(())
}

/// Displays account and contact counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let unconfirmed_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE confirmed = FALSE")
            .fetch_one(pool)
            .await?;

    let contacts_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
        .fetch_one(pool)
        .await?;

    println!(
        "  Users:             {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Unconfirmed users: {}",
        unconfirmed_count.to_string().bright_green().bold()
    );
    println!(
        "  Contacts:          {}",
        contacts_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
