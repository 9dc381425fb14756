//! CLI administration tool for foodgram.
//!
//! Manages accounts and catalog data, shows statistics, and checks the
//! database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a staff account (interactive prompts)
//! cargo run --bin admin -- user create --staff
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Create and list tags
//! cargo run --bin admin -- tag create Breakfast breakfast
//! cargo run --bin admin -- tag list
//!
//! # Load ingredients from a JSON array of {name, measurement_unit}
//! cargo run --bin admin -- ingredient import data/ingredients.json
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `MEDIA_ROOT`, `MEDIA_URL` (optional, same defaults as the server)

use foodgram::application::services::{CatalogService, Registration, UserService};
use foodgram::config::{DatabaseConfig, MediaConfig};
use foodgram::domain::entities::{NewIngredient, NewTag};
use foodgram::infrastructure::media::{LocalMediaStorage, MediaStorage};
use foodgram::infrastructure::persistence::{
    PgIngredientRepository, PgRecipeRepository, PgSubscriptionRepository, PgTagRepository,
    PgUserRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// Users shown by `user list`.
const USER_LIST_LIMIT: i64 = 100;

/// CLI tool for managing foodgram.
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

    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Manage ingredients
    Ingredient {
        #[command(subcommand)]
        action: IngredientAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an account with interactive prompts
    Create {
        /// Grant staff rights (may edit and delete any recipe)
        #[arg(long)]
        staff: bool,
    },

    /// List accounts
    List,
}

#[derive(Subcommand)]
enum TagAction {
    /// Create a tag
    Create {
        /// Display name, e.g. "Breakfast"
        name: String,

        /// URL slug, e.g. "breakfast"
        slug: String,
    },

    /// List all tags
    List,
}

#[derive(Subcommand)]
enum IngredientAction {
    /// Import ingredients from a JSON file, skipping existing names
    Import {
        /// Path to a JSON array of `{ "name": ..., "measurement_unit": ... }`
        file: PathBuf,
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

    let database = DatabaseConfig::from_env()?;

    let pool = database
        .pool_options()
        .max_connections(2)
        .connect(&database.url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Tag { action } => handle_tag_action(action, &pool).await?,
        Commands::Ingredient { action } => handle_ingredient_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn catalog_service(pool: &PgPool) -> CatalogService<PgTagRepository, PgIngredientRepository> {
    let pool = Arc::new(pool.clone());
    CatalogService::new(
        Arc::new(PgTagRepository::new(pool.clone())),
        Arc::new(PgIngredientRepository::new(pool)),
    )
}

/// Dispatches account commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let media_config = MediaConfig::from_env();
    let media: Arc<dyn MediaStorage> =
        Arc::new(LocalMediaStorage::new(media_config.root, &media_config.url));

    let service = UserService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgSubscriptionRepository::new(pool.clone())),
        Arc::new(PgRecipeRepository::new(pool)),
        media,
    );

    match action {
        UserAction::Create { staff } => {
            println!("{}", "👤 Create User".bright_blue().bold());
            println!();

            let registration = Registration {
                email: Input::new().with_prompt("Email").interact_text()?,
                username: Input::new().with_prompt("Username").interact_text()?,
                first_name: Input::new().with_prompt("First name").interact_text()?,
                last_name: Input::new().with_prompt("Last name").interact_text()?,
                password: Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()?,
            };

            if staff {
                let confirmed = Confirm::new()
                    .with_prompt("Grant staff rights?")
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let user = service
                .register(registration, staff)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            println!();
            println!("{}", "✅ User created successfully!".green().bold());
            println!("  ID:       {}", user.id.to_string().bright_black());
            println!("  Username: {}", user.username.cyan());
            println!("  Staff:    {}", user.is_staff);
            println!();
        }
        UserAction::List => {
            println!("{}", "📋 Users".bright_blue().bold());
            println!();

            let (users, total) = service
                .list(0, USER_LIST_LIMIT)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

            if users.is_empty() {
                println!("{}", "  No users found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<24} {:<32} {:<20} {:<6}",
                "ID".bright_white().bold(),
                "Username".bright_white().bold(),
                "Email".bright_white().bold(),
                "Joined".bright_white().bold(),
                "Staff".bright_white().bold()
            );
            println!("  {}", "─".repeat(90).bright_black());

            for user in &users {
                println!(
                    "  {:<5} {:<24} {:<32} {:<20} {}",
                    user.id.to_string().bright_black(),
                    user.username.cyan(),
                    user.email,
                    user.created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black(),
                    if user.is_staff { "yes".green() } else { "no".normal() }
                );
            }

            println!();
            println!("  Total: {}", total.to_string().bright_white().bold());
            println!();
        }
    }

    Ok(())
}

/// Dispatches tag commands.
async fn handle_tag_action(action: TagAction, pool: &PgPool) -> Result<()> {
    let service = catalog_service(pool);

    match action {
        TagAction::Create { name, slug } => {
            let tag = service
                .create_tag(NewTag { name, slug })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create tag: {}", e))?;

            println!(
                "{} {} ({})",
                "✅ Tag created:".green().bold(),
                tag.name.cyan(),
                tag.slug.bright_black()
            );
        }
        TagAction::List => {
            println!("{}", "🏷️  Tags".bright_blue().bold());
            println!();

            let tags = service
                .list_tags()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list tags: {}", e))?;

            if tags.is_empty() {
                println!("{}", "  No tags found".yellow());
                return Ok(());
            }

            for tag in &tags {
                println!(
                    "  {:<5} {:<32} {}",
                    tag.id.to_string().bright_black(),
                    tag.name.cyan(),
                    tag.slug
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Dispatches ingredient commands.
async fn handle_ingredient_action(action: IngredientAction, pool: &PgPool) -> Result<()> {
    match action {
        IngredientAction::Import { file } => {
            println!(
                "{} {}",
                "📥 Importing ingredients from".bright_blue().bold(),
                file.display()
            );

            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let records: Vec<NewIngredient> =
                serde_json::from_str(&raw).context("Expected a JSON array of ingredients")?;

            let report = catalog_service(pool)
                .import_ingredients(records)
                .await
                .map_err(|e| anyhow::anyhow!("Import failed: {}", e))?;

            println!(
                "  Created: {}  Skipped: {}",
                report.created.to_string().bright_green().bold(),
                report.skipped.to_string().yellow()
            );
        }
    }

    Ok(())
}

/// Displays row counts of the main tables.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    for (label, table) in [
        ("Users", "users"),
        ("Recipes", "recipes"),
        ("Tags", "tags"),
        ("Ingredients", "ingredients"),
        ("Subscriptions", "subscriptions"),
        ("Favorites", "favorites"),
        ("Cart entries", "shopping_cart"),
        ("Short links", "short_links"),
        ("Active tokens", "auth_tokens"),
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .with_context(|| format!("Failed to count {}", table))?;

        println!(
            "  {:<15} {}",
            format!("{}:", label),
            count.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
