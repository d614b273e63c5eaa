//! Uphaar CLI - Browse the catalog, manage the cart and check out on WhatsApp.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! uphaar catalog list --brand kyddoz
//! uphaar catalog show up-01
//!
//! # Cart and wishlist (stored under STOREFRONT_DATA_DIR)
//! uphaar cart add up-01 --qty 2 -o size=M -o "color=Red with White"
//! uphaar cart show
//! uphaar wishlist toggle ky-01
//!
//! # Checkout prints the WhatsApp link that completes the order
//! uphaar --user <USER_ID> checkout --name Asha --phone 9820000000
//!
//! # Admin
//! uphaar --user <ADMIN_ID> orders all
//! uphaar --user <ADMIN_ID> orders complete <ORDER_ID>
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show and feature products
//! - `cart` / `wishlist` - Local cart and wishlist
//! - `checkout` - Place the cart as an order
//! - `orders` - Order history and admin status updates
//! - `enquire` / `bulk` - WhatsApp enquiry and bulk order links

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uphaar_core::Brand;
use uphaar_storefront::config::StorefrontConfig;
use uphaar_storefront::state::AppState;

mod commands;

use commands::{CliError, parse_option};

#[derive(Parser)]
#[command(name = "uphaar")]
#[command(author, version, about = "Uphaar & Kyddoz storefront")]
struct Cli {
    /// Signed-in user id (from the auth provider)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Place the cart as an order and print the WhatsApp link
    Checkout {
        /// Customer name (defaults to the profile name)
        #[arg(short, long)]
        name: Option<String>,

        /// Phone number (defaults to the profile phone)
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Order history and admin tools
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Print a WhatsApp enquiry link for a product
    Enquire {
        /// Product id
        id: String,

        /// Customization value as `key=value` (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
    /// Print a WhatsApp bulk order link for a brand
    Bulk {
        /// Brand (`uphaar`, `kyddoz`)
        brand: Brand,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally for one brand
    List {
        #[arg(short, long)]
        brand: Option<Brand>,
    },
    /// List featured products
    Featured,
    /// Show one product with related products
    Show {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product id
        id: String,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Customization value as `key=value` (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
    /// Show the priced cart
    Show,
    /// Remove the line at a 1-based position
    Remove { position: usize },
    /// Remove a line by its line id
    RemoveLine { line_id: u64 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Add or remove a product
    Toggle {
        /// Product id
        id: String,
    },
    /// Show wishlisted products
    Show,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Orders placed by the signed-in user
    List,
    /// All orders (admin)
    All,
    /// Set an order's status (admin)
    SetStatus { order_id: String, status: String },
    /// Toggle an order between placed and completed (admin)
    Complete { order_id: String },
    /// Print a WhatsApp follow-up link for an order (admin)
    FollowUp { order_id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "uphaar_storefront=info,uphaar_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let state = AppState::from_config(config)?;
    let user = cli.user.as_deref();

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { brand } => commands::catalog::list(&state, brand).await?,
            CatalogAction::Featured => commands::catalog::featured(&state).await?,
            CatalogAction::Show { id } => commands::catalog::show(&state, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id, qty, options } => {
                commands::cart::add(&state, &id, qty, options).await?;
            }
            CartAction::Show => commands::cart::show(&state).await?,
            CartAction::Remove { position } => commands::cart::remove(&state, position)?,
            CartAction::RemoveLine { line_id } => commands::cart::remove_line(&state, line_id)?,
            CartAction::Clear => commands::cart::clear(&state)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Toggle { id } => commands::cart::toggle_wishlist(&state, &id)?,
            WishlistAction::Show => commands::cart::show_wishlist(&state).await?,
        },
        Commands::Checkout { name, phone } => {
            commands::checkout::run(&state, user, name, phone).await?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&state, user).await?,
            OrdersAction::All => commands::orders::all(&state, user).await?,
            OrdersAction::SetStatus { order_id, status } => {
                commands::orders::set_status(&state, user, &order_id, &status).await?;
            }
            OrdersAction::Complete { order_id } => {
                commands::orders::toggle_completed(&state, user, &order_id).await?;
            }
            OrdersAction::FollowUp { order_id } => {
                commands::orders::follow_up(&state, user, &order_id).await?;
            }
        },
        Commands::Enquire { id, options } => commands::contact::enquire(&state, &id, options).await?,
        Commands::Bulk { brand } => commands::contact::bulk(&state, brand)?,
    }
    Ok(())
}
