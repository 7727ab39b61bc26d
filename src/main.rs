//! ShopDesk
//!
//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{error, info, warn};

use ShopDesk::{
    config::Settings,
    export,
    handlers::{self, Command, ShopContext},
    services::{self, NotificationService},
    storage::open_backend,
    store::{lookup, LocalStore},
    sync::{RemoteSource, SyncCoordinator, SyncService},
    utils::{helpers, logging},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(version)]
#[command(about = "Shop catalog store with remote mirror sync", long_about = None)]
struct Cli {
    /// Config file name, without extension
    #[arg(long, short, global = true, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the shop bot, keep syncing from the remote mirror and notify
    /// admins until Ctrl-C
    Run,

    /// Run one sync cycle
    Sync,

    /// Show local store statistics
    Status,

    /// Write the full export document
    Export { file: PathBuf },

    /// Write products, categories and orders files for the remote mirror
    ExportBot { dir: PathBuf },

    /// Write the orders CSV
    ExportCsv { file: PathBuf },

    /// Merge an export or partial document into the store
    Import { file: PathBuf },

    /// Snapshot the store into a timestamped backup directory
    Backup {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Drop products, categories and orders and reseed
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load_from(&cli.config).context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", ShopDesk::info());

    let backend = open_backend(&settings)?;
    let store = Arc::new(LocalStore::new(backend, settings.inventory.clone()));
    store.init()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(settings, store).await?,
        Commands::Sync => {
            let remote = RemoteSource::new(&settings.remote)?;
            let coordinator = SyncCoordinator::new(Arc::clone(&store), remote, settings.remote.on_fetch_failure);
            let outcome = coordinator.initialize().await;
            let status = coordinator.status().await;
            println!("{:?}: {}", outcome, status.describe(Utc::now()));
        }
        Commands::Status => print_status(&store),
        Commands::Export { file } => {
            export::write_export_document(&store, &file, Utc::now()).await?;
            println!("{}", file.display());
        }
        Commands::ExportBot { dir } => {
            for path in export::write_bot_sync_files(&store, &dir).await? {
                println!("{}", path.display());
            }
        }
        Commands::ExportCsv { file } => {
            let count = export::write_orders_csv(&store, &file).await?;
            println!("{} ({} orders)", file.display(), count);
        }
        Commands::Import { file } => {
            export::import_file(&store, &file).await?;
            println!("{}", serde_json::to_string_pretty(&store.stats())?);
        }
        Commands::Backup { dir } => {
            let backup = export::create_backup(&store, &dir, Utc::now()).await?;
            println!("{}", backup.display());
        }
        Commands::Clear => {
            store.clear_all()?;
            warn!("Local collections cleared");
        }
    }

    Ok(())
}

/// Serve the bot, sync and notify until interrupted
async fn run(settings: Settings, store: Arc<LocalStore>) -> anyhow::Result<()> {
    let bot = services::shop_bot(&settings, &store);

    let notifications = bot.clone().map(|bot| {
        NotificationService::new(bot, settings.bot.admin_ids.clone(), Arc::clone(&store)).spawn_listener()
    });

    let mut sync = SyncService::start(Arc::clone(&store), &settings.remote).await?;

    let dispatcher = bot.map(|bot| {
        let ctx = ShopContext::new(Arc::clone(&store), settings.bot.admin_ids.clone());
        let mut dispatcher = Dispatcher::builder(bot, create_handler())
            .dependencies(dptree::deps![ctx])
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd.id);
            })
            .build();
        let shutdown = dispatcher.shutdown_token();
        info!("Starting bot with polling mode...");
        (shutdown, tokio::spawn(async move { dispatcher.dispatch().await }))
    });

    info!("ShopDesk is running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("Shutting down");

    if let Some((shutdown, task)) = dispatcher {
        match shutdown.shutdown() {
            Ok(stopped) => stopped.await,
            Err(_) => task.abort(),
        }
    }
    sync.stop();
    if let Some(listener) = notifications {
        listener.abort();
    }

    info!("ShopDesk has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(Update::filter_message()
            .branch(
                // Handle commands
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_commands)
            )
            .branch(
                // Menu buttons and order reasons
                dptree::endpoint(handle_messages)
            )
        )
        .branch(
            Update::filter_callback_query()
                .endpoint(handle_callbacks)
        )
}

async fn handle_commands(bot: Bot, msg: Message, cmd: Command, ctx: ShopContext) -> HandlerResult {
    if let Err(e) = handlers::handle_command(bot, msg, cmd, ctx).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }
    Ok(())
}

async fn handle_messages(bot: Bot, msg: Message, ctx: ShopContext) -> HandlerResult {
    if let Err(e) = handlers::handle_message(bot, msg, ctx).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }
    Ok(())
}

async fn handle_callbacks(bot: Bot, query: CallbackQuery, ctx: ShopContext) -> HandlerResult {
    let user_id = query.from.id.0 as i64;
    if let Err(e) = handlers::handle_callback_query(bot, query, ctx).await {
        error!(user_id, error = %e, "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}

/// Catalog overview for the terminal
fn print_status(store: &LocalStore) {
    let stats = store.stats();
    let products = store.get_products();
    let categories = store.get_categories();

    println!("Mahsulotlar: {} (mavjud: {})", stats.total_products, stats.available_products);
    for category in &categories {
        let count = products.iter().filter(|p| p.category_id == category.id).count();
        println!("  {}: {}", category.display_label(), count);
    }

    let uncategorized = products
        .iter()
        .filter(|p| lookup::category_name(&categories, p.category_id) == lookup::UNCATEGORIZED)
        .count();
    if uncategorized > 0 {
        println!("  {}: {}", lookup::UNCATEGORIZED, uncategorized);
    }

    println!("Buyurtmalar: {} (kutilmoqda: {})", stats.total_orders, stats.pending_orders);
    for order in store.get_orders().iter().rev().take(5) {
        let created_at = order.created_at
            .map(helpers::format_order_timestamp)
            .unwrap_or_default();
        println!(
            "  {} #{} {} | {} | {}",
            order.status.emoji(),
            order.id,
            helpers::truncate_text(&lookup::product_name(&products, order.product_id), 30),
            order.user_name,
            created_at,
        );
    }
}
