use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reelvault::catalog::TmdbClient;
use reelvault::collections::{
    FavoriteRecord, FavoritesStore, MediaKind, PosterBackfill, PurchaseRecord, PurchasesStore,
    WatchlistRecord, WatchlistStore,
};
use reelvault::config::{AppConfig, CliConfig, FileConfig};
use reelvault::notifications::NotificationCenter;
use reelvault::profile::{MemoryStorage, ProfileStorage, SqliteStorage, StorageHub};
use reelvault::session::{EverrestAuthGateway, SessionManager, SignUpRequest};
use reelvault::support::{SupportDesk, TicketStatus};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[clap(name = "reelvault", about = "Per-identity local state engine for a movie browser")]
struct CliArgs {
    /// Path to the SQLite profile database file. Omit for an in-memory profile.
    #[clap(long)]
    profile_db: Option<PathBuf>,

    /// Path to a TOML config file. File values override CLI values.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Base URL of the auth backend.
    #[clap(long)]
    auth_base_url: Option<String>,

    /// Base URL of the catalog API.
    #[clap(long)]
    catalog_base_url: Option<String>,

    /// Catalog API key; required for the poster back-fill.
    #[clap(long)]
    catalog_api_key: Option<String>,

    /// Identity id treated as the support agent in ticket chats.
    #[clap(long)]
    support_id: Option<String>,

    /// Price recorded for purchases that do not specify one.
    #[clap(long)]
    default_price: Option<f64>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the favorites collection.
    Favorites {
        #[clap(subcommand)]
        action: CollectionAction,
    },
    /// Manage the watchlist collection.
    Watchlist {
        #[clap(subcommand)]
        action: CollectionAction,
    },
    /// Manage the purchases collection.
    Purchases {
        #[clap(subcommand)]
        action: PurchaseAction,
    },
    /// Inspect and mutate the notification inbox.
    Inbox {
        #[clap(subcommand)]
        action: InboxAction,
    },
    /// Support tickets and their chat threads.
    Tickets {
        #[clap(subcommand)]
        action: TicketAction,
    },
    /// Sign in and select the identity's namespaces.
    SignIn { email: String, password: String },
    /// Register a new account and sign it in.
    SignUp {
        first_name: String,
        last_name: String,
        email: String,
        password: String,
    },
    /// Sign out of the current session.
    SignOut,
    /// Print the current session owner.
    Whoami,
}

#[derive(Subcommand, Debug)]
enum CollectionAction {
    Add {
        subject_id: u64,
        title: String,
        #[clap(long)]
        poster: Option<String>,
    },
    Remove { subject_id: u64 },
    List,
}

#[derive(Subcommand, Debug)]
enum PurchaseAction {
    Add {
        subject_id: u64,
        title: String,
        #[clap(long)]
        poster: Option<String>,
        #[clap(long)]
        price: Option<f64>,
        /// "movie" or "series".
        #[clap(long, default_value = "movie")]
        kind: String,
    },
    Remove { subject_id: u64 },
    List,
    /// Fetch missing posters and ratings from the catalog.
    Backfill,
}

#[derive(Subcommand, Debug)]
enum InboxAction {
    List,
    MarkAllRead,
    Clear,
}

#[derive(Subcommand, Debug)]
enum TicketAction {
    Submit {
        subject_id: u64,
        subject_title: String,
        reason: String,
        #[clap(default_value = "")]
        details: String,
    },
    Advance {
        ticket_id: String,
        /// "in-progress" or "resolved".
        status: String,
        #[clap(long)]
        message: Option<String>,
    },
    Resolve { ticket_id: String, response: String },
    Messages { ticket_id: String },
    List,
}

struct App {
    favorites: Arc<FavoritesStore>,
    watchlist: Arc<WatchlistStore>,
    purchases: Arc<PurchasesStore>,
    notifications: Arc<NotificationCenter>,
    desk: SupportDesk,
    session: SessionManager,
    config: AppConfig,
}

impl App {
    fn build(config: AppConfig) -> Result<Self> {
        let backend: Arc<dyn ProfileStorage> = match &config.profile_db {
            Some(path) => Arc::new(SqliteStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        let hub = StorageHub::new(backend);

        let notifications = NotificationCenter::new(hub.handle());
        let favorites = Arc::new(FavoritesStore::new(hub.handle(), notifications.clone()));
        let watchlist = Arc::new(WatchlistStore::new(hub.handle()));
        let purchases = Arc::new(PurchasesStore::new(hub.handle()));
        let desk = SupportDesk::new(hub.handle(), notifications.clone(), &config.support_id);

        let gateway = Arc::new(EverrestAuthGateway::new(config.auth_base_url.clone())?);
        let session = SessionManager::new(
            hub.handle(),
            gateway,
            favorites.clone(),
            watchlist.clone(),
            purchases.clone(),
            notifications.clone(),
        );

        Ok(Self {
            favorites,
            watchlist,
            purchases,
            notifications,
            desk,
            session,
            config,
        })
    }

    fn author(&self) -> (String, String, String) {
        match self.session.current_user() {
            Some(user) => {
                let name = [user.first_name, user.last_name]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                (user.id, user.email, name)
            }
            None => ("guest".to_string(), String::new(), "Guest".to_string()),
        }
    }
}

fn parse_media_kind(s: &str) -> Result<MediaKind> {
    match s {
        "movie" => Ok(MediaKind::Movie),
        "series" => Ok(MediaKind::Series),
        other => bail!("Unknown media kind {:?}, expected \"movie\" or \"series\"", other),
    }
}

fn parse_status(s: &str) -> Result<TicketStatus> {
    match s {
        "pending" => Ok(TicketStatus::Pending),
        "in-progress" => Ok(TicketStatus::InProgress),
        "resolved" => Ok(TicketStatus::Resolved),
        other => bail!("Unknown ticket status {:?}", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        profile_db: cli_args.profile_db.clone(),
        auth_base_url: cli_args.auth_base_url.clone(),
        catalog_base_url: cli_args.catalog_base_url.clone(),
        catalog_api_key: cli_args.catalog_api_key.clone(),
        support_id: cli_args.support_id.clone(),
        default_price: cli_args.default_price,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;
    let app = App::build(config)?;

    match cli_args.command {
        Command::Favorites { action } => match action {
            CollectionAction::Add { subject_id, title, poster } => {
                let added = app
                    .favorites
                    .add(FavoriteRecord::new(subject_id, title.clone(), poster));
                if added {
                    println!("Added {} ({})", title, subject_id);
                } else {
                    println!("{} is already in favorites", subject_id);
                }
            }
            CollectionAction::Remove { subject_id } => {
                app.favorites.remove(subject_id);
                println!("Removed {}", subject_id);
            }
            CollectionAction::List => {
                for record in app.favorites.list() {
                    println!("{}\t{}", record.subject_id, record.title);
                }
            }
        },
        Command::Watchlist { action } => match action {
            CollectionAction::Add { subject_id, title, poster } => {
                let added = app
                    .watchlist
                    .add(WatchlistRecord::new(subject_id, title.clone(), poster));
                if added {
                    println!("Added {} ({})", title, subject_id);
                } else {
                    println!("{} is already in the watchlist", subject_id);
                }
            }
            CollectionAction::Remove { subject_id } => {
                app.watchlist.remove(subject_id);
                println!("Removed {}", subject_id);
            }
            CollectionAction::List => {
                for record in app.watchlist.list() {
                    println!("{}\t{}", record.subject_id, record.title);
                }
            }
        },
        Command::Purchases { action } => match action {
            PurchaseAction::Add { subject_id, title, poster, price, kind } => {
                let kind = parse_media_kind(&kind)?;
                let price = price.unwrap_or(app.config.default_price);
                let added = app
                    .purchases
                    .add(PurchaseRecord::new(subject_id, title.clone(), poster, price, kind));
                if added {
                    println!("Purchased {} ({}) for {:.2}", title, subject_id, price);
                } else {
                    println!("{} was already purchased", subject_id);
                }
            }
            PurchaseAction::Remove { subject_id } => {
                app.purchases.remove(subject_id);
                println!("Removed {}", subject_id);
            }
            PurchaseAction::List => {
                for record in app.purchases.list() {
                    println!(
                        "{}\t{}\t{:.2}\t{}",
                        record.subject_id,
                        record.title,
                        record.price,
                        record.poster_path.as_deref().unwrap_or("-")
                    );
                }
            }
            PurchaseAction::Backfill => {
                let api_key = app
                    .config
                    .catalog_api_key
                    .clone()
                    .context("Back-fill needs --catalog-api-key or a [catalog] api_key")?;
                let catalog =
                    Arc::new(TmdbClient::new(app.config.catalog_base_url.clone(), api_key)?);
                let patched = PosterBackfill::new(catalog).run(&app.purchases).await;
                println!("Back-filled {} purchase(s)", patched);
            }
        },
        Command::Inbox { action } => match action {
            InboxAction::List => {
                for item in app.notifications.items() {
                    let marker = if item.read { " " } else { "*" };
                    println!("{} {}\t{}\t{}", marker, item.id, item.title, item.message);
                }
            }
            InboxAction::MarkAllRead => {
                app.notifications.mark_all_read();
                println!("All read");
            }
            InboxAction::Clear => {
                app.notifications.clear();
                println!("Inbox cleared");
            }
        },
        Command::Tickets { action } => match action {
            TicketAction::Submit { subject_id, subject_title, reason, details } => {
                let (author_id, author_email, author_name) = app.author();
                let ticket = app.desk.submit(
                    author_id,
                    author_email,
                    author_name,
                    subject_id,
                    subject_title,
                    reason,
                    details,
                );
                println!("Submitted ticket {}", ticket.id);
            }
            TicketAction::Advance { ticket_id, status, message } => {
                let status = parse_status(&status)?;
                if app.desk.advance_status(&ticket_id, status, message.as_deref()) {
                    println!("Ticket {} is now {:?}", ticket_id, status);
                } else {
                    println!("Transition rejected");
                }
            }
            TicketAction::Resolve { ticket_id, response } => {
                if app.desk.resolve(&ticket_id, &response) {
                    println!("Ticket {} resolved", ticket_id);
                } else {
                    println!("Transition rejected");
                }
            }
            TicketAction::Messages { ticket_id } => {
                for message in app.desk.messages_for(&ticket_id) {
                    println!("{}\t{}\t{}", message.timestamp, message.sender_id, message.body);
                }
            }
            TicketAction::List => {
                for ticket in app.desk.tickets() {
                    println!(
                        "{}\t{:?}\t{}\t{}",
                        ticket.id, ticket.status, ticket.subject_title, ticket.reason
                    );
                }
            }
        },
        Command::SignIn { email, password } => {
            let profile = app.session.sign_in(&email, &password).await?;
            println!("Signed in as {} ({})", profile.email, profile.id);
        }
        Command::SignUp { first_name, last_name, email, password } => {
            let profile = app
                .session
                .sign_up(SignUpRequest {
                    first_name,
                    last_name,
                    email,
                    password,
                    phone: None,
                })
                .await?;
            println!("Signed up as {} ({})", profile.email, profile.id);
        }
        Command::SignOut => {
            app.session.sign_out().await;
            println!("Signed out");
        }
        Command::Whoami => match app.session.current_user() {
            Some(user) => println!("{} ({})", user.email, user.id),
            None => println!("guest"),
        },
    }

    Ok(())
}
