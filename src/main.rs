use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jarvis::catalog::category_tabs;
use jarvis::store::{KvStore, MemoryKvStore, SqliteKvStore};
use jarvis::{build_detector, AppConfig, Catalog, ConversationOrchestrator, Stores};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jarvis")]
#[command(about = "Find the right AI tool for what you want to do", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never call the remote intent service
    #[arg(long, global = true)]
    offline: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for tool recommendations
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show the tools panel
    Tools {
        /// Category id, or "all"
        #[arg(long, short)]
        category: Option<String>,
        /// Search name, description and tags
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List categories
    Categories,
    /// Record a click on a tool and print its URL
    Open { id: String },
    /// Toggle a tool's favorite flag
    Favorite { id: String },
    /// Toggle a tool's hidden flag
    Hide { id: String },
    /// List chat sessions
    Sessions,
    /// Print the messages of the active session
    Show,
    /// Start a new chat and make it active
    NewChat,
    /// Make a chat active
    SelectChat { id: String },
    /// Delete a chat
    DeleteChat { id: String },
    /// Print the greeting for the current relationship level
    Greet,
    /// Usage statistics
    Stats,
    /// Erase stored data
    Reset {
        #[arg(value_enum)]
        target: ResetTarget,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Category the tools panel opens on
    DefaultCategory { id: String },
    /// Restore defaults
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResetTarget {
    /// Usage counts, favorites and hidden tools
    Prefs,
    /// Usage statistics
    Analytics,
    /// Every chat session
    Chats,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jarvis=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_store(config: &AppConfig) -> Arc<dyn KvStore> {
    let path = config.store_path();
    match SqliteKvStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Store unavailable, nothing will be saved: {e:#}");
            Arc::new(MemoryKvStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading config")?;
    if cli.offline {
        config.intent.endpoint = None;
    }

    let catalog = Arc::new(Catalog::builtin());
    let stores = Stores::new(open_store(&config));
    let detector = build_detector(&config, catalog.clone());
    let orch = ConversationOrchestrator::new(Arc::new(detector), catalog, stores);

    match cli.command {
        Commands::Ask { text } => {
            let reply = orch.submit(&text.join(" ")).await?;
            if cli.json {
                let out = serde_json::json!({
                    "sessionId": reply.session_id,
                    "reply": reply.reply.content,
                    "classification": reply.classification,
                    "tools": reply.tools,
                    "leveledUp": reply.leveled_up,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", reply.reply.content);
                for tool in &reply.tools {
                    println!("  - {} <{}>", tool.name, tool.url);
                }
                if reply.leveled_up {
                    println!("\n{}", orch.greeting());
                }
            }
        }
        Commands::Tools { category, search } => {
            if let Some(id) = category {
                orch.set_category_filter(&id);
            }
            if let Some(q) = search {
                orch.set_search_query(&q);
            }
            let prefs = orch.stores().tool_prefs.all();
            let tools = orch.visible_tools();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else {
                for tool in tools {
                    let pref = prefs.get(&tool.id);
                    let star = if pref.is_some_and(|p| p.is_favorite) { "*" } else { " " };
                    let uses = pref.map_or(0, |p| p.usage_count);
                    println!(
                        "{star} {:<20} {:<13} {:>3}  {}",
                        tool.id,
                        tool.category.id(),
                        uses,
                        tool.description
                    );
                }
            }
        }
        Commands::Categories => {
            for tab in category_tabs() {
                println!("{} {:<13} {}", tab.icon, tab.id, tab.name);
            }
        }
        Commands::Open { id } => match orch.open_tool(&id) {
            Some(url) => println!("{url}"),
            None => anyhow::bail!("unknown tool: {id}"),
        },
        Commands::Favorite { id } => match orch.toggle_favorite(&id) {
            Some(on) => println!("{id}: favorite {}", if on { "on" } else { "off" }),
            None => anyhow::bail!("unknown tool: {id}"),
        },
        Commands::Hide { id } => match orch.toggle_hidden(&id) {
            Some(on) => println!("{id}: hidden {}", if on { "on" } else { "off" }),
            None => anyhow::bail!("unknown tool: {id}"),
        },
        Commands::Sessions => {
            let active = orch.stores().chats.active_session_id();
            let sessions = orch.sessions();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else {
                for s in sessions {
                    let mark = if active.as_deref() == Some(s.id.as_str()) { ">" } else { " " };
                    println!(
                        "{mark} {}  {:<43} {:>3} msgs  {}",
                        s.id,
                        s.title,
                        s.messages.len(),
                        s.updated_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        Commands::Show => {
            let session = orch.ensure_active_session();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else if session.messages.is_empty() {
                println!("{}", orch.greeting());
            } else {
                for m in &session.messages {
                    let who = match m.role {
                        jarvis::store::Role::User => "you",
                        jarvis::store::Role::Jarvis => "jarvis",
                    };
                    println!("[{who}] {}\n", m.content);
                }
            }
        }
        Commands::NewChat => println!("{}", orch.new_chat().id),
        Commands::SelectChat { id } => match orch.select_session(&id) {
            Some(s) => println!("{}  {}", s.id, s.title),
            None => anyhow::bail!("unknown chat: {id}"),
        },
        Commands::DeleteChat { id } => {
            if !orch.delete_session(&id) {
                anyhow::bail!("unknown chat: {id}");
            }
            println!("deleted {id}");
        }
        Commands::Greet => println!("{}", orch.greeting()),
        Commands::Stats => {
            let analytics = orch.stores().analytics.get();
            let relationship = orch.stores().relationship.get();
            if cli.json {
                let out = serde_json::json!({
                    "analytics": analytics,
                    "relationship": relationship,
                    "topLinks": orch.stores().analytics.top_links(5),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "{} {} (level {}, {} interactions)",
                    relationship.level.emoji(),
                    relationship.level.name(),
                    relationship.level.number(),
                    relationship.total_interactions
                );
                println!(
                    "sessions {}  messages {}  errors {}",
                    analytics.session_count, analytics.total_messages, analytics.error_count
                );
                for row in orch.stores().analytics.top_links(5) {
                    println!("  {:<20} {}", row.tool_id, row.clicks);
                }
                for (category, count) in &analytics.category_usage {
                    println!("  [{category}] {count}");
                }
            }
        }
        Commands::Reset { target } => {
            let what = match target {
                ResetTarget::Prefs => {
                    orch.reset_tool_preferences();
                    "tool preferences"
                }
                ResetTarget::Analytics => {
                    orch.reset_analytics();
                    "analytics"
                }
                ResetTarget::Chats => {
                    orch.clear_chats();
                    "chat history"
                }
            };
            println!("cleared {what}");
        }
        Commands::Settings { action } => {
            let repo = &orch.stores().settings;
            let settings = match action {
                None => repo.get(),
                Some(SettingsAction::DefaultCategory { id }) => {
                    let filter = jarvis::CategoryFilter::from_id(&id);
                    repo.update(|s| s.default_category = filter.id().to_string())
                }
                Some(SettingsAction::Reset) => repo.reset(),
            };
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
