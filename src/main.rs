//! DocChat CLI
//!
//! Command-line client for the DocChat backend:
//! - Log in and out
//! - Upload, download, and delete PDFs
//! - Ask questions and chat about a document
//! - Generate and export summaries

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docchat::client::{ApiClient, ChatMessage, ClientError, Role};
use docchat::config::{generate_default_config, Config};
use docchat::pages::{self, Dashboard, LoginPage, RegisterPage, EXPIRED_NOTICE};
use docchat::services::{chat, documents, UploadFile};
use docchat::session::{FileStore, Route, Session};
use docchat::views::{
    display_filename, display_title, export_filename, export_text, generated_label,
    relative_time, ChatView, ConversationListView, SummaryPhase, SummaryView,
};
use docchat::Theme;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload PDFs and chat with them through an LLM backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: platform config dir, then ./docchat.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show session and backend settings
    Status,

    /// List uploaded PDFs
    List,

    /// Upload a PDF
    Upload {
        path: PathBuf,
        /// Replace the document with this id instead of creating a new one
        #[arg(long)]
        replace: Option<String>,
    },

    /// Download a PDF
    Download {
        uuid: String,
        /// Output file or directory (default: ./<uuid>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a PDF
    Delete { uuid: String },

    /// Ask a one-shot question about a PDF
    Query { uuid: String, question: String },

    /// Chat about a PDF interactively
    Chat {
        /// Document id
        document: String,
        /// Continue an existing conversation
        #[arg(short, long)]
        conversation: Option<String>,
        /// Display name of the document
        #[arg(long)]
        filename: Option<String>,
    },

    /// Manage conversations
    Conversations {
        #[command(subcommand)]
        action: Option<ConversationAction>,
    },

    /// Show or generate a document summary
    Summary {
        document: String,
        /// Generate (or regenerate) the summary
        #[arg(short, long)]
        generate: bool,
        /// Print the whole summary instead of a preview
        #[arg(long)]
        full: bool,
        /// Write the summary to <filename>_summary.txt
        #[arg(short, long)]
        export: bool,
    },

    /// Show or toggle the light/dark preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConversationAction {
    /// List recent conversations
    List,
    /// Print a conversation
    Show { uuid: String },
    /// Delete a conversation
    Delete { uuid: String },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_with_env(path),
        None => Config::load_default(),
    };
    // Logging is configured from the file, so load errors go straight to stderr
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        match e.downcast_ref::<ClientError>() {
            Some(ClientError::SessionExpired { .. }) => {
                eprintln!("{}", EXPIRED_NOTICE);
                eprintln!("Run `docchat login <username>` to sign in.");
            }
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("docchat={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    if let Commands::Config { output } = &cli.command {
        let template = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &template)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    let store = Arc::new(FileStore::new(&config.session.store_path));
    let session = Arc::new(
        Session::load(store)
            .await
            .context("Failed to open session store")?,
    );
    let client = ApiClient::new(config.client_config(), Arc::clone(&session))?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { username, password } => {
            let mut page = LoginPage::new(Route::login());
            page.username = username;
            page.password = read_password(password).await?;
            match page.submit(&client).await {
                Ok(_) => println!("Logged in as {}", page.username.trim()),
                Err(e) => return Err(shown(page.error(), e)),
            }
        }

        Commands::Register { username, password } => {
            let mut page = RegisterPage::new();
            page.username = username;
            page.password = read_password(password).await?;
            match page.submit(&client).await {
                Ok(_) => {
                    println!("{}", page.message().unwrap_or("Registered."));
                    println!("Log in with `docchat login {}`", page.username.trim());
                }
                Err(e) => return Err(shown(page.error(), e)),
            }
        }

        Commands::Logout => {
            pages::logout(&client).await?;
            println!("Logged out");
        }

        Commands::Status => {
            let authenticated = session.is_authenticated().await;
            let theme = Theme::load(session.store().as_ref()).await?;
            println!("DocChat v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Backend:  {}", config.api.base_url);
            println!("Session:  {}", config.session.store_path);
            println!(
                "Status:   {}",
                if authenticated { "logged in" } else { "logged out" }
            );
            println!("Theme:    {}", theme);
            println!(
                "Links:    {}",
                pages::nav_links(authenticated)
                    .iter()
                    .map(|l| l.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            if !authenticated {
                println!();
                println!("{}", pages::HEADLINE);
            }
        }

        Commands::List => {
            let mut dashboard = Dashboard::new();
            dashboard.refresh(&client).await?;
            let docs = dashboard.documents().documents();

            if json {
                println!("{}", serde_json::to_string_pretty(docs)?);
            } else if docs.is_empty() {
                println!("No PDFs uploaded yet.");
                println!();
                println!("Upload your first document with:");
                println!("  docchat upload report.pdf");
            } else {
                println!("{:<38} {}", "UUID", "Filename");
                println!("{}", "-".repeat(60));
                for doc in docs {
                    println!("{:<38} {}", doc.uuid, doc.filename);
                }
            }
        }

        Commands::Upload { path, replace } => {
            let file = UploadFile::from_path(&path).await?;
            let mut dashboard = Dashboard::new();
            let progress = dashboard.upload().clone();

            // Report progress on stderr while the upload runs
            let reporter = tokio::spawn(async move {
                let mut last = 0;
                loop {
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    let current = progress.progress();
                    if progress.show_progress_bar() && current != last {
                        eprint!("\r{}", progress.button_label());
                        last = current;
                    }
                }
            });

            let result = match &replace {
                Some(uuid) => dashboard
                    .handle_replace(&client, uuid, file)
                    .await
                    .map(|_| uuid.clone()),
                None => dashboard.handle_upload(&client, file).await,
            };
            reporter.abort();
            eprintln!();

            match result {
                Ok(uuid) => {
                    println!(
                        "{} ({})",
                        dashboard.banner().success.as_deref().unwrap_or("Done"),
                        uuid
                    );
                }
                Err(e) => return Err(shown(dashboard.banner().error.as_deref(), e)),
            }
        }

        Commands::Download { uuid, output } => {
            let mut dashboard = Dashboard::new();
            match dashboard
                .handle_download(&client, &uuid, output.as_deref())
                .await
            {
                Ok(path) => println!("Downloaded to {:?}", path),
                Err(e) => return Err(shown(dashboard.banner().error.as_deref(), e)),
            }
        }

        Commands::Delete { uuid } => {
            let mut dashboard = Dashboard::new();
            match dashboard.handle_delete(&client, &uuid).await {
                Ok(()) => println!(
                    "{}",
                    dashboard.banner().success.as_deref().unwrap_or("Deleted")
                ),
                Err(e) => return Err(shown(dashboard.banner().error.as_deref(), e)),
            }
        }

        Commands::Query { uuid, question } => {
            let answer = documents::query(&client, &uuid, &question).await?;
            if json {
                let body = serde_json::json!({
                    "uuid": uuid,
                    "query": question,
                    "llm_response": answer,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", answer);
            }
        }

        Commands::Chat {
            document,
            conversation,
            filename,
        } => {
            let filename = filename.unwrap_or_else(|| document.clone());
            let mut view = match conversation {
                Some(uuid) => {
                    let mut view = ChatView::for_conversation(&document, &filename, uuid);
                    view.load(&client).await?;
                    view
                }
                None => ChatView::new(&document, &filename),
            };
            run_chat(&client, &mut view).await?;
        }

        Commands::Conversations { action } => match action.unwrap_or(ConversationAction::List) {
            ConversationAction::List => {
                let mut view = ConversationListView::new();
                view.refresh(&client).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(view.conversations())?);
                } else if view.is_empty() {
                    println!("No conversations yet. Start one with `docchat chat <document>`.");
                } else {
                    let now = Utc::now();
                    println!(
                        "{:<38} {:<52} {:<42} {:>5}  {}",
                        "UUID", "Title", "Document", "Msgs", "Updated"
                    );
                    println!("{}", "-".repeat(150));
                    for item in view.conversations() {
                        println!(
                            "{:<38} {:<52} {:<42} {:>5}  {}",
                            item.uuid,
                            display_title(item),
                            display_filename(item),
                            item.message_count,
                            relative_time(&item.updated_at, now)
                        );
                    }
                }
            }
            ConversationAction::Show { uuid } => {
                let conversation = chat::get_conversation(&client, &uuid).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&conversation)?);
                } else {
                    println!("{}", conversation.title);
                    println!();
                    for message in &conversation.messages {
                        print_message(message);
                    }
                }
            }
            ConversationAction::Delete { uuid } => {
                let mut view = ConversationListView::new();
                if let Err(e) = view.delete(&client, &uuid).await {
                    return Err(shown(view.error(), e));
                }
                println!("Conversation deleted");
            }
        },

        Commands::Summary {
            document,
            generate,
            full,
            export,
        } => {
            let mut view = SummaryView::new(&document, &document);
            if let Err(e) = view.load(&client).await {
                return Err(shown(view.error(), e));
            }
            if generate || (export && view.phase() == SummaryPhase::Empty) {
                eprintln!("Generating summary...");
                if let Err(e) = view.generate(&client).await {
                    return Err(shown(view.error(), e));
                }
            }
            view.set_expanded(full);

            let Some(summary) = view.summary().cloned() else {
                println!("No summary yet. Generate one with `docchat summary {} --generate`.", document);
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Summary of {}", summary.filename);
                println!("Generated: {}", generated_label(&summary));
                println!();
                for section in view.visible_sections() {
                    if let Some(title) = &section.title {
                        println!("## {}", title);
                    }
                    println!("{}", section.body);
                    println!();
                }
                if view.is_collapsible() && !full {
                    println!("(preview; pass --full for the whole summary)");
                }
            }

            if export {
                let path = PathBuf::from(export_filename(&summary));
                tokio::fs::write(&path, export_text(&summary)).await?;
                println!("Exported to {:?}", path);
            }
        }

        Commands::Theme { action } => {
            let store = session.store();
            let mut theme = Theme::load(store.as_ref()).await?;
            if let Some(ThemeAction::Toggle) = action {
                theme = theme.toggle();
                theme.save(store.as_ref()).await?;
            }
            println!("{}", theme.label());
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Interactive chat loop over stdin; `/quit` or EOF ends it
async fn run_chat(client: &ApiClient, view: &mut ChatView) -> anyhow::Result<()> {
    println!("{} ({})", view.title(), view.document_filename());
    for message in view.messages() {
        print_message(message);
    }
    if view.shows_empty_prompt() {
        println!("Ask anything about this document. Type /quit to leave.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        let seen = view.messages().len();
        match view.send(client, &line).await {
            Ok(Some(conversation)) => {
                tracing::debug!(conversation = %conversation.uuid, "Conversation started");
                println!("[conversation {}]", conversation.uuid);
                for message in view.messages().iter().filter(|m| !m.is_user()) {
                    print_message(message);
                }
            }
            Ok(None) => {
                for message in view.messages().iter().skip(seen + 1) {
                    print_message(message);
                }
            }
            Err(e) if e.is_session_expired() => return Err(e.into()),
            Err(_) => {
                if let Some(error) = view.error() {
                    eprintln!("{}", error);
                }
            }
        }
    }

    Ok(())
}

fn print_message(message: &ChatMessage) {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    println!("{}: {}", who, message.content);
}

async fn read_password(given: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    Ok(lines.next_line().await?.unwrap_or_default())
}

/// The message a view displayed for `err`, keeping expiry detectable
fn shown(message: Option<&str>, err: ClientError) -> anyhow::Error {
    match message {
        Some(message) if !err.is_session_expired() => anyhow::anyhow!(message.to_string()),
        _ => err.into(),
    }
}
