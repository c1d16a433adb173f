//! attach CLI: capture PDFs, inspect pending state, and send intercepted
//! requests from the command line. Config from env (.env supported):
//! ATTACH_DATABASE_URL, ATTACH_LOG_FILE, RUST_LOG.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use attach_core::{ContextProvider, OutboundRequest};
use host_context::HostContextResolver;
use interceptor::{HttpTransport, RequestInterceptor};
use pipeline::{AttachmentController, LoggingNotifier};
use storage::{DocumentRepository, KvStore, PendingFlag, SqlitePoolManager, NS_HOST};

#[derive(Parser)]
#[command(name = "attach")]
#[command(about = "PDF attachment pipeline: capture, list, remove, pending, send", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a PDF for the active chat and flag it for the next send.
    Capture {
        path: PathBuf,
    },
    /// List stored documents (active chat by default).
    List {
        #[arg(short, long)]
        chat: Option<String>,
    },
    /// Remove a stored document by id (soft-cancel if it was pending).
    Remove {
        id: i64,
    },
    /// Show the pending flag without consuming it.
    Pending,
    /// Send a request through the interceptor over HTTP.
    Send {
        #[arg(long)]
        url: String,
        /// Inline JSON body; mutually exclusive with --body-file.
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        /// Read the body from a file.
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Write the host-side activeChatId/activeModel slots (stands in for the
    /// host application, which owns these in production).
    SetContext {
        chat_id: String,
        #[arg(long)]
        model: Option<String>,
    },
}

struct App {
    documents: DocumentRepository,
    flag: PendingFlag,
    kv: KvStore,
    resolver: HostContextResolver,
}

impl App {
    async fn open() -> Result<Self> {
        let database_url =
            std::env::var("ATTACH_DATABASE_URL").unwrap_or_else(|_| "./pdf_attach.db".to_string());

        let pool = SqlitePoolManager::new(&database_url)
            .await
            .with_context(|| format!("Open database {}", database_url))?;
        let documents = DocumentRepository::with_pool(pool.clone()).await?;
        let kv = KvStore::with_pool(pool).await?;
        let flag = PendingFlag::new(kv.clone());
        let resolver = HostContextResolver::new(kv.clone());

        Ok(Self {
            documents,
            flag,
            kv,
            resolver,
        })
    }

    fn controller(&self) -> AttachmentController {
        AttachmentController::new(
            self.documents.clone(),
            self.flag.clone(),
            Arc::new(self.resolver.clone()),
            Arc::new(LoggingNotifier),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let log_file =
        std::env::var("ATTACH_LOG_FILE").unwrap_or_else(|_| "./attach.log".to_string());
    attach_core::init_tracing(&log_file)?;

    let cli = Cli::parse();
    let app = App::open().await?;

    match cli.command {
        Commands::Capture { path } => handle_capture(&app, path).await,
        Commands::List { chat } => handle_list(&app, chat).await,
        Commands::Remove { id } => {
            app.controller().remove(id).await?;
            println!("Removed document {} (if it existed).", id);
            Ok(())
        }
        Commands::Pending => {
            match app.flag.peek().await? {
                Some(chat_id) => println!("Pending attachment for chat {}.", chat_id),
                None => println!("No pending attachment."),
            }
            Ok(())
        }
        Commands::Send { url, body, body_file } => handle_send(&app, url, body, body_file).await,
        Commands::SetContext { chat_id, model } => {
            app.kv.set(NS_HOST, "activeChatId", &chat_id).await?;
            if let Some(model) = model {
                app.kv.set(NS_HOST, "activeModel", &model).await?;
            }
            println!("Host context set to chat {}.", chat_id);
            Ok(())
        }
    }
}

async fn handle_capture(app: &App, path: PathBuf) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Path has no usable file name")?
        .to_string();
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Read {}", path.display()))?;

    let id = app.controller().capture(&filename, &bytes).await?;
    let context = app.resolver.resolve_context().await;

    println!(
        "Stored {} as document {} for chat {}; it will ride the next provider call.",
        filename, id, context.chat_id
    );
    Ok(())
}

async fn handle_list(app: &App, chat: Option<String>) -> Result<()> {
    let chat_id = match chat {
        Some(chat_id) => chat_id,
        None => app.resolver.resolve_context().await.chat_id,
    };

    let documents = app.documents.get_all_for_chat(&chat_id).await?;
    if documents.is_empty() {
        println!("No documents for chat {}.", chat_id);
        return Ok(());
    }

    println!("{:<6} {:<26} {:<12} {}", "id", "captured", "size(b64)", "filename");
    for d in &documents {
        println!(
            "{:<6} {:<26} {:<12} {}",
            d.id,
            d.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            d.content_base64.len(),
            d.filename
        );
    }
    Ok(())
}

async fn handle_send(
    app: &App,
    url: String,
    body: Option<String>,
    body_file: Option<PathBuf>,
) -> Result<()> {
    let body = match (body, body_file) {
        (Some(body), _) => Some(body),
        (None, Some(path)) => Some(
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Read {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let interceptor = RequestInterceptor::new(
        Arc::new(HttpTransport::new()),
        app.documents.clone(),
        app.flag.clone(),
    );

    let response = interceptor.send(OutboundRequest::new(url, body)).await?;

    println!("HTTP {}", response.status);
    println!("{}", response.body);
    Ok(())
}
