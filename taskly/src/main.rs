//! Taskly -- personal task tracker CLI.
//!
//! Drives the view-state reconciler against a running task server and
//! prints the resulting page. Configuration via CLI flags, environment
//! variables, or config file (`~/.config/taskly/config.toml`).
//!
//! ```bash
//! # Add a task, then show the first page
//! taskly --token alice add "Buy milk"
//!
//! # List completed tasks, oldest first
//! taskly --token alice list --completed --sort oldest
//!
//! # Flip completion / rename / remove by task id
//! taskly --token alice done <id>
//! taskly --token alice rename <id> "Buy oat milk"
//! taskly --token alice rm <id>
//! ```

use clap::{Parser, Subcommand};
use uuid::Uuid;

use taskly::api::{HttpTaskApi, Session};
use taskly::config::{CliArgs, ClientConfig};
use taskly::sync::Reconciler;
use taskly_proto::page::SortOrder;
use taskly_proto::task::TaskId;

/// Command-line interface for the Taskly client.
#[derive(Parser, Debug)]
#[command(version, about = "Taskly task tracker")]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of tasks.
    List {
        /// Page number to show.
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Only completed tasks.
        #[arg(long, conflicts_with = "open")]
        completed: bool,
        /// Only open tasks.
        #[arg(long)]
        open: bool,
        /// Sort direction (latest or oldest).
        #[arg(long, default_value = "latest")]
        sort: SortOrder,
    },
    /// Add a task.
    Add {
        /// Title of the new task.
        title: String,
    },
    /// Flip a task's completion state.
    Done {
        /// Task id.
        id: Uuid,
    },
    /// Rename a task.
    Rename {
        /// Task id.
        id: Uuid,
        /// Replacement title.
        title: String,
    },
    /// Remove a task permanently.
    Rm {
        /// Task id.
        id: Uuid,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::load(&cli.args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let session = Session::new(&config.server_url, &config.token);
    let api = HttpTaskApi::new(session);
    let mut reconciler = Reconciler::with_page_size(api, config.page_size);

    if let Err(e) = run(&mut reconciler, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    print_page(&reconciler);
}

/// Executes one subcommand against the reconciler.
async fn run(
    reconciler: &mut Reconciler<HttpTaskApi>,
    command: Command,
) -> Result<(), taskly::sync::SyncError> {
    match command {
        Command::List {
            page,
            completed,
            open,
            sort,
        } => {
            let filter = match (completed, open) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            reconciler.set_sort(sort).await?;
            reconciler.set_filter(filter).await?;
            reconciler.goto_page(page).await
        }
        Command::Add { title } => reconciler.add(&title).await,
        Command::Done { id } => {
            let id = TaskId::from_uuid(id);
            page_containing(reconciler, id).await?;
            reconciler.toggle(id).await
        }
        Command::Rename { id, title } => {
            let id = TaskId::from_uuid(id);
            page_containing(reconciler, id).await?;
            reconciler.rename(id, &title).await
        }
        Command::Rm { id } => {
            let id = TaskId::from_uuid(id);
            page_containing(reconciler, id).await?;
            reconciler.delete(id).await
        }
    }
}

/// Walks pages until the addressed task is on the current one.
///
/// Single-shot commands address tasks the user saw on some page; the
/// reconciler only mutates tasks it is currently rendering.
async fn page_containing(
    reconciler: &mut Reconciler<HttpTaskApi>,
    id: TaskId,
) -> Result<(), taskly::sync::SyncError> {
    reconciler.refresh().await?;
    while !reconciler.tasks().iter().any(|t| t.id == id)
        && reconciler.page() < reconciler.total_pages()
    {
        let next = reconciler.page() + 1;
        reconciler.goto_page(next).await?;
    }
    Ok(())
}

/// Prints the reconciler's current page as plain text.
fn print_page(reconciler: &Reconciler<HttpTaskApi>) {
    for task in reconciler.tasks() {
        let mark = if task.completed { 'x' } else { ' ' };
        println!("[{mark}] {}  ({})", task.title, task.id);
    }
    if reconciler.total_pages() > 1 {
        println!(
            "page {}/{} -- {} tasks",
            reconciler.page(),
            reconciler.total_pages(),
            reconciler.total()
        );
    }
}
