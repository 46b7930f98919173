use anyhow::{Context, Result};
use catpost::api::ApiClient;
use catpost::app::{App, AppEvent};
use catpost::config::{Config, API_BASE_URL_ENV};
use catpost::{tree, ui};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/catpost/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("catpost"))
}

#[derive(Parser, Debug)]
#[command(name = "catpost", about = "Manage categories and posts over a REST API")]
struct Args {
    /// API base URL (overrides CATPOST_API_BASE_URL and the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Config file path (default: ~/.config/catpost/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the category tree
    Tree {
        /// Only list categories under this parent id
        #[arg(long, value_name = "ID")]
        parent: Option<i64>,
    },
    /// Print all posts with their categories
    Posts,
}

/// Log to a file while the TUI owns the terminal, otherwise to stderr.
fn init_tracing(config: &Config, log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn print_tree(api: &ApiClient, parent: Option<i64>) -> Result<()> {
    let list = api
        .list_categories(parent)
        .await
        .context("Failed to fetch categories")?;

    let rows = tree::tree_rows(&list.data);
    if rows.is_empty() {
        println!("No categories yet");
        return Ok(());
    }
    for row in rows {
        println!(
            "{}{} [#{}] {} sub, {} posts",
            "  ".repeat(row.depth),
            row.category.name,
            row.category.id,
            row.child_count,
            row.post_count
        );
    }
    println!("({} total)", list.total_item);
    Ok(())
}

async fn print_posts(api: &ApiClient) -> Result<()> {
    let list = api.list_posts().await.context("Failed to fetch posts")?;
    if list.data.is_empty() {
        println!("No posts yet");
        return Ok(());
    }
    for post in &list.data {
        let names: Vec<&str> = post.categories.iter().map(|c| c.name.as_str()).collect();
        let names = if names.is_empty() {
            "Uncategorized".to_string()
        } else {
            names.join(", ")
        };
        println!("#{} {} [{}]", post.id, post.title, names);
    }
    println!("({} total)", list.total_item);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let log_file = if args.command.is_none() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        Some(config_dir.join("catpost.log"))
    } else {
        None
    };
    init_tracing(&config, log_file.as_deref())?;

    let env_url = std::env::var(API_BASE_URL_ENV).ok();
    let base_url = config.resolve_api_base_url(args.api_url.as_deref(), env_url.as_deref());
    let api = ApiClient::new(&base_url).context("Failed to create API client")?;
    tracing::info!(base_url = %api.base_url(), "Using API");

    match args.command {
        Some(Command::Tree { parent }) => print_tree(&api, parent).await,
        Some(Command::Posts) => print_posts(&api).await,
        None => {
            let mut app = App::new(api, Duration::from_secs(config.status_timeout_secs));
            let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
            ui::run(&mut app, event_tx, event_rx).await?;
            Ok(())
        }
    }
}
