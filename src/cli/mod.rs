//! Command-line interface for second-brain.
//!
//! Provides commands for signing in, browsing and adding content, managing
//! tags, toggling the public share link and switching the theme.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::api::{ApiClient, Credentials};
use crate::card::render::render_card;
use crate::card::{ContentCard, SystemClipboard};
use crate::config::{self, paths};
use crate::dashboard::{cards_without_previews, Dashboard, DashboardError, Filter};
use crate::domain::{ContentId, ContentItem, ContentKind};
use crate::forms::ContentDraft;
use crate::grid::{GridView, Paginator};
use crate::notice::Notice;
use crate::session::{FileTokenStore, Session, Theme, ThemeStore};

/// brain - Second Brain bookmarking client
#[derive(Parser, Debug)]
#[command(name = "brain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account (does not sign in)
    Signup {
        username: String,

        #[arg(short, long, env = "BRAIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in and remember the session
    Signin {
        username: String,

        #[arg(short, long, env = "BRAIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show your content as cards
    List {
        /// Only show one content type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,

        /// Page to show (12 cards per page)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Do not fetch link previews
        #[arg(long)]
        no_preview: bool,
    },

    /// Save new content
    Add {
        #[arg(long)]
        title: String,

        #[arg(short = 't', long = "type", value_enum, default_value = "link")]
        kind: KindArg,

        /// URL, or the note body for text content
        #[arg(short, long, default_value = "")]
        link: String,

        /// Tag titles (repeatable); missing tags are created
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a content item
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Copy an item's link to the clipboard
    Copy { id: String },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Turn the public share link on or off
    Share {
        #[arg(value_enum)]
        state: ShareState,
    },

    /// Browse someone's shared collection
    Shared {
        /// Share hash from the public link
        hash: String,

        #[arg(short, long, default_value = "1")]
        page: usize,

        #[arg(long)]
        no_preview: bool,
    },

    /// Show or change the theme preference
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Look a tag up by title
    Get { title: String },

    /// Create a tag (returns the existing one if present)
    Create { title: String },

    /// Delete a tag by id
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    Show,
    Toggle,
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

/// Content type for CLI (maps to ContentKind)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Link,
    Image,
    Video,
    Text,
}

impl From<KindArg> for ContentKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Link => ContentKind::Link,
            KindArg::Image => ContentKind::Image,
            KindArg::Video => ContentKind::Video,
            KindArg::Text => ContentKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShareState {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Signup { username, password } => {
                sign_up(Credentials::new(username, password)).await
            }
            Commands::Signin { username, password } => {
                sign_in(Credentials::new(username, password)).await
            }
            Commands::Logout => logout(),
            Commands::List {
                kind,
                page,
                no_preview,
            } => list_content(Filter::from(kind.map(ContentKind::from)), page, no_preview).await,
            Commands::Add {
                title,
                kind,
                link,
                tags,
            } => add_content(title, kind.into(), link, tags).await,
            Commands::Delete { id, yes } => delete_content(&id, yes).await,
            Commands::Copy { id } => copy_link(&id).await,
            Commands::Tag { command } => execute_tag(command).await,
            Commands::Share { state } => share(state == ShareState::On).await,
            Commands::Shared {
                hash,
                page,
                no_preview,
            } => show_shared(&hash, page, no_preview).await,
            Commands::Theme { command } => {
                execute_theme(command.unwrap_or(ThemeCommands::Show))
            }
            Commands::Config => show_config(),
        }
    }
}

/// Client plus restored session
fn open_dashboard() -> Result<Dashboard<ApiClient>> {
    let cfg = config::config()?;
    let api = ApiClient::from_config(cfg)?;
    let session = Session::initialize(FileTokenStore::new(paths::session_file()?));
    Ok(Dashboard::new(api, session))
}

/// Dashboard failures become a one-line error notice
fn failed(e: DashboardError) -> anyhow::Error {
    anyhow::anyhow!(Notice::error(e.user_message()))
}

fn report(notice: &Notice) {
    eprintln!("{}", notice);
}

async fn sign_up(credentials: Credentials) -> Result<()> {
    let dashboard = open_dashboard()?;
    let ack = dashboard.sign_up(&credentials).await.map_err(failed)?;
    report(&Notice::success(ack.message));
    eprintln!("Now sign in with 'brain signin {}'.", credentials.username);
    Ok(())
}

async fn sign_in(credentials: Credentials) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let signed_in = dashboard.sign_in(&credentials).await.map_err(failed)?;
    report(&Notice::success(signed_in.message));
    Ok(())
}

fn logout() -> Result<()> {
    let mut dashboard = open_dashboard()?;
    dashboard.sign_out().map_err(failed)?;
    report(&Notice::success("Logged out."));
    Ok(())
}

/// Print one page of cards plus the page controls
async fn print_grid(
    dashboard: &mut Dashboard<ApiClient>,
    items: &[ContentItem],
    page: usize,
    no_preview: bool,
    empty_message: &str,
) {
    let paginator = Paginator::new().at_page(page);

    let page = match paginator.view(items) {
        GridView::Empty => {
            println!("{}", empty_message);
            return;
        }
        GridView::Page(page) => page,
    };

    // Only the visible page is mounted, so only its links are previewed
    let cards = if no_preview {
        cards_without_previews(page.items)
    } else {
        dashboard.cards(page.items).await
    };

    for card in &cards {
        println!("{}", render_card(&card.view()));
    }

    if page.show_controls() {
        let mut controls = format!("Page {} of {}", page.page, page.page_count);
        if page.has_previous() {
            controls.push_str(&format!("  (previous: --page {})", page.page - 1));
        }
        if page.has_next() {
            controls.push_str(&format!("  (next: --page {})", page.page + 1));
        }
        println!("{}", controls);
    }
}

async fn list_content(filter: Filter, page: usize, no_preview: bool) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let items = dashboard.load_filtered(filter).await.map_err(failed)?;

    print_grid(&mut dashboard, &items, page, no_preview, &filter.empty_message()).await;
    Ok(())
}

async fn add_content(
    title: String,
    kind: ContentKind,
    link: String,
    tags: Vec<String>,
) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let mut draft = ContentDraft::new(kind).with_title(title).with_link(link);

    // Catch input problems before any tag is created
    draft.validate().map_err(|e| anyhow::anyhow!(Notice::error(e.to_string())))?;

    for tag in &tags {
        let outcome = dashboard.add_tag(&mut draft, tag).await.map_err(failed)?;
        if let Some(notice) = outcome.notice() {
            report(&notice);
        }
    }

    let created = dashboard.add(&draft).await.map_err(failed)?;
    report(&Notice::success(created.message));

    let total = dashboard.load().await.map_err(failed)?.len();
    eprintln!("You now have {} item(s).", total);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush().context("Failed to flush stderr")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn delete_content(id: &str, yes: bool) -> Result<()> {
    if !yes && !confirm("Are you sure you want to delete this content?")? {
        eprintln!("Cancelled.");
        return Ok(());
    }

    let mut dashboard = open_dashboard()?;
    let ack = dashboard
        .delete(&ContentId::new(id))
        .await
        .map_err(failed)?;
    report(&Notice::success(ack.message));

    let total = dashboard.load().await.map_err(failed)?.len();
    eprintln!("You now have {} item(s).", total);
    Ok(())
}

async fn copy_link(id: &str) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let items = dashboard.load().await.map_err(failed)?;

    let item = items
        .into_iter()
        .find(|i| i.id.as_str() == id)
        .ok_or_else(|| anyhow::anyhow!(Notice::error(format!("No content with id {}", id))))?;

    let (card, _) = ContentCard::mount(item);
    match card.copy_link(&SystemClipboard) {
        Some(notice) if notice.is_error() => anyhow::bail!(notice),
        Some(notice) => report(&notice),
        None => report(&Notice::error("This item has no link to copy.")),
    }
    Ok(())
}

async fn execute_tag(command: TagCommands) -> Result<()> {
    let mut dashboard = open_dashboard()?;

    match command {
        TagCommands::Get { title } => {
            match dashboard.find_tag(&title).await.map_err(failed)? {
                Some(tag) => println!("{}  {}", tag.id, tag.title),
                None => report(&Notice::error(format!("Tag \"{}\" not found.", title))),
            }
        }
        TagCommands::Create { title } => {
            let tag = dashboard.create_tag(&title).await.map_err(failed)?;
            println!("{}  {}", tag.id, tag.title);
        }
        TagCommands::Delete { id } => {
            let ack = dashboard.delete_tag(&id).await.map_err(failed)?;
            report(&Notice::success(ack.message));
        }
    }

    Ok(())
}

async fn share(enable: bool) -> Result<()> {
    let cfg = config::config()?;
    let mut dashboard = open_dashboard()?;
    let link = dashboard.share(enable).await.map_err(failed)?;

    match link.hash {
        Some(hash) if enable => {
            report(&Notice::success("Share link created!"));
            println!("{}", cfg.share_url(&hash));
        }
        _ => report(&Notice::success(link.message)),
    }
    Ok(())
}

async fn show_shared(hash: &str, page: usize, no_preview: bool) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let shared = dashboard.shared(hash).await.map_err(failed)?;

    println!("{}", shared.heading());
    println!();
    print_grid(&mut dashboard, &shared.content, page, no_preview, shared.empty_message()).await;
    Ok(())
}

fn execute_theme(command: ThemeCommands) -> Result<()> {
    let store = ThemeStore::new(paths::theme_file()?);

    let theme = match command {
        ThemeCommands::Show => store.load(),
        ThemeCommands::Toggle => store.toggle()?,
        ThemeCommands::Set { theme } => {
            let theme = Theme::from(theme);
            store.save(theme)?;
            theme
        }
    };

    println!("Theme: {}", theme);
    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Second Brain Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Session: {}", paths::session_file_in(&cfg.home).display());
    println!("  Theme:   {}", paths::theme_file_in(&cfg.home).display());
    println!();
    println!("Backend:");
    println!("  API URL:    {}", cfg.api_url);
    println!("  Share base: {}", cfg.share_base_url);
    println!("  Timeout:    {}s", cfg.http.timeout_seconds);

    Ok(())
}
