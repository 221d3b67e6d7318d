//! Portfolio admin - terminal front end for the admin content API
//!
//! Builds one `ContentAdminClient` wired to the HTTP backend, a terminal view and a
//! stdin confirmation prompt, then runs a single operation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_admin::{
    api::HttpAdminApi,
    config::Config,
    dashboard::{
        notification::{Notification, NotificationKind},
        view::{AdminView, ConfirmGate, ListView, Progress, StatsView},
        ContentAdminClient, DeleteOutcome, RefreshOutcome, SubmitOutcome,
    },
    form::{file_label, FormFile, FormKind, UploadForm},
    preview::PreviewView,
    render::HtmlRenderer,
};

#[derive(Parser)]
#[command(name = "portfolio-admin", version, about = "Manage portfolio blog posts and papers")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "admin.yml")]
    config: PathBuf,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List blog posts and papers
    List {
        /// Print HTML fragments instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Upload a technical paper
    UploadPaper {
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create a blog post
    CreateBlog {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        excerpt: String,
        /// Markdown body, or @path to read it from a file
        #[arg(long)]
        content: String,
        /// Cover image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Upload images
    UploadImages {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete a blog post
    DeleteBlog { id: String },
    /// Delete a technical paper
    DeletePaper { id: String },
    /// End the admin session
    Logout,
}

/// Prints everything the dashboard reports
struct TerminalView {
    show_lists: bool,
    html: Option<HtmlRenderer>,
}

impl TerminalView {
    fn print_list(&self, heading: &str, view: &ListView) {
        if !self.show_lists {
            return;
        }

        if let Some(renderer) = &self.html {
            match renderer.content_list(view) {
                Ok(html) => println!("{}", html),
                Err(e) => tracing::warn!("Failed to render {}: {}", heading, e),
            }
            return;
        }

        match view {
            ListView::Loading => {}
            ListView::Empty { message, .. } => println!("{}\n  {}", heading, message),
            ListView::Populated { items } => {
                println!("{}", heading);
                for item in items {
                    println!("  [{}] {} ({})", item.id, item.title, item.date_label);
                    if !item.summary.is_empty() {
                        println!("      {}", item.summary);
                    }
                }
            }
        }
    }
}

impl AdminView for TerminalView {
    fn render_blogs(&self, view: &ListView) {
        self.print_list("Blog posts", view);
    }

    fn render_papers(&self, view: &ListView) {
        self.print_list("Technical papers", view);
    }

    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => println!("✓ {}", notification.message),
            NotificationKind::Info => println!("i {}", notification.message),
            NotificationKind::Error => eprintln!("✗ {}", notification.message),
        }
    }

    fn set_busy(&self, form: FormKind, busy: bool) {
        tracing::debug!(%form, busy, "Form busy state changed");
    }

    fn render_stats(&self, stats: StatsView) {
        if self.show_lists && self.html.is_none() {
            println!("{} blog post(s), {} paper(s)", stats.blogs, stats.papers);
        }
    }

    fn show_progress(&self, progress: Option<&Progress>) {
        if let Some(progress) = progress {
            eprintln!("{} {}%", progress.title, progress.percent);
        }
    }

    fn render_previews(&self, previews: &[PreviewView]) {
        for preview in previews {
            println!("  + {}", preview.file_name);
        }
    }

    fn navigate(&self, url: &str) {
        println!("Open {} to end the session", url);
    }
}

/// Asks on stdin unless every prompt is pre-approved
struct StdinGate {
    assume_yes: bool,
}

impl ConfirmGate for StdinGate {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

async fn read_content(content: &str) -> Result<String> {
    match content.strip_prefix('@') {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path)),
        None => Ok(content.to_string()),
    }
}

async fn attach(field: &str, path: &Path) -> Result<FormFile> {
    FormFile::from_path(field, path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn submit_code(outcome: SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Accepted => ExitCode::SUCCESS,
        SubmitOutcome::Rejected => ExitCode::FAILURE,
    }
}

fn delete_code(outcome: DeleteOutcome) -> ExitCode {
    match outcome {
        DeleteOutcome::Deleted | DeleteOutcome::Cancelled => ExitCode::SUCCESS,
        DeleteOutcome::Failed => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load_with_env(&cli.config)?;
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let html = match &cli.command {
        Commands::List { html: true } => Some(HtmlRenderer::new()?),
        _ => None,
    };
    let view = Arc::new(TerminalView {
        show_lists: matches!(cli.command, Commands::List { .. }),
        html,
    });
    let gate = Arc::new(StdinGate { assume_yes: cli.yes });
    let api = HttpAdminApi::boxed(&config.api)?;

    let mut client = ContentAdminClient::new(api, view, gate, &config);

    let code = match cli.command {
        Commands::List { .. } => match client.start().await {
            RefreshOutcome::Updated => ExitCode::SUCCESS,
            RefreshOutcome::Stale => {
                eprintln!("Could not load content from {}", config.api.base_url);
                ExitCode::FAILURE
            }
        },
        Commands::UploadPaper {
            file,
            title,
            description,
        } => {
            let mut form = UploadForm::new()
                .with_text("title", title)
                .with_text("description", description)
                .with_file(attach("file", &file).await?);
            submit_code(client.submit_paper(&mut form).await)
        }
        Commands::CreateBlog {
            title,
            excerpt,
            content,
            image,
        } => {
            let mut form = UploadForm::new()
                .with_text("title", title)
                .with_text("excerpt", excerpt)
                .with_text("content", read_content(&content).await?);
            if let Some(image) = image {
                form.attach(attach("image", &image).await?);
            }
            submit_code(client.submit_blog_post(&mut form).await)
        }
        Commands::UploadImages { files } => {
            let mut form = UploadForm::new();
            for path in &files {
                form.attach(attach("images", path).await?);
            }

            let names: Vec<_> = form.files().iter().map(|f| f.file_name.as_str()).collect();
            if let Some(label) = file_label(&names) {
                println!("{}", label);
            }

            // a terminal "loads" every thumbnail as soon as it is listed
            for preview in client.preview_local_images(form.files()) {
                client.thumbnail_loaded(&preview.url);
            }

            submit_code(client.submit_images(&mut form).await)
        }
        Commands::DeleteBlog { id } => delete_code(client.delete_blog(&id).await),
        Commands::DeletePaper { id } => delete_code(client.delete_paper(&id).await),
        Commands::Logout => {
            client.logout();
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
