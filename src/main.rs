//! Markpad - A two-pane terminal markdown editor with rich-text export.
//!
//! # Usage
//!
//! ```bash
//! markpad
//! markpad --theme light --accent "#ff6600"
//! markpad serve --root web --port 8000
//! markpad export README.md --copy
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use markpad::app::App;
use markpad::clipboard::SystemClipboard;
use markpad::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use markpad::export::{self, DEFAULT_ACCENT, ExportOptions, TaskDetection};
use markpad::highlight::{HighlightBackground, set_background_mode};
use markpad::render::{self, RenderOptions};
use markpad::server::{DEFAULT_HOST, DEFAULT_PORT, Server};
use markpad::store::default_store_path;
use markpad::ui::style::{Theme, parse_css_color};
use markpad::words::count_words;

/// A two-pane terminal markdown editor with rich-text export
#[derive(Parser, Debug)]
#[command(name = "markpad", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Color scheme for the editor and highlighted code
    #[arg(long, value_enum, global = true)]
    theme: Option<ThemeMode>,

    /// Accent color used by the preview and rich-text export
    #[arg(long, value_name = "HEX", global = true)]
    accent: Option<String>,

    /// Store file holding the edited document
    #[arg(long, value_name = "PATH", global = true)]
    store: Option<PathBuf>,

    /// Recognize task items by `[ ]`/`[x]` text instead of checkboxes
    #[arg(long, global = true)]
    literal_tasks: bool,

    /// Save current command-line flags as defaults in the global config
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edit the stored document (default)
    Edit,
    /// Serve static files over HTTP
    Serve {
        #[arg(long, value_name = "HOST")]
        host: Option<String>,
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,
        /// Directory to serve
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
    /// Render a markdown file to HTML
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Emit a complete page instead of a fragment
        #[arg(long)]
        standalone: bool,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Export a markdown file as style-inlined rich text
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Copy to the clipboard instead of printing
        #[arg(long)]
        copy: bool,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the word count of a markdown file
    Count {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Logs share the terminal with the editor, so `edit` stays silent unless
/// `RUST_LOG` is set.
fn init_logging(interactive: bool, serving: bool) {
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    } else if interactive {
        EnvFilter::new("off")
    } else if serving {
        EnvFilter::new("warn,markpad=info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_markdown(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    if let Some(path) = output {
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .context("Failed to write to stdout")
    }
}

fn export_options(flags: &ConfigFlags) -> Result<ExportOptions> {
    let accent = flags
        .accent
        .clone()
        .unwrap_or_else(|| DEFAULT_ACCENT.to_string());
    if parse_css_color(&accent).is_none() {
        anyhow::bail!("Invalid accent color: {accent} (expected #rgb or #rrggbb)");
    }
    Ok(ExportOptions {
        accent,
        task_detection: if flags.literal_tasks {
            TaskDetection::Literal
        } else {
            TaskDetection::Structural
        },
    })
}

fn serve(flags: &ConfigFlags) -> Result<()> {
    let host = flags.host.as_deref().unwrap_or(DEFAULT_HOST);
    let port = flags.port.unwrap_or(DEFAULT_PORT);
    let root = flags.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let server = Server::bind(host, port, root)?;
    let addr = server.local_addr()?;
    println!("服务器运行在 http://{addr}/");
    println!("按 Ctrl+C 停止服务器");
    server.serve_forever().context("Server stopped")
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Edit);
    init_logging(
        matches!(command, Command::Edit),
        matches!(command, Command::Serve { .. }),
    );

    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let background = match effective.theme {
        Some(ThemeMode::Dark) => HighlightBackground::Dark,
        Some(ThemeMode::Light) | None => HighlightBackground::Light,
    };
    set_background_mode(background);
    let export_options = export_options(&effective)?;
    let render_options = RenderOptions::default();

    match command {
        Command::Edit => {
            let store_path = effective.store.clone().unwrap_or_else(default_store_path);
            let mut app = App::new(store_path)
                .with_theme(Theme::for_background(background, &export_options.accent))
                .with_render_options(render_options)
                .with_export_options(export_options)
                .with_config_paths(
                    Some(global_path.clone()),
                    if local_path.exists() {
                        Some(local_path.clone())
                    } else {
                        None
                    },
                );
            app.run().context("Application error")
        }
        Command::Serve { .. } => serve(&effective),
        Command::Render {
            file,
            standalone,
            output,
        } => {
            let source = read_markdown(&file)?;
            let fragment = render::render_html(&source, &render_options);
            let html = if standalone {
                let title = file
                    .file_stem()
                    .map_or_else(|| "markpad".into(), |stem| stem.to_string_lossy());
                render::standalone_page(&title, &fragment)
            } else {
                fragment
            };
            write_output(output.as_deref(), &html)
        }
        Command::Export { file, copy, output } => {
            let source = read_markdown(&file)?;
            let rendered = render::render(&source, &render_options);
            if copy {
                let mut clipboard = SystemClipboard::new();
                export::copy_rich_text(&rendered, &export_options, &mut clipboard)
                    .context("Failed to copy rich text")?;
                eprintln!("已复制!");
                Ok(())
            } else {
                write_output(output.as_deref(), &export::export_html(&rendered, &export_options))
            }
        }
        Command::Count { file } => {
            let source = read_markdown(&file)?;
            println!("字数: {}", count_words(&source).total());
            Ok(())
        }
    }
}
