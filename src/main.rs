use anyhow::{Context, Result};
use chatmark::{Config, Message, Stylesheet, assets};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log level used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs the stderr subscriber so stdout carries only rendered markup.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Reads message text from the configured file or stdin.
fn read_input(config: &Config) -> Result<String> {
    match config.input_path() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Renders the message, as a fragment or as a full page.
///
/// Pages written to a file link `assets/chat.css` next to it; pages printed
/// to stdout embed the stylesheet.
fn render(config: &Config, message: &Message, output: Option<&Path>) -> Result<String> {
    let policy = config.policy();

    if !config.page {
        return Ok(chatmark::render_message_with(message, &policy));
    }

    let stylesheet_href = format!("assets/{}", assets::CHAT_CSS_FILE);
    let stylesheet = match output {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new(""));
            assets::write_css_assets(&dir.join("assets"))?;
            Stylesheet::Link(&stylesheet_href)
        }
        None => Stylesheet::Inline(assets::CHAT_CSS),
    };

    let page = chatmark::transcript_page(
        &config.title,
        std::slice::from_ref(message),
        &policy,
        stylesheet,
    );
    Ok(page.into_string())
}

fn main() -> Result<()> {
    init_tracing();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    let text = read_input(&config)?;
    if text.trim().is_empty() {
        warn!("input is empty");
    }

    let message = Message::new(config.role, text);
    if config.allow_any_scheme {
        warn!("anchor URL scheme filtering disabled");
    }

    let html = render(&config, &message, config.output.as_deref())?;

    match &config.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }
            fs::write(path, &html)
                .with_context(|| format!("Failed to write output {}", path.display()))?;
            info!(path = %path.display(), bytes = html.len(), "wrote output");

            if config.open {
                open::that(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .context("Failed to write stdout")?;
        }
    }

    Ok(())
}
