//! Stylesheet bundled with transcript pages

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Stylesheet for transcript pages.
pub const CHAT_CSS: &str = include_str!("../assets/chat.css");

/// File name the stylesheet is written under.
pub const CHAT_CSS_FILE: &str = "chat.css";

/// Writes the chat stylesheet into `assets_dir`, creating the directory.
pub fn write_css_assets(assets_dir: &Path) -> Result<()> {
    fs::create_dir_all(assets_dir)
        .with_context(|| format!("Failed to create assets directory {}", assets_dir.display()))?;
    fs::write(assets_dir.join(CHAT_CSS_FILE), CHAT_CSS)
        .with_context(|| format!("Failed to write CSS asset: {}", CHAT_CSS_FILE))?;
    Ok(())
}
