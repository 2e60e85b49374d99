//! Command line configuration.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::message::Role;
use crate::sanitize::{SanitizePolicy, UrlSchemes};

/// Command line configuration for chatmark.
#[derive(Debug, Clone, Parser)]
#[command(name = "chatmark", version, about, long_about = None)]
pub struct Config {
    /// Input file, reads stdin when omitted or "-"
    pub input: Option<PathBuf>,

    /// Author of the text, selecting Markdown or plain rendering
    #[arg(short, long, value_enum, default_value_t = Role::Assistant)]
    pub role: Role,

    /// Output file, prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Wrap the rendered message in a complete HTML page
    #[arg(long)]
    pub page: bool,

    /// Page title used with --page
    #[arg(long, default_value = "Chat")]
    pub title: String,

    /// Keep anchor URLs of any scheme, including javascript:
    #[arg(long)]
    pub allow_any_scheme: bool,

    /// Open the output file in the default browser
    #[arg(long)]
    pub open: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input file does not exist or `--open` is given
    /// without an output file.
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = self.input_path() {
            if !input.is_file() {
                bail!("Input file does not exist: {}", input.display());
            }
        }

        if self.open && self.output.is_none() {
            bail!("--open requires --output");
        }

        Ok(())
    }

    /// Returns input file path, or `None` when reading stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Builds the sanitizer policy selected by the flags.
    pub fn policy(&self) -> SanitizePolicy {
        let policy = SanitizePolicy::default();
        if self.allow_any_scheme {
            policy.url_schemes(UrlSchemes::Any)
        } else {
            policy
        }
    }
}
