use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};

use crate::{
    coach::{CoachConfig, DEFAULT_MAX_REPLY_CHARS},
    gateway::gemini::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL},
};

#[derive(Parser)]
#[command(name = "trucks-barges-coach")]
#[command(about = "Guided reflection on the Trucks & Barges serious game")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Generative Language API
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP timeout for a single model call, in seconds
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// Longest accepted reply, in characters
    #[arg(long, default_value_t = DEFAULT_MAX_REPLY_CHARS)]
    pub max_reply_chars: usize,

    /// Image to send along with the first reply (repeatable)
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Print the deepening topics and exit
    Topics,
}

impl Cli {
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub const fn coach_config(&self) -> CoachConfig {
        CoachConfig {
            max_reply_chars: self.max_reply_chars,
        }
    }
}
