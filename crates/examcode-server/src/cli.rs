use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "examcode-server")]
#[command(author, version, about = "Resolve patient imaging requests to exam codes", long_about = None)]
pub struct Cli {
    /// Configuration file path (optional)
    #[arg(short, long, default_value = "examcode.yaml")]
    pub config: PathBuf,

    /// Rule set file replacing the built-in normalization and category tables
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Catalog gateway listing URL
    #[arg(long)]
    pub catalog_url: Option<String>,

    /// Azure OpenAI resource endpoint
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    pub azure_endpoint: String,

    /// Azure OpenAI API key
    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    pub azure_api_key: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
