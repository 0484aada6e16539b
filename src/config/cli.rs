use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-bot")]
#[command(about = "Chat bot that answers daily menu queries")]
pub struct ServeArgs {
    /// Path to TOML settings file
    #[arg(short, long, default_value = "settings.toml")]
    pub config: String,

    /// Override the site list file from the settings
    #[arg(long)]
    pub sites: Option<String>,

    /// Override the bind address from the settings
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-query")]
#[command(about = "Print today's (or tomorrow's) aggregated menu and exit")]
pub struct QueryArgs {
    /// Settings file to take the site list and fetch options from
    #[arg(short, long)]
    pub config: Option<String>,

    /// Site list file (JSON array or TOML with [[sites]])
    #[arg(short, long)]
    pub sites: Option<String>,

    /// Show tomorrow's menu instead of today's
    #[arg(short, long)]
    pub tomorrow: bool,

    /// Per-site fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
