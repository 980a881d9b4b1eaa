use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "stargaze",
    version,
    about = "Browse astronomy pictures and videos from the terminal"
)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the media list URL
    #[arg(long, global = true)]
    pub data_url: Option<String>,
    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive gallery
    Browse,
    /// Fetch once and print the gallery
    List,
    /// Print the detail view of one card
    Show {
        /// 1-based card number
        index: usize,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Classify a video URL and print its embeddable form
    Classify { url: String },
}
