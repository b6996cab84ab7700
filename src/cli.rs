use std::path::PathBuf;

use clap::Parser;

/// Two-player chess in the terminal.
#[derive(Parser, Debug, Default)]
#[command(name = "hotseat-chess", version, about = "Two-player chess in the terminal")]
pub struct Cli {
    /// Path to the TOML config file; defaults are used if it does not exist
    #[arg(long, default_value = "chess.toml")]
    pub config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// File to write logs to
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Reject moves that leave your own king in check
    #[arg(long)]
    pub king_safety: bool,

    /// Let any piece, not only the king, get out of check before calling mate
    #[arg(long)]
    pub full_mate: bool,

    /// Do not highlight the moves of the selected piece
    #[arg(long)]
    pub no_highlight: bool,
}
