use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "mdshelf",
    about = "Terminal Markdown viewer with a persistent shelf of documents",
    version
)]
pub struct Cli {
    /// Markdown files (.md) to open at startup, as one intake batch.
    pub files: Vec<PathBuf>,

    /// Chunk target size in bytes for incremental rendering.
    #[arg(long, default_value_t = mdshelf_core::chunker::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// State directory for the persisted shelf (defaults to the platform data dir).
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
}
