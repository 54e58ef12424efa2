use anyhow::Result;
use clap::{Parser, Subcommand};
use code_segmenter::config::Config;
use code_segmenter::segmenter::{self, Chunk};
use code_segmenter::watcher::FileWatcher;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "code-segmenter", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment a single source file and print its chunks
    Segment {
        /// Source file to segment
        file: PathBuf,

        /// Emit chunks as JSON, one per line
        #[arg(long)]
        json: bool,
    },
    /// Watch a directory tree and re-segment files as they change
    Watch {
        /// Directory to monitor (overrides the configured root)
        root: Option<PathBuf>,

        /// Path to a TOML configuration file
        #[arg(long, env = "CODE_SEGMENTER_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Segment { file, json } => {
            let segmentation = segmenter::segment_file(&file)?;

            for diagnostic in &segmentation.diagnostics {
                tracing::warn!("{}: {}", file.display(), diagnostic);
            }
            for chunk in &segmentation.chunks {
                if json {
                    println!("{}", serde_json::to_string(chunk)?);
                } else {
                    print_chunk(chunk);
                }
            }
        }
        Command::Watch { root, config } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(root) = root {
                config.watch.root = root;
            }

            let watcher = FileWatcher::new(config.watch)?;
            tokio::select! {
                result = watcher.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Monitoring stopped");
                }
            }
        }
    }

    Ok(())
}

fn print_chunk(chunk: &Chunk) {
    println!(
        "---- [{}] {} ({}:{}-{})",
        chunk.kind, chunk.name, chunk.file_name, chunk.start_line, chunk.end_line
    );
    println!("{}", chunk.source_text);
}
