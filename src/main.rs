//! Binary entry point for the `lz4pack` command-line tool.
//!
//! A thin front over the file-container adapter: `compress` and `decompress`
//! subcommands map flags one-to-one onto [`lz4pack::file::FileOptions`]
//! fields, and verbosity flags onto the global notification level.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use lz4pack::file::{compress_file, decompress_file, FileOptions};

#[derive(Parser)]
#[command(name = "lz4pack", version, about = "Compress and decompress .lz4 container files")]
struct Cli {
    /// Increase verbosity (repeatable).
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BlockModeArg {
    /// Blocks share a 64 KiB dictionary window.
    Chained,
    /// Each block is compressed independently.
    Independent,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file into an .lz4 container.
    Compress {
        /// Input file.
        input: String,

        /// Output file (defaults to INPUT.lz4).
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Compression level; negative values trade ratio for speed.
        #[arg(short = 'l', long, default_value_t = 0, allow_negative_numbers = true)]
        level: i32,

        /// Block size id (4 = 64 KiB ... 7 = 4 MiB).
        #[arg(short = 'B', long, default_value_t = 7)]
        block_size_id: i32,

        /// Block dependency mode.
        #[arg(long, value_enum, default_value_t = BlockModeArg::Independent)]
        block_mode: BlockModeArg,

        /// Add a checksum to every block.
        #[arg(long)]
        block_checksum: bool,

        /// Omit the whole-stream checksum.
        #[arg(long)]
        no_stream_checksum: bool,

        /// Refuse to overwrite an existing output file.
        #[arg(short = 'k', long)]
        no_overwrite: bool,
    },
    /// Decompress an .lz4 container (output path = input minus suffix).
    Decompress {
        /// Input container file.
        input: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Default level 2: results and warnings, as the container codec expects.
    let verbosity = if cli.quiet {
        0
    } else {
        (2 + cli.verbose as i32).min(4)
    };

    match cli.command {
        Command::Compress {
            input,
            output,
            level,
            block_size_id,
            block_mode,
            block_checksum,
            no_stream_checksum,
            no_overwrite,
        } => {
            let options = FileOptions {
                overwrite: (!no_overwrite) as i32,
                block_size_id,
                block_mode: match block_mode {
                    BlockModeArg::Chained => 0,
                    BlockModeArg::Independent => 1,
                },
                block_checksum: block_checksum as i32,
                stream_checksum: (!no_stream_checksum) as i32,
                verbosity,
            };
            compress_file(&input, output.as_deref(), level, &options)
                .with_context(|| format!("cannot compress {}", input))?;
        }
        Command::Decompress { input } => {
            lz4pack::io::set_notification_level(verbosity);
            decompress_file(&input).with_context(|| format!("cannot decompress {}", input))?;
        }
    }
    Ok(())
}
