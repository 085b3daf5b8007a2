use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use huffzip::code::render;
use huffzip::{Frequencies, Trie};

#[derive(Parser)]
#[command(
    name = "huffzip",
    about = "Static Huffman file compressor",
    version,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log trie and header details
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress SOURCE into TARGET
    #[command(visible_alias = "z")]
    Compress {
        source: PathBuf,
        target: PathBuf,

        /// Print size statistics after compressing
        #[arg(long)]
        stats: bool,
    },

    /// Decompress SOURCE into TARGET
    #[command(visible_alias = "u")]
    Decompress { source: PathBuf, target: PathBuf },

    /// Print the code assigned to every byte of SOURCE
    Codes { source: PathBuf },
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> huffzip::Result<()> {
    match cli.command {
        Commands::Compress {
            source,
            target,
            stats,
        } => {
            let summary = huffzip::compress_file(&source, &target)?;
            if stats {
                println!("{summary}");
            }
        }
        Commands::Decompress { source, target } => {
            huffzip::decompress_file(&source, &target)?;
        }
        Commands::Codes { source } => {
            let freq = Frequencies::count(BufReader::new(File::open(&source)?))?;
            let table = Trie::from_frequencies(&freq).code_table();
            for (symbol, code) in table.iter() {
                let shown = if symbol.is_ascii_graphic() {
                    format!("'{}'", symbol as char)
                } else {
                    "   ".to_string()
                };
                println!(
                    "0x{symbol:02x} {shown} {:>10} {}",
                    freq.get(symbol),
                    render(code)
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
