//! TriSplit CLI - structural three-stream block compressor.
//!
//! Walks the input file in 8 MiB blocks, compresses or decompresses each one
//! independently, and frames the output with size-prefixed records.

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use trisplit_block::{
    MAX_BLOCK_SIZE, ReconEngine, compress_block, decompress_block, read_frame, write_frame,
};

#[derive(Parser)]
#[command(name = "trisplit")]
#[command(
    author,
    version,
    about = "Structural three-stream block compressor",
    long_about = "
TriSplit splits each 8 MiB block into three statistically specialized binary
streams and entropy-codes each one separately.

Examples:
  trisplit -c data.bin data.tsp
  trisplit -d data.tsp data.bin
  trisplit -c --engine bwt data.bin data.tsp
"
)]
#[command(group = clap::ArgGroup::new("mode").required(true).multiple(false))]
struct Cli {
    /// Compress the input file
    #[arg(short = 'c', group = "mode")]
    compress: bool,

    /// Decompress the input file
    #[arg(short = 'd', group = "mode")]
    decompress: bool,

    /// Input file
    input: PathBuf,

    /// Output file
    output: PathBuf,

    /// Entropy engine for the reconstructed stream (compression only)
    #[arg(long, value_enum, default_value = "rans")]
    engine: EngineArg,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineArg {
    /// rANS 2-bit rewrite
    Rans,
    /// BWT/MTF/RLE/Huffman pipeline
    Bwt,
}

impl From<EngineArg> for ReconEngine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Rans => ReconEngine::Rans,
            EngineArg::Bwt => ReconEngine::Bwt,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let input_len = std::fs::metadata(&cli.input)?.len();
    let mut reader = BufReader::new(File::open(&cli.input)?);
    let mut writer = BufWriter::new(File::create(&cli.output)?);

    let progress = create_progress_bar(input_len, !cli.quiet);

    if cli.compress {
        compress_file(&mut reader, &mut writer, cli.engine.into(), &progress)?;
    } else {
        debug_assert!(cli.decompress, "clap enforces exactly one mode flag");
        decompress_file(&mut reader, &mut writer, &progress)?;
    }

    writer.flush()?;
    progress.finish_with_message("done");
    Ok(())
}

fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Fill `buf` from the reader, tolerating short reads. Returns the number of
/// bytes actually read; less than the buffer length means EOF.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn compress_file<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    engine: ReconEngine,
    progress: &ProgressBar,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut buffer = vec![0u8; MAX_BLOCK_SIZE];

    loop {
        let bytes_read = read_block(reader, &mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        let compressed = compress_block(&buffer[..bytes_read], engine)?;
        write_frame(writer, &compressed)?;
        progress.inc(bytes_read as u64);

        if bytes_read < buffer.len() {
            break;
        }
    }

    Ok(())
}

fn decompress_file<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    progress: &ProgressBar,
) -> Result<(), Box<dyn std::error::Error>> {
    while let Some(frame) = read_frame(reader)? {
        let decompressed = decompress_block(&frame)?;
        writer.write_all(&decompressed)?;
        progress.inc(8 + frame.len() as u64);
    }

    Ok(())
}
