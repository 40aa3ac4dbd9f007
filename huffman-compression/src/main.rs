use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use huffman_compression::{files, ArchiveStats};
use log::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file, asking for its name when none is given
    Compress {
        input: Option<PathBuf>,
        /// Defaults to the input name with `Arch` before the extension
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a file from an archive, asking for names when none are given
    Decompress {
        archive: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Command::Compress { input, output } => compress(input, output),
        Command::Decompress { archive, output } => decompress(archive, output),
    }
}

fn compress(input: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let (input, source) = open_or_prompt(input)?;
    let output = output.unwrap_or_else(|| files::archive_path(&input));

    let stats = files::compress_reader(source, &output)?;
    report("compressed", &input, &output, &stats)?;
    println!("{}", output.display());
    Ok(())
}

fn decompress(archive: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let (archive, source) = open_or_prompt(archive)?;
    let output = match output {
        Some(output) => output,
        None => files::prompt_for_path(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "Please, input a filename to unzip: ",
        )?,
    };

    let stats = files::decompress_reader(source, &output)?;
    report("decompressed", &archive, &output, &stats)?;
    println!("{}", output.display());
    Ok(())
}

fn open_or_prompt(path: Option<PathBuf>) -> anyhow::Result<(PathBuf, File)> {
    match path {
        Some(path) => {
            let file =
                File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok((path, file))
        }
        None => files::prompt_for_existing_file(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "Please, enter file name: ",
        ),
    }
}

fn report(action: &str, from: &Path, to: &Path, stats: &ArchiveStats) -> anyhow::Result<()> {
    let from_size = fs::metadata(from)
        .with_context(|| format!("failed to stat {}", from.display()))?
        .len();
    let to_size = fs::metadata(to)
        .with_context(|| format!("failed to stat {}", to.display()))?
        .len();
    let ratio = if from_size == 0 {
        1.0
    } else {
        to_size as f64 / from_size as f64
    };

    info!(
        "{action} {} ({from_size} bytes) into {} ({to_size} bytes), {} symbols, {} distinct, {} payload bytes, ratio {ratio:.3}",
        from.display(),
        to.display(),
        stats.total_symbols,
        stats.distinct_symbols,
        stats.payload_bytes(),
    );
    Ok(())
}
