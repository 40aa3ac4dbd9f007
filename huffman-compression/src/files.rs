use std::{
    ffi::OsString,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use log::debug;
use tempfile::NamedTempFile;

use crate::codec::{self, ArchiveStats};

const ARCHIVE_MARKER: &str = "Arch";
const FILE_NOT_FOUND: &str = "The file can not be found. Check the correctness of the file name.";

/// `notes.txt` becomes `notesArch.txt`, a name without extension just gets
/// the marker appended.
pub fn archive_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(ARCHIVE_MARKER);
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }
    input.with_file_name(name)
}

/// Keeps asking until the answer names a file that can be opened. Only a
/// missing file is retried, any other failure is returned.
pub fn prompt_for_existing_file<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> anyhow::Result<(PathBuf, File)> {
    loop {
        let path = prompt_for_path(input, output, prompt)?;
        match File::open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist", path.display());
                writeln!(output, "{FILE_NOT_FOUND}")?;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to open {}", path.display()))
            }
        }
    }
}

pub fn prompt_for_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> anyhow::Result<PathBuf> {
    loop {
        writeln!(output, "{prompt}")?;
        output.flush()?;

        let mut line = String::new();
        if input
            .read_line(&mut line)
            .context("failed to read a file name")?
            == 0
        {
            bail!("input ended before a file name was given");
        }

        let name = line.trim();
        if !name.is_empty() {
            return Ok(PathBuf::from(name));
        }
    }
}

pub fn compress_file(input: &Path, output: &Path) -> anyhow::Result<ArchiveStats> {
    let source =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    compress_reader(source, output)
}

pub fn compress_reader<R: Read>(mut source: R, output: &Path) -> anyhow::Result<ArchiveStats> {
    let mut content = Vec::new();
    source
        .read_to_end(&mut content)
        .context("failed to read the input")?;
    debug!("read {} bytes to compress", content.len());

    persist_with(output, |writer| codec::compress_to(&content, writer))
}

pub fn decompress_file(archive: &Path, output: &Path) -> anyhow::Result<ArchiveStats> {
    let source =
        File::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;
    decompress_reader(source, output)
}

pub fn decompress_reader<R: Read>(source: R, output: &Path) -> anyhow::Result<ArchiveStats> {
    persist_with(output, |writer| {
        codec::decompress_from(BufReader::new(source), writer)
    })
}

/// Writes into a temporary file next to `output` and renames it into place
/// only once `write` succeeded. On failure the temporary file is removed.
fn persist_with<T>(
    output: &Path,
    write: impl FnOnce(&mut BufWriter<&File>) -> crate::Result<T>,
) -> anyhow::Result<T> {
    let directory = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let temporary = NamedTempFile::new_in(directory).with_context(|| {
        format!(
            "failed to create a temporary file in {}",
            directory.display()
        )
    })?;

    let result = {
        let mut writer = BufWriter::new(temporary.as_file());
        let result =
            write(&mut writer).with_context(|| format!("failed to produce {}", output.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to write {}", output.display()))?;
        result
    };

    debug!(
        "moving {} to {}",
        temporary.path().display(),
        output.display()
    );
    temporary
        .persist(output)
        .with_context(|| format!("failed to save {}", output.display()))?;

    Ok(result)
}
