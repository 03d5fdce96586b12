use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};

use pan::feed;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Xml,
    Yaml,
}

impl Format {
    /// Format of a file, judged by its extension.
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "xml" | "rss" => Some(Format::Xml),
            "yml" | "yaml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pan", about = "Convert podcast feeds between RSS XML and YAML")]
struct Args {
    /// Feed to convert (.xml/.rss or .yml/.yaml)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Target format (default: the opposite of the input's format)
    #[arg(long, value_enum)]
    to: Option<Format>,
}

/// Reads, converts and serializes `content` into the `target` format.
fn convert(content: &[u8], target: Format) -> Result<Vec<u8>> {
    let bytes = match target {
        Format::Yaml => {
            let xml = feed::read_xml(content).context("Failed to parse XML feed")?;
            let yaml = feed::to_yaml(&xml).context("Failed to convert feed to YAML")?;
            feed::write_yaml(&yaml)?
        }
        Format::Xml => {
            let yaml = feed::read_yaml(content).context("Failed to parse YAML feed")?;
            let xml = feed::to_xml(&yaml).context("Failed to convert feed to XML")?;
            feed::write_xml(&xml)?
        }
    };
    Ok(bytes)
}

/// Write `content` to `dst` through a temporary file and a rename, so the
/// destination is never left partially written.
fn atomic_write(dst: &Path, content: &[u8]) -> Result<()> {
    // SEC-009: Use randomized temp filename to prevent TOCTOU race conditions.
    // An attacker cannot predict the temp path, so cannot create a symlink there
    // between our non-existent check and file creation.
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true) // Fails atomically if file exists (prevents symlink race)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions",
                temp_path.display()
            )
        })?;

    temp_file.write_all(content).with_context(|| {
        // Clean up temp file on write failure
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to write to temporary file '{}': disk may be full",
            temp_path.display()
        )
    })?;

    // Sync to disk so the feed is persisted before rename
    temp_file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to sync temporary file '{}'", temp_path.display())
    })?;

    drop(temp_file);

    // Atomic rename (POSIX guarantees atomicity for rename on same filesystem)
    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        std::fs::remove_file(dst).with_context(|| {
            let _ = std::fs::remove_file(&temp_path);
            format!("Failed to replace existing '{}'", dst.display())
        })?;
    }

    std::fs::rename(&temp_path, dst).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to rename '{}' to '{}'",
            temp_path.display(),
            dst.display()
        )
    })?;

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let target = match (args.to, Format::of(&args.input)) {
        (Some(to), _) => to,
        (None, Some(Format::Xml)) => Format::Yaml,
        (None, Some(Format::Yaml)) => Format::Xml,
        (None, None) => bail!(
            "Cannot tell the format of '{}'; pass --to xml or --to yaml",
            args.input.display()
        ),
    };

    let content = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read feed file: {}", args.input.display()))?;
    tracing::info!(input = %args.input.display(), format = ?target, "Converting feed");

    let output = convert(&content, target)?;

    match &args.output {
        Some(path) => {
            atomic_write(path, &output)?;
            tracing::info!(output = %path.display(), bytes = output.len(), "Feed written");
        }
        None => std::io::stdout()
            .write_all(&output)
            .context("Failed to write feed to stdout")?,
    }

    Ok(())
}
