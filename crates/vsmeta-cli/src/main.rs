use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;

use vsmeta_core::ProcessOptions;

#[derive(Parser)]
#[command(
    name = "nfo2vsmeta",
    version,
    about = "Convert Kodi-style .nfo movie metadata into Video Station .vsmeta sidecars"
)]
struct Cli {
    /// Directories to scan for video files
    roots: Vec<PathBuf>,

    /// JSON config file; created with defaults if it does not exist
    #[arg(long)]
    config: Option<PathBuf>,

    /// Poster file suffix appended to the video's stem
    #[arg(long)]
    poster_suffix: Option<String>,

    /// Fanart file suffix appended to the video's stem
    #[arg(long)]
    fanart_suffix: Option<String>,

    /// Comma-separated video extensions (default: mp4,mkv,avi,mov,wmv,ts,rmvb)
    #[arg(long, value_delimiter = ',')]
    extensions: Option<Vec<String>>,

    /// Re-encode even when a .vsmeta already exists
    #[arg(long)]
    overwrite: bool,

    /// Delete existing .vsmeta files before converting
    #[arg(long)]
    delete_vsmeta: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Directory for the per-run log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

/// Load options from a JSON config file, writing a default one first if the
/// file does not exist yet.
fn load_or_init_config(path: &PathBuf) -> anyhow::Result<ProcessOptions> {
    if !path.exists() {
        let defaults = ProcessOptions::default();
        fs::write(path, serde_json::to_string_pretty(&defaults)?)
            .with_context(|| format!("cannot create default config {}", path.display()))?;
        eprintln!(
            "Config {} did not exist; wrote defaults (set \"roots\" before the next run)",
            path.display()
        );
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("config {} is not valid", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let t_total = std::time::Instant::now();

    let mut options = match &cli.config {
        Some(path) => load_or_init_config(path)?,
        None => ProcessOptions::default(),
    };
    options.roots.extend(cli.roots);
    if let Some(suffix) = cli.poster_suffix {
        options.poster_suffix = suffix;
    }
    if let Some(suffix) = cli.fanart_suffix {
        options.fanart_suffix = suffix;
    }
    if let Some(extensions) = cli.extensions {
        options.video_extensions = extensions;
    }
    options.overwrite |= cli.overwrite;
    options.delete_vsmeta |= cli.delete_vsmeta;
    if cli.threads > 0 {
        options.threads = cli.threads;
    }
    anyhow::ensure!(
        !options.roots.is_empty(),
        "no scan roots given (pass directories as arguments or set \"roots\" in the config)"
    );

    fs::create_dir_all(&cli.log_dir)
        .with_context(|| format!("cannot create log dir {}", cli.log_dir.display()))?;
    let log_path = cli.log_dir.join(format!(
        "vsmeta-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    let log = Mutex::new(
        File::create(&log_path)
            .with_context(|| format!("cannot create log file {}", log_path.display()))?,
    );
    let log_line = |message: &str| {
        if let Ok(mut f) = log.lock() {
            let _ = writeln!(
                f,
                "{} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            );
        }
    };

    let result = vsmeta_core::process(&options, &|stage, current, total, message| {
        eprintln!("[{}] {}/{} {}", stage, current.min(total), total, message);
    })?;

    for warning in &result.warnings {
        eprintln!("Warning: {}", warning);
        log_line(&format!("warning: {}", warning));
    }
    for failure in &result.failures {
        log_line(&format!("failed: {}: {}", failure.path.display(), failure.reason));
    }
    for (reason, count) in result.failure_counts() {
        eprintln!("Failed [{}]: {} file(s)", reason, count);
    }

    let summary = format!(
        "{} videos, {} converted, {} skipped, {} failed ({:.2}s)",
        result.total,
        result.converted,
        result.skipped,
        result.failed,
        t_total.elapsed().as_secs_f64()
    );
    log_line(&summary);
    eprintln!("Done! {}", summary);
    eprintln!("Log written to {}", log_path.display());

    Ok(())
}
