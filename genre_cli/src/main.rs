//! Genre dataset MFCC extraction CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use genre_core::{save_mfcc, DecodePolicy, ExtractionConfig};

/// Convert a directory of genre-labelled tracks into an MFCC dataset
#[derive(Parser)]
#[command(name = "genre-mfcc")]
#[command(about = "Extract segment MFCCs from a genre dataset into a JSON file", long_about = None)]
struct Cli {
    /// Dataset root; each subdirectory is a genre
    #[arg(default_value = "genre_dataset")]
    dataset: PathBuf,

    /// Output JSON path (overwritten)
    #[arg(default_value = "data.json")]
    output: PathBuf,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of cepstral coefficients
    #[arg(long)]
    n_mfcc: Option<usize>,

    /// FFT window size
    #[arg(long)]
    n_fft: Option<usize>,

    /// Samples between analysis frames
    #[arg(long)]
    hop_length: Option<usize>,

    /// Segments per track
    #[arg(long)]
    num_segments: Option<usize>,

    /// Target sample rate (Hz)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Assumed track duration (seconds)
    #[arg(long)]
    duration: Option<u32>,

    /// Number of mel bands
    #[arg(long)]
    n_mels: Option<usize>,

    /// Skip files that fail to decode instead of aborting
    #[arg(long)]
    skip_unreadable: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn extraction_config(&self) -> Result<ExtractionConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractionConfig::from_file(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?,
            None => ExtractionConfig::default(),
        };

        if let Some(n) = self.n_mfcc {
            config.n_mfcc = n;
        }
        if let Some(n) = self.n_fft {
            config.n_fft = n;
        }
        if let Some(n) = self.hop_length {
            config.hop_length = n;
        }
        if let Some(n) = self.num_segments {
            config.num_segments = n;
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        if let Some(secs) = self.duration {
            config.track_duration_secs = secs;
        }
        if let Some(n) = self.n_mels {
            config.n_mels = n;
        }
        if self.skip_unreadable {
            config.on_decode_error = DecodePolicy::Skip;
        }

        Ok(config)
    }
}

/// `RUST_LOG` wins when set; otherwise `-v` picks the level. Progress lines
/// are info level, so they show by default.
fn log_filter(verbose: u8, rust_log: Option<String>) -> EnvFilter {
    if let Some(directives) = rust_log {
        return EnvFilter::new(directives);
    }

    let log_level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    EnvFilter::default().add_directive(log_level.into())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, std::env::var("RUST_LOG").ok()))
        .with_target(false)
        .init();

    let config = cli.extraction_config()?;

    let report = save_mfcc(&cli.dataset, &cli.output, &config)
        .with_context(|| format!("failed to build dataset from {}", cli.dataset.display()))?;

    println!("Wrote: {}", report.output.display());
    println!("Genres: {}", report.genres.join(", "));
    println!("Accepted segments: {}", report.stats.segments_accepted);
    println!("Rejected segments: {}", report.stats.segments_rejected);
    println!("Skipped tracks: {}", report.stats.tracks_skipped);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["genre-mfcc"]);
        assert_eq!(cli.dataset, PathBuf::from("genre_dataset"));
        assert_eq!(cli.output, PathBuf::from("data.json"));
        assert_eq!(cli.extraction_config().unwrap(), ExtractionConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "genre-mfcc",
            "songs",
            "out.json",
            "--num-segments",
            "10",
            "--hop-length",
            "256",
            "--skip-unreadable",
        ]);
        let config = cli.extraction_config().unwrap();
        assert_eq!(config.num_segments, 10);
        assert_eq!(config.hop_length, 256);
        assert_eq!(config.n_mfcc, 13);
        assert_eq!(config.on_decode_error, DecodePolicy::Skip);
    }

    #[test]
    fn test_flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("genre.toml");
        std::fs::write(&path, "num_segments = 10\nhop_length = 256\n").unwrap();

        let cli = Cli::parse_from([
            "genre-mfcc",
            "--config",
            path.to_str().unwrap(),
            "--hop-length",
            "128",
        ]);
        let config = cli.extraction_config().unwrap();
        assert_eq!(config.num_segments, 10);
        assert_eq!(config.hop_length, 128);
        assert_eq!(config.n_fft, 2028);
    }

    #[test]
    fn test_rust_log_overrides_verbosity() {
        use tracing::level_filters::LevelFilter;

        let filter = log_filter(2, Some("warn".to_string()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        assert_eq!(log_filter(0, None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(1, None).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_malformed_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("genre.toml");
        std::fs::write(&path, "hop_length = [").unwrap();

        let cli = Cli::parse_from(["genre-mfcc", "--config", path.to_str().unwrap()]);
        assert!(cli.extraction_config().is_err());
    }
}
