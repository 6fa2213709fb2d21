//! Extraction configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// What to do when a file under a genre directory cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Stop the whole run on the first unreadable file
    #[default]
    Abort,
    /// Log the file, count it as skipped and keep going
    Skip,
}

impl std::fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodePolicy::Abort => write!(f, "abort"),
            DecodePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Parameters for turning a genre dataset into MFCC segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Rate every track is resampled to (Hz)
    pub sample_rate: u32,
    /// Assumed duration of every track (seconds)
    pub track_duration_secs: u32,
    /// Number of cepstral coefficients per frame
    pub n_mfcc: usize,
    /// FFT window size in samples
    pub n_fft: usize,
    /// Stride between analysis frames in samples
    pub hop_length: usize,
    /// Segments cut from each track
    pub num_segments: usize,
    /// Mel bands fed to the cepstral transform
    pub n_mels: usize,
    pub on_decode_error: DecodePolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            track_duration_secs: 30,
            n_mfcc: 13,
            n_fft: 2028,
            hop_length: 512,
            num_segments: 5,
            n_mels: 128,
            on_decode_error: DecodePolicy::Abort,
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
            _ => ConfigError::Read {
                path: path.display().to_string(),
                source: e,
            },
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Samples a track of the assumed duration holds at the target rate
    pub fn samples_per_track(&self) -> usize {
        self.sample_rate as usize * self.track_duration_secs as usize
    }

    /// Samples in each segment; trailing remainder samples are dropped
    pub fn segment_length(&self) -> usize {
        self.samples_per_track() / self.num_segments
    }

    /// Reject parameter combinations that would silently yield an empty or
    /// meaningless dataset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("sample_rate", self.sample_rate as usize),
            ("track_duration_secs", self.track_duration_secs as usize),
            ("n_mfcc", self.n_mfcc),
            ("n_fft", self.n_fft),
            ("hop_length", self.hop_length),
            ("num_segments", self.num_segments),
            ("n_mels", self.n_mels),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(invalid(field, value));
            }
        }

        if self.n_fft < 2 {
            return Err(invalid("n_fft", self.n_fft));
        }
        if self.num_segments > self.samples_per_track() {
            return Err(invalid("num_segments", self.num_segments));
        }
        // Centred framing yields 1 + len / hop frames while the acceptance
        // gate expects ceil(len / hop); they only agree when hop does not
        // divide the segment length.
        if self.segment_length() % self.hop_length == 0 {
            return Err(invalid("hop_length", self.hop_length));
        }
        if self.n_mfcc > self.n_mels {
            return Err(invalid("n_mfcc", self.n_mfcc));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert_eq!(config.samples_per_track(), 661_500);
        assert_eq!(config.n_mfcc, 13);
        assert_eq!(config.on_decode_error, DecodePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            sample_rate = 16000
            num_segments = 10
            on_decode_error = "skip"
        "#;

        let config: ExtractionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.num_segments, 10);
        assert_eq!(config.hop_length, 512);
        assert_eq!(config.on_decode_error, DecodePolicy::Skip);
    }

    #[test]
    fn test_example_file_matches_defaults() {
        let config: ExtractionConfig =
            toml::from_str(include_str!("../../genre.example.toml")).unwrap();
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn test_zero_hop_rejected() {
        let config = ExtractionConfig {
            hop_length: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "hop_length"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_hop_dividing_segment_length_rejected() {
        // 22050 / 5 = 4410 = 10 * 441
        let config = ExtractionConfig {
            track_duration_secs: 1,
            hop_length: 441,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidValue { field, value }) => {
                assert_eq!(field, "hop_length");
                assert_eq!(value, "441");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let config = ExtractionConfig {
            hop_length: 440,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_more_segments_than_samples_rejected() {
        let config = ExtractionConfig {
            sample_rate: 4,
            track_duration_secs: 1,
            num_segments: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_many_coefficients_rejected() {
        let config = ExtractionConfig {
            n_mfcc: 40,
            n_mels: 20,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("genre.toml");
        std::fs::write(&path, "num_segments = 10\nhop_length = 256\n").unwrap();

        let config = ExtractionConfig::from_file(&path).unwrap();
        assert_eq!(config.num_segments, 10);
        assert_eq!(config.hop_length, 256);
        assert_eq!(config.sample_rate, 22050);
    }

    #[test]
    fn test_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("genre.toml");
        std::fs::write(&path, "num_segments = \"five\"\n").unwrap();

        let err = ExtractionConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unreadable_file_keeps_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("genre.toml");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        match ExtractionConfig::from_file(&path).unwrap_err() {
            ConfigError::Read { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = ExtractionConfig::from_file(Path::new("/nonexistent/genre.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
