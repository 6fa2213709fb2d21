//! Synthetic genre dataset fixtures

use std::path::{Path, PathBuf};

use genre_core::ExtractionConfig;

/// Small, fast configuration: one second tracks at 22.05 kHz.
///
/// 22050 / 5 = 4410 samples per segment, ceil(4410 / 512) = 9 frames.
pub fn test_config() -> ExtractionConfig {
    ExtractionConfig {
        sample_rate: 22050,
        track_duration_secs: 1,
        n_fft: 2048,
        hop_length: 512,
        num_segments: 5,
        ..Default::default()
    }
}

/// Write a 16-bit sine tone WAV file
pub fn generate_tone_wav(
    path: &Path,
    freq: f32,
    sample_rate: u32,
    channels: u16,
    duration_seconds: f64,
) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let total_samples = (duration_seconds * sample_rate as f64) as usize;

    for i in 0..total_samples {
        let t = i as f32 / sample_rate as f32;
        let value = 0.5 * (2.0 * std::f32::consts::PI * freq * t).sin();
        let sample = (value * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

/// `root/<genre>/track.wav` for each genre, each exactly one second long
pub fn build_dataset(root: &Path, genres: &[&str]) -> anyhow::Result<()> {
    for (i, genre) in genres.iter().enumerate() {
        let path = root.join(genre).join("track.wav");
        generate_tone_wav(&path, 220.0 * (i + 1) as f32, 22050, 1, 1.0)?;
    }
    Ok(())
}
