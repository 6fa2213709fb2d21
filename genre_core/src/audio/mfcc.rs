//! MFCC computation: centred STFT -> Slaney mel filterbank -> dB -> DCT-II.

use std::f32::consts::PI;
use std::sync::Arc;

use ndarray::Array2;
use realfft::{RealFftPlanner, RealToComplex};

use crate::config::ExtractionConfig;
use crate::error::FeatureError;

/// Turns a window of mono samples into a coefficient-major feature matrix.
pub trait FeatureExtractor {
    /// Returns a matrix of shape `(n_coefficients, frame_count)`.
    fn extract(&self, samples: &[f32]) -> Result<Array2<f32>, FeatureError>;
}

/// MFCC parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MfccConfig {
    pub sample_rate: u32,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub n_mfcc: usize,
    /// Dynamic range kept below the loudest bin, in dB
    pub top_db: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            n_mfcc: 13,
            top_db: 80.0,
        }
    }
}

impl From<&ExtractionConfig> for MfccConfig {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            n_fft: config.n_fft,
            hop_length: config.hop_length,
            n_mels: config.n_mels,
            n_mfcc: config.n_mfcc,
            ..Default::default()
        }
    }
}

/// Precomputed MFCC transform.
pub struct MfccExtractor {
    config: MfccConfig,
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    mel_filterbank: Vec<Vec<f32>>, // [n_mels, n_fft/2 + 1]
    dct: Vec<Vec<f32>>,            // [n_mfcc, n_mels]
}

impl MfccExtractor {
    pub fn new(config: MfccConfig) -> Self {
        let mut planner = RealFftPlanner::new();
        let fft = planner.plan_fft_forward(config.n_fft);

        // Periodic Hann window
        let window: Vec<f32> = (0..config.n_fft)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / config.n_fft as f32).cos()))
            .collect();

        let mel_filterbank = create_mel_filterbank(config.sample_rate, config.n_fft, config.n_mels);
        let dct = create_dct_matrix(config.n_mfcc, config.n_mels);

        Self {
            config,
            fft,
            window,
            mel_filterbank,
            dct,
        }
    }

    /// Number of frames produced for `n_samples` of input.
    ///
    /// Frames are centred: the signal is padded by `n_fft / 2` zeros on each
    /// side before framing.
    pub fn frame_count(&self, n_samples: usize) -> usize {
        let padded = n_samples + 2 * (self.config.n_fft / 2);
        if padded < self.config.n_fft {
            0
        } else {
            (padded - self.config.n_fft) / self.config.hop_length + 1
        }
    }

    /// Power mel spectrogram, `[n_mels][n_frames]`.
    fn mel_power(&self, samples: &[f32]) -> Result<Vec<Vec<f32>>, FeatureError> {
        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;
        let pad = n_fft / 2;
        let n_frames = self.frame_count(samples.len());

        let mut mel = vec![vec![0.0f32; n_frames]; self.config.n_mels];

        let mut input = self.fft.make_input_vec();
        let mut spectrum = self.fft.make_output_vec();
        let mut power = vec![0.0f32; spectrum.len()];

        for frame in 0..n_frames {
            // Offset into the padded signal; the first `pad` samples are zeros.
            let start = frame * hop;

            for (i, slot) in input.iter_mut().enumerate() {
                let pos = start + i;
                *slot = if pos >= pad && pos - pad < samples.len() {
                    samples[pos - pad] * self.window[i]
                } else {
                    0.0
                };
            }

            self.fft.process(&mut input, &mut spectrum)?;

            for (p, c) in power.iter_mut().zip(spectrum.iter()) {
                *p = c.norm_sqr();
            }

            for (band, filter) in mel.iter_mut().zip(self.mel_filterbank.iter()) {
                band[frame] = filter.iter().zip(power.iter()).map(|(w, p)| w * p).sum();
            }
        }

        Ok(mel)
    }
}

impl FeatureExtractor for MfccExtractor {
    fn extract(&self, samples: &[f32]) -> Result<Array2<f32>, FeatureError> {
        let n_mfcc = self.config.n_mfcc;
        let mut mel = self.mel_power(samples)?;
        let n_frames = mel.first().map_or(0, |band| band.len());

        power_to_db(&mut mel, self.config.top_db);

        let mut out = vec![0.0f32; n_mfcc * n_frames];
        for (k, basis) in self.dct.iter().enumerate() {
            for frame in 0..n_frames {
                out[k * n_frames + frame] = basis
                    .iter()
                    .zip(mel.iter())
                    .map(|(b, band)| b * band[frame])
                    .sum();
            }
        }

        Ok(Array2::from_shape_vec((n_mfcc, n_frames), out)?)
    }
}

/// Convert power to decibels (reference 1.0), flooring at `max - top_db`.
fn power_to_db(mel: &mut [Vec<f32>], top_db: f32) {
    const AMIN: f32 = 1e-10;

    let mut max_db = f32::NEG_INFINITY;
    for value in mel.iter_mut().flat_map(|band| band.iter_mut()) {
        *value = 10.0 * value.max(AMIN).log10();
        max_db = max_db.max(*value);
    }

    let floor = max_db - top_db;
    for value in mel.iter_mut().flat_map(|band| band.iter_mut()) {
        *value = value.max(floor);
    }
}

const F_SP: f32 = 200.0 / 3.0;
const MIN_LOG_HZ: f32 = 1000.0;
const MIN_LOG_MEL: f32 = MIN_LOG_HZ / F_SP;

fn log_step() -> f32 {
    6.4f32.ln() / 27.0
}

/// Slaney mel scale: linear below 1 kHz, logarithmic above.
fn hz_to_mel(hz: f32) -> f32 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

fn mel_to_hz(mel: f32) -> f32 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular filters spanning 0 Hz to Nyquist, area-normalised.
fn create_mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let n_bins = n_fft / 2 + 1;
    let f_max = sample_rate as f32 / 2.0;

    let fft_freqs: Vec<f32> = (0..n_bins)
        .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
        .collect();

    let mel_max = hz_to_mel(f_max);
    let mel_points: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f32 / (n_mels + 1) as f32))
        .collect();

    let mut filterbank = vec![vec![0.0f32; n_bins]; n_mels];

    for (m, filter) in filterbank.iter_mut().enumerate() {
        let left = mel_points[m];
        let center = mel_points[m + 1];
        let right = mel_points[m + 2];
        let enorm = 2.0 / (right - left);

        for (weight, &freq) in filter.iter_mut().zip(fft_freqs.iter()) {
            let rising = (freq - left) / (center - left);
            let falling = (right - freq) / (right - center);
            *weight = rising.min(falling).max(0.0) * enorm;
        }
    }

    filterbank
}

/// Orthonormal DCT-II basis, one row per kept coefficient.
fn create_dct_matrix(n_mfcc: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let n = n_mels as f32;
    (0..n_mfcc)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_mels)
                .map(|i| scale * (PI * k as f32 * (2.0 * i as f32 + 1.0) / (2.0 * n)).cos())
                .collect()
        })
        .collect()
}
