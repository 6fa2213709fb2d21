//! Dataset directory -> MFCC dataset file

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audio::{load_track, FeatureExtractor, MfccConfig, MfccExtractor};
use crate::config::{DecodePolicy, ExtractionConfig};
use crate::dataset::collector::{CollectionStats, Collector};
use crate::dataset::segment::SegmentPlan;
use crate::dataset::walker::walk;
use crate::dataset::writer::{write_dataset, DatasetRecord};
use crate::error::{DecodeError, PrepError, Result};

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub output: PathBuf,
    pub genres: Vec<String>,
    pub samples: usize,
    pub stats: CollectionStats,
}

/// Extract MFCC segments for every track under `dataset_path` and write
/// them to `json_path`.
pub fn save_mfcc(
    dataset_path: &Path,
    json_path: &Path,
    config: &ExtractionConfig,
) -> Result<PipelineReport> {
    config.validate()?;

    let extractor = MfccExtractor::new(MfccConfig::from(config));
    let (record, stats) = extract_dataset(dataset_path, config, &extractor, |path: &Path, rate| {
        load_track(path, rate)
    })?;

    write_dataset(&record, json_path)?;
    info!("Wrote {} samples to {}", record.len(), json_path.display());

    Ok(PipelineReport {
        output: json_path.to_path_buf(),
        genres: record.mapping,
        samples: record.labels.len(),
        stats,
    })
}

/// Build the dataset in memory without writing it.
///
/// Every directory below the root is a genre, labelled in traversal order
/// starting from 0; every file inside it is a track. `loader` decodes a
/// track to mono samples at the configured rate.
pub fn extract_dataset<E, L>(
    dataset_path: &Path,
    config: &ExtractionConfig,
    extractor: &E,
    mut loader: L,
) -> Result<(DatasetRecord, CollectionStats)>
where
    E: FeatureExtractor + ?Sized,
    L: FnMut(&Path, u32) -> std::result::Result<Vec<f32>, DecodeError>,
{
    config.validate()?;

    let plan = SegmentPlan::new(
        config.samples_per_track(),
        config.num_segments,
        config.hop_length,
    );
    let mut collector = Collector::new(plan);
    info!(
        "{} samples per segment, expecting {} frames (on decode error: {})",
        plan.segment_length, plan.expected_frames, config.on_decode_error
    );

    for listing in walk(dataset_path)? {
        let listing = listing?;

        // The root only tells us we are now below it; files there are ignored.
        if listing.is_root() {
            continue;
        }

        let label = collector.begin_genre(listing.name());
        info!("Processing {}", listing.name());

        for file_path in &listing.files {
            let signal = match loader(file_path, config.sample_rate) {
                Ok(signal) => signal,
                Err(source) => match config.on_decode_error {
                    DecodePolicy::Abort => {
                        return Err(PrepError::Decode {
                            path: file_path.clone(),
                            source,
                        });
                    }
                    DecodePolicy::Skip => {
                        warn!("Skipping {}: {}", file_path.display(), source);
                        collector.track_skipped();
                        continue;
                    }
                },
            };

            for segment in plan.windows() {
                let features = extractor.extract(segment.slice(&signal))?;
                collector.offer(label, file_path, segment, &features);
            }
            collector.track_processed();
        }
    }

    let (record, stats) = collector.finish();
    info!(
        "Accepted {} segments, rejected {}, skipped {} tracks",
        stats.segments_accepted, stats.segments_rejected, stats.tracks_skipped
    );

    Ok((record, stats))
}
