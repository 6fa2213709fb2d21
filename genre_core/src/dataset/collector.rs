//! Segment acceptance and dataset accumulation

use std::path::Path;

use ndarray::Array2;
use tracing::{debug, info};

use super::segment::{Segment, SegmentPlan};
use super::writer::DatasetRecord;

/// Counters describing what happened during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub tracks_processed: usize,
    pub tracks_skipped: usize,
    pub segments_accepted: usize,
    pub segments_rejected: usize,
}

/// Owns the dataset being built. Samples and labels are only ever appended
/// together, so `mfcc.len() == labels.len()` always holds.
#[derive(Debug)]
pub struct Collector {
    plan: SegmentPlan,
    record: DatasetRecord,
    stats: CollectionStats,
}

impl Collector {
    pub fn new(plan: SegmentPlan) -> Self {
        Self {
            plan,
            record: DatasetRecord::default(),
            stats: CollectionStats::default(),
        }
    }

    pub fn record(&self) -> &DatasetRecord {
        &self.record
    }

    /// Register a genre and return its label. Labels count up from 0 in
    /// registration order.
    pub fn begin_genre(&mut self, name: impl Into<String>) -> u32 {
        let label = self.record.mapping.len() as u32;
        self.record.mapping.push(name.into());
        label
    }

    pub fn track_processed(&mut self) {
        self.stats.tracks_processed += 1;
    }

    pub fn track_skipped(&mut self) {
        self.stats.tracks_skipped += 1;
    }

    /// Offer one segment's coefficient-major features `(n_mfcc, frames)`.
    ///
    /// The matrix is stored frame-major and kept only when its frame count
    /// equals the plan's expected frame count. Returns whether it was kept.
    pub fn offer(
        &mut self,
        label: u32,
        track: &Path,
        segment: Segment,
        features: &Array2<f32>,
    ) -> bool {
        let frames = features.t();

        if frames.nrows() != self.plan.expected_frames {
            debug!(
                "{}, segment:{} rejected ({} frames, expected {})",
                track.display(),
                segment.index + 1,
                frames.nrows(),
                self.plan.expected_frames
            );
            self.stats.segments_rejected += 1;
            return false;
        }

        let matrix: Vec<Vec<f32>> = frames.rows().into_iter().map(|row| row.to_vec()).collect();
        self.record.mfcc.push(matrix);
        self.record.labels.push(label);
        self.stats.segments_accepted += 1;

        info!("{}, segment:{}", track.display(), segment.index + 1);
        true
    }

    pub fn finish(self) -> (DatasetRecord, CollectionStats) {
        (self.record, self.stats)
    }
}
