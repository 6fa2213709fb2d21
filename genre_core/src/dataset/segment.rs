//! Equal-length track segmentation

/// A half-open `[start, end)` sample window within a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The part of `signal` covered by this window. Windows reaching past the
    /// end of a short track are clamped, possibly to an empty slice.
    pub fn slice<'a>(&self, signal: &'a [f32]) -> &'a [f32] {
        let start = self.start.min(signal.len());
        let end = self.end.min(signal.len());
        &signal[start..end]
    }
}

/// Segment layout shared by every track of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPlan {
    pub segment_count: usize,
    pub segment_length: usize,
    /// Frames a correctly sized segment yields; the acceptance criterion
    pub expected_frames: usize,
}

impl SegmentPlan {
    /// `segment_count` and `hop_length` must be non-zero; the configuration
    /// is validated before a plan is built.
    pub fn new(total_samples: usize, segment_count: usize, hop_length: usize) -> Self {
        let segment_length = total_samples / segment_count;
        Self {
            segment_count,
            segment_length,
            expected_frames: expected_frames(segment_length, hop_length),
        }
    }

    /// Consecutive non-overlapping windows from sample 0. Remainder samples
    /// past `segment_length * segment_count` are not covered.
    pub fn windows(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count).map(move |index| {
            let start = index * self.segment_length;
            Segment {
                index,
                start,
                end: start + self.segment_length,
            }
        })
    }

    /// Total samples covered by all windows
    pub fn covered_samples(&self) -> usize {
        self.segment_length * self.segment_count
    }
}

/// `ceil(segment_length / hop_length)`
pub fn expected_frames(segment_length: usize, hop_length: usize) -> usize {
    segment_length.div_ceil(hop_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let plan = SegmentPlan::new(661_500, 5, 512);
        assert_eq!(plan.segment_length, 132_300);
        assert_eq!(plan.expected_frames, 259);
    }

    #[test]
    fn test_windows_are_contiguous() {
        for (total, count) in [(661_500, 5), (1000, 3), (10, 10), (7, 2), (100, 1)] {
            let plan = SegmentPlan::new(total, count, 4);
            let windows: Vec<Segment> = plan.windows().collect();

            assert_eq!(windows.len(), count);
            assert_eq!(windows[0].start, 0);
            for pair in windows.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            assert!(windows.iter().all(|w| w.len() == plan.segment_length));

            let covered: usize = windows.iter().map(Segment::len).sum();
            assert_eq!(covered, plan.covered_samples());
            assert!(covered <= total);
        }
    }

    #[test]
    fn test_remainder_dropped() {
        let plan = SegmentPlan::new(1003, 4, 10);
        assert_eq!(plan.segment_length, 250);
        assert_eq!(plan.windows().last().unwrap().end, 1000);
    }

    #[test]
    fn test_expected_frames_boundaries() {
        assert_eq!(expected_frames(1024, 512), 2);
        assert_eq!(expected_frames(1025, 512), 3);
        assert_eq!(expected_frames(1023, 512), 2);
        assert_eq!(expected_frames(0, 512), 0);
        assert_eq!(expected_frames(1, 512), 1);
    }

    #[test]
    fn test_slice_clamps_to_signal() {
        let signal = vec![0.0f32; 25];
        let plan = SegmentPlan::new(40, 4, 2);
        let lens: Vec<usize> = plan.windows().map(|w| w.slice(&signal).len()).collect();
        assert_eq!(lens, vec![10, 10, 5, 0]);
    }
}
