//! Walking, segmenting, collecting and writing the dataset

pub mod collector;
pub mod segment;
pub mod walker;
pub mod writer;

pub use collector::{CollectionStats, Collector};
pub use segment::{expected_frames, Segment, SegmentPlan};
pub use walker::{walk, DatasetWalk, DirListing};
pub use writer::{read_dataset, write_dataset, DatasetRecord};
