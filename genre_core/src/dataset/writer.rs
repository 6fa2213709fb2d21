//! Dataset record and its JSON form

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Everything written to the output file.
///
/// `mfcc[i]` is a `(frames, n_mfcc)` matrix whose genre is
/// `mapping[labels[i]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub mapping: Vec<String>,
    pub mfcc: Vec<Vec<Vec<f32>>>,
    pub labels: Vec<u32>,
}

impl DatasetRecord {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Write `record` as pretty-printed JSON (4-space indent), replacing any
/// existing file at `path`. The write is not atomic.
pub fn write_dataset(record: &DatasetRecord, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let out_file = File::create(path)?;
    let mut writer = BufWriter::new(out_file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    record.serialize(&mut ser)?;

    writer.flush()?;
    Ok(())
}

/// Load a record previously produced by [`write_dataset`].
pub fn read_dataset(path: &Path) -> Result<DatasetRecord> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
