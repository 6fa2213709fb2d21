use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{DecoderOptions, CODEC_TYPE_NULL},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler};
use tracing::debug;

use crate::error::DecodeError;

/// Decode an audio file to mono f32 samples at `target_rate` Hz.
///
/// The whole track is returned; nothing is trimmed or padded to the
/// configured track duration.
pub fn load_track<P: AsRef<Path>>(path: P, target_rate: u32) -> Result<Vec<f32>, DecodeError> {
    let path = path.as_ref();

    let file = std::fs::File::open(path).map_err(DecodeError::Open)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(DecodeError::Probe)?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;

    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(DecodeError::Codec)?;

    let mut interleaved: Vec<f32> = Vec::new();

    // Codec params are preferred; the first decoded buffer fills any gaps.
    let mut input_rate: Option<u32> = track.codec_params.sample_rate;
    let mut input_channels: Option<usize> = track.codec_params.channels.map(|c| c.count());

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::ResetRequired) => return Err(DecodeError::ResetRequired),
            Err(SymphoniaError::IoError(_)) => break, // end of stream
            Err(e) => return Err(DecodeError::Decode(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => {
                debug!("skipping corrupt packet in {}", path.display());
                continue;
            }
            Err(SymphoniaError::ResetRequired) => return Err(DecodeError::ResetRequired),
            Err(e) => return Err(DecodeError::Decode(e)),
        };

        input_rate.get_or_insert(decoded.spec().rate);
        input_channels.get_or_insert(decoded.spec().channels.count());

        let mut sbuf = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        sbuf.copy_interleaved_ref(decoded);

        interleaved.extend_from_slice(sbuf.samples());
    }

    let rate_in = input_rate.ok_or(DecodeError::UnknownFormat("input sample rate"))?;
    let channels = input_channels.ok_or(DecodeError::UnknownFormat("channel count"))?;

    if interleaved.is_empty() {
        return Err(DecodeError::Empty);
    }

    debug!(
        "decoded {}: {} Hz, {} channel(s), {} frames",
        path.display(),
        rate_in,
        channels,
        interleaved.len() / channels.max(1)
    );

    let mono = downmix(interleaved, channels);
    resample(mono, rate_in, target_rate)
}

/// Average interleaved channels into a single mono channel.
pub fn downmix(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved;
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample a mono clip from `rate_in` to `rate_out` with the FFT resampler.
pub fn resample(mono: Vec<f32>, rate_in: u32, rate_out: u32) -> Result<Vec<f32>, DecodeError> {
    if rate_in == rate_out || mono.is_empty() {
        return Ok(mono);
    }

    // Offline whole-clip processing; 1024 frame chunks keep the FFT small.
    let chunk_size: usize = 1024;
    let sub_chunks: usize = 1;

    let mut resampler = Fft::<f32>::new(
        rate_in as usize,
        rate_out as usize,
        chunk_size,
        sub_chunks,
        1,
        FixedSync::Input,
    )
    .map_err(|e| DecodeError::Resample(e.to_string()))?;

    let input_len = mono.len();
    let out_len = resampler.process_all_needed_output_len(input_len);

    let mut out = vec![0.0f32; out_len];

    let input_adapter = InterleavedSlice::new(&mono, 1, input_len)
        .map_err(|e| DecodeError::Resample(e.to_string()))?;
    let mut output_adapter = InterleavedSlice::new_mut(&mut out, 1, out_len)
        .map_err(|e| DecodeError::Resample(e.to_string()))?;

    let (_frames_read, frames_written) = resampler
        .process_all_into_buffer(&input_adapter, &mut output_adapter, input_len, None)
        .map_err(|e| DecodeError::Resample(e.to_string()))?;

    out.truncate(frames_written);
    Ok(out)
}
