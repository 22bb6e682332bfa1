use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{AnalysisError, Result};

/// Single-channel sample buffer for one input file.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode `path` and keep only its first channel.
///
/// Multi-channel input is not downmixed: the left (first) channel is taken
/// as-is.
pub fn load_audio(path: &Path) -> Result<AudioBuffer> {
    let file = std::fs::File::open(path).map_err(|e| AnalysisError::unreadable(path, e))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AnalysisError::unreadable(path, format!("failed to probe format: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::unreadable(path, "no audio tracks found"))?;

    let track_id = track.id;
    let declared_channels = track.codec_params.channels.map(|c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&sr| sr > 0)
        .ok_or_else(|| AnalysisError::unreadable(path, "unknown sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::unreadable(path, format!("failed to create decoder: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels = declared_channels.unwrap_or(1);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(symphonia::core::errors::Error::ResetRequired) => break,
            Err(e) => return Err(AnalysisError::unreadable(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(AnalysisError::unreadable(path, e)),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        channels = spec.channels.count();
        samples.extend(first_channel(sample_buf.samples(), channels));
    }

    if samples.is_empty() {
        return Err(AnalysisError::unreadable(path, "file contains no samples"));
    }

    let audio = AudioBuffer { samples, sample_rate };

    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.1}s ({} channel(s), kept first)",
        audio.samples.len(),
        sample_rate,
        audio.duration(),
        channels
    );

    Ok(audio)
}

/// Left (first) channel of an interleaved buffer; no downmix.
fn first_channel(interleaved: &[f32], channels: usize) -> impl Iterator<Item = f32> + '_ {
    interleaved.iter().step_by(channels.max(1)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_wav<F>(path: &Path, channels: u16, bits: u16, format: SampleFormat, mut write: F)
    where
        F: FnMut(&mut WavWriter<std::io::BufWriter<std::fs::File>>),
    {
        let spec = WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: bits,
            sample_format: format,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        write(&mut writer);
        writer.finalize().unwrap();
    }

    #[test]
    fn reads_16_bit_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono16.wav");
        write_wav(&path, 1, 16, SampleFormat::Int, |w| {
            for i in 0..800 {
                w.write_sample(((i % 100) * 100) as i16).unwrap();
            }
        });

        let audio = load_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.samples.len(), 800);
        assert!((audio.duration() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn reads_32_bit_int_and_float() {
        let dir = tempfile::tempdir().unwrap();
        let int_path = dir.path().join("int32.wav");
        write_wav(&int_path, 1, 32, SampleFormat::Int, |w| {
            for _ in 0..400 {
                w.write_sample(i32::MAX / 2).unwrap();
            }
        });
        let float_path = dir.path().join("float32.wav");
        write_wav(&float_path, 1, 32, SampleFormat::Float, |w| {
            for _ in 0..400 {
                w.write_sample(0.25f32).unwrap();
            }
        });

        let int_audio = load_audio(&int_path).unwrap();
        assert_eq!(int_audio.samples.len(), 400);
        assert!((int_audio.samples[10] - 0.5).abs() < 1e-3);

        let float_audio = load_audio(&float_path).unwrap();
        assert_eq!(float_audio.samples.len(), 400);
        assert!((float_audio.samples[10] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn stereo_keeps_left_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, 32, SampleFormat::Float, |w| {
            for _ in 0..300 {
                w.write_sample(0.5f32).unwrap();
                w.write_sample(-0.5f32).unwrap();
            }
        });

        let audio = load_audio(&path).unwrap();
        assert_eq!(audio.samples.len(), 300);
        assert!(audio.samples.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn first_channel_follows_buffer_layout() {
        let interleaved = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mono: Vec<f32> = first_channel(&interleaved, 1).collect();
        assert_eq!(mono, interleaved.to_vec());
        let left: Vec<f32> = first_channel(&interleaved, 3).collect();
        assert_eq!(left, vec![1.0, 4.0]);
        let zero: Vec<f32> = first_channel(&interleaved, 0).collect();
        assert_eq!(zero.len(), 6);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = load_audio(Path::new("/no/such/file.wav")).unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableAudio { .. }));
    }

    #[test]
    fn garbage_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"this is not a riff header at all").unwrap();
        let err = load_audio(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableAudio { .. }));
    }

    #[test]
    fn empty_wav_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 1, 16, SampleFormat::Int, |_| {});
        let err = load_audio(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableAudio { .. }));
    }
}
