use std::path::Path;

use ffmpeg_next::format::{sample, Sample};
use ffmpeg_next::software::resampling;
use ffmpeg_next::util::frame::audio::Audio;

use crate::media::domain::audio_reader::AudioReader;
use crate::speech::domain::audio_segment::AudioSegment;

/// Decodes a recorded utterance (any container ffmpeg understands) to mono f32 PCM.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut input = ffmpeg_next::format::input(path)?;
        let Some(stream) = input.streams().best(ffmpeg_next::media::Type::Audio) else {
            return Ok(None);
        };
        let stream_index = stream.index();
        let mut decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?
            .decoder()
            .audio()?;

        let mut resampler = resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            Sample::F32(sample::Type::Planar),
            ffmpeg_next::ChannelLayout::MONO,
            target_sample_rate,
        )?;

        let mut pcm = MonoPcm::default();
        for (stream, packet) in input.packets() {
            if stream.index() == stream_index {
                decoder.send_packet(&packet)?;
                pcm.drain(&mut decoder, &mut resampler)?;
            }
        }
        decoder.send_eof()?;
        pcm.drain(&mut decoder, &mut resampler)?;

        // Flush whatever the resampler is still buffering
        let mut tail = Audio::empty();
        if let Ok(Some(delay)) = resampler.flush(&mut tail) {
            if delay.output > 0 {
                pcm.append(&tail);
            }
        }

        log::debug!(
            "Decoded {} samples at {target_sample_rate} Hz from {}",
            pcm.samples.len(),
            path.display()
        );
        Ok(Some(AudioSegment::new(pcm.samples, target_sample_rate, 1)))
    }
}

#[derive(Default)]
struct MonoPcm {
    samples: Vec<f32>,
}

impl MonoPcm {
    /// Resample every frame the decoder has ready.
    fn drain(
        &mut self,
        decoder: &mut ffmpeg_next::decoder::Audio,
        resampler: &mut resampling::Context,
    ) -> Result<(), ffmpeg_next::Error> {
        let mut decoded = Audio::empty();
        let mut resampled = Audio::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            resampler.run(&decoded, &mut resampled)?;
            self.append(&resampled);
        }
        Ok(())
    }

    fn append(&mut self, frame: &Audio) {
        let count = frame.samples();
        if count == 0 {
            return;
        }
        // Planar F32 mono: plane 0 holds `count` contiguous f32 values
        let floats =
            unsafe { std::slice::from_raw_parts(frame.data(0).as_ptr() as *const f32, count) };
        self.samples.extend_from_slice(floats);
    }
}
