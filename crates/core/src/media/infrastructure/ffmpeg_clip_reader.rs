use std::path::Path;

use ffmpeg_next::format::context::Input;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;

use crate::media::domain::clip_reader::ClipReader;
use crate::shared::clip_metadata::ClipMetadata;
use crate::shared::constants::MAX_CLIP_WIDTH;
use crate::shared::frame::{Frame, FRAME_CHANNELS};

/// Decodes sign clips with ffmpeg-next into RGBA frames no wider than
/// `max_width`, keeping the aspect ratio.
pub struct FfmpegClipReader {
    max_width: u32,
    clip: Option<OpenClip>,
}

struct OpenClip {
    input: Input,
    stream_index: usize,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    width: u32,
    height: u32,
}

// ffmpeg contexts hold raw pointers; a reader is only ever driven by one thread.
unsafe impl Send for FfmpegClipReader {}

impl FfmpegClipReader {
    pub fn new() -> Self {
        Self::with_max_width(MAX_CLIP_WIDTH)
    }

    pub fn with_max_width(max_width: u32) -> Self {
        Self {
            max_width: max_width.max(2),
            clip: None,
        }
    }
}

impl Default for FfmpegClipReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipReader for FfmpegClipReader {
    fn open(&mut self, path: &Path) -> Result<ClipMetadata, Box<dyn std::error::Error>> {
        self.clip = None;
        ffmpeg_next::init()?;

        let input = ffmpeg_next::format::input(path)?;
        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| format!("{} has no video stream", path.display()))?;
        let stream_index = stream.index();
        let rate = stream.rate();
        let total_frames = stream.frames().max(0) as usize;

        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?
            .decoder()
            .video()?;
        let (width, height) = display_size(decoder.width(), decoder.height(), self.max_width);
        let scaler = scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGBA,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        let metadata = ClipMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps: if rate.denominator() == 0 {
                0.0
            } else {
                f64::from(rate)
            },
            total_frames,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };

        self.clip = Some(OpenClip {
            input,
            stream_index,
            decoder,
            scaler,
            width,
            height,
        });
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.clip.as_mut() {
            Some(clip) => Box::new(ClipFrames {
                clip,
                next_index: 0,
                stage: Stage::Reading,
            }),
            None => Box::new(std::iter::once(Err("no clip is open".into()))),
        }
    }

    fn close(&mut self) {
        self.clip = None;
    }
}

/// Output size for a `width` x `height` clip bounded by `max_width`.
/// Dimensions stay even for the scaler.
fn display_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled_height = (u64::from(height) * u64::from(max_width) / u64::from(width)) as u32;
    (max_width & !1, (scaled_height & !1).max(2))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Reading,
    Draining,
    Done,
}

/// Pulls packets on demand, so a clip is never decoded ahead of playback.
struct ClipFrames<'a> {
    clip: &'a mut OpenClip,
    next_index: usize,
    stage: Stage,
}

impl ClipFrames<'_> {
    fn receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut decoded = Video::empty();
        self.clip.decoder.receive_frame(&mut decoded).ok()?;

        let mut rgba = Video::empty();
        if let Err(e) = self.clip.scaler.run(&decoded, &mut rgba) {
            return Some(Err(Box::new(e)));
        }

        let pixels = packed_rows(&rgba, self.clip.width, self.clip.height);
        let frame = Frame::new(pixels, self.clip.width, self.clip.height, self.next_index);
        self.next_index += 1;
        Some(Ok(frame))
    }
}

impl Iterator for ClipFrames<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.stage != Stage::Done {
            if let Some(frame) = self.receive() {
                return Some(frame);
            }
            if self.stage == Stage::Draining {
                self.stage = Stage::Done;
                break;
            }

            match self.clip.input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() == self.clip.stream_index {
                        // Corrupt packets are skipped; the clip fails only if nothing decodes
                        let _ = self.clip.decoder.send_packet(&packet);
                    }
                }
                None => {
                    let _ = self.clip.decoder.send_eof();
                    self.stage = Stage::Draining;
                }
            }
        }
        None
    }
}

/// Copy RGBA rows out of an ffmpeg frame, dropping any stride padding.
fn packed_rows(frame: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let data = frame.data(0);
    let row_len = width as usize * FRAME_CHANNELS;

    (0..height as usize)
        .flat_map(move |row| &data[row * stride..row * stride + row_len])
        .copied()
        .collect()
}
