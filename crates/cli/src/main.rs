use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;
use crossbeam_channel::{select, Receiver};

use signreel_core::dictionary::domain::dictionary::Dictionary;
use signreel_core::dictionary::domain::dictionary_source::DictionarySource;
use signreel_core::dictionary::infrastructure::json_dictionary_source::JsonDictionarySource;
use signreel_core::media::domain::media_resolver::MediaResolver;
use signreel_core::media::infrastructure::clip_player::{
    self, ClipPlayback, ClipRequest, ClipSignal, Pacing,
};
use signreel_core::media::infrastructure::ffmpeg_clip_reader::FfmpegClipReader;
use signreel_core::pipeline::playback_controller::PlaybackController;
use signreel_core::pipeline::translate_text_use_case::{
    TranslateTextUseCase, Translation, TranslatorConfig,
};
use signreel_core::playback::domain::playback_event::{PlaybackEffect, PlaybackEvent};
use signreel_core::playback::domain::playlist::PlaylistEntry;
use signreel_core::playback::infrastructure::thread_advance_timer::ThreadAdvanceTimer;
use signreel_core::segmentation::domain::segment::UnmatchedPolicy;
use signreel_core::shared::constants::{
    AUDIO_EXTENSIONS, DEFAULT_BACKEND_URL, DEFAULT_DICTIONARY_FILE,
};
use signreel_core::shared::model_resolver::FetchPolicy;
use signreel_core::speech::infrastructure::dictation::dictation_for_file;

/// Translate English text into a sequence of sign-language clips.
#[derive(Parser)]
#[command(name = "signreel")]
struct Cli {
    /// Text to translate.
    text: Option<String>,

    /// Dictate the text from a recorded audio file instead.
    #[arg(long, conflicts_with = "text")]
    speech: Option<PathBuf>,

    /// Phrase to clip dictionary (JSON object).
    #[arg(long, default_value = DEFAULT_DICTIONARY_FILE)]
    dictionary: PathBuf,

    /// Directory the clip paths are relative to (defaults to the dictionary's directory).
    #[arg(long)]
    media_root: Option<PathBuf>,

    /// URL prefix for resolved clips.
    #[arg(long, default_value = "")]
    base_path: String,

    /// Unmatched words: drop, placeholder or fingerspell.
    #[arg(long, default_value = "drop")]
    unmatched: String,

    /// NLP backend endpoint text is forwarded to.
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Do not forward text to the NLP backend.
    #[arg(long)]
    no_backend: bool,

    /// Directory holding the whisper model for --speech.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Never download the whisper model.
    #[arg(long)]
    offline: bool,

    /// Print the translation plan instead of playing it.
    #[arg(long)]
    plan: bool,

    /// Print the plan as JSON (with --plan).
    #[arg(long)]
    json: bool,

    /// Play clips at their natural frame rate.
    #[arg(long)]
    realtime: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let dictionary = Arc::new(JsonDictionarySource::new(&cli.dictionary).load()?);
    let config = translator_config(&cli)?;
    let text = input_text(&cli)?;

    if cli.plan {
        let translator = TranslateTextUseCase::new(dictionary, &config);
        print_plan(&translator.execute(&text), cli.json)?;
        return Ok(());
    }

    let media_root = media_root(&cli);
    let pacing = if cli.realtime {
        Pacing::Realtime
    } else {
        Pacing::AsFastAsPossible
    };
    play(&text, dictionary, &config, &media_root, pacing)
}

fn translator_config(cli: &Cli) -> Result<TranslatorConfig, Box<dyn std::error::Error>> {
    Ok(TranslatorConfig {
        base_path: cli.base_path.clone(),
        policy: cli.unmatched.parse::<UnmatchedPolicy>()?,
        backend_url: (!cli.no_backend).then(|| cli.backend_url.clone()),
    })
}

fn input_text(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    let Some(audio) = &cli.speech else {
        return Err("Provide text to translate or --speech <audio file>".into());
    };

    let policy = if cli.offline {
        FetchPolicy::CacheOnly
    } else {
        FetchPolicy::AllowDownload
    };
    let capture = dictation_for_file(
        audio,
        cli.model_dir.as_deref(),
        policy,
        Some(Box::new(download_progress)),
    );
    let text = capture.capture()?;
    eprintln!("Heard: {text}");
    Ok(text)
}

fn print_plan(translation: &Translation, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(translation)?);
        return Ok(());
    }
    if translation.playlist.is_empty() {
        println!("No sign language videos available.");
        return Ok(());
    }
    for (i, entry) in translation.playlist.iter().enumerate() {
        match entry {
            PlaylistEntry::Clip { phrase, url } => println!("{:>3}. {phrase:<24} {url}", i + 1),
            PlaylistEntry::Gap { token } => println!("{:>3}. {token:<24} (no sign)", i + 1),
        }
    }
    Ok(())
}

/// Headless sequential playback: decode each clip in turn and report progress.
fn play(
    text: &str,
    dictionary: Arc<Dictionary>,
    config: &TranslatorConfig,
    media_root: &Path,
    pacing: Pacing,
) -> Result<(), Box<dyn std::error::Error>> {
    let (event_tx, event_rx) = crossbeam_channel::unbounded::<PlaybackEvent>();
    let (clip_tx, clip_rx) = crossbeam_channel::unbounded::<ClipSignal>();

    let translator = TranslateTextUseCase::new(dictionary, config);
    let resolver = translator.resolver().clone();
    let mut controller = PlaybackController::new(
        translator,
        config.forwarder()?,
        Box::new(ThreadAdvanceTimer::new(event_tx)),
    );

    let mut player = HeadlessPlayer {
        media_root,
        resolver: &resolver,
        pacing,
        clip_tx,
        current: None,
        last_error: None,
    };

    let effects = controller.submit(text);
    if controller.session().has_no_videos() {
        println!("No sign language videos available.");
        return Ok(());
    }

    let mut finished = player.apply(&controller, effects);
    while !finished {
        let Some(event) = next_event(&event_rx, &clip_rx)? else {
            continue;
        };
        let effects = controller.dispatch(event);
        finished = player.apply(&controller, effects);
    }

    if let Some(analysis) = controller.backend_analysis() {
        log::info!("Backend tokens: {}", analysis.filtered_tokens.join(" "));
    }
    Ok(())
}

/// Wait for the next timer event or clip signal, mapped to a playback event.
fn next_event(
    events: &Receiver<PlaybackEvent>,
    clips: &Receiver<ClipSignal>,
) -> Result<Option<PlaybackEvent>, Box<dyn std::error::Error>> {
    select! {
        recv(events) -> event => Ok(Some(event?)),
        recv(clips) -> signal => Ok(match signal? {
            ClipSignal::Opened { metadata, .. } => {
                log::debug!(
                    "Opened {}x{} clip at {:.2} fps",
                    metadata.width,
                    metadata.height,
                    metadata.fps
                );
                None
            }
            ClipSignal::Frame { .. } => None,
            ClipSignal::Ended { generation, index } => {
                Some(PlaybackEvent::ClipEnded { generation, index })
            }
            ClipSignal::Failed {
                generation,
                index,
                reason,
            } => Some(PlaybackEvent::ClipFailed {
                generation,
                index,
                reason,
            }),
        }),
    }
}

struct HeadlessPlayer<'a> {
    media_root: &'a Path,
    resolver: &'a MediaResolver,
    pacing: Pacing,
    clip_tx: crossbeam_channel::Sender<ClipSignal>,
    current: Option<ClipPlayback>,
    last_error: Option<String>,
}

impl HeadlessPlayer<'_> {
    /// Carry out host effects. Returns true once playback has finished.
    fn apply(&mut self, controller: &PlaybackController, effects: Vec<PlaybackEffect>) -> bool {
        let session = controller.session();
        let error = session.error().map(str::to_string);
        if error.is_some() && error != self.last_error {
            eprintln!("{}", error.as_deref().unwrap_or_default());
        }
        self.last_error = error;

        for effect in effects {
            match effect {
                PlaybackEffect::StartClip {
                    generation,
                    index,
                    url,
                } => {
                    println!("Playing video {} of {}: {url}", index + 1, session.total());
                    let request = ClipRequest {
                        generation,
                        index,
                        path: self.resolver.to_local_path(&url, self.media_root),
                        pacing: self.pacing,
                        emit_frames: false,
                    };
                    self.current = Some(clip_player::spawn(
                        Box::new(FfmpegClipReader::new()),
                        request,
                        self.clip_tx.clone(),
                    ));
                }
                PlaybackEffect::StopClip => self.current = None,
                PlaybackEffect::Finished => {
                    self.current = None;
                    println!("All videos have been played.");
                    return true;
                }
                PlaybackEffect::ScheduleAdvance(_) | PlaybackEffect::CancelAdvance => {}
            }
        }
        false
    }
}

fn media_root(cli: &Cli) -> PathBuf {
    cli.media_root.clone().unwrap_or_else(|| {
        cli.dictionary
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.text.is_none() && cli.speech.is_none() {
        return Err("Provide text to translate or --speech <audio file>".into());
    }
    if !cli.dictionary.exists() {
        return Err(format!("Dictionary not found: {}", cli.dictionary.display()).into());
    }
    if let Some(root) = &cli.media_root {
        if !root.is_dir() {
            return Err(format!("Media root is not a directory: {}", root.display()).into());
        }
    }
    if let Some(audio) = &cli.speech {
        if !audio.exists() {
            return Err(format!("Audio file not found: {}", audio.display()).into());
        }
        if !is_audio(audio) {
            return Err(format!(
                "Unsupported audio file '{}', expected one of: {}",
                audio.display(),
                AUDIO_EXTENSIONS.join(", ")
            )
            .into());
        }
    }
    cli.unmatched.parse::<UnmatchedPolicy>()?;
    if !cli.no_backend
        && !(cli.backend_url.starts_with("http://") || cli.backend_url.starts_with("https://"))
    {
        return Err(format!(
            "Backend URL must start with http:// or https://, got '{}'",
            cli.backend_url
        )
        .into());
    }
    if cli.json && !cli.plan {
        return Err("--json requires --plan".into());
    }
    Ok(())
}

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech model... {pct}%");
    } else {
        eprint!("\rDownloading speech model... {downloaded} bytes");
    }
}
