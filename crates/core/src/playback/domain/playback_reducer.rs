use std::sync::Arc;

use crate::shared::constants::ERROR_SKIP_DELAY;

use super::playback_event::{PlaybackEffect, PlaybackEvent};
use super::playback_session::{PendingAdvance, PlaybackSession};
use super::playlist::PlaylistEntry;

/// The next session and the effects the host must run to get there.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub session: PlaybackSession,
    pub effects: Vec<PlaybackEffect>,
}

impl Transition {
    fn unchanged(session: &PlaybackSession) -> Self {
        Self {
            session: session.clone(),
            effects: Vec::new(),
        }
    }
}

/// Apply one event to a session.
///
/// Pure: the input session is untouched and all side effects come back as
/// [`PlaybackEffect`] values. Events for an older generation or another
/// index leave the session as it was.
pub fn reduce(session: &PlaybackSession, event: PlaybackEvent) -> Transition {
    match event {
        PlaybackEvent::TextSubmitted => submit(session),
        PlaybackEvent::SegmentsReady {
            generation,
            playlist,
        } => {
            if generation != session.generation || !session.loading {
                log::debug!("Ignoring playlist for generation {generation}");
                return Transition::unchanged(session);
            }
            log::info!("Playlist ready with {} entries", playlist.len());
            let next = PlaybackSession {
                playlist: Arc::new(playlist),
                index: 0,
                loading: false,
                ..session.clone()
            };
            enter(next, Vec::new())
        }
        PlaybackEvent::ClipEnded { generation, index } => {
            if !is_current(session, generation, index) {
                log::debug!("Ignoring stale end of clip {index} (generation {generation})");
                return Transition::unchanged(session);
            }
            let mut effects = Vec::new();
            if session.pending_advance.is_some() {
                effects.push(PlaybackEffect::CancelAdvance);
            }
            advance(session, effects)
        }
        PlaybackEvent::ClipFailed {
            generation,
            index,
            reason,
        } => {
            if !is_current(session, generation, index) || session.pending_advance.is_some() {
                log::debug!("Ignoring stale failure of clip {index} (generation {generation})");
                return Transition::unchanged(session);
            }
            let url = session.current().and_then(PlaylistEntry::url).unwrap_or_default();
            log::warn!("Unable to load {url}: {reason}");
            skip_after_delay(session.clone(), format!("Unable to load video file: {url}"))
        }
        PlaybackEvent::AutoAdvance { generation, index } => {
            let expected = session
                .pending_advance
                .is_some_and(|p| p.generation == generation && p.index == index);
            if !expected {
                log::debug!("Ignoring stale auto-advance for {index} (generation {generation})");
                return Transition::unchanged(session);
            }
            advance(session, Vec::new())
        }
        PlaybackEvent::Restart => {
            if !session.can_restart() || session.playlist.is_empty() {
                return Transition::unchanged(session);
            }
            log::debug!("Restarting playback from the first clip");
            let mut effects = Vec::new();
            if session.pending_advance.is_some() {
                effects.push(PlaybackEffect::CancelAdvance);
            }
            let next = PlaybackSession {
                generation: session.generation + 1,
                index: 0,
                error: None,
                pending_advance: None,
                ..session.clone()
            };
            enter(next, effects)
        }
    }
}

fn submit(session: &PlaybackSession) -> Transition {
    let mut effects = vec![PlaybackEffect::StopClip];
    if session.pending_advance.is_some() {
        effects.push(PlaybackEffect::CancelAdvance);
    }
    Transition {
        session: PlaybackSession {
            generation: session.generation + 1,
            loading: true,
            ..PlaybackSession::default()
        },
        effects,
    }
}

/// Whether `(generation, index)` names the entry on screen. A finished or
/// empty session has none.
fn is_current(session: &PlaybackSession, generation: u64, index: usize) -> bool {
    !session.loading
        && session.generation == generation
        && session.index == index
        && index < session.playlist.len()
}

/// Step past the current entry, clearing any error it raised.
fn advance(session: &PlaybackSession, effects: Vec<PlaybackEffect>) -> Transition {
    let next = PlaybackSession {
        index: session.index + 1,
        error: None,
        pending_advance: None,
        ..session.clone()
    };
    enter(next, effects)
}

/// Start whatever sits at `session.index`.
fn enter(session: PlaybackSession, mut effects: Vec<PlaybackEffect>) -> Transition {
    match session.current().cloned() {
        None if session.playlist.is_empty() => {
            log::info!("No sign language videos available");
            Transition { session, effects }
        }
        None => {
            log::info!("All {} videos have been played", session.playlist.len());
            effects.push(PlaybackEffect::Finished);
            Transition { session, effects }
        }
        Some(PlaylistEntry::Clip { url, .. }) => {
            log::debug!(
                "Playing video {} of {}: {url}",
                session.index + 1,
                session.playlist.len()
            );
            effects.push(PlaybackEffect::StartClip {
                generation: session.generation,
                index: session.index,
                url,
            });
            Transition { session, effects }
        }
        Some(PlaylistEntry::Gap { token }) => {
            effects.push(PlaybackEffect::StopClip);
            let mut transition =
                skip_after_delay(session, format!("No sign video for \"{token}\""));
            effects.append(&mut transition.effects);
            transition.effects = effects;
            transition
        }
    }
}

fn skip_after_delay(session: PlaybackSession, message: String) -> Transition {
    let pending = PendingAdvance {
        generation: session.generation,
        index: session.index,
        delay: ERROR_SKIP_DELAY,
    };
    Transition {
        session: PlaybackSession {
            error: Some(message),
            pending_advance: Some(pending),
            ..session
        },
        effects: vec![PlaybackEffect::ScheduleAdvance(pending)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::domain::playback_session::PlaybackStatus;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn clip(name: &str) -> PlaylistEntry {
        PlaylistEntry::Clip {
            phrase: name.to_string(),
            url: format!("/{name}.mp4"),
        }
    }

    fn gap(token: &str) -> PlaylistEntry {
        PlaylistEntry::Gap {
            token: token.to_string(),
        }
    }

    /// Submit text and deliver `playlist`, returning the resulting transition.
    fn started(playlist: Vec<PlaylistEntry>) -> Transition {
        let submitted = reduce(&PlaybackSession::default(), PlaybackEvent::TextSubmitted);
        let generation = submitted.session.generation();
        reduce(
            &submitted.session,
            PlaybackEvent::SegmentsReady {
                generation,
                playlist,
            },
        )
    }

    fn ended(session: &PlaybackSession) -> Transition {
        reduce(
            session,
            PlaybackEvent::ClipEnded {
                generation: session.generation(),
                index: session.index(),
            },
        )
    }

    fn failed(session: &PlaybackSession) -> Transition {
        reduce(
            session,
            PlaybackEvent::ClipFailed {
                generation: session.generation(),
                index: session.index(),
                reason: "no such file".to_string(),
            },
        )
    }

    #[test]
    fn test_text_submitted_enters_loading() {
        let t = reduce(&PlaybackSession::default(), PlaybackEvent::TextSubmitted);
        assert_eq!(t.session.status(), PlaybackStatus::Loading);
        assert_eq!(t.session.generation(), 1);
        assert_eq!(t.effects, vec![PlaybackEffect::StopClip]);
    }

    #[test]
    fn test_segments_ready_starts_first_clip() {
        let t = started(vec![clip("a"), clip("b")]);
        assert_eq!(t.session.status(), PlaybackStatus::Playing(0));
        assert!(!t.session.is_loading());
        assert_eq!(
            t.effects,
            vec![PlaybackEffect::StartClip {
                generation: 1,
                index: 0,
                url: "/a.mp4".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_playlist_is_idle_with_no_videos() {
        let t = started(Vec::new());
        assert_eq!(t.session.status(), PlaybackStatus::Idle);
        assert!(t.session.has_no_videos());
        assert!(t.effects.is_empty());
        assert_relative_eq!(t.session.progress(), 0.0);
    }

    #[test]
    fn test_three_clip_ends_finish_the_session() {
        let mut t = started(vec![clip("a"), clip("b"), clip("c")]);
        for expected in 1..=3 {
            t = ended(&t.session);
            assert_eq!(t.session.index(), expected);
        }
        assert_eq!(t.session.status(), PlaybackStatus::Finished);
        assert_eq!(t.effects, vec![PlaybackEffect::Finished]);
        assert_relative_eq!(t.session.progress(), 1.0);
    }

    #[test]
    fn test_progress_tracks_index() {
        let t = started(vec![clip("a"), clip("b"), clip("c"), clip("d")]);
        let t = ended(&t.session);
        assert_relative_eq!(t.session.progress(), 0.25);
    }

    #[test]
    fn test_restart_after_finish_plays_from_start() {
        let mut t = started(vec![clip("a"), clip("b"), clip("c")]);
        for _ in 0..3 {
            t = ended(&t.session);
        }

        let restarted = reduce(&t.session, PlaybackEvent::Restart);
        assert_eq!(restarted.session.index(), 0);
        assert_eq!(restarted.session.status(), PlaybackStatus::Playing(0));
        assert!(matches!(
            restarted.effects.as_slice(),
            [PlaybackEffect::StartClip { index: 0, .. }]
        ));
    }

    #[test]
    fn test_restart_at_first_clip_is_ignored() {
        let t = started(vec![clip("a"), clip("b")]);
        let restarted = reduce(&t.session, PlaybackEvent::Restart);
        assert_eq!(restarted.session, t.session);
        assert!(restarted.effects.is_empty());
    }

    #[test]
    fn test_restart_while_loading_is_ignored() {
        let t = reduce(&PlaybackSession::default(), PlaybackEvent::TextSubmitted);
        assert!(reduce(&t.session, PlaybackEvent::Restart).effects.is_empty());
    }

    #[test]
    fn test_failure_sets_message_and_schedules_skip() {
        let t = started(vec![clip("a"), clip("b")]);
        let t = failed(&t.session);

        assert_eq!(t.session.error(), Some("Unable to load video file: /a.mp4"));
        assert_eq!(t.session.index(), 0);
        let pending = t.session.pending_advance().unwrap();
        assert_eq!(pending.index, 0);
        assert_eq!(pending.delay, ERROR_SKIP_DELAY);
        assert_eq!(t.effects, vec![PlaybackEffect::ScheduleAdvance(pending)]);
    }

    #[test]
    fn test_auto_advance_after_failure_behaves_like_clip_end() {
        let t = started(vec![clip("a"), clip("b")]);
        let t = failed(&t.session);
        let pending = t.session.pending_advance().unwrap();

        let t = reduce(
            &t.session,
            PlaybackEvent::AutoAdvance {
                generation: pending.generation,
                index: pending.index,
            },
        );
        assert_eq!(t.session.index(), 1);
        assert_eq!(t.session.error(), None);
        assert_eq!(t.session.pending_advance(), None);
        assert!(matches!(
            t.effects.as_slice(),
            [PlaybackEffect::StartClip { index: 1, .. }]
        ));
    }

    #[test]
    fn test_failure_on_last_clip_finishes_after_delay() {
        let t = started(vec![clip("a")]);
        let t = failed(&t.session);
        let t = reduce(
            &t.session,
            PlaybackEvent::AutoAdvance {
                generation: 1,
                index: 0,
            },
        );
        assert_eq!(t.session.status(), PlaybackStatus::Finished);
        assert_eq!(t.effects, vec![PlaybackEffect::Finished]);
    }

    #[test]
    fn test_auto_advance_without_pending_is_ignored() {
        let t = started(vec![clip("a"), clip("b")]);
        let next = reduce(
            &t.session,
            PlaybackEvent::AutoAdvance {
                generation: 1,
                index: 0,
            },
        );
        assert_eq!(next.session, t.session);
    }

    #[test]
    fn test_duplicate_failure_is_ignored() {
        let t = started(vec![clip("a"), clip("b")]);
        let t = failed(&t.session);
        let again = failed(&t.session);
        assert!(again.effects.is_empty());
        assert_eq!(again.session, t.session);
    }

    #[test]
    fn test_stale_generation_events_are_ignored() {
        let t = started(vec![clip("a"), clip("b")]);
        let resubmitted = reduce(&t.session, PlaybackEvent::TextSubmitted);
        let t = reduce(
            &resubmitted.session,
            PlaybackEvent::SegmentsReady {
                generation: resubmitted.session.generation(),
                playlist: vec![clip("c"), clip("d")],
            },
        );

        let stale = reduce(
            &t.session,
            PlaybackEvent::ClipEnded {
                generation: 1,
                index: 0,
            },
        );
        assert_eq!(stale.session, t.session);
        assert!(stale.effects.is_empty());
    }

    #[test]
    fn test_stale_index_events_are_ignored() {
        let t = started(vec![clip("a"), clip("b")]);
        let stale = reduce(
            &t.session,
            PlaybackEvent::ClipFailed {
                generation: 1,
                index: 1,
                reason: "late".to_string(),
            },
        );
        assert_eq!(stale.session, t.session);
    }

    #[test]
    fn test_new_submission_clears_error_and_cancels_pending_skip() {
        let t = started(vec![clip("a"), clip("b")]);
        let t = failed(&t.session);

        let t = reduce(&t.session, PlaybackEvent::TextSubmitted);
        assert_eq!(t.session.error(), None);
        assert_eq!(t.session.pending_advance(), None);
        assert!(t.session.playlist().is_empty());
        assert!(t.effects.contains(&PlaybackEffect::CancelAdvance));
    }

    #[test]
    fn test_restart_cancels_pending_skip_and_bumps_generation() {
        let t = started(vec![clip("a"), clip("b"), clip("c")]);
        let t = ended(&t.session);
        let t = failed(&t.session);

        let restarted = reduce(&t.session, PlaybackEvent::Restart);
        assert_eq!(restarted.session.error(), None);
        assert_eq!(restarted.session.pending_advance(), None);
        assert_eq!(restarted.session.generation(), t.session.generation() + 1);
        assert_eq!(restarted.effects[0], PlaybackEffect::CancelAdvance);

        let late = reduce(
            &restarted.session,
            PlaybackEvent::AutoAdvance {
                generation: t.session.generation(),
                index: 1,
            },
        );
        assert_eq!(late.session, restarted.session);
    }

    #[test]
    fn test_gap_entry_shows_notice_and_schedules_skip() {
        let t = started(vec![gap("friend"), clip("b")]);

        assert_eq!(t.session.error(), Some("No sign video for \"friend\""));
        assert_eq!(t.session.status(), PlaybackStatus::Playing(0));
        assert!(matches!(
            t.effects.as_slice(),
            [PlaybackEffect::StopClip, PlaybackEffect::ScheduleAdvance(_)]
        ));

        let t = reduce(
            &t.session,
            PlaybackEvent::AutoAdvance {
                generation: 1,
                index: 0,
            },
        );
        assert_eq!(t.session.error(), None);
        assert!(matches!(
            t.effects.as_slice(),
            [PlaybackEffect::StartClip { index: 1, .. }]
        ));
    }

    #[test]
    fn test_error_cleared_by_next_successful_clip() {
        let t = started(vec![clip("a"), clip("b"), clip("c")]);
        let t = failed(&t.session);
        let t = reduce(
            &t.session,
            PlaybackEvent::AutoAdvance {
                generation: 1,
                index: 0,
            },
        );
        let t = ended(&t.session);
        assert_eq!(t.session.error(), None);
        assert_eq!(t.session.index(), 2);
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let t = started(vec![clip("a"), clip("b")]);
        let before = t.session.clone();
        let _ = ended(&t.session);
        assert_eq!(t.session, before);
    }

    #[rstest]
    #[case::clip_ended(false)]
    #[case::clip_failed(true)]
    fn test_events_after_finish_are_ignored(#[case] fail: bool) {
        let mut t = started(vec![clip("a"), clip("b")]);
        for _ in 0..2 {
            t = ended(&t.session);
        }
        assert_eq!(t.session.status(), PlaybackStatus::Finished);

        let late = if fail { failed(&t.session) } else { ended(&t.session) };
        assert!(late.effects.is_empty());
        assert_eq!(late.session, t.session);
        assert_eq!(late.session.index(), 2);
        assert_relative_eq!(late.session.progress(), 1.0);
    }

    #[rstest]
    #[case::clip_ended(false)]
    #[case::clip_failed(true)]
    fn test_events_on_empty_playlist_are_ignored(#[case] fail: bool) {
        let t = started(Vec::new());

        let late = if fail { failed(&t.session) } else { ended(&t.session) };
        assert!(late.effects.is_empty());
        assert_eq!(late.session, t.session);
        assert!(late.session.has_no_videos());
        assert_eq!(late.session.pending_advance(), None);
    }
}
