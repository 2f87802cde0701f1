//! Background music session: the track cursor and mute flag, kept in step with
//! one audio element and a persisted snapshot so a reload resumes where the
//! listener left off.
//!
//! Every operation takes the session and its collaborators explicitly. Starting
//! playback never completes inline; operations that start it hand back a
//! [`PlayRequest`] whose outcome the caller feeds to [`MusicSession::settle`].

use super::media::{MediaHandle, MuteIndicator, PlayOutcome};
use crate::config::MusicConfig;
use crate::db::{PlaybackState, StateStore};
use crate::error::{Result, SerenadeError};
use futures_util::future::LocalBoxFuture;
use std::time::Duration;

/// Ordered, non-empty list of track sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist(Vec<String>);

impl Playlist {
    pub fn new(tracks: Vec<String>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(SerenadeError::EmptyPlaylist);
        }
        Ok(Self(tracks))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Source for `index`, wrapping past the end.
    pub fn source(&self, index: usize) -> &str {
        &self.0[index % self.0.len()]
    }
}

/// Everything the session drives.
pub struct PlayerIo<M, S, I> {
    pub media: M,
    pub store: S,
    pub indicator: I,
}

/// Where to pick up once the restored track's metadata is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumePoint {
    pub position: f64,
    pub resume: bool,
}

/// What the page has to schedule after [`MusicSession::initialize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Startup {
    /// First visit: try to start after `delay`.
    Autoplay { delay: Duration },
    /// Wait for `loadedmetadata` (once), then call [`MusicSession::resume_at`].
    Resume(ResumePoint),
}

/// Identifies one play request; only the latest one may settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTicket(u64);

pub struct PlayRequest {
    pub ticket: PlayTicket,
    pub outcome: LocalBoxFuture<'static, PlayOutcome>,
}

#[derive(Debug)]
pub struct MusicSession {
    playlist: Playlist,
    track_index: usize,
    is_muted: bool,
    generation: u64,
    autoplay_delay: Duration,
    default_volume: f64,
}

impl MusicSession {
    pub fn new(playlist: Playlist, config: &MusicConfig) -> Self {
        Self {
            playlist,
            track_index: 0,
            is_muted: false,
            generation: 0,
            autoplay_delay: config.autoplay_delay,
            default_volume: config.default_volume,
        }
    }

    pub fn track_index(&self) -> usize {
        self.track_index
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    /// Read the persisted snapshot. Missing, unreadable or invalid records all
    /// come back as `None`.
    pub fn restore<S: StateStore>(store: &S) -> Option<PlaybackState> {
        match store.load() {
            Ok(Some(state)) => match state.validate() {
                Ok(state) => Some(state),
                Err(err) => {
                    tracing::debug!("ignoring stored playback state: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::debug!("ignoring stored playback state: {err}");
                None
            }
        }
    }

    pub fn snapshot<M: MediaHandle>(&self, media: &M) -> PlaybackState {
        PlaybackState {
            track_index: self.track_index,
            current_time: media.current_time().max(0.0),
            is_playing: !media.paused() && !self.is_muted,
            volume: media.volume().clamp(0.0, 1.0),
        }
    }

    /// Persist the current position. Best effort.
    pub fn save<M, S, I>(&self, io: &PlayerIo<M, S, I>)
    where
        M: MediaHandle,
        S: StateStore,
    {
        if let Err(err) = io.store.save(&self.snapshot(&io.media)) {
            tracing::debug!("playback state not saved: {err}");
        }
    }

    /// Periodic tick: only a playing element has a position worth saving.
    pub fn save_if_playing<M, S, I>(&self, io: &PlayerIo<M, S, I>)
    where
        M: MediaHandle,
        S: StateStore,
    {
        if !io.media.paused() {
            self.save(io);
        }
    }

    /// Load the stored snapshot into the session and the audio element.
    pub fn initialize<M, S, I>(&mut self, io: &PlayerIo<M, S, I>) -> Startup
    where
        M: MediaHandle,
        S: StateStore,
        I: MuteIndicator,
    {
        let Some(saved) = Self::restore(&io.store) else {
            self.track_index = 0;
            self.is_muted = false;
            io.media.load(self.playlist.source(0));
            io.media.set_volume(self.default_volume);
            io.indicator.show_sound_on(true);
            return Startup::Autoplay {
                delay: self.autoplay_delay,
            };
        };

        // The saved position belongs to the saved track; a fallback starts fresh.
        let (track_index, position) = if saved.track_index < self.playlist.len() {
            (saved.track_index, saved.current_time)
        } else {
            tracing::warn!(
                "stored track {} is outside a playlist of {}, starting from the top",
                saved.track_index,
                self.playlist.len()
            );
            (0, 0.0)
        };
        self.track_index = track_index;
        self.is_muted = !saved.is_playing;
        io.media.load(self.playlist.source(self.track_index));
        io.media.set_volume(saved.volume);
        io.indicator.show_sound_on(saved.is_playing);

        Startup::Resume(ResumePoint {
            position,
            resume: saved.is_playing,
        })
    }

    /// Seek to the restored position once the duration is known, then resume
    /// if the listener had music on.
    pub fn resume_at<M, S, I>(
        &mut self,
        point: ResumePoint,
        io: &PlayerIo<M, S, I>,
    ) -> Option<PlayRequest>
    where
        M: MediaHandle,
    {
        // NaN duration compares false, so an unknown length never seeks.
        if point.position > 0.0 && point.position < io.media.duration() {
            io.media.seek(point.position);
        }
        if point.resume && !self.is_muted {
            Some(self.request_play(io))
        } else {
            None
        }
    }

    pub fn request_play<M, S, I>(&mut self, io: &PlayerIo<M, S, I>) -> PlayRequest
    where
        M: MediaHandle,
    {
        self.generation += 1;
        PlayRequest {
            ticket: PlayTicket(self.generation),
            outcome: io.media.play(),
        }
    }

    /// Apply the outcome of a play request. A rejection always lands in the
    /// muted, paused state with the icon showing it.
    pub fn settle<M, S, I>(&mut self, ticket: PlayTicket, outcome: PlayOutcome, io: &PlayerIo<M, S, I>)
    where
        M: MediaHandle,
        S: StateStore,
        I: MuteIndicator,
    {
        if ticket != PlayTicket(self.generation) {
            tracing::debug!("dropping outcome of superseded play request: {outcome:?}");
            return;
        }
        match outcome {
            PlayOutcome::Started => {
                self.is_muted = false;
                io.indicator.show_sound_on(true);
            }
            PlayOutcome::Rejected(reason) => {
                tracing::info!("autoplay prevented, waiting for the listener: {reason}");
                io.media.pause();
                self.is_muted = true;
                io.indicator.show_sound_on(false);
            }
        }
        self.save(io);
    }

    /// Move to the next track when the current one ends, wrapping at the end
    /// of the playlist.
    pub fn advance<M, S, I>(&mut self, io: &PlayerIo<M, S, I>) -> Option<PlayRequest>
    where
        M: MediaHandle,
        S: StateStore,
    {
        self.track_index = (self.track_index + 1) % self.playlist.len();
        io.media.load(self.playlist.source(self.track_index));
        let request = (!self.is_muted).then(|| self.request_play(io));
        self.save(io);
        request
    }

    pub fn toggle_mute<M, S, I>(&mut self, io: &PlayerIo<M, S, I>) -> Option<PlayRequest>
    where
        M: MediaHandle,
        S: StateStore,
        I: MuteIndicator,
    {
        let request = if self.is_muted || io.media.paused() {
            self.is_muted = false;
            io.indicator.show_sound_on(true);
            Some(self.request_play(io))
        } else {
            // Invalidate any play still in flight.
            self.generation += 1;
            io.media.pause();
            self.is_muted = true;
            io.indicator.show_sound_on(false);
            None
        };
        self.save(io);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::music::testing::{fake_io, settle_now, FakeIo, Policy};
    use crate::db::MemoryStore;
    use proptest::prelude::*;

    fn playlist(n: usize) -> Playlist {
        Playlist::new((0..n).map(|i| format!("/assets/music/{i}.mp3")).collect()).unwrap()
    }

    fn session(n: usize) -> MusicSession {
        MusicSession::new(playlist(n), &MusicConfig::default())
    }

    fn stored(io: &FakeIo) -> PlaybackState {
        MusicSession::restore(&io.store).expect("state persisted")
    }

    fn seed(io: &FakeIo, state: PlaybackState) {
        io.store.save(&state).unwrap();
    }

    #[test]
    fn empty_playlist_is_rejected() {
        assert!(matches!(
            Playlist::new(Vec::new()),
            Err(SerenadeError::EmptyPlaylist)
        ));
    }

    #[test]
    fn restore_treats_missing_and_malformed_as_no_state() {
        let store = MemoryStore::new("musicState");
        assert_eq!(MusicSession::restore(&store), None);

        store.put_raw("not json at all");
        assert_eq!(MusicSession::restore(&store), None);

        store.put_raw(r#"{"trackIndex":0,"currentTime":-3,"isPlaying":true,"volume":0.5}"#);
        assert_eq!(MusicSession::restore(&store), None);

        store.put_raw(r#"[1, 2, 3]"#);
        assert_eq!(MusicSession::restore(&store), None);

        store.set_unavailable(true);
        assert_eq!(MusicSession::restore(&store), None);
    }

    #[test]
    fn fresh_visit_selects_first_track_and_schedules_autoplay() {
        let io = fake_io();
        let mut session = session(3);

        let startup = session.initialize(&io);

        assert_eq!(
            startup,
            Startup::Autoplay {
                delay: Duration::from_millis(500)
            }
        );
        assert_eq!(session.track_index(), 0);
        assert_eq!(io.media.src().as_deref(), Some("/assets/music/0.mp3"));
        assert_eq!(io.media.volume(), 0.5);

        let request = session.request_play(&io);
        settle_now(&mut session, request, &io);
        assert!(!session.is_muted());
        assert_eq!(io.indicator.shown(), Some(true));
        assert!(stored(&io).is_playing);
    }

    #[test]
    fn rejected_first_autoplay_falls_back_to_muted() {
        let io = fake_io();
        io.media.set_policy(Policy::Reject);
        let mut session = session(3);
        session.initialize(&io);

        let request = session.request_play(&io);
        settle_now(&mut session, request, &io);

        assert!(session.is_muted());
        assert!(io.media.paused());
        assert_eq!(io.indicator.shown(), Some(false));
        assert!(!stored(&io).is_playing);
    }

    #[test]
    fn corrupt_state_behaves_like_first_visit() {
        let io = fake_io();
        io.store.put_raw("{\"trackIndex\":");
        let mut session = session(3);

        assert!(matches!(
            session.initialize(&io),
            Startup::Autoplay { .. }
        ));
        assert_eq!(session.track_index(), 0);
    }

    #[test]
    fn restored_state_seeks_and_resumes_after_metadata() {
        let io = fake_io();
        seed(
            &io,
            PlaybackState {
                track_index: 1,
                current_time: 42.5,
                is_playing: true,
                volume: 0.3,
            },
        );
        let mut session = session(3);

        let Startup::Resume(point) = session.initialize(&io) else {
            panic!("expected a resume");
        };
        assert_eq!(session.track_index(), 1);
        assert_eq!(io.media.src().as_deref(), Some("/assets/music/1.mp3"));
        assert_eq!(io.media.volume(), 0.3);
        assert_eq!(io.indicator.shown(), Some(true));
        assert_eq!(io.media.play_calls(), 0);

        io.media.set_duration(180.0);
        let request = session.resume_at(point, &io).expect("resume requested");
        assert_eq!(io.media.seeks(), vec![42.5]);
        settle_now(&mut session, request, &io);

        assert!(!io.media.paused());
        assert!(!session.is_muted());
        let saved = stored(&io);
        assert_eq!(saved.track_index, 1);
        assert_eq!(saved.current_time, 42.5);
        assert!(saved.is_playing);
    }

    #[test]
    fn rejected_resume_ends_muted_and_paused() {
        let io = fake_io();
        io.media.set_policy(Policy::Reject);
        seed(
            &io,
            PlaybackState {
                track_index: 1,
                current_time: 42.5,
                is_playing: true,
                volume: 0.3,
            },
        );
        let mut session = session(3);
        let Startup::Resume(point) = session.initialize(&io) else {
            panic!("expected a resume");
        };

        io.media.set_duration(180.0);
        let request = session.resume_at(point, &io).expect("resume requested");
        settle_now(&mut session, request, &io);

        assert!(session.is_muted());
        assert!(io.media.paused());
        assert_eq!(io.indicator.shown(), Some(false));
    }

    #[test]
    fn paused_state_restores_position_without_playing() {
        let io = fake_io();
        seed(
            &io,
            PlaybackState {
                track_index: 2,
                current_time: 10.0,
                is_playing: false,
                volume: 0.8,
            },
        );
        let mut session = session(3);
        let Startup::Resume(point) = session.initialize(&io) else {
            panic!("expected a resume");
        };
        assert!(session.is_muted());
        assert_eq!(io.indicator.shown(), Some(false));

        io.media.set_duration(200.0);
        assert!(session.resume_at(point, &io).is_none());
        assert_eq!(io.media.seeks(), vec![10.0]);
        assert_eq!(io.media.play_calls(), 0);
    }

    #[test]
    fn stale_or_unknown_positions_are_not_seeked() {
        let io = fake_io();
        let mut session = session(1);
        let past_end = ResumePoint {
            position: 300.0,
            resume: false,
        };

        // Duration still unknown.
        session.resume_at(past_end, &io);
        io.media.set_duration(120.0);
        session.resume_at(past_end, &io);
        session.resume_at(
            ResumePoint {
                position: 0.0,
                resume: false,
            },
            &io,
        );

        assert!(io.media.seeks().is_empty());
    }

    #[test]
    fn out_of_range_track_index_starts_from_first_track() {
        let io = fake_io();
        seed(
            &io,
            PlaybackState {
                track_index: 5,
                current_time: 42.5,
                is_playing: true,
                volume: 0.5,
            },
        );
        let mut session = session(3);

        let Startup::Resume(point) = session.initialize(&io) else {
            panic!("expected a resume");
        };
        assert_eq!(session.track_index(), 0);
        assert_eq!(io.media.src().as_deref(), Some("/assets/music/0.mp3"));
        assert_eq!(point.position, 0.0);

        // The first track starts from its beginning, not the old offset.
        io.media.set_duration(180.0);
        let request = session.resume_at(point, &io).expect("resume requested");
        settle_now(&mut session, request, &io);
        assert!(io.media.seeks().is_empty());
        assert_eq!(stored(&io).track_index, 0);
    }

    #[test]
    fn advance_wraps_from_last_track() {
        let io = fake_io();
        seed(
            &io,
            PlaybackState {
                track_index: 2,
                current_time: 0.0,
                is_playing: true,
                volume: 0.5,
            },
        );
        let mut session = session(3);
        session.initialize(&io);

        let request = session.advance(&io).expect("plays next track");
        settle_now(&mut session, request, &io);

        assert_eq!(session.track_index(), 0);
        assert_eq!(io.media.src().as_deref(), Some("/assets/music/0.mp3"));
        assert_eq!(stored(&io).track_index, 0);
    }

    #[test]
    fn advance_while_muted_loads_but_stays_silent() {
        let io = fake_io();
        let mut session = session(3);
        session.initialize(&io);
        // Muting from the paused first-visit state turns music on, so turn it
        // on first and then off.
        let request = session.toggle_mute(&io).expect("unmutes");
        settle_now(&mut session, request, &io);
        assert!(session.toggle_mute(&io).is_none());
        let plays = io.media.play_calls();

        assert!(session.advance(&io).is_none());

        assert_eq!(io.media.play_calls(), plays);
        assert_eq!(session.track_index(), 1);
        let saved = stored(&io);
        assert_eq!(saved.track_index, 1);
        assert!(!saved.is_playing);
    }

    #[test]
    fn toggle_from_muted_plays_and_persists() {
        let io = fake_io();
        io.media.set_policy(Policy::Reject);
        let mut session = session(3);
        session.initialize(&io);
        let request = session.request_play(&io);
        settle_now(&mut session, request, &io);
        assert!(session.is_muted());

        // The click counts as a user gesture.
        io.media.set_policy(Policy::Allow);
        let request = session.toggle_mute(&io).expect("play requested");
        assert_eq!(io.indicator.shown(), Some(true));
        assert!(io.store.raw().is_some());
        settle_now(&mut session, request, &io);

        assert!(!session.is_muted());
        assert_eq!(io.indicator.shown(), Some(true));
        assert!(stored(&io).is_playing);
    }

    #[test]
    fn toggle_while_playing_pauses_and_mutes() {
        let io = fake_io();
        let mut session = session(3);
        session.initialize(&io);
        let request = session.request_play(&io);
        settle_now(&mut session, request, &io);

        assert!(session.toggle_mute(&io).is_none());

        assert!(session.is_muted());
        assert!(io.media.paused());
        assert_eq!(io.indicator.shown(), Some(false));
        assert!(!stored(&io).is_playing);
    }

    #[test]
    fn superseded_play_outcome_is_ignored() {
        let io = fake_io();
        let mut session = session(3);
        session.initialize(&io);

        let pending = session.toggle_mute(&io).expect("play requested");
        assert!(session.toggle_mute(&io).is_none());
        settle_now(&mut session, pending, &io);

        assert!(session.is_muted());
        assert_eq!(io.indicator.shown(), Some(false));
    }

    #[test]
    fn periodic_save_skips_paused_playback() {
        let io = fake_io();
        let session = session(3);

        session.save_if_playing(&io);
        assert!(io.store.raw().is_none());

        io.media.set_paused(false);
        io.media.set_current_time(7.25);
        session.save_if_playing(&io);
        assert_eq!(stored(&io).current_time, 7.25);
    }

    #[test]
    fn save_survives_unavailable_storage() {
        let io = fake_io();
        io.store.set_unavailable(true);
        let session = session(3);

        session.save(&io);

        io.store.set_unavailable(false);
        assert!(io.store.raw().is_none());
    }

    proptest! {
        /// Property: n track endings land on index n mod L
        #[test]
        fn advance_is_modular(len in 1usize..20, n in 0usize..100) {
            let io = fake_io();
            let mut session = session(len);
            session.initialize(&io);

            for _ in 0..n {
                session.advance(&io);
            }

            prop_assert_eq!(session.track_index(), n % len);
        }

        /// Property: the saved play flag is "element playing and not muted"
        #[test]
        fn saved_play_flag_tracks_element_and_mute(
            paused in any::<bool>(),
            muted in any::<bool>(),
            time in 0.0f64..600.0,
        ) {
            let io = fake_io();
            let mut session = session(2);
            session.is_muted = muted;
            io.media.set_paused(paused);
            io.media.set_current_time(time);

            session.save(&io);

            let saved = stored(&io);
            prop_assert_eq!(saved.is_playing, !paused && !muted);
            prop_assert_eq!(saved.current_time, time);
        }
    }
}
