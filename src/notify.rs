//! Feedback cues for gameplay events.
//!
//! The session never plays sounds itself. It reports [`GameEvent`]s and the
//! caller hands them to whichever [`Notifier`] it constructed for the session.

use std::io::Write;

use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CorrectGuess(char),
    WrongGuess(char),
    PuzzleWon,
    PuzzleLost,
    HintRevealed,
    /// Play moved on to the puzzle at this index.
    PuzzleStarted(usize),
    SessionRestarted,
    SessionComplete,
}

pub trait Notifier {
    fn session_started(&mut self) {}

    fn notify(&mut self, event: GameEvent);

    fn session_ended(&mut self) {}

    fn set_muted(&mut self, _muted: bool) {}

    fn is_muted(&self) -> bool {
        true
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&mut self, _event: GameEvent) {}
}

/// Writes every event to the log.
#[derive(Debug, Default)]
pub struct LogNotifier {
    muted: bool,
}

impl Notifier for LogNotifier {
    fn session_started(&mut self) {
        info!("Session started");
    }

    fn notify(&mut self, event: GameEvent) {
        if !self.muted {
            info!("Game event: {event:?}");
        }
    }

    fn session_ended(&mut self) {
        info!("Session ended");
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}

const BELL: &[u8] = b"\x07";

/// Rings the terminal bell on wrong guesses and lost puzzles.
pub struct BellNotifier<W: Write> {
    out: W,
    muted: bool,
    rung: usize,
}

impl<W: Write> BellNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            muted: false,
            rung: 0,
        }
    }

    /// How many times the bell has sounded.
    #[must_use]
    pub fn rung(&self) -> usize {
        self.rung
    }

    fn ring(&mut self) {
        // A closed terminal is not worth interrupting play for.
        if let Err(e) = self.out.write_all(BELL).and_then(|()| self.out.flush()) {
            debug!("Bell write failed: {e}");
            return;
        }
        self.rung += 1;
    }
}

impl<W: Write> Notifier for BellNotifier<W> {
    fn notify(&mut self, event: GameEvent) {
        if self.muted {
            return;
        }
        if matches!(event, GameEvent::WrongGuess(_) | GameEvent::PuzzleLost) {
            self.ring();
        }
    }

    fn session_ended(&mut self) {
        let _ = self.out.flush();
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_rings_only_on_failures() {
        let mut bell = BellNotifier::new(Vec::new());
        bell.notify(GameEvent::CorrectGuess('A'));
        bell.notify(GameEvent::PuzzleWon);
        bell.notify(GameEvent::WrongGuess('Z'));
        bell.notify(GameEvent::PuzzleLost);
        assert_eq!(bell.rung(), 2);
        assert_eq!(bell.out, b"\x07\x07".to_vec());
    }

    #[test]
    fn test_muted_bell_stays_quiet() {
        let mut bell = BellNotifier::new(Vec::new());
        bell.set_muted(true);
        assert!(bell.is_muted());
        bell.notify(GameEvent::WrongGuess('Z'));
        assert_eq!(bell.rung(), 0);
        assert!(bell.out.is_empty());
    }

    #[test]
    fn test_log_notifier_mute_toggle() {
        let mut notifier = LogNotifier::default();
        assert!(!notifier.is_muted());
        notifier.session_started();
        notifier.notify(GameEvent::WrongGuess('Z'));
        notifier.set_muted(true);
        assert!(notifier.is_muted());
        notifier.notify(GameEvent::PuzzleLost);
        notifier.session_ended();
        notifier.set_muted(false);
        assert!(!notifier.is_muted());
    }

    #[test]
    fn test_silent_notifier_reports_muted() {
        let mut silent = SilentNotifier;
        silent.notify(GameEvent::HintRevealed);
        assert!(silent.is_muted());
    }
}
