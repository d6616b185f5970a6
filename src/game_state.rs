use crate::notify::{GameEvent, Notifier};
use crate::session::{Advance, GameSession};
use crate::{debug_log, info_log};

/// Something the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Guess(char),
    Hint,
    Next,
    Restart,
    ToggleSound,
    Exit,
}

/// How a call to [`game_loop`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every puzzle was played and the player chose to leave.
    Completed,
    /// The player quit part way through.
    Exited,
}

/// Presentation layer driven by [`game_loop`].
///
/// Implementations only render and collect input; all rules live in
/// [`GameSession`].
pub trait GameInterface {
    fn show_session(&mut self, session: &GameSession);

    /// `None` means the input was not understood and nothing should happen.
    fn read_action(&mut self, session: &GameSession) -> Option<UserAction>;

    fn show_events(&mut self, session: &GameSession, events: &[GameEvent]);

    fn show_message(&mut self, message: &str);

    fn show_session_complete(&mut self, session: &GameSession);

    fn show_exit_message(&mut self);
}

pub fn game_loop<I, N>(session: &mut GameSession, interface: &mut I, notifier: &mut N) -> SessionEnd
where
    I: GameInterface + ?Sized,
    N: Notifier + ?Sized,
{
    notifier.session_started();
    let end = run(session, interface, notifier);
    notifier.session_ended();
    interface.show_exit_message();
    info_log!("game_loop() - finished: {:?}", end);
    end
}

fn run<I, N>(session: &mut GameSession, interface: &mut I, notifier: &mut N) -> SessionEnd
where
    I: GameInterface + ?Sized,
    N: Notifier + ?Sized,
{
    loop {
        if session.is_complete() {
            interface.show_session_complete(session);
        } else {
            interface.show_session(session);
        }

        let Some(action) = interface.read_action(session) else {
            continue;
        };
        debug_log!("game_loop() - action {:?}", action);

        let events = match action {
            UserAction::Exit => {
                return if session.is_complete() {
                    SessionEnd::Completed
                } else {
                    SessionEnd::Exited
                };
            }
            UserAction::ToggleSound => {
                let muted = !notifier.is_muted();
                notifier.set_muted(muted);
                interface.show_message(if muted { "Sound off" } else { "Sound on" });
                continue;
            }
            UserAction::Restart => session.restart(),
            _ if session.is_complete() => {
                interface.show_message("All puzzles done. Restart to play again or exit.");
                continue;
            }
            UserAction::Guess(letter) => session.guess_letter(letter),
            UserAction::Hint => session.reveal_hint(),
            UserAction::Next => match session.advance_puzzle() {
                Advance::NextPuzzle(index) => vec![GameEvent::PuzzleStarted(index)],
                Advance::SessionComplete => vec![GameEvent::SessionComplete],
                Advance::NotFinished => {
                    interface.show_message("Finish this puzzle before moving on.");
                    continue;
                }
            },
        };

        for event in &events {
            notifier.notify(*event);
        }
        if !events.is_empty() {
            interface.show_events(session, &events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Difficulty, RawCandidate};
    use crate::session::{GameConfig, PuzzleStatus};
    use crate::validator::validate_candidates;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Plays back a fixed script and records what it was shown.
    #[derive(Default)]
    struct ScriptedInterface {
        actions: VecDeque<Option<UserAction>>,
        events: Vec<GameEvent>,
        messages: Vec<String>,
        completions: usize,
        exited: bool,
    }

    impl ScriptedInterface {
        fn new(actions: Vec<Option<UserAction>>) -> Self {
            Self {
                actions: actions.into(),
                ..Self::default()
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn show_session(&mut self, _session: &GameSession) {}

        fn read_action(&mut self, _session: &GameSession) -> Option<UserAction> {
            self.actions.pop_front().unwrap_or(Some(UserAction::Exit))
        }

        fn show_events(&mut self, _session: &GameSession, events: &[GameEvent]) {
            self.events.extend_from_slice(events);
        }

        fn show_message(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }

        fn show_session_complete(&mut self, _session: &GameSession) {
            self.completions += 1;
        }

        fn show_exit_message(&mut self) {
            self.exited = true;
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        started: bool,
        ended: bool,
        muted: bool,
        events: Vec<GameEvent>,
    }

    impl Notifier for RecordingNotifier {
        fn session_started(&mut self) {
            self.started = true;
        }

        fn notify(&mut self, event: GameEvent) {
            self.events.push(event);
        }

        fn session_ended(&mut self) {
            self.ended = true;
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn is_muted(&self) -> bool {
            self.muted
        }
    }

    fn session(answers: &[&str]) -> GameSession {
        let raw: Vec<RawCandidate> = answers
            .iter()
            .map(|a| RawCandidate::new(a, "q", "h", "Easy"))
            .collect();
        GameSession::new(
            validate_candidates(&raw, Difficulty::Easy).unwrap(),
            GameConfig::default(),
        )
    }

    fn guesses(letters: &str) -> Vec<Option<UserAction>> {
        letters.chars().map(|c| Some(UserAction::Guess(c))).collect()
    }

    #[test]
    fn test_immediate_exit() {
        let mut game = session(&["ATOM"]);
        let mut ui = ScriptedInterface::new(vec![Some(UserAction::Exit)]);
        let mut notifier = RecordingNotifier::default();
        assert_eq!(game_loop(&mut game, &mut ui, &mut notifier), SessionEnd::Exited);
        assert!(notifier.started && notifier.ended);
        assert!(ui.exited);
        assert!(ui.events.is_empty());
    }

    #[test]
    fn test_full_session_completes() {
        let mut game = session(&["ATOM", "CELL"]);
        let mut script = guesses("ATOM");
        script.push(Some(UserAction::Next));
        script.extend(guesses("CEL"));
        script.push(Some(UserAction::Next));
        script.push(Some(UserAction::Exit));
        let mut ui = ScriptedInterface::new(script);
        let mut notifier = RecordingNotifier::default();

        assert_eq!(game_loop(&mut game, &mut ui, &mut notifier), SessionEnd::Completed);
        assert_eq!(game.score(), 70);
        assert_eq!(game.stats().words_completed, 2);
        assert_eq!(ui.completions, 1);
        assert_eq!(notifier.events.last(), Some(&GameEvent::SessionComplete));
        assert_eq!(ui.events, notifier.events);
    }

    #[test]
    fn test_next_announces_new_puzzle() {
        let mut game = session(&["ATOM", "CELL"]);
        let mut script = guesses("ATOM");
        script.push(Some(UserAction::Next));
        let mut ui = ScriptedInterface::new(script);
        game_loop(&mut game, &mut ui, &mut RecordingNotifier::default());
        assert_eq!(game.current_index(), 1);
        assert_eq!(ui.events.last(), Some(&GameEvent::PuzzleStarted(1)));
    }

    #[test]
    fn test_next_refused_while_playing() {
        let mut game = session(&["ATOM", "CELL"]);
        let mut ui = ScriptedInterface::new(vec![Some(UserAction::Next)]);
        game_loop(&mut game, &mut ui, &mut RecordingNotifier::default());
        assert_eq!(game.current_index(), 0);
        assert_eq!(ui.messages, vec!["Finish this puzzle before moving on."]);
    }

    #[test]
    fn test_unrecognized_input_is_skipped() {
        let mut game = session(&["ATOM"]);
        let mut ui = ScriptedInterface::new(vec![None, Some(UserAction::Guess('A')), None]);
        game_loop(&mut game, &mut ui, &mut RecordingNotifier::default());
        assert_eq!(ui.events, vec![GameEvent::CorrectGuess('A')]);
    }

    #[test]
    fn test_toggle_sound_mutes_notifier() {
        let mut game = session(&["ATOM"]);
        let mut ui = ScriptedInterface::new(vec![Some(UserAction::ToggleSound)]);
        let mut notifier = RecordingNotifier::default();
        game_loop(&mut game, &mut ui, &mut notifier);
        assert!(notifier.muted);
        assert_eq!(ui.messages, vec!["Sound off"]);
    }

    #[test]
    fn test_only_restart_or_exit_after_completion() {
        let mut game = session(&["ATOM"]);
        let mut script = guesses("ATOM");
        script.push(Some(UserAction::Next));
        script.push(Some(UserAction::Guess('Z')));
        script.push(Some(UserAction::Restart));
        script.push(Some(UserAction::Guess('Z')));
        let mut ui = ScriptedInterface::new(script);
        let mut notifier = RecordingNotifier::default();

        assert_eq!(game_loop(&mut game, &mut ui, &mut notifier), SessionEnd::Exited);
        assert_eq!(
            ui.messages,
            vec!["All puzzles done. Restart to play again or exit."]
        );
        assert!(notifier.events.contains(&GameEvent::SessionRestarted));
        assert_eq!(game.score(), 0);
        assert_eq!(game.wrong_guess_count(), 1);
        assert_eq!(game.status(), PuzzleStatus::Playing);
    }

    #[test]
    fn test_wrong_guesses_reach_loss_through_loop() {
        let mut game = session(&["CELL"]);
        let mut ui = ScriptedInterface::new(guesses("XQZWBDFGHJ"));
        let mut notifier = RecordingNotifier::default();
        game_loop(&mut game, &mut ui, &mut notifier);
        assert_eq!(game.status(), PuzzleStatus::Lost);
        assert_eq!(
            notifier
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::WrongGuess(_)))
                .count(),
            10
        );
        assert!(notifier.events.contains(&GameEvent::HintRevealed));
        assert_eq!(notifier.events.last(), Some(&GameEvent::PuzzleLost));
    }
}
