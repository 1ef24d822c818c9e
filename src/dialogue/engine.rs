//! Dialogue Engine
//!
//! Plays one dialogue set at a time with a typewriter effect. Callers start a
//! set and then poll [`DialogueEngine::is_running`]; there is no other
//! synchronization.

use std::sync::Arc;

use tracing::{debug, warn};

use super::data::DialogueSet;
use crate::config::DialogueSettings;
use crate::input::FrameInput;
use crate::present::Presenter;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Revealing the current line one character at a time
    Typing { elapsed: f32 },
    /// Current line fully shown, waiting for a skip
    LineShown,
    /// Past the last line, waiting to hide the panel
    FadingOut { remaining: f32 },
    /// A temporary message is on screen
    Message { remaining: f32 },
}

pub struct DialogueEngine {
    settings: DialogueSettings,
    phase: Phase,
    current: Option<Arc<DialogueSet>>,
    line_index: usize,
    /// Characters of the current line on screen
    revealed: usize,
    voice_playing: bool,
}

impl DialogueEngine {
    pub fn new(settings: DialogueSettings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            current: None,
            line_index: 0,
            revealed: 0,
            voice_playing: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.phase, Phase::Typing { .. })
    }

    pub fn is_showing_message(&self) -> bool {
        matches!(self.phase, Phase::Message { .. })
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn current_set(&self) -> Option<&str> {
        self.current.as_deref().map(|set| set.id.as_str())
    }

    /// Text of the current line that is on screen
    pub fn visible_text(&self) -> &str {
        let Some(text) = self.current_text() else {
            return "";
        };
        match text.char_indices().nth(self.revealed) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }

    fn current_text(&self) -> Option<&str> {
        self.current
            .as_deref()
            .and_then(|set| set.lines.get(self.line_index))
            .map(|line| line.text.as_str())
    }

    /// Begin playing a set. Rejected while anything is running or when the
    /// set has no lines.
    pub fn start(&mut self, set: &Arc<DialogueSet>, presenter: &mut dyn Presenter) -> bool {
        if self.is_running() {
            debug!("Dialogue '{}' rejected: engine busy", set.id);
            return false;
        }
        if set.is_empty() {
            warn!("Dialogue '{}' has no lines", set.id);
            return false;
        }

        self.current = Some(Arc::clone(set));
        self.line_index = 0;
        presenter.show_dialogue_panel();
        self.show_line(presenter);
        true
    }

    /// Primary click: finish typing the current line, or move to the next one
    pub fn skip(&mut self, presenter: &mut dyn Presenter) {
        match self.phase {
            Phase::Typing { .. } => {
                self.revealed = self.current_text().map_or(0, |t| t.chars().count());
                presenter.set_dialogue_text(self.visible_text());
                self.phase = Phase::LineShown;
            }
            Phase::LineShown => self.next_line(presenter),
            Phase::Idle | Phase::FadingOut { .. } | Phase::Message { .. } => {}
        }
    }

    pub fn next_line(&mut self, presenter: &mut dyn Presenter) {
        if self.current.is_none() || matches!(self.phase, Phase::FadingOut { .. }) {
            return;
        }

        self.line_index += 1;
        let line_count = self.current.as_deref().map_or(0, |set| set.lines.len());
        if self.line_index >= line_count {
            self.phase = Phase::FadingOut {
                remaining: self.settings.fade_out_delay,
            };
        } else {
            self.show_line(presenter);
        }
    }

    fn show_line(&mut self, presenter: &mut dyn Presenter) {
        let Some(set) = self.current.clone() else {
            return;
        };
        let Some(line) = set.lines.get(self.line_index) else {
            return;
        };

        presenter.set_speaker(&line.speaker, line.portrait.as_deref());

        // First character shows immediately
        self.revealed = usize::from(!line.text.is_empty());
        self.phase = Phase::Typing { elapsed: 0.0 };
        presenter.set_dialogue_text(self.visible_text());

        if let Some(clip) = &line.voice {
            if self.voice_playing {
                presenter.stop_voice();
            }
            presenter.play_voice(clip);
            self.voice_playing = true;
        }
    }

    /// Show a message outside any dialogue set for `message_duration`
    pub fn show_temporary_message(&mut self, message: &str, presenter: &mut dyn Presenter) -> bool {
        let duration = self.settings.message_duration;
        self.show_temporary_message_for(message, duration, presenter)
    }

    pub fn show_temporary_message_for(
        &mut self,
        message: &str,
        duration: f32,
        presenter: &mut dyn Presenter,
    ) -> bool {
        if self.is_running() {
            return false;
        }

        presenter.show_dialogue_panel();
        presenter.set_dialogue_text(message);
        self.phase = Phase::Message { remaining: duration };
        true
    }

    pub fn handle_input(&mut self, input: &FrameInput, presenter: &mut dyn Presenter) {
        if input.primary_click && self.is_running() {
            self.skip(presenter);
        }
    }

    pub fn tick(&mut self, dt: f32, presenter: &mut dyn Presenter) {
        match self.phase {
            Phase::Idle | Phase::LineShown => {}
            Phase::Typing { elapsed } => self.advance_typing(elapsed + dt, presenter),
            Phase::FadingOut { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.finish(presenter);
                } else {
                    self.phase = Phase::FadingOut { remaining };
                }
            }
            Phase::Message { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    presenter.hide_dialogue_panel();
                    self.phase = Phase::Idle;
                } else {
                    self.phase = Phase::Message { remaining };
                }
            }
        }
    }

    /// One more character per elapsed interval; once the line is complete a
    /// final interval passes before typing ends.
    fn advance_typing(&mut self, mut elapsed: f32, presenter: &mut dyn Presenter) {
        let total = self.current_text().map_or(0, |t| t.chars().count());
        let interval = self.settings.typing_interval;
        let before = self.revealed;

        if interval <= 0.0 {
            self.revealed = total;
            self.phase = Phase::LineShown;
        } else {
            self.phase = Phase::Typing { elapsed };
            while elapsed >= interval {
                elapsed -= interval;
                if self.revealed < total {
                    self.revealed += 1;
                    self.phase = Phase::Typing { elapsed };
                } else {
                    self.phase = Phase::LineShown;
                    break;
                }
            }
        }

        if self.revealed != before {
            presenter.set_dialogue_text(self.visible_text());
        }
    }

    fn finish(&mut self, presenter: &mut dyn Presenter) {
        presenter.hide_dialogue_panel();
        if self.voice_playing {
            presenter.stop_voice();
            self.voice_playing = false;
        }
        self.current = None;
        self.line_index = 0;
        self.revealed = 0;
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::DialogueLine;
    use crate::present::testing::{Cue, RecordingPresenter};

    fn engine() -> DialogueEngine {
        DialogueEngine::new(DialogueSettings {
            typing_interval: 0.25,
            fade_out_delay: 1.0,
            message_duration: 2.0,
        })
    }

    fn two_lines() -> Arc<DialogueSet> {
        Arc::new(DialogueSet::new(
            "intro",
            vec![
                DialogueLine::new("Keeper", "Hello").with_voice("hello_clip"),
                DialogueLine::new("Keeper", "Bye"),
            ],
        ))
    }

    #[test]
    fn test_start_and_typing() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = engine();

        assert!(engine.start(&two_lines(), &mut presenter));
        assert!(engine.is_running());
        assert!(engine.is_typing());
        assert_eq!(engine.visible_text(), "H");
        assert!(presenter.has(&Cue::ShowDialoguePanel));
        assert!(presenter.has(&Cue::PlayVoice("hello_clip".into())));

        engine.tick(0.25, &mut presenter);
        assert_eq!(engine.visible_text(), "He");

        engine.tick(0.75, &mut presenter);
        assert_eq!(engine.visible_text(), "Hello");
        assert!(engine.is_typing());

        // One more interval after the last character
        engine.tick(0.25, &mut presenter);
        assert!(!engine.is_typing());
        assert_eq!(engine.line_index(), 0);
        assert_eq!(presenter.last_dialogue_text(), Some("Hello"));
    }

    #[test]
    fn test_skip_completes_line_then_advances() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = engine();
        engine.start(&two_lines(), &mut presenter);

        engine.skip(&mut presenter);
        assert!(!engine.is_typing());
        assert_eq!(engine.visible_text(), "Hello");
        assert_eq!(engine.line_index(), 0);

        engine.skip(&mut presenter);
        assert_eq!(engine.line_index(), 1);
        assert!(engine.is_typing());
        assert_eq!(engine.visible_text(), "B");
    }

    #[test]
    fn test_fade_out_after_last_line() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = engine();
        engine.start(&two_lines(), &mut presenter);

        for _ in 0..4 {
            engine.skip(&mut presenter);
        }
        // Past the last line but still running until the delay elapses
        assert!(engine.is_running());
        engine.tick(0.5, &mut presenter);
        assert!(engine.is_running());
        engine.tick(0.6, &mut presenter);
        assert!(!engine.is_running());
        assert_eq!(engine.current_set(), None);
        assert_eq!(engine.line_index(), 0);
        assert!(presenter.has(&Cue::HideDialoguePanel));
        assert!(presenter.has(&Cue::StopVoice));
    }

    #[test]
    fn test_start_rejected_while_running_or_empty() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = engine();

        let empty = Arc::new(DialogueSet::new("empty", vec![]));
        assert!(!engine.start(&empty, &mut presenter));
        assert!(!engine.is_running());

        assert!(engine.start(&two_lines(), &mut presenter));
        let other = Arc::new(DialogueSet::new("other", vec![DialogueLine::new("", "Hi")]));
        assert!(!engine.start(&other, &mut presenter));
        assert_eq!(engine.current_set(), Some("intro"));
    }

    #[test]
    fn test_temporary_message() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = engine();

        assert!(engine.show_temporary_message("Locked.", &mut presenter));
        assert!(engine.is_running());
        assert!(engine.is_showing_message());
        assert!(!engine.start(&two_lines(), &mut presenter));

        // Clicks do not consume the message
        engine.handle_input(&FrameInput::click(), &mut presenter);
        assert!(engine.is_showing_message());

        engine.tick(2.0, &mut presenter);
        assert!(!engine.is_running());
        assert!(engine.start(&two_lines(), &mut presenter));
        assert!(!engine.show_temporary_message("Busy", &mut presenter));
    }

    #[test]
    fn test_unicode_typing() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = engine();
        let set = Arc::new(DialogueSet::new("u", vec![DialogueLine::new("", "héllo")]));
        engine.start(&set, &mut presenter);
        engine.tick(0.25, &mut presenter);
        assert_eq!(engine.visible_text(), "hé");
    }
}
