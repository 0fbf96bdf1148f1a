use std::time::Duration;

use super::narration::{Cue, CueToken, Deferred, Locale, Narration};
use super::tasks::QuizTask;
use super::LessonError;

pub const VERBAL_REWARD: u32 = 10;
pub const VERBAL_PROMPT_DELAY: Duration = Duration::from_millis(1800);

/// Speaking drill: the learner answers out loud, then grades themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbalDrill<'a> {
    tasks: Vec<QuizTask<'a>>,
    cursor: usize,
    revealed: bool,
}

/// What a self-report earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub points: u32,
    pub finished: bool,
}

impl<'a> VerbalDrill<'a> {
    pub fn new(tasks: Vec<QuizTask<'a>>) -> Self {
        Self {
            tasks,
            cursor: 0,
            revealed: false,
        }
    }

    pub fn current(&self) -> Option<&QuizTask<'a>> {
        self.tasks.get(self.cursor)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// 1-based position and total, for the progress line.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.tasks.len())
    }

    /// Instruction now, the word itself a little later.
    pub fn prompt_cues(&self, token: CueToken) -> Vec<Cue> {
        let Some(task) = self.current() else {
            return Vec::new();
        };
        let instruction = if task.is_conjugation() {
            "What is the past tense of?"
        } else {
            "What is this in English?"
        };
        vec![
            Cue::say(instruction, Locale::Target),
            Cue::later(VERBAL_PROMPT_DELAY, token, Deferred::Say(task.narration())),
        ]
    }

    pub fn reveal(&mut self) -> Result<Cue, LessonError> {
        let task = self.current().ok_or(LessonError::NoCurrentTask)?;
        if self.revealed {
            return Err(LessonError::NotAvailable("the answer is already shown"));
        }
        let cue = Cue::Say(Narration::english(task.expected_answer()));
        self.revealed = true;
        Ok(cue)
    }

    pub fn report(&mut self, success: bool) -> Result<Report, LessonError> {
        if self.current().is_none() {
            return Err(LessonError::NoCurrentTask);
        }
        if !self.revealed {
            return Err(LessonError::NotAvailable("reveal the answer first"));
        }
        self.cursor += 1;
        self.revealed = false;
        Ok(Report {
            points: if success { VERBAL_REWARD } else { 0 },
            finished: self.cursor >= self.tasks.len(),
        })
    }
}
