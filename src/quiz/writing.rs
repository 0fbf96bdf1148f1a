use std::time::Duration;

use super::narration::{Cue, CueToken, Deferred, Locale};
use super::tasks::QuizTask;
use super::LessonError;

pub const WRITING_REWARD: u32 = 20;
pub const WRITING_PROMPT_DELAY: Duration = Duration::from_millis(1500);
pub const CORRECT_ADVANCE_DELAY: Duration = Duration::from_millis(1500);
pub const GIVE_UP_ADVANCE_DELAY: Duration = Duration::from_millis(2000);
/// Wrong attempts needed before the answer can be shown.
pub const GIVE_UP_AFTER: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritingStatus {
    #[default]
    Idle,
    Correct,
    Wrong,
    GaveUp,
}

impl WritingStatus {
    /// Waiting for the delayed advance; the task takes no more input.
    pub fn is_settled(&self) -> bool {
        matches!(self, WritingStatus::Correct | WritingStatus::GaveUp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Correct { points: u32 },
    Wrong { attempts: u32 },
}

/// Spelling drill: the learner types each answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritingDrill<'a> {
    tasks: Vec<QuizTask<'a>>,
    cursor: usize,
    input: String,
    status: WritingStatus,
    attempts: u32,
}

pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

impl<'a> WritingDrill<'a> {
    pub fn new(tasks: Vec<QuizTask<'a>>) -> Self {
        Self {
            tasks,
            cursor: 0,
            input: String::new(),
            status: WritingStatus::Idle,
            attempts: 0,
        }
    }

    pub fn current(&self) -> Option<&QuizTask<'a>> {
        self.tasks.get(self.cursor)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> WritingStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.tasks.len())
    }

    pub fn can_give_up(&self) -> bool {
        self.current().is_some() && self.attempts >= GIVE_UP_AFTER && !self.status.is_settled()
    }

    pub fn prompt_cues(&self, token: CueToken) -> Vec<Cue> {
        let Some(task) = self.current() else {
            return Vec::new();
        };
        let instruction = if task.is_conjugation() {
            "Write the past tense of"
        } else {
            "Write the English word for"
        };
        vec![
            Cue::say(instruction, Locale::Target),
            Cue::later(WRITING_PROMPT_DELAY, token, Deferred::Say(task.narration())),
        ]
    }

    /// Expected answer of the task still waiting for input.
    fn open_answer(&self) -> Result<&'a str, LessonError> {
        let task = self.current().ok_or(LessonError::NoCurrentTask)?;
        if self.status.is_settled() {
            return Err(LessonError::NotAvailable("moving on to the next word"));
        }
        Ok(task.expected_answer())
    }

    /// Compares `answer` with the expected one; spacing around it and case don't matter.
    pub fn check(&mut self, answer: &str) -> Result<CheckOutcome, LessonError> {
        let expected = self.open_answer()?;
        self.input = answer.to_string();

        if normalize_answer(&self.input) == normalize_answer(expected) {
            self.status = WritingStatus::Correct;
            Ok(CheckOutcome::Correct {
                points: WRITING_REWARD,
            })
        } else {
            self.status = WritingStatus::Wrong;
            self.attempts += 1;
            Ok(CheckOutcome::Wrong {
                attempts: self.attempts,
            })
        }
    }

    /// Fills in the expected answer. Only offered after enough wrong attempts.
    pub fn give_up(&mut self) -> Result<&'a str, LessonError> {
        let expected = self.open_answer()?;
        if self.attempts < GIVE_UP_AFTER {
            return Err(LessonError::NotAvailable("keep trying a little longer"));
        }
        self.input = expected.to_string();
        self.status = WritingStatus::GaveUp;
        Ok(expected)
    }

    /// Moves past a settled task. Returns true once every task is done.
    pub fn advance(&mut self) -> Result<bool, LessonError> {
        if !self.status.is_settled() {
            return Err(LessonError::NotAvailable("the current word is not answered yet"));
        }
        self.cursor += 1;
        self.input.clear();
        self.status = WritingStatus::Idle;
        self.attempts = 0;
        Ok(self.cursor >= self.tasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::narration::Narration;
    use crate::quiz::tasks::generate_tasks;
    use crate::quiz::vocab::VOCABULARY;

    fn drill() -> WritingDrill<'static> {
        WritingDrill::new(generate_tasks(&["buy"], VOCABULARY))
    }

    #[test]
    fn answers_ignore_case_and_outer_spaces() {
        let mut drill = drill();
        assert_eq!(
            drill.check("  BUY ").unwrap(),
            CheckOutcome::Correct { points: 20 }
        );
        assert_eq!(drill.advance(), Ok(false));
        assert_eq!(
            drill.check(" Bought ").unwrap(),
            CheckOutcome::Correct { points: 20 }
        );
        assert_eq!(drill.advance(), Ok(true));
        assert!(drill.current().is_none());
    }

    #[test]
    fn wrong_answer_keeps_input_and_cursor() {
        let mut drill = drill();
        assert_eq!(drill.check("bye").unwrap(), CheckOutcome::Wrong { attempts: 1 });
        assert_eq!(drill.status(), WritingStatus::Wrong);
        assert_eq!(drill.input(), "bye");
        assert_eq!(drill.progress(), (1, 2));
        assert!(drill.advance().is_err());
        assert!(!drill.can_give_up());
    }

    #[test]
    fn give_up_needs_two_misses() {
        let mut drill = drill();
        assert!(drill.give_up().is_err());
        drill.check("bye").unwrap();
        drill.check("by").unwrap();
        assert!(drill.can_give_up());
        assert_eq!(drill.give_up(), Ok("buy"));
        assert_eq!(drill.input(), "buy");
        assert_eq!(drill.status(), WritingStatus::GaveUp);
    }

    #[test]
    fn settled_task_takes_no_more_input() {
        let mut drill = drill();
        drill.check("buy").unwrap();
        assert!(drill.check("buy").is_err());
        assert!(drill.give_up().is_err());

        assert_eq!(drill.advance(), Ok(false));
        assert_eq!(drill.status(), WritingStatus::Idle);
        assert_eq!(drill.attempts(), 0);
        assert_eq!(drill.input(), "");
    }

    #[test]
    fn prompt_uses_past_tense_instruction_for_verbs() {
        let mut drill = drill();
        drill.check("buy").unwrap();
        drill.advance().unwrap();
        assert_eq!(
            drill.prompt_cues(CueToken(3)),
            vec![
                Cue::say("Write the past tense of", Locale::Target),
                Cue::later(
                    WRITING_PROMPT_DELAY,
                    CueToken(3),
                    Deferred::Say(Narration::new("buy", Locale::Target))
                ),
            ]
        );
    }

    #[test]
    fn empty_drill_reports_missing_task() {
        let mut drill = WritingDrill::new(Vec::new());
        assert_eq!(drill.check("x"), Err(LessonError::NoCurrentTask));
        assert!(!drill.can_give_up());
    }
}
