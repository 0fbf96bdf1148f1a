pub mod ai_helper;
pub mod lesson;
pub mod missions;
pub mod narration;
pub mod session;
pub mod tasks;
pub mod verbal;
pub mod vocab;
pub mod writing;

pub use lesson::Lesson;
pub use missions::Curriculum;
pub use narration::{Cue, CueToken, Deferred, Locale, Narration};
pub use session::{Event, Phase};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LessonError {
    #[error("{event:?} can't happen during {phase}")]
    InvalidTransition { phase: Phase, event: Event },
    #[error("can't {action} during {phase}")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("{0}")]
    NotAvailable(&'static str),
    #[error("this mission has no words to practise")]
    NoCurrentTask,
    #[error("the scheduled cue is out of date")]
    StaleCue,
}
