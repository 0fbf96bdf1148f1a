use log::info;
use rand::seq::SliceRandom;

use super::missions::{Curriculum, Mission};
use super::narration::{Cue, CueToken, Deferred, Locale};
use super::session::{Event, Phase, SessionState};
use super::tasks::generate_tasks;
use super::verbal::VerbalDrill;
use super::vocab::{find_word, VocabWord};
use super::writing::{
    CheckOutcome, WritingDrill, CORRECT_ADVANCE_DELAY, GIVE_UP_ADVANCE_DELAY,
};
use super::LessonError;

pub const INTRO_SPEECH: &str = "Hi! I'm Alex. Welcome to Mission Lost in London. We will watch videos, speak, and write. Are you ready?";
pub const START_SPEECH: &str = "Let's go!";
pub const OUTRO_SPEECH: &str = "Mission Complete! You are a master of London. Fantastic work!";

/// Sub-flow data for the phase the session is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Intro,
    Narration { slide: usize },
    Verbal(VerbalDrill<'static>),
    Writing(WritingDrill<'static>),
    Outro { challenge: Option<&'static VocabWord> },
}

/// One playthrough: the session state machine plus the active drill.
///
/// Every method that the learner (or a timer) triggers returns the narration
/// cues to play. Cues scheduled for later carry a [`CueToken`]; any accepted
/// action afterwards makes that token stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    curriculum: Curriculum,
    session: SessionState,
    stage: Stage,
    epoch: u64,
}

impl Lesson {
    pub fn new(curriculum: Curriculum) -> Self {
        Self {
            curriculum,
            session: SessionState::new(curriculum.missions.len()),
            stage: Stage::Intro,
            epoch: 0,
        }
    }

    pub fn welcome(&self) -> Vec<Cue> {
        vec![Cue::say(INTRO_SPEECH, Locale::Target)]
    }

    /// Throws the whole playthrough away and starts over at the intro.
    /// The epoch carries over so cues from the old playthrough stay stale.
    pub fn restart(&mut self) -> Vec<Cue> {
        let epoch = self.epoch;
        *self = Lesson::new(self.curriculum);
        self.epoch = epoch;
        self.next_token();
        self.welcome()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn mission(&self) -> Option<&'static Mission> {
        self.curriculum.mission(self.session.mission_index())
    }

    pub fn verbal(&self) -> Option<&VerbalDrill<'static>> {
        match &self.stage {
            Stage::Verbal(drill) => Some(drill),
            _ => None,
        }
    }

    pub fn writing(&self) -> Option<&WritingDrill<'static>> {
        match &self.stage {
            Stage::Writing(drill) => Some(drill),
            _ => None,
        }
    }

    /// Current narration slide as (index, line).
    pub fn slide(&self) -> Option<(usize, &'static str)> {
        match self.stage {
            Stage::Narration { slide } => self
                .mission()
                .and_then(|m| m.narration_lines.get(slide))
                .map(|line| (slide, *line)),
            _ => None,
        }
    }

    /// Word the outro sentence challenge asks about.
    pub fn challenge(&self) -> Option<&'static VocabWord> {
        match self.stage {
            Stage::Outro { challenge } => challenge,
            _ => None,
        }
    }

    pub fn is_current(&self, token: CueToken) -> bool {
        token.0 == self.epoch
    }

    fn next_token(&mut self) -> CueToken {
        self.epoch += 1;
        CueToken(self.epoch)
    }

    pub fn start(&mut self) -> Result<Vec<Cue>, LessonError> {
        let phase = self.session.apply(Event::StartRequested)?;
        let mut cues = vec![Cue::say(START_SPEECH, Locale::Target)];
        cues.extend(self.enter(phase));
        Ok(cues)
    }

    pub fn next_slide(&mut self) -> Result<Vec<Cue>, LessonError> {
        let Stage::Narration { slide } = self.stage else {
            return Err(self.wrong_phase("turn the slide"));
        };
        let lines = self.mission().map_or(0, |m| m.narration_lines.len());
        if slide + 1 < lines {
            self.stage = Stage::Narration { slide: slide + 1 };
            self.next_token();
            Ok(self.slide_cues())
        } else {
            self.finish(Event::NarrationFinished)
        }
    }

    pub fn repeat_slide(&mut self) -> Result<Vec<Cue>, LessonError> {
        if !matches!(self.stage, Stage::Narration { .. }) {
            return Err(self.wrong_phase("repeat the slide"));
        }
        self.next_token();
        Ok(self.slide_cues())
    }

    pub fn reveal(&mut self) -> Result<Vec<Cue>, LessonError> {
        let cue = self.verbal_mut("show the answer")?.reveal()?;
        self.next_token();
        Ok(vec![cue])
    }

    /// The learner says whether they got the spoken answer right.
    pub fn self_report(&mut self, success: bool) -> Result<Vec<Cue>, LessonError> {
        let report = self.verbal_mut("grade yourself")?.report(success)?;
        self.session.add_score(report.points);
        if report.finished {
            return self.finish(Event::VerbalDrillFinished);
        }
        let token = self.next_token();
        Ok(self.verbal_mut("grade yourself")?.prompt_cues(token))
    }

    pub fn check(&mut self, answer: &str) -> Result<Vec<Cue>, LessonError> {
        let outcome = self.writing_mut("check an answer")?.check(answer)?;
        let token = self.next_token();
        match outcome {
            CheckOutcome::Correct { points } => {
                self.session.add_score(points);
                Ok(vec![
                    Cue::say("Correct!", Locale::Target),
                    Cue::later(CORRECT_ADVANCE_DELAY, token, Deferred::Advance),
                ])
            }
            CheckOutcome::Wrong { .. } => Ok(vec![Cue::say("Try again.", Locale::Target)]),
        }
    }

    pub fn give_up(&mut self) -> Result<Vec<Cue>, LessonError> {
        let answer = self.writing_mut("show the answer")?.give_up()?;
        let token = self.next_token();
        Ok(vec![
            Cue::say(format!("The answer is {answer}"), Locale::Target),
            Cue::later(GIVE_UP_ADVANCE_DELAY, token, Deferred::Advance),
        ])
    }

    /// Runs a scheduled [`Deferred::Advance`].
    pub fn advance(&mut self, token: CueToken) -> Result<Vec<Cue>, LessonError> {
        if !self.is_current(token) {
            return Err(LessonError::StaleCue);
        }
        let finished = self.writing_mut("move on")?.advance()?;
        if finished {
            return self.finish(Event::WritingDrillFinished);
        }
        let token = self.next_token();
        Ok(self.writing_mut("move on")?.prompt_cues(token))
    }

    fn finish(&mut self, event: Event) -> Result<Vec<Cue>, LessonError> {
        let phase = self.session.apply(event)?;
        Ok(self.enter(phase))
    }

    fn enter(&mut self, phase: Phase) -> Vec<Cue> {
        let token = self.next_token();
        let mission = self.mission();
        info!(
            "Entering {} (mission {}/{}, score {})",
            phase,
            self.session.mission_index() + 1,
            self.session.mission_count(),
            self.session.score()
        );
        let vocab_ids = mission.map_or(&[][..], |m| m.vocab_ids);

        match phase {
            Phase::Intro => {
                self.stage = Stage::Intro;
                self.welcome()
            }
            Phase::Narration => {
                self.stage = Stage::Narration { slide: 0 };
                self.slide_cues()
            }
            Phase::VerbalDrill => {
                let drill = VerbalDrill::new(generate_tasks(vocab_ids, self.curriculum.words));
                let cues = drill.prompt_cues(token);
                self.stage = Stage::Verbal(drill);
                cues
            }
            Phase::WritingDrill => {
                let drill = WritingDrill::new(generate_tasks(vocab_ids, self.curriculum.words));
                let cues = drill.prompt_cues(token);
                self.stage = Stage::Writing(drill);
                cues
            }
            Phase::Outro => {
                self.stage = Stage::Outro {
                    challenge: self.pick_challenge(),
                };
                vec![Cue::say(OUTRO_SPEECH, Locale::Target)]
            }
        }
    }

    fn slide_cues(&self) -> Vec<Cue> {
        self.slide()
            .map(|(_, line)| vec![Cue::say(line, Locale::Target)])
            .unwrap_or_default()
    }

    /// A random past tense verb from anywhere in the curriculum.
    fn pick_challenge(&self) -> Option<&'static VocabWord> {
        let words = self.curriculum.words;
        let verbs: Vec<&'static VocabWord> = self
            .curriculum
            .missions
            .iter()
            .flat_map(|m| m.vocab_ids.iter())
            .filter_map(|id| find_word(words, id))
            .filter(|w| w.drilled_past_tense().is_some())
            .collect();
        verbs.choose(&mut rand::thread_rng()).copied()
    }

    fn wrong_phase(&self, action: &'static str) -> LessonError {
        LessonError::WrongPhase {
            action,
            phase: self.phase(),
        }
    }

    fn verbal_mut(&mut self, action: &'static str) -> Result<&mut VerbalDrill<'static>, LessonError> {
        let phase = self.phase();
        match &mut self.stage {
            Stage::Verbal(drill) => Ok(drill),
            _ => Err(LessonError::WrongPhase { action, phase }),
        }
    }

    fn writing_mut(&mut self, action: &'static str) -> Result<&mut WritingDrill<'static>, LessonError> {
        let phase = self.phase();
        match &mut self.stage {
            Stage::Writing(drill) => Ok(drill),
            _ => Err(LessonError::WrongPhase { action, phase }),
        }
    }
}
