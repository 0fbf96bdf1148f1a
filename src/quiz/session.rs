use std::fmt;

use super::LessonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Intro,
    Narration,
    VerbalDrill,
    WritingDrill,
    Outro,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Intro => "INTRO",
            Phase::Narration => "NARRATION",
            Phase::VerbalDrill => "VERBAL DRILL",
            Phase::WritingDrill => "WRITING DRILL",
            Phase::Outro => "OUTRO",
        };
        f.write_str(name)
    }
}

/// Completion signals the sub-flows report back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    StartRequested,
    NarrationFinished,
    VerbalDrillFinished,
    WritingDrillFinished,
}

/// Phase, mission and score of one playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    phase: Phase,
    mission_index: usize,
    mission_count: usize,
    score: u32,
}

impl SessionState {
    pub fn new(mission_count: usize) -> Self {
        Self {
            phase: Phase::Intro,
            mission_index: 0,
            mission_count,
            score: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mission_index(&self) -> usize {
        self.mission_index
    }

    pub fn mission_count(&self) -> usize {
        self.mission_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_last_mission(&self) -> bool {
        self.mission_index + 1 >= self.mission_count
    }

    /// Points are trusted as given; the drills own the scoring policy.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Applies a completion event and returns the new phase.
    /// Events that don't belong to the current phase leave the state untouched.
    pub fn apply(&mut self, event: Event) -> Result<Phase, LessonError> {
        let next = match (self.phase, event) {
            (Phase::Intro, Event::StartRequested) => Phase::Narration,
            (Phase::Narration, Event::NarrationFinished) => Phase::VerbalDrill,
            (Phase::VerbalDrill, Event::VerbalDrillFinished) => Phase::WritingDrill,
            (Phase::WritingDrill, Event::WritingDrillFinished) if self.is_last_mission() => {
                Phase::Outro
            }
            (Phase::WritingDrill, Event::WritingDrillFinished) => {
                self.mission_index += 1;
                Phase::Narration
            }
            (phase, event) => return Err(LessonError::InvalidTransition { phase, event }),
        };
        self.phase = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [Event; 4] = [
        Event::StartRequested,
        Event::NarrationFinished,
        Event::VerbalDrillFinished,
        Event::WritingDrillFinished,
    ];

    fn completion_of(phase: Phase) -> Option<Event> {
        match phase {
            Phase::Intro => Some(Event::StartRequested),
            Phase::Narration => Some(Event::NarrationFinished),
            Phase::VerbalDrill => Some(Event::VerbalDrillFinished),
            Phase::WritingDrill => Some(Event::WritingDrillFinished),
            Phase::Outro => None,
        }
    }

    #[test]
    fn walks_every_mission_then_ends() {
        let mut session = SessionState::new(2);
        let mut visited = vec![session.phase()];
        while let Some(event) = completion_of(session.phase()) {
            visited.push(session.apply(event).unwrap());
        }
        assert_eq!(
            visited,
            vec![
                Phase::Intro,
                Phase::Narration,
                Phase::VerbalDrill,
                Phase::WritingDrill,
                Phase::Narration,
                Phase::VerbalDrill,
                Phase::WritingDrill,
                Phase::Outro,
            ]
        );
        assert_eq!(session.mission_index(), 1);
    }

    #[test]
    fn only_the_matching_event_is_accepted() {
        for phase in [
            Phase::Intro,
            Phase::Narration,
            Phase::VerbalDrill,
            Phase::WritingDrill,
            Phase::Outro,
        ] {
            for event in EVENTS {
                let mut session = SessionState::new(3);
                session.phase = phase;
                let before = session.clone();
                let result = session.apply(event);
                if completion_of(phase) == Some(event) {
                    assert!(result.is_ok(), "{phase:?} should accept {event:?}");
                } else {
                    assert!(
                        matches!(result, Err(LessonError::InvalidTransition { .. })),
                        "{phase:?} should reject {event:?}"
                    );
                    assert_eq!(session, before);
                }
            }
        }
    }

    #[test]
    fn last_mission_goes_to_outro_without_moving_index() {
        let mut session = SessionState::new(4);
        session.phase = Phase::WritingDrill;
        session.mission_index = 3;
        assert_eq!(session.apply(Event::WritingDrillFinished).unwrap(), Phase::Outro);
        assert_eq!(session.mission_index(), 3);
    }

    #[test]
    fn earlier_mission_moves_on() {
        let mut session = SessionState::new(4);
        session.phase = Phase::WritingDrill;
        session.mission_index = 2;
        assert_eq!(
            session.apply(Event::WritingDrillFinished).unwrap(),
            Phase::Narration
        );
        assert_eq!(session.mission_index(), 3);
    }

    #[test]
    fn score_only_grows() {
        let mut session = SessionState::new(1);
        session.add_score(10);
        session.add_score(0);
        session.add_score(20);
        assert_eq!(session.score(), 30);
    }
}
