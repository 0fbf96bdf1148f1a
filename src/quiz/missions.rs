use super::tasks::unresolved_ids;
use super::vocab::{duplicate_ids, VocabWord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mission {
    pub title: &'static str,
    pub theme: &'static str,
    pub vocab_ids: &'static [&'static str],
    pub narration_lines: &'static [&'static str],
}

impl Mission {
    /// Emoji shown on the narration slides, picked from the theme.
    pub fn badge(&self) -> &'static str {
        if self.theme.contains("Food") {
            "🍔"
        } else if self.theme.contains("Health") {
            "🤒"
        } else if self.theme.contains("Drill") {
            "🎤"
        } else {
            "🗺️"
        }
    }
}

/// Everything a playthrough reads from: the word list and the ordered missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curriculum {
    pub words: &'static [VocabWord],
    pub missions: &'static [Mission],
}

impl Curriculum {
    pub fn mission(&self, index: usize) -> Option<&'static Mission> {
        self.missions.get(index)
    }

    /// Authoring mistakes the drills would otherwise paper over.
    pub fn content_problems(&self) -> Vec<String> {
        let mut problems: Vec<String> = duplicate_ids(self.words)
            .into_iter()
            .map(|id| format!("word id {id:?} is used more than once"))
            .collect();
        for mission in self.missions {
            for id in unresolved_ids(mission.vocab_ids, self.words) {
                problems.push(format!("{}: unknown word id {id:?}", mission.title));
            }
            if mission.narration_lines.is_empty() {
                problems.push(format!("{}: no narration lines", mission.title));
            }
        }
        problems
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self {
            words: super::vocab::VOCABULARY,
            missions: MISSIONS,
        }
    }
}

pub static MISSIONS: &[Mission] = &[
    Mission {
        title: "Mission 1: Lost in the City",
        theme: "Orientation & Places",
        vocab_ids: &[
            "way",
            "map",
            "turn_left",
            "turn_right",
            "traffic_lights",
            "cross",
            "post_office",
            "hairdresser",
            "supermarket",
            "past",
            "excuse_me",
        ],
        narration_lines: &[
            "Hi! I am Alex. I am in London, but I am lost.",
            "I have a map, but it is confusing.",
            "Excuse me, can you help me find the way?",
            "We need to go to the post office.",
            "Look at the traffic lights. We must cross the street.",
            "Then turn left and go past the hairdresser.",
        ],
    },
    Mission {
        title: "Mission 2: The Hungry Traveller",
        theme: "Food & Past Tense (Irregular)",
        // "drink" is not in the word list yet and gets skipped
        vocab_ids: &[
            "hungry", "eat", "buy", "meat", "salad", "cake", "potato", "crisps", "drink",
        ],
        narration_lines: &[
            "Walking makes me hungry.",
            "Yesterday I bought a lot of crisps.",
            "But today I want a salad and some meat.",
            "Yesterday I ate chocolate cake.",
            "It was delicious, but not healthy.",
            "Let's eat something good now!",
        ],
    },
    Mission {
        title: "Mission 3: What's wrong with Ben?",
        theme: "Health & Feelings",
        vocab_ids: &[
            "ill",
            "headache",
            "sore_throat",
            "temperature",
            "doctor",
            "worried",
            "feel",
            "maybe",
            "shout",
        ],
        narration_lines: &[
            "Oh look, there is my friend Ben.",
            "He looks ill. I am worried.",
            "Maybe he has a headache?",
            "He says he has a sore throat and a temperature.",
            "He feels hot. We must find a doctor.",
            "Don't shout, his head hurts!",
        ],
    },
    Mission {
        title: "Mission 4: The Past Tense Champion",
        theme: "Irregular Verbs Drill",
        vocab_ids: &[
            "find_out", "ring", "sleep", "stand", "take", "tell", "win", "go", "say", "run",
            "sing",
        ],
        narration_lines: &[
            "We found the doctor and Ben is okay.",
            "Now let's tell stories about yesterday.",
            "Yesterday I ran to the park.",
            "I sang a song and I won a game.",
            "I stood on a chair and rang a bell.",
            "Then I went home and slept.",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mission_has_narration() {
        for mission in MISSIONS {
            assert!(!mission.narration_lines.is_empty(), "{}", mission.title);
            assert!(!mission.vocab_ids.is_empty(), "{}", mission.title);
        }
    }

    #[test]
    fn only_the_known_gap_is_unresolved() {
        let curriculum = Curriculum::default();
        let missing: Vec<_> = curriculum
            .missions
            .iter()
            .flat_map(|m| unresolved_ids(m.vocab_ids, curriculum.words))
            .collect();
        assert_eq!(missing, vec!["drink"]);
        assert_eq!(
            curriculum.content_problems(),
            vec![r#"Mission 2: The Hungry Traveller: unknown word id "drink""#.to_string()]
        );
    }

    #[test]
    fn badge_follows_theme() {
        let badges: Vec<_> = MISSIONS.iter().map(|m| m.badge()).collect();
        assert_eq!(badges, vec!["🗺️", "🍔", "🤒", "🎤"]);
    }
}
