use super::narration::{Locale, Narration};
use super::vocab::{find_word, VocabWord};

/// One question generated from a vocabulary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizTask<'a> {
    /// German word shown, English word expected.
    TranslateToEnglish { word: &'a VocabWord },
    /// English present shown, English past expected.
    ConjugatePast {
        word: &'a VocabWord,
        past_tense: &'a str,
    },
}

impl<'a> QuizTask<'a> {
    pub fn word(&self) -> &'a VocabWord {
        match self {
            QuizTask::TranslateToEnglish { word } | QuizTask::ConjugatePast { word, .. } => *word,
        }
    }

    pub fn prompt_text(&self) -> String {
        match self {
            QuizTask::TranslateToEnglish { word } => word.german.to_string(),
            QuizTask::ConjugatePast { word, .. } => format!("Past tense of: {}", word.english),
        }
    }

    /// The word itself, without the "Past tense of" framing.
    pub fn headline(&self) -> &'a str {
        match self {
            QuizTask::TranslateToEnglish { word } => word.german,
            QuizTask::ConjugatePast { word, .. } => word.english,
        }
    }

    pub fn expected_answer(&self) -> &'a str {
        match self {
            QuizTask::TranslateToEnglish { word } => word.english,
            QuizTask::ConjugatePast { past_tense, .. } => *past_tense,
        }
    }

    pub fn narration(&self) -> Narration {
        match self {
            QuizTask::TranslateToEnglish { word } => Narration::new(word.german, Locale::Source),
            QuizTask::ConjugatePast { word, .. } => Narration::new(word.english, Locale::Target),
        }
    }

    pub fn is_conjugation(&self) -> bool {
        matches!(self, QuizTask::ConjugatePast { .. })
    }
}

/// Builds the drill tasks for a mission, keeping the order of `vocab_ids`.
///
/// Every id found in `catalog` yields a translation task, directly followed by a
/// past tense task when the word is a verb with a recorded past form.
/// Ids missing from the catalog are skipped.
pub fn generate_tasks<'a>(vocab_ids: &[&str], catalog: &'a [VocabWord]) -> Vec<QuizTask<'a>> {
    let mut tasks = Vec::with_capacity(vocab_ids.len() * 2);
    for word in vocab_ids.iter().filter_map(|id| find_word(catalog, id)) {
        tasks.push(QuizTask::TranslateToEnglish { word });
        if let Some(past_tense) = word.drilled_past_tense() {
            tasks.push(QuizTask::ConjugatePast { word, past_tense });
        }
    }
    tasks
}

/// Ids `generate_tasks` would silently drop. Meant for content checks.
pub fn unresolved_ids<'i>(vocab_ids: &[&'i str], catalog: &[VocabWord]) -> Vec<&'i str> {
    vocab_ids
        .iter()
        .copied()
        .filter(|id| find_word(catalog, id).is_none())
        .collect()
}
