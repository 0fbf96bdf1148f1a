use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Verb,
    Noun,
    Phrase,
    Adjective,
    Preposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabWord {
    pub id: &'static str,
    pub english: &'static str,
    pub german: &'static str,
    pub part_of_speech: PartOfSpeech,
    // Only set for verbs whose past tense gets drilled
    pub past_tense: Option<&'static str>,
}

impl VocabWord {
    const fn new(
        id: &'static str,
        english: &'static str,
        german: &'static str,
        part_of_speech: PartOfSpeech,
    ) -> Self {
        Self {
            id,
            english,
            german,
            part_of_speech,
            past_tense: None,
        }
    }

    const fn verb(
        id: &'static str,
        english: &'static str,
        german: &'static str,
        past_tense: &'static str,
    ) -> Self {
        Self {
            id,
            english,
            german,
            part_of_speech: PartOfSpeech::Verb,
            past_tense: Some(past_tense),
        }
    }

    /// The past tense form, but only when the word is actually a verb.
    pub fn drilled_past_tense(&self) -> Option<&'static str> {
        match self.part_of_speech {
            PartOfSpeech::Verb => self.past_tense,
            _ => None,
        }
    }
}

pub fn find_word<'a>(catalog: &'a [VocabWord], id: &str) -> Option<&'a VocabWord> {
    catalog.iter().find(|w| w.id == id)
}

/// Ids that occur more than once in the catalog, in order of their second appearance.
pub fn duplicate_ids(catalog: &[VocabWord]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .filter(|w| !seen.insert(w.id))
        .map(|w| w.id)
        .collect()
}

use PartOfSpeech::*;

pub static VOCABULARY: &[VocabWord] = &[
    // Unit 3-4
    VocabWord::new("do_exercises", "do exercises", "Übungen machen", Verb),
    VocabWord::verb("shout", "shout", "rufen/schreien", "shouted"),
    VocabWord::new("somebody", "somebody", "jemand", Noun),
    VocabWord::new("these_people", "these people", "diese Menschen", Noun),
    VocabWord::new("special", "special", "besonderer/e/s", Adjective),
    // Irregular verbs
    VocabWord::verb("find_out", "find out", "herausfinden", "found out"),
    VocabWord::verb("ring", "ring", "läuten/klingeln", "rang"),
    VocabWord::verb("sleep", "sleep", "schlafen", "slept"),
    VocabWord::verb("stand", "stand", "stehen", "stood"),
    VocabWord::verb("take", "take", "nehmen", "took"),
    VocabWord::verb("tell", "tell", "erzählen", "told"),
    VocabWord::verb("win", "win", "gewinnen", "won"),
    VocabWord::verb("eat", "eat", "essen", "ate"),
    VocabWord::verb("buy", "buy", "kaufen", "bought"),
    VocabWord::verb("go", "go", "gehen", "went"),
    VocabWord::verb("say", "say", "sagen", "said"),
    VocabWord::verb("run", "run", "rennen", "ran"),
    VocabWord::verb("put", "put", "legen/stellen", "put"),
    VocabWord::verb("sing", "sing", "singen", "sang"),
    // What's wrong with...?
    VocabWord::new("ill", "ill", "krank", Adjective),
    VocabWord::new("skive", "skive", "schwänzen (Schule)", Verb),
    VocabWord::new("maybe", "maybe", "vielleicht", Adjective),
    VocabWord::new("headache", "headache", "Kopfschmerzen", Noun),
    VocabWord::new("worried", "worried", "besorgt", Adjective),
    VocabWord::new("sore_throat", "sore throat", "Halsschmerzen", Noun),
    VocabWord::new("temperature", "temperature", "Fieber/Temperatur", Noun),
    VocabWord::new("doctor", "doctor", "Arzt", Noun),
    // Orientation
    VocabWord::new("do_better", "do better", "besser abschneiden", Verb),
    VocabWord::new("way", "way", "Weg", Noun),
    VocabWord::new("excuse_me", "excuse me", "Entschuldigung", Phrase),
    VocabWord::new("cross", "cross", "überqueren", Verb),
    VocabWord::new("turn_right", "turn right", "rechts abbiegen", Phrase),
    VocabWord::new("turn_left", "turn left", "links abbiegen", Phrase),
    VocabWord::new("along", "along", "entlang", Preposition),
    VocabWord::new("past", "past", "vorbei (an)", Preposition),
    VocabWord::new("bank", "bank", "Bank (Geldinstitut)", Noun),
    VocabWord::new("traffic_lights", "traffic lights", "Ampel", Noun),
    VocabWord::new("map", "map", "Karte", Noun),
    VocabWord::new("supermarket", "supermarket", "Supermarkt", Noun),
    VocabWord::new("post_office", "post office", "Postamt", Noun),
    VocabWord::new("neighbourhood", "neighbourhood", "Nachbarschaft/Viertel", Noun),
    VocabWord::new("hairdresser", "hairdresser", "Friseur", Noun),
    // Food & feelings
    VocabWord::new("hungry", "hungry", "hungrig", Adjective),
    VocabWord::new("salad", "salad", "Salat", Noun),
    VocabWord::new("meat", "meat", "Fleisch", Noun),
    VocabWord::new("cake", "cake", "Kuchen", Noun),
    VocabWord::new("bonfire", "bonfire", "Feuer/Freudenfeuer", Noun),
    VocabWord::verb("celebrate", "celebrate", "feiern", "celebrated"),
    VocabWord::new("potato", "potato", "Kartoffel", Noun),
    VocabWord::new("crisps", "crisps", "Chips", Noun),
    VocabWord::verb("feel", "feel", "fühlen", "felt"),
    VocabWord::new("wait", "wait", "warten", Verb),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        assert!(duplicate_ids(VOCABULARY).is_empty());
    }

    #[test]
    fn catalog_entries_are_filled_in() {
        for word in VOCABULARY {
            assert!(!word.english.trim().is_empty(), "{} has no english", word.id);
            assert!(!word.german.trim().is_empty(), "{} has no german", word.id);
            if word.past_tense.is_some() {
                assert_eq!(word.part_of_speech, Verb, "{} is not a verb", word.id);
            }
        }
    }

    #[test]
    fn duplicates_are_reported() {
        let catalog = [
            VocabWord::new("a", "a", "a", Noun),
            VocabWord::new("b", "b", "b", Noun),
            VocabWord::new("a", "again", "nochmal", Noun),
        ];
        assert_eq!(duplicate_ids(&catalog), vec!["a"]);
    }

    #[test]
    fn past_tense_is_ignored_for_non_verbs() {
        let odd = VocabWord {
            past_tense: Some("ghosted"),
            ..VocabWord::new("ghost", "ghost", "Geist", Noun)
        };
        assert_eq!(odd.drilled_past_tense(), None);
        assert_eq!(
            find_word(VOCABULARY, "buy").and_then(|w| w.drilled_past_tense()),
            Some("bought")
        );
        assert!(find_word(VOCABULARY, "drink").is_none());
    }
}
