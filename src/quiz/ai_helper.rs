use chatgpt::prelude::*;
use chatgpt::types::CompletionResponse;
use log::{debug, warn};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::quiz::vocab::VocabWord;

const ENCOURAGEMENTS: [&str; 4] = [
    "Great effort!",
    "Nice try, keep going!",
    "Well done for writing a whole sentence!",
    "You're getting better every time!",
];

/// Verdict on a sentence the learner wrote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceCheck {
    pub is_correct: bool,
    pub feedback: String,
}

/// Optional ChatGPT helper. Without an API key every call answers locally,
/// and remote failures never reach the caller.
pub struct AnswerAssistant {
    chat_gpt: Option<ChatGPT>,
}

impl AnswerAssistant {
    pub fn new(chat_gpt: Option<ChatGPT>) -> Self {
        Self { chat_gpt }
    }

    pub fn is_available(&self) -> bool {
        self.chat_gpt.is_some()
    }

    async fn ask(chat_gpt: &ChatGPT, prompt: &str) -> Result<String> {
        let response: CompletionResponse = chat_gpt.send_message(prompt).await?;
        let content = response.message().clone().content;

        debug!("Completion: {:?}", content);

        Ok(content.trim().to_string())
    }

    /// A short example sentence using the word, if ChatGPT is around to write one.
    pub async fn generate_practice_sentence(&self, word: &VocabWord) -> Option<String> {
        let chat_gpt = self.chat_gpt.as_ref()?;
        debug!("Generating practice sentence for: {:?}", word.english);

        let prompt = format!(
            "Create a very simple, short English sentence for a 12-year-old student using the word \"{}\".
            The context should be about travel in London or feeling sick or eating food.
            Do not translate it. Just return the English sentence.",
            word.english
        );

        match Self::ask(chat_gpt, &prompt).await {
            Ok(sentence) if !sentence.is_empty() => Some(sentence),
            Ok(_) => None,
            Err(err) => {
                warn!("Practice sentence for {:?} failed: {}", word.id, err);
                None
            }
        }
    }

    pub async fn grammar_hint(&self, present: &str, past: &str) -> String {
        let Some(chat_gpt) = self.chat_gpt.as_ref() else {
            return format!("Magic Hint: {present} changes to {past} in the past!");
        };

        let prompt = format!(
            "Explain to a 12-year-old why '{present}' becomes '{past}' in the past tense. Keep it under 20 words. Be fun and encouraging."
        );

        match Self::ask(chat_gpt, &prompt).await {
            Ok(hint) if !hint.is_empty() => hint,
            Ok(_) => format!("Remember: Yesterday I {past}!"),
            Err(err) => {
                warn!("Grammar hint for {:?} failed: {}", present, err);
                format!("Remember: Yesterday I {past}!")
            }
        }
    }

    /// Does `sentence` use `target_word` (and, with ChatGPT, is it good English)?
    pub async fn check_sentence(&self, sentence: &str, target_word: &str) -> SentenceCheck {
        let Some(chat_gpt) = self.chat_gpt.as_ref() else {
            return local_sentence_check(sentence, target_word);
        };

        let prompt = format!(
            "Check if this sentence is correct English and uses the word \"{target_word}\": \"{sentence}\".
            Return JSON {{ \"isCorrect\": boolean, \"feedback\": string }}. Feedback should be for a child."
        );

        let reply = match Self::ask(chat_gpt, &prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("Sentence check failed, going easy on the learner: {}", err);
                return encouragement();
            }
        };

        parse_sentence_check(&reply).unwrap_or_else(|| {
            warn!("Sentence check reply was not the JSON we asked for: {:?}", reply);
            encouragement()
        })
    }
}

/// Plain substring check used when ChatGPT isn't configured.
pub fn local_sentence_check(sentence: &str, target_word: &str) -> SentenceCheck {
    let is_correct = sentence
        .to_lowercase()
        .contains(&target_word.to_lowercase());
    let feedback = if is_correct {
        "Good job!".to_string()
    } else {
        format!("Try to use '{target_word}' in your sentence.")
    };
    SentenceCheck {
        is_correct,
        feedback,
    }
}

/// Reads the `{ "isCorrect": .., "feedback": .. }` object out of a reply,
/// tolerating a markdown code fence around it.
pub fn parse_sentence_check(reply: &str) -> Option<SentenceCheck> {
    let body = reply.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(body);
    serde_json::from_str(body.trim()).ok()
}

fn encouragement() -> SentenceCheck {
    let feedback = ENCOURAGEMENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Great effort!");
    SentenceCheck {
        is_correct: true,
        feedback: feedback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::vocab::{find_word, VOCABULARY};

    #[tokio::test]
    async fn offline_check_looks_for_the_word() {
        let assistant = AnswerAssistant::new(None);
        assert!(!assistant.is_available());

        let hit = assistant.check_sentence("I bought apples", "bought").await;
        assert_eq!(
            hit,
            SentenceCheck {
                is_correct: true,
                feedback: "Good job!".to_string()
            }
        );

        let miss = assistant.check_sentence("I got apples", "bought").await;
        assert!(!miss.is_correct);
        assert_eq!(miss.feedback, "Try to use 'bought' in your sentence.");
    }

    #[tokio::test]
    async fn offline_check_ignores_case() {
        let assistant = AnswerAssistant::new(None);
        assert!(assistant.check_sentence("YESTERDAY I SANG", "sang").await.is_correct);
    }

    #[tokio::test]
    async fn offline_hint_and_sentence() {
        let assistant = AnswerAssistant::new(None);
        assert_eq!(
            assistant.grammar_hint("buy", "bought").await,
            "Magic Hint: buy changes to bought in the past!"
        );
        let word = find_word(VOCABULARY, "eat").unwrap();
        assert_eq!(assistant.generate_practice_sentence(word).await, None);
    }

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain = parse_sentence_check(r#"{"isCorrect": false, "feedback": "Use 'went'."}"#);
        assert_eq!(
            plain,
            Some(SentenceCheck {
                is_correct: false,
                feedback: "Use 'went'.".to_string()
            })
        );

        let fenced = parse_sentence_check(
            "```json\n{ \"isCorrect\": true, \"feedback\": \"Super!\" }\n```",
        );
        assert_eq!(fenced.map(|c| c.is_correct), Some(true));
    }

    #[test]
    fn malformed_reply_is_rejected() {
        assert_eq!(parse_sentence_check("Looks great to me!"), None);
        assert_eq!(parse_sentence_check(r#"{"isCorrect": "yes"}"#), None);
    }

    #[test]
    fn encouragement_is_always_a_pass() {
        let check = encouragement();
        assert!(check.is_correct);
        assert!(ENCOURAGEMENTS.contains(&check.feedback.as_str()));
    }
}
