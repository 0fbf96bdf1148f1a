use std::time::Duration;

/// Source is the learner's German, target is the English being learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Source,
    Target,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Source => "de-DE",
            Locale::Target => "en-GB",
        }
    }

    /// Language prefix of the tag, used to pick a voice.
    pub fn language(&self) -> &'static str {
        self.tag().split('-').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    pub locale: Locale,
}

impl Narration {
    pub fn new(text: impl Into<String>, locale: Locale) -> Self {
        Self {
            text: text.into(),
            locale,
        }
    }

    pub fn english(text: impl Into<String>) -> Self {
        Self::new(text, Locale::Target)
    }
}

/// Identifies the lesson state a delayed cue was scheduled from.
/// Any later accepted action hands out a new token, making older ones stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CueToken(pub(crate) u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    Say(Narration),
    /// Move the writing drill on to its next task.
    Advance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Say(Narration),
    After {
        delay: Duration,
        token: CueToken,
        then: Deferred,
    },
}

impl Cue {
    pub fn say(text: impl Into<String>, locale: Locale) -> Self {
        Cue::Say(Narration::new(text, locale))
    }

    pub fn later(delay: Duration, token: CueToken, then: Deferred) -> Self {
        Cue::After { delay, token, then }
    }
}
