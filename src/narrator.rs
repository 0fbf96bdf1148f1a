use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use log::{debug, warn};
use teloxide::{prelude::*, types::ParseMode, utils::html};
use tokio::task::JoinHandle;

use crate::quiz::{Locale, Narration};

/// Flag standing in for the voice, chosen by the locale's language prefix.
pub fn voice_for(locale: Locale) -> &'static str {
    match locale.language() {
        "de" => "🇩🇪",
        "en" => "🇬🇧",
        _ => "🔊",
    }
}

pub fn render(narration: &Narration) -> String {
    format!(
        "🔊{} <i>{}</i>",
        voice_for(narration.locale),
        html::escape(&narration.text)
    )
}

/// Speaks to a chat. One utterance at a time: speaking cancels whatever
/// delayed narration is still waiting for that chat.
pub struct Narrator {
    bot: Bot,
    pending: Mutex<HashMap<ChatId, (u64, JoinHandle<()>)>>,
    tickets: AtomicU64,
}

impl Narrator {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            pending: Mutex::new(HashMap::new()),
            tickets: AtomicU64::new(0),
        }
    }

    pub async fn speak(&self, chat: ChatId, narration: &Narration) {
        self.cancel_pending(chat);
        self.deliver(chat, narration).await;
    }

    /// Sends without touching pending narration; used by the delayed task itself.
    pub async fn deliver(&self, chat: ChatId, narration: &Narration) {
        debug!("[{}] {} {:?}", chat, narration.locale.tag(), narration.text);
        let sent = self
            .bot
            .send_message(chat, render(narration))
            .parse_mode(ParseMode::Html)
            .await;
        if let Err(err) = sent {
            warn!("Could not narrate to chat {}: {}", chat, err);
        }
    }

    /// Ticket identifying one delayed narration, handed to `hold` and `release`.
    pub fn ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::Relaxed)
    }

    /// Remembers a delayed narration so the next `speak` can cancel it.
    pub fn hold(&self, chat: ChatId, ticket: u64, handle: JoinHandle<()>) {
        let Ok(mut pending) = self.pending.lock() else {
            return;
        };
        if let Some((_, previous)) = pending.remove(&chat) {
            previous.abort();
        }
        if !handle.is_finished() {
            pending.insert(chat, (ticket, handle));
        }
    }

    /// Forgets a delayed narration once it has run, unless a newer one took its place.
    pub fn release(&self, chat: ChatId, ticket: u64) {
        let Ok(mut pending) = self.pending.lock() else {
            return;
        };
        if pending.get(&chat).is_some_and(|(held, _)| *held == ticket) {
            pending.remove(&chat);
        }
    }

    fn cancel_pending(&self, chat: ChatId) {
        let Ok(mut pending) = self.pending.lock() else {
            return;
        };
        if let Some((_, handle)) = pending.remove(&chat) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_holding(narrator: &Narrator, chat: ChatId) -> bool {
        narrator.pending.lock().unwrap().contains_key(&chat)
    }

    #[test]
    fn narration_is_tagged_by_language() {
        assert_eq!(
            render(&Narration::new("kaufen", Locale::Source)),
            "🔊🇩🇪 <i>kaufen</i>"
        );
        assert_eq!(
            render(&Narration::new("fish & chips", Locale::Target)),
            "🔊🇬🇧 <i>fish &amp; chips</i>"
        );
    }

    #[tokio::test]
    async fn fired_narration_is_forgotten() {
        let narrator = Narrator::new(Bot::new("0:test"));
        let chat = ChatId(7);

        let first = narrator.ticket();
        narrator.hold(chat, first, tokio::spawn(std::future::pending::<()>()));
        assert!(is_holding(&narrator, chat));

        let second = narrator.ticket();
        narrator.hold(chat, second, tokio::spawn(std::future::pending::<()>()));
        // the first one was replaced, releasing it leaves the second alone
        narrator.release(chat, first);
        assert!(is_holding(&narrator, chat));

        narrator.release(chat, second);
        assert!(!is_holding(&narrator, chat));
        assert!(narrator.pending.lock().unwrap().is_empty());
    }
}
