mod config;
mod narrator;
mod quiz;
mod screens;

use std::{sync::Arc, time::Duration};

use dotenv::dotenv;
use log::{debug, info, warn};
use narrator::Narrator;
use quiz::{
    ai_helper::AnswerAssistant, writing::WritingStatus, writing::GIVE_UP_AFTER, Cue, CueToken,
    Curriculum, Deferred, Lesson, Phase,
};
use teloxide::{
    dispatching::dialogue::{InMemStorage, InMemStorageError},
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
    utils::html,
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Debug, Default)]
pub enum State {
    #[default]
    Start,
    Playing {
        lesson: Lesson,
    },
}

#[tokio::main]
async fn main() {
    // A .env file is optional, the variables may come from the environment
    dotenv().ok();

    pretty_env_logger::init();
    log::info!("Starting mission bot...");

    let config = config::Config::from_env();
    let curriculum = Curriculum::default();
    for problem in curriculum.content_problems() {
        warn!("Content: {}", problem);
    }

    let bot = Bot::from_env();
    let assistant = Arc::new(AnswerAssistant::new(config.chat_gpt()));
    info!("Answer assistant online: {}", assistant.is_available());
    let narrator = Arc::new(Narrator::new(bot.clone()));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Playing { lesson }].endpoint(play)),
    )
    .dependencies(dptree::deps![
        InMemStorage::<State>::new(),
        assistant,
        narrator,
        curriculum
    ])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

/// Everything a delayed cue needs to reach its chat again.
#[derive(Clone)]
struct Room {
    bot: Bot,
    dialogue: QuizDialogue,
    narrator: Arc<Narrator>,
}

impl Room {
    fn chat(&self) -> ChatId {
        self.dialogue.chat_id()
    }
}

async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    narrator: Arc<Narrator>,
    curriculum: Curriculum,
) -> HandlerResult {
    let lesson = Lesson::new(curriculum);
    info!("New playthrough in chat {}", dialogue.chat_id());

    dialogue
        .update(State::Playing {
            lesson: lesson.clone(),
        })
        .await?;

    let room = Room {
        bot,
        dialogue,
        narrator,
    };
    perform(&room, lesson.welcome()).await;
    show(&room.bot, room.chat(), &lesson).await
}

async fn play(
    bot: Bot,
    dialogue: QuizDialogue,
    lesson: Lesson,
    msg: Message,
    narrator: Arc<Narrator>,
    assistant: Arc<AnswerAssistant>,
) -> HandlerResult {
    let room = Room {
        bot,
        dialogue,
        narrator,
    };
    let Some(text) = msg.text() else {
        room
            .bot
            .send_message(msg.chat.id, "Please answer with text ✍️")
            .await?;
        return Ok(());
    };

    let mut lesson = lesson;
    let step = match (lesson.phase(), text) {
        (_, "/start") | (Phase::Outro, screens::PLAY_AGAIN) => Ok(lesson.restart()),
        (_, "/score") => {
            let score = format!("⭐ Your score: {}", lesson.session().score());
            room.bot.send_message(msg.chat.id, score).await?;
            return Ok(());
        }
        (Phase::Intro, screens::START_MISSION) => lesson.start(),
        (Phase::Narration, screens::NEXT_SLIDE | screens::FINISH_VIDEO) => lesson.next_slide(),
        (Phase::Narration, screens::REPEAT) => lesson.repeat_slide(),
        (Phase::VerbalDrill, screens::SHOW_ANSWER) => lesson.reveal(),
        (Phase::VerbalDrill, screens::SAID_IT) => lesson.self_report(true),
        (Phase::VerbalDrill, screens::WAS_WRONG) => lesson.self_report(false),
        (Phase::WritingDrill, screens::GIVE_UP) => lesson.give_up(),
        (Phase::WritingDrill, answer) => lesson.check(answer),
        (Phase::Outro, sentence) => {
            return sentence_challenge(&room, &lesson, sentence, &assistant).await;
        }
        _ => {
            room
                .bot
                .send_message(msg.chat.id, "Please use the buttons below 👇")
                .await?;
            return show(&room.bot, msg.chat.id, &lesson).await;
        }
    };

    let cues = match step {
        Ok(cues) => cues,
        Err(err) => {
            debug!("Chat {} tried something out of turn: {}", msg.chat.id, err);
            room
                .bot
                .send_message(msg.chat.id, format!("🤔 {err}"))
                .await?;
            return show(&room.bot, msg.chat.id, &lesson).await;
        }
    };

    // Stored before any cue is scheduled, so timers see this state
    room
        .dialogue
        .update(State::Playing {
            lesson: lesson.clone(),
        })
        .await?;

    perform(&room, cues).await;
    show(&room.bot, msg.chat.id, &lesson).await?;
    assist(&room, &lesson, text, &assistant).await
}

/// Extra help from the assistant once the step itself is on screen.
async fn assist(
    room: &Room,
    lesson: &Lesson,
    text: &str,
    assistant: &AnswerAssistant,
) -> HandlerResult {
    if text == screens::SHOW_ANSWER {
        let Some(task) = lesson.verbal().and_then(|d| d.current()) else {
            return Ok(());
        };
        if let Some(sentence) = assistant.generate_practice_sentence(task.word()).await {
            room
                .bot
                .send_message(room.chat(), format!("💬 <i>{}</i>", html::escape(&sentence)))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        return Ok(());
    }

    let Some(drill) = lesson.writing() else {
        return Ok(());
    };
    let Some(task) = drill.current() else {
        return Ok(());
    };
    if drill.status() == WritingStatus::Wrong
        && drill.attempts() == GIVE_UP_AFTER
        && task.is_conjugation()
    {
        let hint = assistant
            .grammar_hint(task.word().english, task.expected_answer())
            .await;
        room
            .bot
            .send_message(room.chat(), format!("💡 {}", html::escape(&hint)))
            .parse_mode(ParseMode::Html)
            .await?;
    }
    Ok(())
}

async fn sentence_challenge(
    room: &Room,
    lesson: &Lesson,
    sentence: &str,
    assistant: &AnswerAssistant,
) -> HandlerResult {
    let Some(target) = lesson.challenge().and_then(|w| w.drilled_past_tense()) else {
        return show(&room.bot, room.chat(), lesson).await;
    };

    // Only cosmetic, so a failure here doesn't matter
    let _ = room
        .bot
        .send_chat_action(room.chat(), ChatAction::Typing)
        .await;

    let verdict = assistant.check_sentence(sentence, target).await;
    let mark = if verdict.is_correct { "✅" } else { "❌" };
    room
        .bot
        .send_message(room.chat(), format!("{} {}", mark, verdict.feedback))
        .await?;
    Ok(())
}

/// Plays the cues in order; delayed ones are handed to the runtime.
async fn perform(room: &Room, cues: Vec<Cue>) {
    for cue in cues {
        match cue {
            Cue::Say(narration) => room.narrator.speak(room.chat(), &narration).await,
            Cue::After { delay, token, then } => schedule(room.clone(), delay, token, then),
        }
    }
}

fn schedule(room: Room, delay: Duration, token: CueToken, then: Deferred) {
    let chat = room.chat();
    let narrator = room.narrator.clone();
    let is_narration = matches!(then, Deferred::Say(_));
    let ticket = narrator.ticket();

    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(err) = fire(&room, token, then).await {
            warn!("Scheduled cue for chat {} failed: {}", chat, err);
        }
        room.narrator.release(chat, ticket);
    });

    if is_narration {
        narrator.hold(chat, ticket, handle);
    }
}

async fn fire(room: &Room, token: CueToken, then: Deferred) -> HandlerResult {
    let Some(State::Playing { mut lesson }) = room.dialogue.get().await? else {
        return Ok(());
    };
    if !lesson.is_current(token) {
        debug!("Dropping stale cue for chat {}", room.chat());
        return Ok(());
    }

    match then {
        Deferred::Say(narration) => room.narrator.deliver(room.chat(), &narration).await,
        Deferred::Advance => {
            let cues = lesson.advance(token)?;
            // A message may have moved the lesson on while this one was advancing
            if !still_current(&room.dialogue, token).await? {
                debug!("Chat {} moved on, dropping advance", room.chat());
                return Ok(());
            }
            room
                .dialogue
                .update(State::Playing {
                    lesson: lesson.clone(),
                })
                .await?;
            perform(room, cues).await;
            show(&room.bot, room.chat(), &lesson).await?;
        }
    }
    Ok(())
}

async fn still_current(
    dialogue: &QuizDialogue,
    token: CueToken,
) -> Result<bool, InMemStorageError> {
    let latest = dialogue.get().await?;
    Ok(matches!(latest, Some(State::Playing { lesson }) if lesson.is_current(token)))
}

async fn show(bot: &Bot, chat: ChatId, lesson: &Lesson) -> HandlerResult {
    let screen = screens::render(lesson);
    let request = bot.send_message(chat, screen.text).parse_mode(ParseMode::Html);

    if screen.buttons.is_empty() {
        request.reply_markup(KeyboardRemove::new()).await?;
    } else {
        let keyboard = KeyboardMarkup::new(
            screen
                .buttons
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        );
        request.reply_markup(keyboard).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_advance() -> (Lesson, CueToken) {
        let mut lesson = Lesson::new(Curriculum::default());
        lesson.start().unwrap();
        while lesson.phase() == Phase::Narration {
            lesson.next_slide().unwrap();
        }
        while lesson.phase() == Phase::VerbalDrill {
            lesson.reveal().unwrap();
            lesson.self_report(true).unwrap();
        }
        let token = lesson
            .check("way")
            .unwrap()
            .into_iter()
            .find_map(|cue| match cue {
                Cue::After { token, .. } => Some(token),
                Cue::Say(_) => None,
            })
            .unwrap();
        (lesson, token)
    }

    #[tokio::test]
    async fn advance_is_dropped_after_restart() {
        let dialogue = QuizDialogue::new(InMemStorage::<State>::new(), ChatId(42));
        let (mut lesson, token) = pending_advance();

        dialogue
            .update(State::Playing {
                lesson: lesson.clone(),
            })
            .await
            .unwrap();
        assert!(still_current(&dialogue, token).await.unwrap());

        lesson.restart();
        dialogue.update(State::Playing { lesson }).await.unwrap();
        assert!(!still_current(&dialogue, token).await.unwrap());

        dialogue.exit().await.unwrap();
        assert!(!still_current(&dialogue, token).await.unwrap());
    }
}
