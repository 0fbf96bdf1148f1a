use teloxide::utils::html;

use crate::quiz::writing::WritingStatus;
use crate::quiz::{Lesson, Phase};

pub const START_MISSION: &str = "Start Mission 🚀";
pub const NEXT_SLIDE: &str = "Next ▶";
pub const FINISH_VIDEO: &str = "Finish Video ✅";
pub const REPEAT: &str = "🔊 Repeat";
pub const SHOW_ANSWER: &str = "Show Answer 👀";
pub const SAID_IT: &str = "I said it! ✅";
pub const WAS_WRONG: &str = "I was wrong ❌";
pub const GIVE_UP: &str = "Skip / Show Answer";
pub const PLAY_AGAIN: &str = "Play Again 🔄";

/// What the chat shows between narrations: a card and its reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub buttons: Vec<Vec<&'static str>>,
}

pub fn render(lesson: &Lesson) -> Screen {
    let mut text = header(lesson);
    let buttons = match lesson.phase() {
        Phase::Intro => {
            text.push_str(
                "💂 <b>Your Mission</b>\n\n📺 Watch the story\n🗣️ Speak the words\n✍️ Write the test",
            );
            vec![vec![START_MISSION]]
        }
        Phase::Narration => narration_card(lesson, &mut text),
        Phase::VerbalDrill => verbal_card(lesson, &mut text),
        Phase::WritingDrill => writing_card(lesson, &mut text),
        Phase::Outro => {
            text.push_str(&format!(
                "🏰 <b>Mission Complete!</b>\n\nTotal Score: ⭐ <b>{}</b>\nVocabulary Master Certified! 🎓",
                lesson.session().score()
            ));
            if let Some(past) = lesson.challenge().and_then(|w| w.drilled_past_tense()) {
                text.push_str(&format!(
                    "\n\n✏️ Bonus: write a sentence with <b>{}</b>.",
                    html::escape(past)
                ));
            }
            vec![vec![PLAY_AGAIN]]
        }
    };
    Screen { text, buttons }
}

fn header(lesson: &Lesson) -> String {
    let session = lesson.session();
    let title = lesson.mission().map_or("Mission: Lost in London", |m| m.title);
    format!(
        "🇬🇧 <b>{}</b>\n{} • Story {}/{} • ⭐ {}\n\n",
        html::escape(title),
        session.phase(),
        session.mission_index() + 1,
        session.mission_count(),
        session.score()
    )
}

fn narration_card(lesson: &Lesson, text: &mut String) -> Vec<Vec<&'static str>> {
    let (Some(mission), Some((slide, line))) = (lesson.mission(), lesson.slide()) else {
        text.push_str("Loading...");
        return Vec::new();
    };
    let dots: String = (0..mission.narration_lines.len())
        .map(|i| if i == slide { '●' } else { '○' })
        .collect();
    text.push_str(&format!(
        "📺 Learning Video: {}\n\n{}\n\n\"{}\"\n\n{}",
        html::escape(mission.title),
        mission.badge(),
        html::escape(line),
        dots
    ));
    let next = if slide + 1 < mission.narration_lines.len() {
        NEXT_SLIDE
    } else {
        FINISH_VIDEO
    };
    vec![vec![REPEAT, next]]
}

fn verbal_card(lesson: &Lesson, text: &mut String) -> Vec<Vec<&'static str>> {
    let Some((drill, task)) = lesson.verbal().and_then(|d| d.current().map(|t| (d, t))) else {
        text.push_str("Loading...");
        return Vec::new();
    };
    let label = if task.is_conjugation() {
        "Say the Past Tense"
    } else {
        "Translate to English"
    };
    text.push_str(&format!(
        "🗣️ Verbal Test\n\n<i>{}</i>\n<b>{}</b>\n\n",
        label,
        html::escape(task.headline())
    ));
    if drill.is_revealed() {
        text.push_str(&format!("✅ <b>{}</b>", html::escape(task.expected_answer())));
        if task.is_conjugation() {
            text.push_str("\n(Yesterday I...)");
        }
    } else {
        text.push('?');
    }
    let (position, total) = drill.progress();
    text.push_str(&format!("\n\n{position} / {total}"));

    if drill.is_revealed() {
        vec![vec![WAS_WRONG, SAID_IT]]
    } else {
        vec![vec![SHOW_ANSWER]]
    }
}

fn writing_card(lesson: &Lesson, text: &mut String) -> Vec<Vec<&'static str>> {
    let Some((drill, task)) = lesson.writing().and_then(|d| d.current().map(|t| (d, t))) else {
        text.push_str("Loading...");
        return Vec::new();
    };
    let label = if task.is_conjugation() {
        "Past Tense"
    } else {
        "Translate"
    };
    text.push_str(&format!(
        "✍️ Writing Test\n\n<i>{}</i>\n<b>{}</b>\n\n",
        label,
        html::escape(task.headline())
    ));
    let input = html::escape(drill.input());
    match drill.status() {
        WritingStatus::Idle => text.push_str("Type your answer..."),
        WritingStatus::Correct => text.push_str(&format!("✅ <code>{input}</code>")),
        WritingStatus::Wrong => {
            text.push_str(&format!("❌ <code>{input}</code>\nNot quite. Try again!"))
        }
        WritingStatus::GaveUp => text.push_str(&format!("👀 <code>{input}</code>")),
    }
    let (position, total) = drill.progress();
    text.push_str(&format!("\n\n{position} / {total}"));

    if drill.can_give_up() {
        vec![vec![GIVE_UP]]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Curriculum;

    fn in_verbal_drill() -> Lesson {
        let mut lesson = Lesson::new(Curriculum::default());
        lesson.start().unwrap();
        while lesson.phase() == Phase::Narration {
            lesson.next_slide().unwrap();
        }
        lesson
    }

    #[test]
    fn intro_offers_start() {
        let screen = render(&Lesson::new(Curriculum::default()));
        assert_eq!(screen.buttons, vec![vec![START_MISSION]]);
        assert!(screen.text.contains("INTRO • Story 1/4 • ⭐ 0"));
    }

    #[test]
    fn last_slide_offers_finish() {
        let mut lesson = Lesson::new(Curriculum::default());
        lesson.start().unwrap();
        assert_eq!(render(&lesson).buttons, vec![vec![REPEAT, NEXT_SLIDE]]);
        for _ in 1..6 {
            lesson.next_slide().unwrap();
        }
        let screen = render(&lesson);
        assert_eq!(screen.buttons, vec![vec![REPEAT, FINISH_VIDEO]]);
        assert!(screen.text.contains("○○○○○●"));
    }

    #[test]
    fn verbal_card_hides_then_shows_answer() {
        let mut lesson = in_verbal_drill();
        let hidden = render(&lesson);
        assert!(hidden.text.contains("<b>Weg</b>"));
        assert!(!hidden.text.contains("✅"));
        assert_eq!(hidden.buttons, vec![vec![SHOW_ANSWER]]);

        lesson.reveal().unwrap();
        let shown = render(&lesson);
        assert!(shown.text.contains("✅ <b>way</b>"));
        assert_eq!(shown.buttons, vec![vec![WAS_WRONG, SAID_IT]]);
    }

    #[test]
    fn writing_card_offers_skip_after_two_misses() {
        let mut lesson = in_verbal_drill();
        while lesson.phase() == Phase::VerbalDrill {
            lesson.reveal().unwrap();
            lesson.self_report(true).unwrap();
        }
        assert!(render(&lesson).buttons.is_empty());
        lesson.check("<wey>").unwrap();
        let screen = render(&lesson);
        assert!(screen.text.contains("&lt;wey&gt;"));
        assert!(screen.buttons.is_empty());
        lesson.check("wai").unwrap();
        assert_eq!(render(&lesson).buttons, vec![vec![GIVE_UP]]);
    }
}
