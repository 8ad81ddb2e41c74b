//! Per-game HTML
//!
//! `shell` is rendered once per level generation and holds anything the
//! player types into. `live` is re-rendered into the `[data-live]` slot
//! whenever it changes.

use std::fmt::Write;

use super::escape_html as esc;
use crate::games::drag_drop::CARDS;
use crate::games::pixel_art::{GRID_SIZE, PALETTE, PALETTE_NAMES};
use crate::games::platformer::{GROUND_PX, RunState};
use crate::games::quiz::QuizPhase;
use crate::games::simon::SimonColor;
use crate::games::typing::CharMark;
use crate::games::*;

const LIVE: &str = r#"<div class="fun-live" data-live></div>"#;

fn instructions(text: &str) -> String {
    format!(r#"<div class="fun-instructions">{}</div>"#, esc(text))
}

fn status(text: &str, ok: bool) -> String {
    let class = if ok { "fun-status ok" } else { "fun-status bad" };
    format!(r#"<div class="{}">{}</div>"#, class, esc(text))
}

pub fn shell(game: &ActiveGame) -> String {
    match game {
        ActiveGame::ConfettiClicks(_) => LIVE.to_string(),
        ActiveGame::DragDrop(_) => {
            let mut html = instructions("Drag a card onto the target (or tap a card, then the target).");
            html.push_str(r#"<div class="drag-cards">"#);
            for (i, card) in CARDS.iter().enumerate() {
                let _ = write!(
                    html,
                    r#"<div class="drag-card" draggable="true" data-action="drag-select" data-idx="{}">{}</div>"#,
                    i,
                    esc(card)
                );
            }
            html.push_str("</div>");
            html.push_str(r#"<div class="drop-target" data-action="drag-target" data-drop>Drop Here!</div>"#);
            html.push_str(LIVE);
            html
        }
        ActiveGame::Quiz(_) => LIVE.to_string(),
        ActiveGame::MemoryMatch(_) => {
            instructions("Flip cards to find all matching pairs.") + LIVE
        }
        ActiveGame::SimonSays(_) => instructions(
            "Watch and repeat the color sequence. Complete 5 rounds to win!",
        ) + LIVE,
        ActiveGame::TypingChallenge(_) => {
            instructions("Type the sentence below as fast and accurately as you can!")
                + LIVE
                + r#"<input type="text" class="typing-input" data-input="typing" autocomplete="off" spellcheck="false">"#
        }
        ActiveGame::LightsOut(_) => instructions(
            "Turn off all the lights by clicking the buttons. (Only 1 move needed!)",
        ) + LIVE,
        ActiveGame::PixelArt(_) => {
            let mut html = instructions("Color the grid to match the heart pattern!");
            html.push_str(r#"<div class="pixel-palette">"#);
            for (i, (hex, name)) in PALETTE.iter().zip(PALETTE_NAMES).enumerate() {
                let _ = write!(
                    html,
                    r#"<button class="pixel-swatch" style="background:{}" title="{}" data-action="pixel-color" data-idx="{}"></button>"#,
                    hex, name, i
                );
            }
            html.push_str("</div>");
            html.push_str(LIVE);
            html
        }
        ActiveGame::TriviaWheel(_) => {
            instructions("Spin the wheel and answer the trivia question!")
                + r#"<button class="fun-btn" data-action="trivia-spin">SPIN THE WHEEL!</button>"#
                + LIVE
                + r#"<input type="text" data-input="trivia" placeholder="Your answer..."><button class="fun-btn" data-action="trivia-submit">Submit</button>"#
        }
        ActiveGame::Platformer(_) => {
            instructions("Press Space or ↑ to jump. Avoid obstacles and survive 12 seconds!") + LIVE
        }
        ActiveGame::CodeDebug(g) => {
            let challenge = g.challenge();
            let mut html = instructions("Find and fix the bug in the code below, then submit your fix!");
            let _ = write!(
                html,
                r#"<h3>Debug the Code!</h3><div>{}</div><pre class="debug-code">{}</pre><textarea data-input="debug" spellcheck="false">{}</textarea><button class="fun-btn" data-action="debug-submit">Submit Fix</button>"#,
                esc(challenge.description),
                esc(challenge.buggy_code),
                esc(challenge.buggy_code)
            );
            html.push_str(LIVE);
            html
        }
        ActiveGame::EmojiGuess(g) => {
            let puzzle = g.puzzle();
            let mut html = instructions("Guess the object shown by the emojis!");
            let _ = write!(
                html,
                r#"<h3>Guess the Emoji!</h3><div class="emoji-clue">{}</div><div class="emoji-options">"#,
                esc(puzzle.emoji)
            );
            for (i, option) in puzzle.options.iter().enumerate() {
                let _ = write!(
                    html,
                    r#"<button class="fun-btn" data-action="emoji-guess" data-idx="{}">{}</button>"#,
                    i,
                    esc(option)
                );
            }
            html.push_str("</div>");
            html.push_str(LIVE);
            html
        }
        ActiveGame::SecretCommand(_) => {
            instructions("Type the secret command and submit!")
                + r#"<h3>Enter the Secret Command</h3><input type="text" data-input="secret" placeholder="Type the secret phrase..."><button class="fun-btn" data-action="secret-submit">Submit</button>"#
                + LIVE
        }
        ActiveGame::Celebration(_) => {
            r#"<div class="celebration"><h2>Congratulations! 🎉</h2><div>You completed all levels!<br>Thank you for playing.<br><span class="surprise-teaser">Here's a surprise for you!</span></div></div>"#.to_string()
                + LIVE
        }
    }
}

pub fn live(game: &ActiveGame) -> String {
    match game {
        ActiveGame::ConfettiClicks(g) => g.counter_text().map(|t| esc(&t)).unwrap_or_default(),
        ActiveGame::DragDrop(g) => {
            if g.is_complete() {
                status("Success!", true)
            } else if let Some(i) = g.selected() {
                format!(
                    r#"<div class="fun-status">Selected {}, now tap the target</div>"#,
                    esc(CARDS.get(i).copied().unwrap_or_default())
                )
            } else {
                String::new()
            }
        }
        ActiveGame::Quiz(q) => quiz(q),
        ActiveGame::MemoryMatch(g) => memory(g),
        ActiveGame::SimonSays(g) => simon(g),
        ActiveGame::TypingChallenge(g) => typing(g),
        ActiveGame::LightsOut(g) => lights_out(g),
        ActiveGame::PixelArt(g) => pixel_art(g),
        ActiveGame::TriviaWheel(g) => {
            let mut html = match g.question() {
                Some(q) => format!(r#"<div class="trivia-question">{}</div>"#, esc(q.question)),
                None => String::new(),
            };
            match g.verdict() {
                Some(true) => html.push_str(&status("Correct! 🎉", true)),
                Some(false) => html.push_str(&status("Try again!", false)),
                None => {}
            }
            html
        }
        ActiveGame::Platformer(g) => platformer(g),
        ActiveGame::CodeDebug(g) => {
            let mut html = g
                .status()
                .map(|s| status(s, g.verdict() == Some(true)))
                .unwrap_or_default();
            if let Some((answer, hint)) = g.reveal() {
                let _ = write!(
                    html,
                    r#"<div class="debug-answer"><b>The correct fix:</b><pre>{}</pre></div><div class="fun-modal"><div class="fun-modal-body">{}</div></div>"#,
                    esc(answer),
                    esc(hint)
                );
            }
            html
        }
        ActiveGame::EmojiGuess(g) => g
            .status()
            .map(|s| status(s, s == crate::games::emoji::CORRECT_STATUS))
            .unwrap_or_default(),
        ActiveGame::SecretCommand(g) => g
            .status()
            .map(|s| status(s, s == crate::games::secret_command::UNLOCKED_STATUS))
            .unwrap_or_default(),
        ActiveGame::Celebration(g) => match g.surprise() {
            Some(text) => format!(
                r#"<button class="fun-btn" disabled>🎁 Reveal your surprise!</button><div class="surprise">{}</div>"#,
                esc(text)
            ),
            None => r#"<button class="fun-btn" data-action="surprise">🎁 Reveal your surprise!</button>"#
                .to_string(),
        },
    }
}

/// Quiz body, shared by level 3 and the unlock fallback
pub fn quiz(q: &Quiz) -> String {
    let phase = q.phase();
    match phase {
        QuizPhase::Summary { .. } | QuizPhase::Finished => format!(
            r#"<div class="quiz-result">Quiz Complete!<br>Your Score: {} / {}</div>"#,
            q.score(),
            q.total()
        ),
        QuizPhase::Asking | QuizPhase::Feedback { .. } => {
            let Some(question) = q.current_question() else {
                return String::new();
            };
            let mut html = format!(
                r#"<div class="quiz-question">{}</div><div class="quiz-options">"#,
                esc(question.question)
            );
            for (i, option) in question.options.iter().enumerate() {
                let (class, disabled) = match phase {
                    QuizPhase::Feedback { selected, .. } => {
                        let class = if i == question.correct {
                            "quiz-option correct"
                        } else if i == selected {
                            "quiz-option wrong"
                        } else {
                            "quiz-option"
                        };
                        (class, " disabled")
                    }
                    _ => ("quiz-option", ""),
                };
                let _ = write!(
                    html,
                    r#"<button class="{}" data-action="quiz-answer" data-idx="{}"{}>{}</button>"#,
                    class,
                    i,
                    disabled,
                    esc(option)
                );
            }
            html.push_str("</div>");
            if let QuizPhase::Feedback { correct, .. } = phase {
                html.push_str(&if correct {
                    status("Correct! 🎉", true)
                } else {
                    status("Wrong answer.", false)
                });
            }
            html
        }
    }
}

fn memory(g: &MemoryMatch) -> String {
    let mut html = String::from(r#"<div class="memory-grid">"#);
    for (i, card) in g.cards().iter().enumerate() {
        let shown = g.is_face_up(i) || g.is_matched(i);
        let class = if g.is_matched(i) {
            "memory-card matched"
        } else if shown {
            "memory-card up"
        } else {
            "memory-card"
        };
        let face = if shown { esc(card) } else { "❓".to_string() };
        let _ = write!(
            html,
            r#"<button class="{}" data-action="memory-flip" data-idx="{}">{}</button>"#,
            class, i, face
        );
    }
    let _ = write!(
        html,
        r#"</div><div class="fun-status">Pairs: {} / {}</div>"#,
        g.pairs_matched(),
        g.len() / 2
    );
    html
}

fn simon(g: &SimonSays) -> String {
    let mut html = String::from(r#"<div class="simon-pad">"#);
    let lit = g.lit();
    for (i, color) in SimonColor::ALL.iter().enumerate() {
        let class = if lit == Some(*color) {
            "simon-btn lit"
        } else {
            "simon-btn"
        };
        let disabled = if g.accepts_input() { "" } else { " disabled" };
        let _ = write!(
            html,
            r#"<button class="{}" style="background:{}" data-action="simon-press" data-idx="{}" aria-label="{}"{}></button>"#,
            class,
            color.hex(),
            i,
            color.name(),
            disabled
        );
    }
    let _ = write!(
        html,
        r#"</div><div class="fun-status">{}</div><div class="simon-round">Round {} / {}</div>"#,
        esc(g.status()),
        g.round(),
        crate::games::simon::ROUNDS_TO_WIN
    );
    html
}

fn typing(g: &TypingChallenge) -> String {
    let mut html = String::from(r#"<div class="typing-target">"#);
    for (ch, mark) in g.target().chars().zip(g.marks()) {
        let class = match mark {
            CharMark::Pending => "pending",
            CharMark::Correct => "correct",
            CharMark::Wrong => "wrong",
        };
        let _ = write!(html, r#"<span class="{}">{}</span>"#, class, esc(&ch.to_string()));
    }
    html.push_str("</div>");
    if let Some(r) = g.result() {
        let _ = write!(
            html,
            r#"<div class="fun-status ok">Completed in <b>{:.2}</b> seconds!<br>WPM: <b>{}</b>   Accuracy: <b>{}%</b> 🎉</div>"#,
            r.elapsed_secs, r.wpm, r.accuracy
        );
    }
    html
}

fn lights_out(g: &LightsOut) -> String {
    let mut html = format!(
        r#"<div class="lights-grid" style="grid-template-columns:repeat({},1fr)">"#,
        g.size()
    );
    for (i, lit) in g.cells().iter().enumerate() {
        let class = if *lit { "light on" } else { "light" };
        let _ = write!(
            html,
            r#"<button class="{}" data-action="lights-toggle" data-idx="{}"></button>"#,
            class, i
        );
    }
    html.push_str("</div>");
    if g.is_solved() {
        html.push_str(&status("Puzzle Solved! 🎉", true));
    }
    html
}

fn pixel_art(g: &PixelArt) -> String {
    let mut html = format!(
        r#"<div class="pixel-selected">Color: {}</div><div class="pixel-grid" style="grid-template-columns:repeat({},1fr)">"#,
        PALETTE_NAMES.get(g.selected() as usize).copied().unwrap_or_default(),
        GRID_SIZE
    );
    for (r, row) in g.grid().iter().enumerate() {
        for (c, color) in row.iter().enumerate() {
            let _ = write!(
                html,
                r#"<div class="pixel" style="background:{}" data-action="pixel-paint" data-idx="{}"></div>"#,
                PALETTE.get(*color as usize).copied().unwrap_or(PALETTE[0]),
                r * GRID_SIZE + c
            );
        }
    }
    html.push_str("</div>");
    if g.is_complete() {
        html.push_str(&status("Pixel Art Complete! 🎉", true));
    }
    html
}

fn platformer(g: &Platformer) -> String {
    let mut html = format!(
        r#"<div class="platformer-stage" data-action="platform-jump"><div class="platformer-player" style="bottom:{:.1}px"></div><div class="platformer-obstacle" style="left:{:.1}px"></div>"#,
        GROUND_PX + g.player_y(),
        g.obstacle_x()
    );
    match g.state() {
        RunState::Failed { .. } => html.push_str(r#"<div class="platformer-msg bad">Oops! Try again.</div>"#),
        RunState::Won => html.push_str(r#"<div class="platformer-msg ok">You Win! 🎉</div>"#),
        RunState::Running => {}
    }
    let _ = write!(
        html,
        r#"</div><div class="platformer-time">{:.1}s / {}s</div>"#,
        g.elapsed_ms() as f32 / 1000.0,
        crate::games::platformer::SURVIVE_MS / 1000
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::rng;

    #[test]
    fn test_every_game_has_live_slot() {
        let mut rng = rng();
        for kind in [
            GameKind::DragDrop,
            GameKind::Quiz,
            GameKind::TypingChallenge,
            GameKind::CodeDebug,
            GameKind::Celebration,
        ] {
            let game = kind.build(&mut rng).unwrap();
            assert!(shell(&game).contains("data-live"), "{:?}", kind);
        }
    }

    #[test]
    fn test_lights_out_markup() {
        let game = ActiveGame::LightsOut(LightsOut::standard());
        let html = live(&game);
        assert_eq!(html.matches("light on").count(), 3);
        assert!(html.contains(r#"data-idx="3""#));
    }

    #[test]
    fn test_code_is_escaped() {
        let game = ActiveGame::CodeDebug(
            CodeDebug::with_challenge(&crate::games::code_debug::CHALLENGES[3]).unwrap(),
        );
        let html = shell(&game);
        assert!(!html.contains("<b>"));
        assert!(html.contains("str[str.length-1]"));
    }

    #[test]
    fn test_quiz_summary() {
        let mut quiz = Quiz::new(crate::games::quiz::QUIZ_QUESTIONS).unwrap();
        for _ in 0..quiz.total() {
            quiz.answer(0);
            quiz.tick(crate::games::quiz::ANSWER_FEEDBACK_MS);
        }
        let html = live(&ActiveGame::Quiz(quiz));
        assert!(html.contains("Your Score: 0 / 4"));
    }
}
