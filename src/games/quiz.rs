//! Level 3: multiple-choice quiz
//!
//! Also reused by the unlock gate's fallback. Finishing counts regardless
//! of score.

use rand_pcg::Pcg32;

use super::{BonusTiming, Completion, CompletionLatch, MiniGame, tick_delay};
use crate::error::GameError;

/// Feedback shown after each answer
pub const ANSWER_FEEDBACK_MS: u32 = 1200;
/// Final score shown before completing
pub const SUMMARY_MS: u32 = 2000;

const NEXT: Completion = Completion::new(4, 0, BonusTiming::OnTransition);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct: usize,
}

pub const QUIZ_QUESTIONS: &[QuizQuestion] = &[
    QuizQuestion {
        question: "What is 2 + 2 * 2?",
        options: &["4", "8", "6", "12"],
        correct: 2,
    },
    QuizQuestion {
        question: "Which language runs in a web browser?",
        options: &["Python", "Java", "C", "JavaScript"],
        correct: 3,
    },
    QuizQuestion {
        question: "What does HTML stand for?",
        options: &[
            "Hyper Trainer Marking Language",
            "Hyper Text Markup Language",
            "Hyper Text Marketing Language",
            "Hyper Text Markup Leveler",
        ],
        correct: 1,
    },
    QuizQuestion {
        question: "Which company developed the Android OS?",
        options: &["Apple", "Google", "Microsoft", "IBM"],
        correct: 1,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for an answer to the current question
    Asking,
    /// Answer locked in, showing right/wrong
    Feedback {
        selected: usize,
        correct: bool,
        remaining_ms: u32,
    },
    /// All questions answered, showing the score
    Summary { remaining_ms: u32 },
    /// Done
    Finished,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    questions: &'static [QuizQuestion],
    current: usize,
    score: usize,
    phase: QuizPhase,
    latch: CompletionLatch,
}

impl Quiz {
    pub fn new(questions: &'static [QuizQuestion]) -> Result<Self, GameError> {
        if questions.is_empty() {
            return Err(GameError::EmptyPool("quiz question"));
        }
        Ok(Self {
            questions,
            current: 0,
            score: 0,
            phase: QuizPhase::Asking,
            latch: CompletionLatch::default(),
        })
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Asking | QuizPhase::Feedback { .. } => self.questions.get(self.current),
            _ => None,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    /// Answer the current question. `None` if no answer is expected or the
    /// option doesn't exist.
    pub fn answer(&mut self, selected: usize) -> Option<bool> {
        if self.phase != QuizPhase::Asking {
            return None;
        }
        let question = self.questions.get(self.current)?;
        if selected >= question.options.len() {
            return None;
        }
        let correct = selected == question.correct;
        if correct {
            self.score += 1;
        }
        self.phase = QuizPhase::Feedback {
            selected,
            correct,
            remaining_ms: ANSWER_FEEDBACK_MS,
        };
        Some(correct)
    }

    /// Advance feedback and summary delays
    pub fn tick(&mut self, dt_ms: u32) {
        match &mut self.phase {
            QuizPhase::Feedback { remaining_ms, .. } => {
                if tick_delay(remaining_ms, dt_ms) {
                    self.current += 1;
                    self.phase = if self.current >= self.questions.len() {
                        log::debug!("Quiz complete: {}/{}", self.score, self.questions.len());
                        QuizPhase::Summary {
                            remaining_ms: SUMMARY_MS,
                        }
                    } else {
                        QuizPhase::Asking
                    };
                }
            }
            QuizPhase::Summary { remaining_ms } => {
                if tick_delay(remaining_ms, dt_ms) {
                    self.phase = QuizPhase::Finished;
                    self.latch.fire(NEXT);
                }
            }
            QuizPhase::Asking | QuizPhase::Finished => {}
        }
    }
}

impl MiniGame for Quiz {
    fn advance(&mut self, dt_ms: u32, _rng: &mut Pcg32) {
        self.tick(dt_ms);
    }

    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_and_wait(quiz: &mut Quiz, idx: usize) -> Option<bool> {
        let result = quiz.answer(idx);
        quiz.tick(ANSWER_FEEDBACK_MS);
        result
    }

    #[test]
    fn test_completes_regardless_of_score() {
        let mut quiz = Quiz::new(QUIZ_QUESTIONS).unwrap();
        for _ in 0..QUIZ_QUESTIONS.len() {
            // Option 0 is wrong for every question
            assert_eq!(answer_and_wait(&mut quiz, 0), Some(false));
        }
        assert_eq!(quiz.score(), 0);
        assert!(matches!(quiz.phase(), QuizPhase::Summary { .. }));
        assert_eq!(quiz.take_completion(), None);

        quiz.tick(SUMMARY_MS);
        assert!(quiz.is_finished());
        assert_eq!(quiz.take_completion(), Some(NEXT));
    }

    #[test]
    fn test_scores_correct_answers() {
        let mut quiz = Quiz::new(QUIZ_QUESTIONS).unwrap();
        for q in QUIZ_QUESTIONS {
            assert_eq!(answer_and_wait(&mut quiz, q.correct), Some(true));
        }
        assert_eq!(quiz.score(), QUIZ_QUESTIONS.len());
    }

    #[test]
    fn test_answer_locked_during_feedback() {
        let mut quiz = Quiz::new(QUIZ_QUESTIONS).unwrap();
        quiz.answer(2);
        assert_eq!(quiz.answer(1), None);
        quiz.tick(ANSWER_FEEDBACK_MS - 1);
        assert_eq!(quiz.answer(1), None);
        quiz.tick(1);
        assert_eq!(
            quiz.current_question().map(|q| q.question),
            Some("Which language runs in a web browser?")
        );
    }

    #[test]
    fn test_invalid_option_ignored() {
        let mut quiz = Quiz::new(QUIZ_QUESTIONS).unwrap();
        assert_eq!(quiz.answer(9), None);
        assert_eq!(quiz.phase(), QuizPhase::Asking);
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(Quiz::new(&[]).is_err());
    }
}
