// src/scoring.rs

use crate::models::quiz::QuizQuestion;

/// Scores a completed session: one point per position where the selected
/// option index equals the stored correct index. Skipped questions
/// (`None`) and positions beyond the question list never score, so the
/// result is always within `0..=questions.len()`.
///
/// Pure and deterministic: the same inputs always yield the same score.
pub fn score_answers(selected: &[Option<i64>], questions: &[QuizQuestion]) -> i64 {
    questions
        .iter()
        .zip(selected.iter().chain(std::iter::repeat(&None)))
        .filter(|(question, answer)| **answer == Some(question.correct_answer))
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_with_answers(correct: &[i64]) -> Vec<QuizQuestion> {
        correct
            .iter()
            .map(|&answer| QuizQuestion {
                question: "q".to_string(),
                options: vec!["A)".into(), "B)".into(), "C)".into(), "D)".into()],
                correct_answer: answer,
            })
            .collect()
    }

    #[test]
    fn all_correct_scores_full() {
        let questions = quiz_with_answers(&[0, 1, 2, 3, 0]);
        let selected: Vec<_> = [0i64, 1, 2, 3, 0].map(Some).to_vec();
        assert_eq!(score_answers(&selected, &questions), 5);
    }

    #[test]
    fn one_wrong_scores_four() {
        let questions = quiz_with_answers(&[0, 1, 2, 3, 0]);
        let selected: Vec<_> = [1i64, 1, 2, 3, 0].map(Some).to_vec();
        assert_eq!(score_answers(&selected, &questions), 4);
    }

    #[test]
    fn empty_answer_set_scores_zero() {
        let questions = quiz_with_answers(&[0, 1, 2, 3, 0]);
        assert_eq!(score_answers(&[], &questions), 0);
    }

    #[test]
    fn skipped_questions_never_score() {
        let questions = quiz_with_answers(&[0, 1, 2]);
        let selected = vec![Some(0), None, Some(2)];
        assert_eq!(score_answers(&selected, &questions), 2);
    }

    #[test]
    fn extra_answers_are_ignored() {
        let questions = quiz_with_answers(&[0]);
        let selected = vec![Some(0), Some(1), Some(2)];
        assert_eq!(score_answers(&selected, &questions), 1);
    }
}
