// src/client.rs
//
// The client application modeled as an explicit finite-state machine: six
// mutually exclusive screens and a pure reducer, independent of any UI
// framework. A rendering layer owns nothing but the current `Screen` and
// feeds it actions from user input and API responses.

use crate::generation::OPTIONS_PER_QUESTION;

/// The six screens. Points shown on the user dashboard are never mutated
/// optimistically; the rendering layer re-fetches history after a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    HostLogin,
    HostDashboard { host_id: i64 },
    UserLogin,
    UserDashboard { user_id: i64 },
    TakeQuiz { user_id: i64, session: QuizSession },
}

/// Per-session quiz-taking state, local to the TakeQuiz screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub quiz_id: i64,
    pub answers: Vec<Option<usize>>,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Showing question `i` (0-indexed).
    Question(usize),
    /// Terminal for the session; the submit request is issued on entry.
    Results,
}

impl QuizSession {
    pub fn new(quiz_id: i64, total_questions: usize) -> Self {
        Self {
            quiz_id,
            answers: vec![None; total_questions],
            phase: Phase::Question(0),
        }
    }

    /// Selected indices in question order, shaped for the submit payload.
    pub fn selected_answers(&self) -> Vec<Option<i64>> {
        self.answers
            .iter()
            .map(|a| a.map(|i| i as i64))
            .collect()
    }
}

/// Everything that can move the state machine: explicit user actions and
/// successful API responses. Failed API calls produce no action, so the
/// screen stays put.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenHostLogin,
    OpenUserLogin,
    GoHome,
    /// POST /api/host/signup or /api/host/login succeeded.
    HostAuthenticated { host_id: i64 },
    /// POST /api/user/login succeeded.
    UserAuthenticated { user_id: i64 },
    /// GET /api/quiz/{code} succeeded from the user dashboard.
    QuizLoaded { quiz_id: i64, total_questions: usize },
    /// An option was tapped on the current question.
    SelectAnswer(usize),
    /// The "next" button; ignored until the current question is answered.
    NextQuestion,
    /// POST /api/quiz/submit succeeded from the results phase.
    SubmitAcknowledged,
}

/// Pure reducer: `(state, action) -> new state`. Any action that is not
/// meaningful on the current screen leaves the state unchanged.
pub fn reduce(screen: Screen, action: Action) -> Screen {
    match (screen, action) {
        (_, Action::GoHome) => Screen::Home,
        (Screen::Home, Action::OpenHostLogin) => Screen::HostLogin,
        (Screen::Home, Action::OpenUserLogin) => Screen::UserLogin,

        (Screen::HostLogin, Action::HostAuthenticated { host_id }) => {
            Screen::HostDashboard { host_id }
        }
        (Screen::UserLogin, Action::UserAuthenticated { user_id }) => {
            Screen::UserDashboard { user_id }
        }

        (
            Screen::UserDashboard { user_id },
            Action::QuizLoaded {
                quiz_id,
                total_questions,
            },
        ) if total_questions > 0 => Screen::TakeQuiz {
            user_id,
            session: QuizSession::new(quiz_id, total_questions),
        },

        (Screen::TakeQuiz { user_id, session }, Action::SelectAnswer(choice)) => Screen::TakeQuiz {
            user_id,
            session: select_answer(session, choice),
        },
        (Screen::TakeQuiz { user_id, session }, Action::NextQuestion) => Screen::TakeQuiz {
            user_id,
            session: advance(session),
        },
        (Screen::TakeQuiz { user_id, session }, Action::SubmitAcknowledged)
            if session.phase == Phase::Results =>
        {
            Screen::UserDashboard { user_id }
        }

        // Anything else is a no-op.
        (screen, _) => screen,
    }
}

/// Records an answer for the current question; staying on the same
/// question lets the learner change their pick before advancing.
fn select_answer(mut session: QuizSession, choice: usize) -> QuizSession {
    if let Phase::Question(index) = session.phase {
        if choice < OPTIONS_PER_QUESTION {
            session.answers[index] = Some(choice);
        }
    }
    session
}

/// Advances to the next question, or to Results after the last one.
/// Advancing without an answer recorded is rejected.
fn advance(mut session: QuizSession) -> QuizSession {
    if let Phase::Question(index) = session.phase {
        if session.answers[index].is_none() {
            return session;
        }
        session.phase = if index + 1 < session.answers.len() {
            Phase::Question(index + 1)
        } else {
            Phase::Results
        };
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take_quiz_screen() -> Screen {
        let screen = reduce(
            Screen::UserLogin,
            Action::UserAuthenticated { user_id: 7 },
        );
        reduce(
            screen,
            Action::QuizLoaded {
                quiz_id: 3,
                total_questions: 3,
            },
        )
    }

    #[test]
    fn host_path_reaches_dashboard() {
        let screen = reduce(Screen::Home, Action::OpenHostLogin);
        assert_eq!(screen, Screen::HostLogin);

        let screen = reduce(screen, Action::HostAuthenticated { host_id: 42 });
        assert_eq!(screen, Screen::HostDashboard { host_id: 42 });
    }

    #[test]
    fn answering_every_question_reaches_results() {
        let mut screen = take_quiz_screen();

        for choice in [0, 2, 3] {
            screen = reduce(screen, Action::SelectAnswer(choice));
            screen = reduce(screen, Action::NextQuestion);
        }

        match &screen {
            Screen::TakeQuiz { session, .. } => {
                assert_eq!(session.phase, Phase::Results);
                assert_eq!(
                    session.selected_answers(),
                    vec![Some(0), Some(2), Some(3)]
                );
            }
            other => panic!("expected TakeQuiz, got {other:?}"),
        }

        // Results is terminal; only the acknowledged submit leaves it.
        let screen = reduce(screen, Action::NextQuestion);
        let screen = reduce(screen, Action::SubmitAcknowledged);
        assert_eq!(screen, Screen::UserDashboard { user_id: 7 });
    }

    #[test]
    fn advancing_without_an_answer_is_rejected() {
        let screen = take_quiz_screen();
        let after = reduce(screen.clone(), Action::NextQuestion);
        assert_eq!(after, screen);
    }

    #[test]
    fn reselecting_overwrites_the_answer() {
        let screen = take_quiz_screen();
        let screen = reduce(screen, Action::SelectAnswer(1));
        let screen = reduce(screen, Action::SelectAnswer(2));

        match &screen {
            Screen::TakeQuiz { session, .. } => {
                assert_eq!(session.phase, Phase::Question(0));
                assert_eq!(session.answers[0], Some(2));
            }
            other => panic!("expected TakeQuiz, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let screen = take_quiz_screen();
        let after = reduce(screen.clone(), Action::SelectAnswer(9));
        assert_eq!(after, screen);
    }

    #[test]
    fn empty_quiz_is_never_entered() {
        let dashboard = Screen::UserDashboard { user_id: 7 };
        let after = reduce(
            dashboard.clone(),
            Action::QuizLoaded {
                quiz_id: 3,
                total_questions: 0,
            },
        );
        assert_eq!(after, dashboard);
    }

    #[test]
    fn go_home_resets_any_screen() {
        assert_eq!(reduce(take_quiz_screen(), Action::GoHome), Screen::Home);
        assert_eq!(
            reduce(Screen::HostDashboard { host_id: 1 }, Action::GoHome),
            Screen::Home
        );
    }

    #[test]
    fn irrelevant_actions_are_no_ops() {
        let dashboard = Screen::HostDashboard { host_id: 1 };
        let after = reduce(dashboard.clone(), Action::SelectAnswer(0));
        assert_eq!(after, dashboard);
    }
}
