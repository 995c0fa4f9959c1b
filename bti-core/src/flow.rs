//! Quiz flow state machine
//!
//! Walks the question catalog one question at a time, accumulating an
//! [`AnswerSet`]. The last answer transitions the flow to `Loading` and
//! hands the complete answer set to the caller, which is expected to invoke
//! the analysis exactly once. No backward navigation; restarting discards
//! all session state.

use crate::error::{CoreError, CoreResult};
use crate::types::{AnswerSet, Question, QuestionKind};

/// UI page states of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Landing page
    Start,
    /// Answering question at this catalog index
    Question(usize),
    /// Analysis in flight
    Loading,
    /// Finished report on screen
    Result,
    /// Browsing past reports
    Gallery,
}

/// Outcome of a single answer submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    /// Advanced to the next question
    Advanced,
    /// All questions answered; the completed answer set is handed off
    /// and the flow sits in `Loading` until a result or failure arrives
    Completed(AnswerSet),
}

/// One quiz session
#[derive(Debug, Clone)]
pub struct QuizFlow {
    questions: Vec<Question>,
    page: Page,
    answers: AnswerSet,
}

impl QuizFlow {
    /// Create a session over the given catalog, starting at the landing page
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            page: Page::Start,
            answers: AnswerSet::new(),
        }
    }

    /// Current page
    pub fn page(&self) -> Page {
        self.page
    }

    /// Answers collected so far
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Question currently on screen, if any
    pub fn current_question(&self) -> Option<&Question> {
        match self.page {
            Page::Question(idx) => self.questions.get(idx),
            _ => None,
        }
    }

    /// Progress through the catalog as a fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        match self.page {
            Page::Question(idx) => idx as f32 / self.questions.len() as f32,
            Page::Start => 0.0,
            _ => 1.0,
        }
    }

    /// Leave the landing page and show the first question
    pub fn begin(&mut self) -> CoreResult<()> {
        match self.page {
            Page::Start => {
                if self.questions.is_empty() {
                    return Err(CoreError::InvalidState("empty question catalog".into()));
                }
                self.answers.clear();
                self.page = Page::Question(0);
                Ok(())
            }
            _ => Err(CoreError::InvalidState(format!(
                "cannot begin from {:?}",
                self.page
            ))),
        }
    }

    /// Record an answer for the question on screen.
    ///
    /// Free-text values are trimmed; an empty trimmed value is rejected with
    /// a validation error and no state change. On the last question the flow
    /// moves to `Loading` and the full answer set is returned for handoff.
    pub fn submit_answer(&mut self, question_id: &str, value: &str) -> CoreResult<FlowStep> {
        let idx = match self.page {
            Page::Question(idx) => idx,
            _ => {
                return Err(CoreError::InvalidState(format!(
                    "no question on screen in {:?}",
                    self.page
                )))
            }
        };

        let question = self
            .questions
            .get(idx)
            .ok_or_else(|| CoreError::InvalidState(format!("question index {} out of range", idx)))?;

        if question.id != question_id {
            return Err(CoreError::UnknownQuestion(question_id.to_string()));
        }

        let value = match question.kind {
            QuestionKind::FreeText => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::Validation("답변을 입력해주세요".into()));
                }
                trimmed.to_string()
            }
            QuestionKind::Choice => {
                if !question.options.iter().any(|o| o.value == value) {
                    return Err(CoreError::Validation(format!(
                        "not an option of {}: {}",
                        question.id, value
                    )));
                }
                value.to_string()
            }
        };

        self.answers.insert(question.id.clone(), value);

        if idx + 1 < self.questions.len() {
            self.page = Page::Question(idx + 1);
            Ok(FlowStep::Advanced)
        } else {
            self.page = Page::Loading;
            Ok(FlowStep::Completed(self.answers.clone()))
        }
    }

    /// Analysis succeeded; show the result page
    pub fn result_ready(&mut self) -> CoreResult<()> {
        match self.page {
            Page::Loading => {
                self.page = Page::Result;
                Ok(())
            }
            _ => Err(CoreError::InvalidState(format!(
                "result_ready from {:?}",
                self.page
            ))),
        }
    }

    /// Analysis failed; fall back to the landing page and discard the session
    pub fn analysis_failed(&mut self) {
        self.answers.clear();
        self.page = Page::Start;
    }

    /// Browse the gallery (allowed from the landing and result pages)
    pub fn show_gallery(&mut self) {
        self.page = Page::Gallery;
    }

    /// Restart from the beginning with a fresh answer set
    pub fn restart(&mut self) {
        self.answers.clear();
        self.page = Page::Start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::questions;

    fn answer_for(q: &Question) -> String {
        match q.kind {
            QuestionKind::Choice => q.options[0].value.clone(),
            QuestionKind::FreeText => format!("answer for {}", q.id),
        }
    }

    #[test]
    fn test_full_walk_invokes_handoff_once() {
        let catalog = questions();
        let mut flow = QuizFlow::new(catalog.clone());
        flow.begin().unwrap();

        let mut completions = 0;
        for _ in 0..catalog.len() {
            let q = flow.current_question().unwrap().clone();
            match flow.submit_answer(&q.id, &answer_for(&q)).unwrap() {
                FlowStep::Advanced => {}
                FlowStep::Completed(answers) => {
                    completions += 1;
                    assert_eq!(answers.len(), catalog.len());
                }
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(flow.page(), Page::Loading);
        // one key per question, no duplicates
        assert_eq!(flow.answers().len(), catalog.len());
    }

    #[test]
    fn test_empty_free_text_rejected_without_state_change() {
        let mut flow = QuizFlow::new(questions());
        flow.begin().unwrap();
        // move to Q3 (first free-text)
        flow.submit_answer("Q1", "lecture").unwrap();
        flow.submit_answer("Q2", "lighthouse").unwrap();

        for bad in ["", "   ", "\n\t "] {
            let err = flow.submit_answer("Q3", bad).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)));
            assert_eq!(flow.page(), Page::Question(2));
            assert!(!flow.answers().contains_key("Q3"));
        }
    }

    #[test]
    fn test_free_text_trimmed() {
        let mut flow = QuizFlow::new(questions());
        flow.begin().unwrap();
        flow.submit_answer("Q1", "lecture").unwrap();
        flow.submit_answer("Q2", "lighthouse").unwrap();
        flow.submit_answer("Q3", "  guidance  ").unwrap();
        assert_eq!(flow.answers()["Q3"], "guidance");
    }

    #[test]
    fn test_unknown_choice_value_rejected() {
        let mut flow = QuizFlow::new(questions());
        flow.begin().unwrap();
        let err = flow.submit_answer("Q1", "not-an-option").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(flow.page(), Page::Question(0));
    }

    #[test]
    fn test_wrong_question_id_rejected() {
        let mut flow = QuizFlow::new(questions());
        flow.begin().unwrap();
        let err = flow.submit_answer("Q5", "whatever").unwrap_err();
        assert!(matches!(err, CoreError::UnknownQuestion(_)));
    }

    #[test]
    fn test_restart_discards_session() {
        let mut flow = QuizFlow::new(questions());
        flow.begin().unwrap();
        flow.submit_answer("Q1", "discussion").unwrap();
        flow.restart();
        assert_eq!(flow.page(), Page::Start);
        assert!(flow.answers().is_empty());

        // a fresh run starts from an empty answer set
        flow.begin().unwrap();
        assert_eq!(flow.page(), Page::Question(0));
        assert!(flow.answers().is_empty());
    }

    #[test]
    fn test_analysis_failure_returns_to_start() {
        let catalog = questions();
        let mut flow = QuizFlow::new(catalog.clone());
        flow.begin().unwrap();
        for _ in 0..catalog.len() {
            let q = flow.current_question().unwrap().clone();
            flow.submit_answer(&q.id, &answer_for(&q)).unwrap();
        }
        assert_eq!(flow.page(), Page::Loading);

        flow.analysis_failed();
        assert_eq!(flow.page(), Page::Start);
        assert!(flow.answers().is_empty());
    }

    #[test]
    fn test_result_ready_only_from_loading() {
        let mut flow = QuizFlow::new(questions());
        assert!(flow.result_ready().is_err());
    }
}
