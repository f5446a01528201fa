use anyhow::Result;
use duelist_types::oracle::{
    AnswerCheck, GeneratedQuestion, OptionLetter, PromptContext, QuestionPrompt,
};
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::oracle::QuestionOracle;

/// Oracle stub returning pre-agreed results.
///
/// Verdicts pushed with [`push_verdict`](Self::push_verdict) are consumed in
/// order; once the queue drains, the fallback verdict (if any) repeats
/// forever. Question generation synthesizes a placeholder question from the
/// prompt so tests can assert on the resolved context.
pub struct ScriptedOracle {
    verdicts: RefCell<VecDeque<String>>,
    fallback: Option<String>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            verdicts: RefCell::new(VecDeque::new()),
            fallback: None,
        }
    }

    /// Every check resolves to `verdict` unless a scripted one is queued.
    pub fn always(verdict: &str) -> Self {
        Self {
            verdicts: RefCell::new(VecDeque::new()),
            fallback: Some(verdict.to_owned()),
        }
    }

    pub fn push_verdict(&self, verdict: &str) {
        self.verdicts.borrow_mut().push_back(verdict.to_owned());
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionOracle for ScriptedOracle {
    fn generate_question(&self, prompt: &QuestionPrompt) -> Result<GeneratedQuestion> {
        let (subject, wildcard_anime) = match &prompt.context {
            PromptContext::Normal { anime, .. } => (anime.clone(), None),
            PromptContext::WildCard { suggested, .. } => {
                (suggested.clone(), Some(suggested.clone()))
            }
        };
        Ok(GeneratedQuestion {
            question: format!(
                "Question #{} about {} for {}",
                prompt.question_num, subject, prompt.room_code
            ),
            options: [
                "A) first".to_owned(),
                "B) second".to_owned(),
                "C) third".to_owned(),
                "D) fourth".to_owned(),
            ],
            answer: OptionLetter::A,
            wildcard_anime,
        })
    }

    fn check_answer(&self, _check: &AnswerCheck) -> Result<String> {
        if let Some(verdict) = self.verdicts.borrow_mut().pop_front() {
            return Ok(verdict);
        }
        match &self.fallback {
            Some(verdict) => Ok(verdict.clone()),
            None => anyhow::bail!("no scripted verdict left"),
        }
    }
}
