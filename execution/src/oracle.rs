use anyhow::Result;
use duelist_types::oracle::{AnswerCheck, GeneratedQuestion, QuestionPrompt};

/// Port to the non-deterministic question oracle.
///
/// Implementations run the prompt against the oracle and reconcile the
/// independent executions into one canonical result before returning; the
/// core calls the port synchronously within a transition and treats whatever
/// comes back as agreed. A returned error aborts the whole transition, so no
/// state staged before the call survives.
pub trait QuestionOracle {
    /// Generate the question for an already-resolved context.
    fn generate_question(&self, prompt: &QuestionPrompt) -> Result<GeneratedQuestion>;

    /// Judge a submitted answer, returning the raw verdict token. The core
    /// extracts only the leading correct/wrong marker.
    fn check_answer(&self, check: &AnswerCheck) -> Result<String>;
}
