//! Oracle boundary payloads.
//!
//! The core emits a structured question-generation payload and a separate
//! correctness-check payload; the oracle layer (prompting, execution, and the
//! agreement protocol that reconciles independent runs) lives in the host.
//! Only the already-agreed results cross back: a JSON-shaped question object
//! and a plain verdict token.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};

use crate::duel::{
    read_string, string_encode_size, write_string, Seat, MAX_ANIME_LENGTH, MAX_QUESTION_LENGTH,
};

/// Maximum length of a single answer option carried in a generated question.
pub const MAX_OPTION_LENGTH: usize = 256;

/// Context for one question, resolved deterministically by the room engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionPrompt {
    pub room_code: String,
    pub seat: Seat,
    pub question_num: u8,
    pub context: PromptContext,
}

/// Normal rounds draw from a player's own selection (or the sniper's, for one
/// question); wild-card rounds draw from the fixed pool minus both selections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptContext {
    Normal {
        anime: String,
        category: String,
        sniped: bool,
    },
    WildCard {
        suggested: String,
        pool: Vec<String>,
        excluded: [String; 2],
    },
}

/// Correctness-check payload for a submitted answer. The oracle is expected to
/// be lenient (alternate valid answers, minor spelling errors).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerCheck {
    pub question: String,
    pub answer: String,
}

/// Correct-option label in a generated question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub fn as_char(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl Write for OptionLetter {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for OptionLetter {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(Self::A),
            1 => Ok(Self::B),
            2 => Ok(Self::C),
            3 => Ok(Self::D),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for OptionLetter {
    const SIZE: usize = 1;
}

/// The oracle's agreed question object. Journaled verbatim in
/// `Event::QuestionIssued` so clients can render it without re-querying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: [String; 4],
    pub answer: OptionLetter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard_anime: Option<String>,
}

impl GeneratedQuestion {
    /// Decode the oracle's JSON response. Schema robustness beyond this shape
    /// is the oracle layer's responsibility.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw.trim())
    }
}

impl Write for GeneratedQuestion {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.question, writer);
        for option in &self.options {
            write_string(option, writer);
        }
        self.answer.write(writer);
        match &self.wildcard_anime {
            Some(anime) => {
                true.write(writer);
                write_string(anime, writer);
            }
            None => false.write(writer),
        }
    }
}

impl Read for GeneratedQuestion {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let question = read_string(reader, MAX_QUESTION_LENGTH)?;
        let options = [
            read_string(reader, MAX_OPTION_LENGTH)?,
            read_string(reader, MAX_OPTION_LENGTH)?,
            read_string(reader, MAX_OPTION_LENGTH)?,
            read_string(reader, MAX_OPTION_LENGTH)?,
        ];
        let answer = OptionLetter::read(reader)?;
        let wildcard_anime = if bool::read(reader)? {
            Some(read_string(reader, MAX_ANIME_LENGTH)?)
        } else {
            None
        };
        Ok(Self {
            question,
            options,
            answer,
            wildcard_anime,
        })
    }
}

impl EncodeSize for GeneratedQuestion {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.question)
            + self
                .options
                .iter()
                .map(|o| string_encode_size(o))
                .sum::<usize>()
            + self.answer.encode_size()
            + 1
            + self
                .wildcard_anime
                .as_ref()
                .map(|a| string_encode_size(a))
                .unwrap_or(0)
    }
}

/// Agreed correctness verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong,
}

impl Verdict {
    /// Lenient extraction from the oracle's raw token: anything that starts
    /// with `correct` after trimming and lowercasing counts, everything else
    /// is wrong.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().to_lowercase().starts_with("correct") {
            Self::Correct
        } else {
            Self::Wrong
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}
