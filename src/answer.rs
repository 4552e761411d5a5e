use std::{fmt, str::FromStr};

use thiserror::Error;

/// A single multiple-choice answer. Unanswered questions are `None` wherever
/// an `Option<Answer>` is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Answer {
    A,
    B,
    C,
    D,
}

/// Number of distinct answer values, used as the smoothing denominator.
pub const ALPHABET_SIZE: usize = Answer::ALL.len();

impl Answer {
    pub const ALL: [Answer; 4] = [Answer::A, Answer::B, Answer::C, Answer::D];

    pub fn letter(self) -> char {
        match self {
            Answer::A => 'A',
            Answer::B => 'B',
            Answer::C => 'C',
            Answer::D => 'D',
        }
    }

    /// Position of this answer in the alphabet (A = 0).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not one of A, B, C or D")]
pub struct ParseAnswerError(pub String);

impl FromStr for Answer {
    type Err = ParseAnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Answer::A),
            "B" => Ok(Answer::B),
            "C" => Ok(Answer::C),
            "D" => Ok(Answer::D),
            _ => Err(ParseAnswerError(s.to_string())),
        }
    }
}

/// A fully answered survey together with the affiliation it was labeled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRow {
    pub answers: Vec<Answer>,
    pub label: String,
}

impl LabeledRow {
    pub fn new(answers: Vec<Answer>, label: impl Into<String>) -> Self {
        LabeledRow {
            answers,
            label: label.into(),
        }
    }

    /// The answers as a partial vector with every slot filled in.
    pub fn as_partial(&self) -> Vec<Option<Answer>> {
        self.answers.iter().copied().map(Some).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_leniently() {
        assert_eq!(" b ".parse::<Answer>(), Ok(Answer::B));
        assert_eq!("d".parse::<Answer>(), Ok(Answer::D));
        assert!("".parse::<Answer>().is_err());
        assert!("E".parse::<Answer>().is_err());
        assert!("AB".parse::<Answer>().is_err());
    }

    #[test]
    fn alphabet_is_ordered() {
        assert_eq!(ALPHABET_SIZE, 4);
        for (i, answer) in Answer::ALL.iter().enumerate() {
            assert_eq!(answer.index(), i);
        }
        assert_eq!(Answer::C.to_string(), "C");
    }
}
