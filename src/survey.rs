use crate::{
    answer::{Answer, LabeledRow, ALPHABET_SIZE},
    bayes::NaiveBayesClassifier,
};
use anyhow::{bail, Result};
use std::io::{BufRead, Write};

pub struct Question {
    pub text: &'static str,
    pub options: [&'static str; ALPHABET_SIZE],
}

pub fn default_questions() -> Vec<Question> {
    vec![
        Question {
            text: "What should be the government's role in supporting low-income communities?",
            options: [
                "Expand federal assistance and social support programs.",
                "Encourage private charities and local organizations to take the lead.",
                "Prioritize skill-building programs and workforce development.",
                "Limit government involvement and allow the market to address needs.",
            ],
        },
        Question {
            text: "How do you believe healthcare should be structured in the U.S.?",
            options: [
                "A government-run system that provides healthcare for everyone.",
                "Primarily private insurance with very little government regulation.",
                "A blended system where public and private options both exist.",
                "A fully free-market healthcare system with no federal oversight.",
            ],
        },
        Question {
            text: "How should taxes be managed?",
            options: [
                "Increase taxes on higher earners to support public programs.",
                "Lower taxes overall, especially for businesses and investors.",
                "Close loopholes and simplify the entire tax system.",
                "Reduce or eliminate income taxes and shrink government budgets.",
            ],
        },
        Question {
            text: "What approach should the government take on environmental issues?",
            options: [
                "Implement strong rules and fund renewable energy projects.",
                "Promote innovation but avoid heavy federal restrictions.",
                "Find a middle ground between environmental action and economic growth.",
                "Keep government involvement minimal and let market forces decide.",
            ],
        },
        Question {
            text: "What is the best way to improve the education system?",
            options: [
                "Increase funding and investment in public schools.",
                "Give families more freedom through school choice programs.",
                "Emphasize career training and vocational pathways.",
                "Reduce federal control and pass decisions to local communities.",
            ],
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Democrat,
    Republican,
    Libertarian,
    Green,
}

impl Party {
    pub const ALL: [Party; ALPHABET_SIZE] = [
        Party::Democrat,
        Party::Republican,
        Party::Libertarian,
        Party::Green,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Party::Democrat => "Democrat",
            Party::Republican => "Republican",
            Party::Libertarian => "Libertarian",
            Party::Green => "Green",
        }
    }
}

impl From<Answer> for Party {
    fn from(answer: Answer) -> Self {
        Party::ALL[answer.index()]
    }
}

/// One respondent working through the questionnaire, with a running guess
/// after every answer.
pub struct Session<'a> {
    model: &'a NaiveBayesClassifier,
    questions: &'a [Question],
}

impl<'a> Session<'a> {
    pub fn new(model: &'a NaiveBayesClassifier, questions: &'a [Question]) -> Self {
        Session { model, questions }
    }

    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<LabeledRow> {
        writeln!(out, "Welcome to the Political Survey!")?;
        writeln!(
            out,
            "Please answer the following questions by typing A, B, C, or D.\n"
        )?;

        let mut partial: Vec<Option<Answer>> = vec![None; self.questions.len()];
        for (i, question) in self.questions.iter().enumerate() {
            writeln!(out, "Question {}: {}", i + 1, question.text)?;
            for (answer, option) in Answer::ALL.iter().zip(question.options.iter()) {
                writeln!(out, "{}. {}", answer, option)?;
            }
            write!(out, "Your answer (A/B/C/D): ")?;

            partial[i] = Some(read_answer(input, out)?);

            match self.model.predict(&partial) {
                Some(guess) => writeln!(out, "Current model guess (so far): {}\n", guess)?,
                None => writeln!(out, "Current model guess (so far): not enough data yet\n")?,
            }
            log::debug!("scores after question {}: {:?}", i + 1, self.model.scores(&partial));
        }

        writeln!(
            out,
            "Final question: Which political party do you most identify with?"
        )?;
        for (answer, party) in Answer::ALL.iter().zip(Party::ALL.iter()) {
            writeln!(out, "{}. {}", answer, party.name())?;
        }
        write!(out, "Your party (A/B/C/D): ")?;
        let party = Party::from(read_answer(input, out)?);

        let answers = partial.into_iter().flatten().collect();
        Ok(LabeledRow::new(answers, party.name()))
    }
}

/// Reads lines until one parses as an answer letter.
fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Answer> {
    loop {
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before the survey was finished");
        }
        match line.parse::<Answer>() {
            Ok(answer) => return Ok(answer),
            Err(_) => write!(out, "Please enter A, B, C, or D: ")?,
        }
    }
}
