use crate::answer::{Answer, LabeledRow};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// A row whose answer vector does not match the configured question count.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("row {row} has {found} answers but the model expects {expected}")]
pub struct MalformedRowError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// Frequency tables gathered from labeled survey rows.
///
/// Label counts live in an ordered map, so labels are always enumerated
/// lexicographically. Feature counts are a flat table keyed by
/// `(question, label, answer)`; combinations never observed read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    num_questions: usize,
    label_counts: BTreeMap<String, usize>,
    feature_counts: HashMap<(usize, String, Answer), usize>,
    total_rows: usize,
}

impl Statistics {
    pub fn new(num_questions: usize) -> Self {
        Statistics {
            num_questions,
            ..Default::default()
        }
    }

    /// Adds a batch of rows. Every row is checked before anything is
    /// counted, so a malformed row leaves the tables exactly as they were.
    pub fn ingest(&mut self, rows: &[LabeledRow]) -> Result<(), MalformedRowError> {
        check_rows(rows, self.num_questions)?;

        for row in rows {
            *self.label_counts.entry(row.label.clone()).or_insert(0) += 1;
            self.total_rows += 1;

            for (question, &answer) in row.answers.iter().enumerate() {
                *self
                    .feature_counts
                    .entry((question, row.label.clone(), answer))
                    .or_insert(0) += 1;
            }
        }

        log::debug!(
            "ingested {} rows ({} total, {} labels)",
            rows.len(),
            self.total_rows,
            self.label_counts.len()
        );

        Ok(())
    }

    pub fn num_questions(&self) -> usize {
        self.num_questions
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn is_empty(&self) -> bool {
        self.label_counts.is_empty()
    }

    /// Labels with their row counts, in lexicographic order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, usize)> {
        self.label_counts
            .iter()
            .map(|(label, &count)| (label.as_str(), count))
    }

    pub fn label_count(&self, label: &str) -> usize {
        self.label_counts.get(label).copied().unwrap_or(0)
    }

    pub fn feature_count(&self, question: usize, label: &str, answer: Answer) -> usize {
        self.feature_counts
            .get(&(question, label.to_string(), answer))
            .copied()
            .unwrap_or(0)
    }
}

pub(crate) fn check_rows(rows: &[LabeledRow], expected: usize) -> Result<(), MalformedRowError> {
    match rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.answers.len() != expected)
    {
        Some((row, bad)) => Err(MalformedRowError {
            row,
            expected,
            found: bad.answers.len(),
        }),
        None => Ok(()),
    }
}
