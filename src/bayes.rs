use crate::{
    answer::{Answer, LabeledRow, ALPHABET_SIZE},
    config::ModelConfig,
    stats::{check_rows, MalformedRowError, Statistics},
};

/// Weighted multinomial Naive Bayes over multiple-choice answers.
///
/// Built once from a batch of rows and read-only afterwards, so a trained
/// classifier can be shared between threads without locking.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    stats: Statistics,
    weights: Vec<f64>,
}

/// Outcome of scoring a labeled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

impl NaiveBayesClassifier {
    /// A classifier with no trained classes. Every prediction is `None`.
    pub fn untrained(config: &ModelConfig) -> Self {
        NaiveBayesClassifier {
            stats: Statistics::new(config.num_questions()),
            weights: config.weights().to_vec(),
        }
    }

    pub fn train(config: &ModelConfig, rows: &[LabeledRow]) -> Result<Self, MalformedRowError> {
        let mut classifier = Self::untrained(config);
        classifier.stats.ingest(rows)?;

        log::info!(
            "trained on {} rows across {} labels",
            classifier.stats.total_rows(),
            classifier.stats.labels().count()
        );

        Ok(classifier)
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn is_trained(&self) -> bool {
        !self.stats.is_empty()
    }

    /// ln(count(label) / total rows), or `None` for a label never seen.
    pub fn log_prior(&self, label: &str) -> Option<f64> {
        match self.stats.label_count(label) {
            0 => None,
            count => Some((count as f64 / self.stats.total_rows() as f64).ln()),
        }
    }

    /// Laplace-smoothed P(answer | label) for one question.
    pub fn conditional_probability(&self, question: usize, label: &str, answer: Answer) -> f64 {
        let count = self.stats.feature_count(question, label, answer) as f64;
        let class_total = self.stats.label_count(label) as f64;
        (count + 1.0) / (class_total + ALPHABET_SIZE as f64)
    }

    /// Log-posterior of a single label against a partial answer vector.
    pub fn score(&self, label: &str, partial: &[Option<Answer>]) -> Option<f64> {
        let prior = self.log_prior(label)?;

        // Unanswered slots and slots past the last weight contribute nothing:
        let score = partial
            .iter()
            .zip(self.weights.iter())
            .enumerate()
            .filter_map(|(question, (answer, &weight))| answer.map(|a| (question, a, weight)))
            .fold(prior, |acc, (question, answer, weight)| {
                acc + weight * self.conditional_probability(question, label, answer).ln()
            });

        Some(score)
    }

    /// Scores for every trained label, in label order.
    pub fn scores(&self, partial: &[Option<Answer>]) -> Vec<(&str, f64)> {
        self.stats
            .labels()
            .filter_map(|(label, _)| self.score(label, partial).map(|score| (label, score)))
            .collect()
    }

    /// Given a (possibly partial) set of answers, makes a prediction as to which label it is.
    /// Equal scores resolve to the lexicographically smallest label.
    pub fn predict(&self, partial: &[Option<Answer>]) -> Option<&str> {
        if !self.is_trained() {
            log::warn!("prediction requested from a model with no trained labels");
            return None;
        }
        if partial.len() > self.weights.len() {
            log::warn!(
                "ignoring {} answers beyond the {} configured questions",
                partial.len() - self.weights.len(),
                self.weights.len()
            );
        }

        let (best_label, best_score) = self.scores(partial).into_iter().fold(
            (None, f64::NEG_INFINITY),
            |(best_label, best_score), (label, score)| {
                if score > best_score {
                    (Some(label), score)
                } else {
                    (best_label, best_score)
                }
            },
        );

        log::trace!("best label {:?} with score {:.4}", best_label, best_score);
        best_label
    }

    /// Predicts every row from its full answer vector and counts agreement
    /// with the trailing label.
    pub fn evaluate_detailed(&self, rows: &[LabeledRow]) -> Result<Evaluation, MalformedRowError> {
        check_rows(rows, self.stats.num_questions())?;

        if !self.is_trained() {
            log::warn!("evaluating a model with no trained labels");
            return Ok(Evaluation {
                correct: 0,
                total: rows.len(),
            });
        }

        let correct = rows
            .iter()
            .filter(|row| self.predict(&row.as_partial()) == Some(row.label.as_str()))
            .count();

        Ok(Evaluation {
            correct,
            total: rows.len(),
        })
    }

    /// Fraction of rows predicted correctly, 0.0 for an empty dataset.
    pub fn evaluate(&self, rows: &[LabeledRow]) -> Result<f64, MalformedRowError> {
        self.evaluate_detailed(rows).map(|eval| eval.accuracy())
    }
}
