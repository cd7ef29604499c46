use tracing::info;

use crate::error::Result;
use crate::naive_bayes::config::check_lambda;
use crate::naive_bayes::{BigramEstimator, ClassifierConfig, UnigramEstimator};
use crate::types::{Document, Label, LogScores, PredictionSequence, TrainingSet};

/// Interpolates unigram and bigram evidence in log space:
/// `lambda * bigram + (1 - lambda) * unigram` for each class.
pub struct MixtureClassifier {
    unigram: UnigramEstimator,
    bigram: BigramEstimator,
    lambda: f64,
}

impl MixtureClassifier {
    pub fn train(training_set: &TrainingSet, config: &ClassifierConfig) -> Result<MixtureClassifier> {
        config.validate_mixture()?;
        let unigram = UnigramEstimator::train(training_set, config.mixture_unigram_params(), config.num_threads)?;
        let bigram = BigramEstimator::train(training_set, config.bigram_params(), config.num_threads)?;
        Ok(MixtureClassifier { unigram, bigram, lambda: config.bigram_lambda })
    }

    pub fn unigram(&self) -> &UnigramEstimator {
        &self.unigram
    }

    pub fn bigram(&self) -> &BigramEstimator {
        &self.bigram
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn score(&self, dev_set: &[Document]) -> Result<Vec<LogScores>> {
        check_lambda(self.lambda)?;
        let unigram_scores = self.unigram.score(dev_set)?;
        let bigram_scores = self.bigram.score(dev_set)?;
        let lambda = self.lambda;
        Ok(unigram_scores
            .iter()
            .zip(bigram_scores.iter())
            .map(|(uni, bi)| LogScores {
                positive: lambda * bi.positive + (1.0 - lambda) * uni.positive,
                negative: lambda * bi.negative + (1.0 - lambda) * uni.negative,
            })
            .collect())
    }

    pub fn predict(&self, dev_set: &[Document]) -> Result<PredictionSequence> {
        let predictions: PredictionSequence = self.score(dev_set)?.iter().map(LogScores::decide).collect();
        info!(
            "mixture model (lambda {}): {} of {} documents predicted positive",
            self.lambda,
            predictions.iter().filter(|l| **l == Label::Positive).count(),
            predictions.len()
        );
        Ok(predictions)
    }
}

pub fn classify_with_config(
    dev_set: &[Document],
    train_set: &[Document],
    train_labels: &[Label],
    config: &ClassifierConfig,
) -> Result<PredictionSequence> {
    config.validate_mixture()?;
    let training_set = TrainingSet::new(train_set, train_labels)?;
    MixtureClassifier::train(&training_set, config)?.predict(dev_set)
}

/// Unigram/bigram mixture prediction for every dev document, in input order.
pub fn classify(
    dev_set: &[Document],
    train_set: &[Document],
    train_labels: &[Label],
    unigram_smoothing: f64,
    bigram_smoothing: f64,
    lambda_mix: f64,
    pos_prior: f64,
) -> Result<PredictionSequence> {
    let config = ClassifierConfig {
        unigram_smoothing_parameter: unigram_smoothing,
        bigram_smoothing_parameter: bigram_smoothing,
        bigram_lambda: lambda_mix,
        pos_prior,
        ..Default::default()
    };
    classify_with_config(dev_set, train_set, train_labels, &config)
}

/// [`classify`] with the training data first.
pub fn bigram_bayes(
    train_set: &[Document],
    train_labels: &[Label],
    dev_set: &[Document],
    unigram_smoothing_parameter: f64,
    bigram_smoothing_parameter: f64,
    bigram_lambda: f64,
    pos_prior: f64,
) -> Result<PredictionSequence> {
    classify(
        dev_set,
        train_set,
        train_labels,
        unigram_smoothing_parameter,
        bigram_smoothing_parameter,
        bigram_lambda,
        pos_prior,
    )
}
