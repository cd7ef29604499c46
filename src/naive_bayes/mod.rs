use std::hash::Hash;
use std::marker::PhantomData;

use tracing::{debug, info};

pub mod bigram;
pub mod config;
pub mod mixture;
pub mod unigram;

use crate::error::{ClassifierError, Result};
use crate::frequency_table::{build, ClassTables, FrequencyTable};
use crate::types::{Document, Label, LogScores, PredictionSequence, TrainingSet};
use crate::util::{checked_ln, multi_thread_process_list};

pub use self::bigram::{BigramEstimator, Bigrams};
pub use self::config::{ClassifierConfig, ScoringParams, UnseenPolicy};
pub use self::mixture::{bigram_bayes, classify, classify_with_config, MixtureClassifier};
pub use self::unigram::{UnigramEstimator, Unigrams};

/// Turns a document into the features a model counts.
pub trait FeatureExtractor {
    type Feature: Hash + Eq + Send + Sync;

    /// Model name used in log output.
    const NAME: &'static str;

    fn extract(document: &[String]) -> Vec<Self::Feature>;
}

/// Smoothed `ln P(feature | class)`.
///
/// Numerator and denominator are logged separately so a tiny smoothing
/// parameter cannot underflow the ratio to zero.
fn log_likelihood<K: Hash + Eq>(table: &FrequencyTable<K>, feature: &K, params: &ScoringParams) -> Result<f64> {
    let count = table.count_with_floor(feature, params.unseen_policy.floor()) as f64;
    let denominator = table.total() as f64 + params.vocabulary_multiplier * params.smoothing;
    Ok(checked_ln(count + params.smoothing)? - checked_ln(denominator)?)
}

/// Under [`UnseenPolicy::AtLeastOne`] an unseen feature in an empty class
/// table estimates `(1 + s) / (V s)`, which is only a probability when
/// `(V - 1) s > 1`.
fn check_unseen_floor<K: Hash + Eq>(tables: &ClassTables<K>, params: &ScoringParams) -> Result<()> {
    if params.unseen_policy == UnseenPolicy::Zero {
        return Ok(());
    }
    let floor = params.unseen_policy.floor() as f64;
    for table in [&tables.positive, &tables.negative] {
        if table.total() as f64 + (params.vocabulary_multiplier - 1.0) * params.smoothing <= floor {
            return Err(ClassifierError::InvalidParameter {
                name: "smoothing",
                value: params.smoothing,
                reason: "at_least_one floor with an empty class table needs (vocabulary_multiplier - 1) * smoothing > 1",
            });
        }
    }
    Ok(())
}

/// Smoothed probability estimate for one feature in one class table.
pub fn smoothed_probability<K: Hash + Eq>(table: &FrequencyTable<K>, feature: &K, params: &ScoringParams) -> f64 {
    let count = table.count_with_floor(feature, params.unseen_policy.floor()) as f64;
    (count + params.smoothing) / (table.total() as f64 + params.vocabulary_multiplier * params.smoothing)
}

fn score_document<F: FeatureExtractor>(
    document: &[String],
    tables: &ClassTables<F::Feature>,
    params: &ScoringParams,
) -> Result<LogScores> {
    let mut positive = 0.0;
    let mut negative = 0.0;
    for feature in F::extract(document) {
        positive += log_likelihood(&tables.positive, &feature, params)?;
        negative += log_likelihood(&tables.negative, &feature, params)?;
    }
    positive += checked_ln(params.pos_prior)?;
    negative += checked_ln(1.0 - params.pos_prior)?;
    Ok(LogScores { positive, negative })
}

/// Log-probability of every dev document under both classes, priors included.
///
/// Class totals come from the tables themselves. Parameters are validated
/// before any document is touched.
pub fn score_documents<F: FeatureExtractor>(
    dev_set: &[Document],
    tables: &ClassTables<F::Feature>,
    params: &ScoringParams,
    num_threads: usize,
) -> Result<Vec<LogScores>> {
    params.validate()?;
    check_unseen_floor(tables, params)?;
    multi_thread_process_list(dev_set, num_threads, |chunk: &[Document]| {
        chunk
            .iter()
            .map(|document| score_document::<F>(document, tables, params))
            .collect::<Result<Vec<LogScores>>>()
    })
}

/// Naive Bayes model over the features of `F`, trained once and immutable after.
pub struct NaiveBayes<F: FeatureExtractor> {
    tables: ClassTables<F::Feature>,
    params: ScoringParams,
    num_threads: usize,
    _features: PhantomData<F>,
}

impl<F: FeatureExtractor> NaiveBayes<F> {
    pub fn train(training_set: &TrainingSet, params: ScoringParams, num_threads: usize) -> Result<NaiveBayes<F>> {
        params.validate()?;
        let num_threads = num_threads.max(1);
        let tables = build(training_set, F::extract, num_threads)?;
        check_unseen_floor(&tables, &params)?;
        debug!(
            "{} model trained on {} documents: {} positive / {} negative features",
            F::NAME,
            training_set.len(),
            tables.positive.total(),
            tables.negative.total()
        );
        Ok(NaiveBayes { tables, params, num_threads, _features: PhantomData })
    }

    pub fn tables(&self) -> &ClassTables<F::Feature> {
        &self.tables
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    pub fn score(&self, dev_set: &[Document]) -> Result<Vec<LogScores>> {
        score_documents::<F>(dev_set, &self.tables, &self.params, self.num_threads)
    }

    pub fn predict(&self, dev_set: &[Document]) -> Result<PredictionSequence> {
        let predictions: PredictionSequence = self.score(dev_set)?.iter().map(LogScores::decide).collect();
        info!(
            "{} model: {} of {} documents predicted positive",
            F::NAME,
            predictions.iter().filter(|l| **l == Label::Positive).count(),
            predictions.len()
        );
        Ok(predictions)
    }
}

/// One-call unigram classifier.
pub fn naive_bayes(
    train_set: &[Document],
    train_labels: &[Label],
    dev_set: &[Document],
    smoothing_parameter: f64,
    pos_prior: f64,
) -> Result<PredictionSequence> {
    let config = ClassifierConfig { smoothing_parameter, pos_prior, ..Default::default() };
    naive_bayes_with_config(train_set, train_labels, dev_set, &config)
}

pub fn naive_bayes_with_config(
    train_set: &[Document],
    train_labels: &[Label],
    dev_set: &[Document],
    config: &ClassifierConfig,
) -> Result<PredictionSequence> {
    config.validate_unigram()?;
    let training_set = TrainingSet::new(train_set, train_labels)?;
    UnigramEstimator::train(&training_set, config.unigram_params(), config.num_threads)?.predict(dev_set)
}
