use itertools::Itertools;

use crate::naive_bayes::{FeatureExtractor, NaiveBayes};
use crate::types::Bigram;

/// Ordered pairs of adjacent tokens `(doc[i], doc[i + 1])`.
/// Documents shorter than two tokens have no features.
#[derive(Debug, Clone, Copy)]
pub struct Bigrams;

impl FeatureExtractor for Bigrams {
    type Feature = Bigram;

    const NAME: &'static str = "bigram";

    fn extract(document: &[String]) -> Vec<Bigram> {
        document.iter().cloned().tuple_windows::<(String, String)>().collect_vec()
    }
}

pub type BigramEstimator = NaiveBayes<Bigrams>;
