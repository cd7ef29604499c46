use crate::naive_bayes::{FeatureExtractor, NaiveBayes};

/// Every token is a feature; order is irrelevant.
#[derive(Debug, Clone, Copy)]
pub struct Unigrams;

impl FeatureExtractor for Unigrams {
    type Feature = String;

    const NAME: &'static str = "unigram";

    fn extract(document: &[String]) -> Vec<String> {
        document.to_vec()
    }
}

pub type UnigramEstimator = NaiveBayes<Unigrams>;
