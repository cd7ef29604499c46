pub mod error;
pub mod frequency_table;
pub mod naive_bayes;
pub mod types;
pub mod util;

pub use error::{ClassifierError, Result};
pub use naive_bayes::{bigram_bayes, classify, naive_bayes, ClassifierConfig, MixtureClassifier};
pub use types::{Document, Label, PredictionSequence, TrainingSet};
