use std::{fmt::Debug, fs, path::Path, str::FromStr};
use json::{JsonValue, parse};

use crate::error::{ClassifierError, Result};

/*
Config file structure:
every key is optional, a missing key keeps its default
{
    smoothing_parameter: 0.05,
    pos_prior: 0.8,
    unigram_smoothing_parameter: 1.0,
    bigram_smoothing_parameter: 1.0,
    bigram_lambda: 0.5,
    vocabulary_multiplier: 3.0,
    unseen_policy: "zero" | "at_least_one",
    num_threads: 1
}
*/

fn get_json<T>(obj: &JsonValue, k: &str, def: T) -> Result<T> where T: FromStr, <T as FromStr>::Err: Debug {
    if !obj.has_key(k) {
        return Ok(def);
    }
    let value = &obj[k];
    let raw = match value.as_str() {
        Some(s) => String::from(s),
        None => value.dump(),
    };
    raw.parse::<T>()
        .map_err(|e| ClassifierError::Config(format!("error parsing `{}` = {}: {:?}", k, raw, e)))
}

/// Count floor applied to every feature lookup before smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnseenPolicy {
    /// Unseen features count as zero occurrences.
    #[default]
    Zero,
    /// Every feature counts as at least one occurrence (`max(1, count)`).
    ///
    /// A class with no training features then needs
    /// `(vocabulary_multiplier - 1) * smoothing > 1`; training rejects it otherwise.
    AtLeastOne,
}

impl UnseenPolicy {
    pub fn floor(self) -> u64 {
        match self {
            UnseenPolicy::Zero => 0,
            UnseenPolicy::AtLeastOne => 1,
        }
    }
}

impl FromStr for UnseenPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "zero" => Ok(UnseenPolicy::Zero),
            "at_least_one" => Ok(UnseenPolicy::AtLeastOne),
            other => Err(format!("unknown unseen policy `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    // Laplace constant of the stand-alone unigram model
    pub smoothing_parameter: f64,
    // P(positive), exclusive (0, 1)
    pub pos_prior: f64,
    pub unigram_smoothing_parameter: f64,
    pub bigram_smoothing_parameter: f64,
    // weight of the bigram model in the mixture, [0, 1]
    pub bigram_lambda: f64,
    // V in (count + s) / (total + V * s)
    pub vocabulary_multiplier: f64,
    pub unseen_policy: UnseenPolicy,
    pub num_threads: usize,
}

impl Default for ClassifierConfig {
    fn default() -> ClassifierConfig {
        ClassifierConfig {
            smoothing_parameter: 0.05,
            pos_prior: 0.8,
            unigram_smoothing_parameter: 1.0,
            bigram_smoothing_parameter: 1.0,
            bigram_lambda: 0.5,
            vocabulary_multiplier: 3.0,
            unseen_policy: UnseenPolicy::Zero,
            num_threads: 1,
        }
    }
}

fn check_multiplier(value: f64) -> Result<()> {
    if value > 1.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ClassifierError::InvalidParameter {
            name: "vocabulary_multiplier",
            value,
            reason: "must be a finite number > 1",
        })
    }
}

// the smoothed denominator is `total + vocabulary_multiplier * smoothing`, so the product must stay finite
fn check_smoothing(name: &'static str, value: f64, vocabulary_multiplier: f64) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(ClassifierError::InvalidParameter { name, value, reason: "must be a finite number > 0" });
    }
    if !(vocabulary_multiplier * value).is_finite() {
        return Err(ClassifierError::InvalidParameter {
            name,
            value,
            reason: "vocabulary_multiplier * smoothing overflows",
        });
    }
    Ok(())
}

fn check_threads(value: usize) -> Result<()> {
    if value == 0 {
        return Err(ClassifierError::InvalidParameter {
            name: "num_threads",
            value: 0.0,
            reason: "must be at least 1",
        });
    }
    Ok(())
}

pub(crate) fn check_prior(value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ClassifierError::InvalidParameter {
            name: "pos_prior",
            value,
            reason: "must lie strictly between 0 and 1",
        })
    }
}

pub(crate) fn check_lambda(value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ClassifierError::InvalidParameter { name: "bigram_lambda", value, reason: "must lie in [0, 1]" })
    }
}

impl ClassifierConfig {
    pub fn from_json(obj: &JsonValue) -> Result<ClassifierConfig> {
        let mut tmp_config = ClassifierConfig::default();
        tmp_config.smoothing_parameter = get_json(obj, "smoothing_parameter", tmp_config.smoothing_parameter)?;
        tmp_config.pos_prior = get_json(obj, "pos_prior", tmp_config.pos_prior)?;
        tmp_config.unigram_smoothing_parameter =
            get_json(obj, "unigram_smoothing_parameter", tmp_config.unigram_smoothing_parameter)?;
        tmp_config.bigram_smoothing_parameter =
            get_json(obj, "bigram_smoothing_parameter", tmp_config.bigram_smoothing_parameter)?;
        tmp_config.bigram_lambda = get_json(obj, "bigram_lambda", tmp_config.bigram_lambda)?;
        tmp_config.vocabulary_multiplier = get_json(obj, "vocabulary_multiplier", tmp_config.vocabulary_multiplier)?;
        tmp_config.unseen_policy = get_json(obj, "unseen_policy", tmp_config.unseen_policy)?;
        tmp_config.num_threads = get_json(obj, "num_threads", tmp_config.num_threads)?;
        Ok(tmp_config)
    }

    pub fn read_config<P: AsRef<Path>>(file_name: P) -> Result<ClassifierConfig> {
        let file_contents = fs::read_to_string(file_name.as_ref())?;
        if file_contents.trim().is_empty() {
            return Err(ClassifierError::Config(format!("{}: file empty", file_name.as_ref().display())));
        }
        let json_data = parse(&file_contents)?;
        if !json_data.is_object() {
            return Err(ClassifierError::Config(String::from("top level value must be an object")));
        }
        ClassifierConfig::from_json(&json_data)
    }

    /// Rejects every parameter that would put a zero, negative or NaN value
    /// under a logarithm, or an out-of-range mixture weight.
    pub fn validate(&self) -> Result<()> {
        self.validate_unigram()?;
        self.validate_mixture()
    }

    /// Checks only what the stand-alone unigram model reads.
    pub fn validate_unigram(&self) -> Result<()> {
        check_multiplier(self.vocabulary_multiplier)?;
        check_smoothing("smoothing_parameter", self.smoothing_parameter, self.vocabulary_multiplier)?;
        check_prior(self.pos_prior)?;
        check_threads(self.num_threads)
    }

    /// Checks only what the unigram/bigram mixture reads.
    pub fn validate_mixture(&self) -> Result<()> {
        check_multiplier(self.vocabulary_multiplier)?;
        check_smoothing("unigram_smoothing_parameter", self.unigram_smoothing_parameter, self.vocabulary_multiplier)?;
        check_smoothing("bigram_smoothing_parameter", self.bigram_smoothing_parameter, self.vocabulary_multiplier)?;
        check_prior(self.pos_prior)?;
        check_lambda(self.bigram_lambda)?;
        check_threads(self.num_threads)
    }

    /// Scoring parameters of the stand-alone unigram model.
    pub fn unigram_params(&self) -> ScoringParams {
        self.params_with(self.smoothing_parameter)
    }

    /// Unigram half of the mixture.
    pub fn mixture_unigram_params(&self) -> ScoringParams {
        self.params_with(self.unigram_smoothing_parameter)
    }

    pub fn bigram_params(&self) -> ScoringParams {
        self.params_with(self.bigram_smoothing_parameter)
    }

    pub(crate) fn params_with(&self, smoothing: f64) -> ScoringParams {
        ScoringParams {
            smoothing,
            pos_prior: self.pos_prior,
            vocabulary_multiplier: self.vocabulary_multiplier,
            unseen_policy: self.unseen_policy,
        }
    }
}

/// Everything one estimator needs besides its frequency tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub smoothing: f64,
    pub pos_prior: f64,
    pub vocabulary_multiplier: f64,
    pub unseen_policy: UnseenPolicy,
}

impl ScoringParams {
    pub fn validate(&self) -> Result<()> {
        check_multiplier(self.vocabulary_multiplier)?;
        check_smoothing("smoothing", self.smoothing, self.vocabulary_multiplier)?;
        check_prior(self.pos_prior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_json_defaults_and_overrides() {
        let obj = parse(r#"{ "pos_prior": 0.5, "bigram_lambda": 0.25, "unseen_policy": "at_least_one", "num_threads": 4 }"#).unwrap();
        let config = ClassifierConfig::from_json(&obj).unwrap();
        assert_eq!(config.pos_prior, 0.5);
        assert_eq!(config.bigram_lambda, 0.25);
        assert_eq!(config.unseen_policy, UnseenPolicy::AtLeastOne);
        assert_eq!(config.num_threads, 4);
        assert_eq!(config.smoothing_parameter, 0.05);
        assert_eq!(config.vocabulary_multiplier, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_bad_value() {
        let obj = parse(r#"{ "pos_prior": "high" }"#).unwrap();
        assert!(matches!(ClassifierConfig::from_json(&obj), Err(ClassifierError::Config(_))));
        let obj = parse(r#"{ "unseen_policy": "sometimes" }"#).unwrap();
        assert!(matches!(ClassifierConfig::from_json(&obj), Err(ClassifierError::Config(_))));
    }

    #[test]
    fn test_read_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "smoothing_parameter": 1.0 }}"#).unwrap();
        let config = ClassifierConfig::read_config(file.path()).unwrap();
        assert_eq!(config.smoothing_parameter, 1.0);

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(ClassifierConfig::read_config(empty.path()), Err(ClassifierError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let cases = vec![
            ClassifierConfig { pos_prior: 0.0, ..Default::default() },
            ClassifierConfig { pos_prior: 1.0, ..Default::default() },
            ClassifierConfig { pos_prior: f64::NAN, ..Default::default() },
            ClassifierConfig { smoothing_parameter: 0.0, ..Default::default() },
            ClassifierConfig { unigram_smoothing_parameter: -1.0, ..Default::default() },
            ClassifierConfig { bigram_smoothing_parameter: f64::INFINITY, ..Default::default() },
            ClassifierConfig { bigram_lambda: 1.5, ..Default::default() },
            ClassifierConfig { bigram_lambda: -0.1, ..Default::default() },
            ClassifierConfig { vocabulary_multiplier: 1.0, ..Default::default() },
            ClassifierConfig { num_threads: 0, ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ClassifierError::InvalidParameter { .. })),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_validate_rejects_overflowing_smoothing() {
        let cases = vec![
            ClassifierConfig { smoothing_parameter: 1e308, ..Default::default() },
            ClassifierConfig { unigram_smoothing_parameter: 1e308, ..Default::default() },
            ClassifierConfig { bigram_smoothing_parameter: f64::MAX, ..Default::default() },
            ClassifierConfig { smoothing_parameter: 1e300, vocabulary_multiplier: 1e10, ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ClassifierError::InvalidParameter { .. })),
                "{:?} should be rejected",
                config
            );
        }

        let params = ClassifierConfig { smoothing_parameter: 1e308, ..Default::default() }.unigram_params();
        assert!(matches!(params.validate(), Err(ClassifierError::InvalidParameter { name: "smoothing", .. })));
        // large but representable
        assert!(ClassifierConfig { smoothing_parameter: 1e300, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn test_validation_scoped_to_model() {
        let config = ClassifierConfig { smoothing_parameter: 0.0, ..Default::default() };
        assert!(config.validate_mixture().is_ok());
        assert!(matches!(
            config.validate_unigram(),
            Err(ClassifierError::InvalidParameter { name: "smoothing_parameter", .. })
        ));

        let config = ClassifierConfig { bigram_smoothing_parameter: -1.0, bigram_lambda: 7.0, ..Default::default() };
        assert!(config.validate_unigram().is_ok());
        assert!(config.validate_mixture().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lambda_bounds_inclusive() {
        assert!(ClassifierConfig { bigram_lambda: 0.0, ..Default::default() }.validate().is_ok());
        assert!(ClassifierConfig { bigram_lambda: 1.0, ..Default::default() }.validate().is_ok());
    }
}
