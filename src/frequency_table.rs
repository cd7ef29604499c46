use std::collections::HashMap;
use std::hash::Hash;

use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::types::{Document, Label, TrainingSet};
use crate::util::multi_thread_process_list;

/// Occurrence counts of features (tokens or token pairs) for one class.
///
/// Lookups of absent keys never insert; they read as 0, or as a caller
/// supplied floor through [`FrequencyTable::count_with_floor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<K: Hash + Eq> {
    counts: HashMap<K, u64>,
    total: u64,
}

impl<K: Hash + Eq> FrequencyTable<K> {
    pub fn new() -> FrequencyTable<K> {
        FrequencyTable { counts: HashMap::new(), total: 0 }
    }

    fn add(&mut self, key: K, amount: u64) {
        *self.counts.entry(key).or_insert(0) += amount;
        self.total += amount;
    }

    fn merge(&mut self, other: FrequencyTable<K>) {
        for (key, amount) in other.counts {
            self.add(key, amount);
        }
    }

    pub fn count(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn count_with_floor(&self, key: &K, floor: u64) -> u64 {
        self.count(key).max(floor)
    }

    /// Sum of all counts in the table.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &u64)> {
        self.counts.iter()
    }
}

impl<K: Hash + Eq> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (key, amount) in iter.into_iter().counts() {
            table.add(key, amount as u64);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTables<K: Hash + Eq> {
    pub positive: FrequencyTable<K>,
    pub negative: FrequencyTable<K>,
}

impl<K: Hash + Eq> ClassTables<K> {
    pub fn new() -> ClassTables<K> {
        ClassTables { positive: FrequencyTable::new(), negative: FrequencyTable::new() }
    }

    pub fn table(&self, label: Label) -> &FrequencyTable<K> {
        match label {
            Label::Positive => &self.positive,
            Label::Negative => &self.negative,
        }
    }

    fn merge(&mut self, other: ClassTables<K>) {
        self.positive.merge(other.positive);
        self.negative.merge(other.negative);
    }
}

impl<K: Hash + Eq> Default for ClassTables<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts the features `extract` yields for every training document into the
/// table of that document's label.
///
/// With `num_threads > 1` each worker counts a contiguous chunk of documents
/// into private tables which are summed afterwards.
pub fn build<K, F>(training_set: &TrainingSet, extract: F, num_threads: usize) -> Result<ClassTables<K>>
    where
        K: Hash + Eq + Send,
        F: Fn(&[String]) -> Vec<K> + Sync
{
    let input = training_set.iter().collect_vec();

    let f_thread = |chunk: &[(&Document, Label)]| -> Result<Vec<ClassTables<K>>> {
        let count_class = |label: Label| -> FrequencyTable<K> {
            chunk
                .iter()
                .filter(|(_, l)| *l == label)
                .flat_map(|(document, _)| extract(document.as_slice()))
                .collect()
        };
        Ok(vec![ClassTables {
            positive: count_class(Label::Positive),
            negative: count_class(Label::Negative),
        }])
    };

    let partials = multi_thread_process_list(&input, num_threads, f_thread)?;
    let mut tables = ClassTables::new();
    for partial in partials {
        tables.merge(partial);
    }

    debug!(
        "built tables: {} positive keys ({} total), {} negative keys ({} total)",
        tables.positive.len(),
        tables.positive.total(),
        tables.negative.len(),
        tables.negative.total()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Document> {
        raw.iter()
            .map(|d| d.iter().map(|s| String::from(*s)).collect())
            .collect()
    }

    fn words(document: &[String]) -> Vec<String> {
        document.to_vec()
    }

    #[test]
    fn test_build_counts_per_label() {
        let documents = docs(&[&["good", "good", "movie"], &["bad", "movie"], &["good"]]);
        let labels = vec![Label::Positive, Label::Negative, Label::Positive];
        let training_set = TrainingSet::new(&documents, &labels).unwrap();

        let tables = build(&training_set, words, 1).unwrap();
        assert_eq!(tables.positive.count(&String::from("good")), 3);
        assert_eq!(tables.positive.count(&String::from("movie")), 1);
        assert_eq!(tables.positive.count(&String::from("bad")), 0);
        assert_eq!(tables.negative.count(&String::from("movie")), 1);
        assert_eq!(tables.positive.total(), 4);
        assert_eq!(tables.negative.total(), 2);
        assert_eq!(tables.table(Label::Negative).len(), 2);
    }

    #[test]
    fn test_count_with_floor() {
        let table: FrequencyTable<String> = ["a", "a", "b"].iter().map(|s| String::from(*s)).collect();
        assert_eq!(table.count_with_floor(&String::from("a"), 1), 2);
        assert_eq!(table.count_with_floor(&String::from("zzz"), 1), 1);
        assert_eq!(table.count_with_floor(&String::from("zzz"), 0), 0);
        // lookups do not insert
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_threaded_build_matches_single() {
        let documents = docs(&[
            &["a", "b"], &["c"], &["a", "a", "d"], &[], &["b", "e"], &["a"], &["f", "g", "a"],
        ]);
        let labels = vec![
            Label::Positive, Label::Negative, Label::Positive, Label::Negative,
            Label::Negative, Label::Positive, Label::Negative,
        ];
        let training_set = TrainingSet::new(&documents, &labels).unwrap();
        let single = build(&training_set, words, 1).unwrap();
        let multi = build(&training_set, words, 3).unwrap();
        assert_eq!(single, multi);
    }

    #[test]
    fn test_empty_training_set() {
        let documents: Vec<Document> = Vec::new();
        let labels: Vec<Label> = Vec::new();
        let training_set = TrainingSet::new(&documents, &labels).unwrap();
        let tables = build(&training_set, words, 4).unwrap();
        assert!(tables.positive.is_empty());
        assert_eq!(tables.negative.total(), 0);
    }
}
