use std::path::Path;
use std::sync::mpsc;
use std::sync::OnceLock;
use std::thread;

use csv::Reader;
use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::error::{ClassifierError, Result};
use crate::types::{Document, Label};

/// Splits `list` into `num_threads` contiguous chunks, runs `f_thread` on each
/// chunk in its own scoped thread and concatenates the results in chunk order.
///
/// With a single thread (or fewer than two items) `f_thread` runs inline on the
/// whole list. The first chunk error is returned.
pub fn multi_thread_process_list<T1, T2, F>(
    list: &[T1],
    num_threads: usize,
    f_thread: F,
) -> Result<Vec<T2>>
    where
        T1: Sync,
        T2: Send,
        F: Fn(&[T1]) -> Result<Vec<T2>> + Sync
    {
    let list_size = list.len();
    if num_threads <= 1 || list_size < 2 {
        return f_thread(list);
    }

    let num_in_chunk = list_size.div_ceil(num_threads);
    debug!("{} total records, {} in chunk", list_size, num_in_chunk);

    let (tx, rx) = mpsc::channel::<(usize, Result<Vec<T2>>)>();
    thread::scope(|s| {
        for (i, chunk) in list.chunks(num_in_chunk).enumerate() {
            let ctx = tx.clone();
            let f = &f_thread;
            s.spawn(move || {
                // receiver outlives the scope
                let _ = ctx.send((i, f(chunk)));
            });
        }
    });
    drop(tx);

    let mut ret_val: Vec<T2> = Vec::with_capacity(list_size);
    for (_, rec) in rx.into_iter().sorted_by_key(|(i, _)| *i) {
        ret_val.extend(rec?);
    }
    Ok(ret_val)
}

/// Natural log that refuses non-positive or non-finite input instead of
/// returning `-inf`/`NaN`.
pub fn checked_ln(value: f64) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value.ln())
    } else {
        Err(ClassifierError::MathDomain(value))
    }
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").unwrap())
}

pub fn strip_special_characters(input: &str) -> String {
    let special_characters = "!@#$%^&*()_+-=[]{}\\|;:\",./<>?0123456789\n\r\t";
    input
        .to_lowercase()
        .chars()
        .map(|c| {
            if special_characters.contains(c) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

pub fn tokenize(input: &str) -> Document {
    let stripped_input = strip_special_characters(input);
    word_regex()
        .find_iter(&stripped_input)
        .map(|m| String::from(m.as_str()))
        .collect_vec()
}

/// Reads a `label,text` csv (with header) into tokenized documents and labels.
pub fn get_input_data_csv<P: AsRef<Path>>(csv_file: P) -> Result<(Vec<Document>, Vec<Label>)> {
    let mut rdr = Reader::from_path(csv_file.as_ref())?;

    let mut documents = Vec::new();
    let mut labels = Vec::new();
    for result in rdr.records() {
        let r = result?;
        let raw_label = r.get(0).unwrap_or("").trim();
        let label_value = raw_label
            .parse::<i64>()
            .map_err(|_| ClassifierError::Config(format!("unparseable label `{}`", raw_label)))?;
        labels.push(Label::try_from(label_value)?);
        documents.push(tokenize(r.get(1).unwrap_or("")));
    }
    debug!("{} csv records read from {}", documents.len(), csv_file.as_ref().display());
    Ok((documents, labels))
}

/// Fraction of predictions matching the reference labels, 0.0 for empty input.
pub fn accuracy(predictions: &[Label], truth: &[Label]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let num_correct = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    num_correct as f64 / predictions.len() as f64
}

pub fn get_percent(prob: f64) -> f64 {
    f64::round(prob * 10000.0) / 100.0
}
