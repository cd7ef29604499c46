use crate::error::{ClassifierError, Result};

pub type Document = Vec<String>;
pub type Bigram = (String, String);
pub type PredictionSequence = Vec<Label>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Label {
    Negative = 0,
    Positive = 1,
}

impl Label {
    pub fn as_int(self) -> u8 {
        self as u8
    }

    // strict: ties go negative
    pub fn from_scores(positive: f64, negative: f64) -> Label {
        if positive > negative { Label::Positive } else { Label::Negative }
    }
}

impl TryFrom<i64> for Label {
    type Error = ClassifierError;

    fn try_from(value: i64) -> Result<Label> {
        match value {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => Err(ClassifierError::InvalidLabel(other)),
        }
    }
}

/// Index-aligned training documents and their labels.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSet<'a> {
    documents: &'a [Document],
    labels: &'a [Label],
}

impl<'a> TrainingSet<'a> {
    pub fn new(documents: &'a [Document], labels: &'a [Label]) -> Result<TrainingSet<'a>> {
        if documents.len() != labels.len() {
            return Err(ClassifierError::ShapeMismatch {
                documents: documents.len(),
                labels: labels.len(),
            });
        }
        Ok(TrainingSet { documents, labels })
    }

    pub fn documents(&self) -> &'a [Document] {
        self.documents
    }

    pub fn labels(&self) -> &'a [Label] {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a Document, Label)> + 'a {
        let (documents, labels) = (self.documents, self.labels);
        documents.iter().zip(labels.iter().copied())
    }
}

// (log P(doc, positive), log P(doc, negative))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScores {
    pub positive: f64,
    pub negative: f64,
}

impl LogScores {
    pub fn decide(&self) -> Label {
        Label::from_scores(self.positive, self.negative)
    }
}
