use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    category::Category,
    parser::{self, ParseError},
    record::Record,
    thresholds::ThresholdTable,
};

/// Result of one classification pass: matching exercise names per category.
///
/// Every category is always present. Iteration follows `Category` ordering,
/// which is the grid display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub rows: usize,
    pub categories: BTreeMap<Category, Vec<String>>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            rows: 0,
            categories: Category::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }
}

impl Classification {
    pub fn get(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when no exercise landed in any category.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    /// Length of the longest category list (grid height).
    pub fn depth(&self) -> usize {
        self.categories.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.categories
            .iter()
            .map(|(category, names)| (*category, names.as_slice()))
    }
}

/// Apply every category predicate to every record, keeping row order.
pub fn classify(records: &[Record], table: &ThresholdTable) -> Classification {
    let mut classification = Classification {
        rows: records.len(),
        ..Classification::default()
    };

    for record in records {
        for category in Category::ALL {
            if category.matches(record, table) {
                classification
                    .categories
                    .entry(category)
                    .or_default()
                    .push(record.exercise.clone());
            }
        }
    }

    classification
}

/// Human readable outcome of the latest upload.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    NoRows,
    NoMatches,
    Classified(usize),
    Failed(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NoRows => write!(f, "No rows yet. Upload a CSV file."),
            Status::NoMatches => write!(f, "No rows matched any category"),
            Status::Classified(rows) => write!(f, "Upload succeeded, {rows} rows classified"),
            Status::Failed(message) => write!(f, "{message}"),
        }
    }
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed(_))
    }
}

/// Output store for the presentation layer.
///
/// Each upload replaces the previous classification wholesale; a failed
/// parse leaves an empty result behind.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: ThresholdTable,
    classification: Classification,
    status: Status,
}

impl Dashboard {
    pub fn new(table: ThresholdTable) -> Self {
        Self {
            table,
            classification: Classification::default(),
            status: Status::NoRows,
        }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.table
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Run a full pass over an uploaded CSV text.
    pub fn upload(&mut self, text: &str) -> Result<&Classification, ParseError> {
        match parser::parse(text) {
            Ok(records) => {
                let classification = classify(&records, &self.table);
                self.status = if classification.is_empty() {
                    Status::NoMatches
                } else {
                    Status::Classified(classification.rows)
                };
                info!(rows = classification.rows, status = %self.status, "classified upload");
                self.classification = classification;
                Ok(&self.classification)
            }
            Err(err) => {
                warn!(error = %err, "upload rejected");
                self.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Drop the current result and report `message` instead.
    pub fn fail(&mut self, message: String) {
        self.classification = Classification::default();
        self.status = Status::Failed(message);
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(ThresholdTable::default())
    }
}
