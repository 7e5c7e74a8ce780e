use std::collections::BTreeMap;

use super::METRIC_EMPTY_PLACEHOLDER;

const OPERATION_SLOTS: usize = 3;

/// The ordered 3-slot tuple describing one trackable action.
///
/// Slot 0 holds the verb (the lower-cased HTTP method for request
/// metrics), slot 1 the first path segment, slot 2 the second. Unset
/// slots always hold the empty placeholder `"-"`, never an empty string,
/// so every built metric name has the same arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricOperation {
    operations: [String; OPERATION_SLOTS],
    /// Label set attached to the operation, consumed by the Prometheus
    /// client only. Keys are unique; ordering is deterministic.
    pub labels: Option<BTreeMap<String, String>>,
}

impl MetricOperation {
    /// Builds an operation from up to three parts; missing slots are
    /// filled with the empty placeholder, extra parts are dropped.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut operations: [String; OPERATION_SLOTS] = [
            METRIC_EMPTY_PLACEHOLDER.to_string(),
            METRIC_EMPTY_PLACEHOLDER.to_string(),
            METRIC_EMPTY_PLACEHOLDER.to_string(),
        ];
        for (slot, part) in operations.iter_mut().zip(parts) {
            *slot = part.into();
        }
        MetricOperation {
            operations,
            labels: None,
        }
    }

    /// Attaches a label set, replacing any previous one.
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn get(&self, slot: usize) -> &str {
        &self.operations[slot]
    }

    pub fn set(&mut self, slot: usize, value: impl Into<String>) {
        self.operations[slot] = value.into();
    }

    /// All three slots in order.
    pub fn parts(&self) -> &[String; OPERATION_SLOTS] {
        &self.operations
    }
}
