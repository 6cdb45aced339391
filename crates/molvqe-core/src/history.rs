//! Per-evaluation progress records collected during optimization.

use serde::{Deserialize, Serialize};

/// One objective evaluation as reported to the progress callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// 1-based evaluation index.
    pub iteration: usize,
    /// Parameters the objective was evaluated at.
    pub params: Vec<f64>,
    /// Estimated energy.
    pub mean: f64,
    /// Standard error of `mean`.
    pub std: f64,
}

/// Caller-owned log of every evaluation of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceHistory {
    records: Vec<EvaluationRecord>,
}

impl ConvergenceHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: EvaluationRecord) {
        self.records.push(record);
    }

    /// Append the fields of one evaluation.
    pub fn record(&mut self, iteration: usize, params: &[f64], mean: f64, std: f64) {
        self.push(EvaluationRecord {
            iteration,
            params: params.to_vec(),
            mean,
            std,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvaluationRecord> {
        self.records.iter()
    }

    /// Energies in evaluation order.
    pub fn means(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.mean).collect()
    }

    /// Evaluation with the lowest energy.
    pub fn best(&self) -> Option<&EvaluationRecord> {
        self.records.iter().min_by(|a, b| a.mean.total_cmp(&b.mean))
    }

    /// Most recent evaluation.
    pub fn last(&self) -> Option<&EvaluationRecord> {
        self.records.last()
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<'a> IntoIterator for &'a ConvergenceHistory {
    type Item = &'a EvaluationRecord;
    type IntoIter = std::slice::Iter<'a, EvaluationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_bookkeeping() {
        let mut history = ConvergenceHistory::new();
        assert!(history.best().is_none());
        history.record(1, &[0.0, 0.0], -1.0, 0.0);
        history.record(2, &[0.1, 0.0], -1.2, 0.01);
        history.record(3, &[0.2, 0.0], -1.1, 0.01);

        assert_eq!(history.len(), 3);
        assert_eq!(history.means(), vec![-1.0, -1.2, -1.1]);
        assert_eq!(history.best().unwrap().iteration, 2);
        assert_eq!(history.last().unwrap().params, vec![0.2, 0.0]);
        assert_eq!((&history).into_iter().count(), 3);

        history.clear();
        assert!(history.is_empty());
    }
}
