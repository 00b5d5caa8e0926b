use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Multiclass confusion matrix over string labels.
///
/// The label space is seeded with the closed set the caller declares, so a
/// category with zero support still gets a row and every configuration is
/// averaged over the same denominator. `Unknown` is an ordinary label here:
/// a classifier that dodges with `Unknown` pays for it in every aggregate.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    // counts[truth][predicted]
    counts: Vec<Vec<usize>>,
    total: usize,
}

impl ConfusionMatrix {
    /// Build from `(predicted, actual)` pairs over the given label set. Any
    /// label appearing in the data but missing from the set is added, so
    /// nothing observed is silently dropped; labels are kept sorted so
    /// reports are deterministic regardless of input order.
    pub fn from_pairs<'a, I>(label_set: &[&str], pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
    {
        let mut label_set: BTreeSet<String> =
            label_set.iter().map(|l| l.to_string()).collect();
        for (predicted, actual) in pairs.clone() {
            label_set.insert(predicted.to_string());
            label_set.insert(actual.to_string());
        }
        let labels: Vec<String> = label_set.into_iter().collect();

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        let mut total = 0;
        for (predicted, actual) in pairs {
            let p = labels.iter().position(|l| l == predicted);
            let t = labels.iter().position(|l| l == actual);
            if let (Some(p), Some(t)) = (p, t) {
                counts[t][p] += 1;
                total += 1;
            }
        }

        Self {
            labels,
            counts,
            total,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Count of items with the given true label predicted as the given label.
    pub fn count(&self, actual: &str, predicted: &str) -> usize {
        let t = self.labels.iter().position(|l| l == actual);
        let p = self.labels.iter().position(|l| l == predicted);
        match (t, p) {
            (Some(t), Some(p)) => self.counts[t][p],
            _ => 0,
        }
    }

    fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Items whose true label is `k` (row sum).
    fn true_count(&self, k: usize) -> usize {
        self.counts[k].iter().sum()
    }

    /// Items predicted as `k` (column sum).
    fn predicted_count(&self, k: usize) -> usize {
        self.counts.iter().map(|row| row[k]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct() as f64 / self.total as f64
    }

    fn label_metrics(&self, k: usize) -> LabelMetrics {
        let tp = self.counts[k][k];
        let predicted = self.predicted_count(k);
        let support = self.true_count(k);

        let precision = ratio(tp, predicted);
        let recall = ratio(tp, support);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        LabelMetrics {
            label: self.labels[k].clone(),
            precision,
            recall,
            f1,
            support,
        }
    }

    pub fn macro_f1(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        let sum: f64 = (0..self.labels.len())
            .map(|k| self.label_metrics(k).f1)
            .sum();
        sum / self.labels.len() as f64
    }

    /// F1 averaged with each label weighted by its true-label support.
    pub fn weighted_f1(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: f64 = (0..self.labels.len())
            .map(|k| self.label_metrics(k).f1 * self.true_count(k) as f64)
            .sum();
        sum / self.total as f64
    }

    /// Cohen's kappa: agreement corrected for chance. Zero when chance
    /// agreement saturates (all mass on one label).
    pub fn cohen_kappa(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let s = self.total as f64;
        let po = self.accuracy();
        let pe: f64 = (0..self.labels.len())
            .map(|k| (self.predicted_count(k) as f64 / s) * (self.true_count(k) as f64 / s))
            .sum();
        if (1.0 - pe).abs() < f64::EPSILON {
            return 0.0;
        }
        (po - pe) / (1.0 - pe)
    }

    /// Multiclass Matthews correlation coefficient. Zero on a degenerate
    /// matrix where either column is constant.
    pub fn matthews_corrcoef(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let s = self.total as f64;
        let c = self.correct() as f64;

        let mut dot = 0.0;
        let mut p_sq = 0.0;
        let mut t_sq = 0.0;
        for k in 0..self.labels.len() {
            let p = self.predicted_count(k) as f64;
            let t = self.true_count(k) as f64;
            dot += p * t;
            p_sq += p * p;
            t_sq += t * t;
        }

        let denominator = ((s * s - p_sq) * (s * s - t_sq)).sqrt();
        if denominator == 0.0 {
            return 0.0;
        }
        (c * s - dot) / denominator
    }

    pub fn report(&self) -> EvaluationReport {
        EvaluationReport {
            total: self.total,
            accuracy: self.accuracy(),
            macro_f1: self.macro_f1(),
            weighted_f1: self.weighted_f1(),
            cohen_kappa: self.cohen_kappa(),
            matthews_corrcoef: self.matthews_corrcoef(),
            per_label: (0..self.labels.len())
                .map(|k| self.label_metrics(k))
                .collect(),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub weighted_f1: f64,
    pub cohen_kappa: f64,
    pub matthews_corrcoef: f64,
    pub per_label: Vec<LabelMetrics>,
}
