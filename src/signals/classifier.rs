//! Next-bar direction classifier.
//!
//! A fresh decision tree is trained on every call from the rows it is given;
//! nothing is kept between calls.

use crate::error::PipelineError;
use crate::ml::{DecisionTree, TreeConfig};
use crate::models::indicators::IndicatorRow;
use crate::models::signal::SignalDirection;
use tracing::debug;

pub const MIN_TRAINING_ROWS: usize = 10;
pub const CLASSIFIER_SEED: u64 = 42;

/// `labels[i]` is whether the close of row `i + 1` is above the close of row `i`.
/// The final row has no label.
pub fn label_rows(rows: &[IndicatorRow]) -> Vec<bool> {
    rows.windows(2).map(|w| w[1].close() > w[0].close()).collect()
}

pub struct DirectionClassifier;

impl DirectionClassifier {
    /// Train on every row but the last, then predict the direction for the last row.
    pub fn predict(rows: &[IndicatorRow]) -> Result<(SignalDirection, &IndicatorRow), PipelineError> {
        let Some((last, history)) = rows.split_last() else {
            return Err(PipelineError::InsufficientHistory {
                stage: "training",
                available: 0,
                required: MIN_TRAINING_ROWS,
            });
        };

        let labels = label_rows(rows);
        let (features, targets): (Vec<[f64; 7]>, Vec<bool>) = history
            .iter()
            .zip(labels)
            .filter(|(row, _)| row.undefined_features().is_empty())
            .map(|(row, label)| (row.features(), label))
            .unzip();

        if features.len() < MIN_TRAINING_ROWS {
            return Err(PipelineError::InsufficientHistory {
                stage: "training",
                available: features.len(),
                required: MIN_TRAINING_ROWS,
            });
        }

        let undefined = last.undefined_features();
        if !undefined.is_empty() {
            return Err(PipelineError::UndefinedFeatures {
                features: undefined,
            });
        }

        let mut tree = DecisionTree::new(TreeConfig {
            seed: CLASSIFIER_SEED,
            ..TreeConfig::default()
        });
        tree.fit(&features, &targets)
            .map_err(|e| PipelineError::Unexpected(format!("training failed: {}", e)))?;
        let up = tree
            .predict_one(&last.features())
            .map_err(|e| PipelineError::Unexpected(format!("prediction failed: {}", e)))?;

        debug!(
            samples = features.len(),
            depth = tree.depth(),
            leaves = tree.n_leaves(),
            up,
            "Classifier: trained on {} rows (depth {}, {} leaves)",
            features.len(),
            tree.depth(),
            tree.n_leaves()
        );

        Ok((SignalDirection::from_prediction(up), last))
    }
}
