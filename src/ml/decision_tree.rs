//! CART decision tree for binary classification

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Decision tree configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until every leaf is pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Seed for the order in which features are searched for splits
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("cannot fit a tree on an empty training set")]
    EmptyTrainingSet,
    #[error("{features} feature rows but {labels} labels")]
    LabelMismatch { features: usize, labels: usize },
    #[error("sample {index} has {found} features, expected {expected}")]
    FeatureMismatch {
        index: usize,
        found: usize,
        expected: usize,
    },
    #[error("tree has not been fitted")]
    NotFitted,
}

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        positive: usize,
        negative: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Decision Tree model
#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    n_features: usize,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
        }
    }

    /// Train the tree on `features[i]` → `labels[i]`, replacing any previous fit.
    pub fn fit<F: AsRef<[f64]>>(&mut self, features: &[F], labels: &[bool]) -> Result<(), TreeError> {
        if features.is_empty() {
            return Err(TreeError::EmptyTrainingSet);
        }
        if features.len() != labels.len() {
            return Err(TreeError::LabelMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }

        let n_features = features[0].as_ref().len();
        for (index, row) in features.iter().enumerate() {
            let found = row.as_ref().len();
            if found != n_features {
                return Err(TreeError::FeatureMismatch {
                    index,
                    found,
                    expected: n_features,
                });
            }
        }

        let samples: Vec<&[f64]> = features.iter().map(|f| f.as_ref()).collect();
        let indices: Vec<usize> = (0..samples.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        self.n_features = n_features;
        self.root = Some(self.build_tree(&samples, labels, &indices, 0, &mut rng));
        Ok(())
    }

    fn build_tree(
        &self,
        samples: &[&[f64]],
        labels: &[bool],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let (positive, negative) = count_classes(labels, indices);
        let leaf = TreeNode::Leaf { positive, negative };

        if positive == 0
            || negative == 0
            || indices.len() < self.config.min_samples_split
            || self.config.max_depth.is_some_and(|max| depth >= max)
        {
            return leaf;
        }

        match self.find_best_split(samples, labels, indices, rng) {
            Some(split) => {
                let left = self.build_tree(samples, labels, &split.left, depth + 1, rng);
                let right = self.build_tree(samples, labels, &split.right, depth + 1, rng);
                TreeNode::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            None => leaf,
        }
    }

    fn find_best_split(
        &self,
        samples: &[&[f64]],
        labels: &[bool],
        indices: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Option<Split> {
        let mut feature_order: Vec<usize> = (0..self.n_features).collect();
        feature_order.shuffle(rng);

        let (positive, negative) = count_classes(labels, indices);
        let parent_impurity = gini(positive, negative);

        let n_total = indices.len();
        let mut best_gain = 0.0;
        let mut best: Option<(usize, f64)> = None;
        let mut sorted = indices.to_vec();

        for &feature in &feature_order {
            sorted.sort_by(|&a, &b| samples[a][feature].total_cmp(&samples[b][feature]));

            // Sweep left to right, moving one sample at a time into the left side.
            let (mut lp, mut ln) = (0usize, 0usize);
            for k in 0..n_total.saturating_sub(1) {
                if labels[sorted[k]] {
                    lp += 1;
                } else {
                    ln += 1;
                }

                let current = samples[sorted[k]][feature];
                let next = samples[sorted[k + 1]][feature];
                if current == next {
                    continue;
                }

                let n_left = k + 1;
                let n_right = n_total - n_left;
                if n_left < self.config.min_samples_leaf || n_right < self.config.min_samples_leaf {
                    continue;
                }

                let (rp, rn) = (positive - lp, negative - ln);
                let weighted = (n_left as f64 * gini(lp, ln) + n_right as f64 * gini(rp, rn))
                    / n_total as f64;
                let gain = parent_impurity - weighted;

                if gain > best_gain {
                    let mut threshold = (current + next) / 2.0;
                    if threshold >= next {
                        threshold = current;
                    }
                    best_gain = gain;
                    best = Some((feature, threshold));
                }
            }
        }

        let (feature, threshold) = best?;
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| samples[i][feature] <= threshold);
        Some(Split {
            feature,
            threshold,
            left,
            right,
        })
    }

    /// Predict the class of a single sample. Ties resolve to `false`.
    pub fn predict_one(&self, sample: &[f64]) -> Result<bool, TreeError> {
        let (positive, negative) = self.leaf_counts(sample)?;
        Ok(positive > negative)
    }

    /// Share of `true` training samples in the leaf reached by `sample`
    pub fn predict_proba_one(&self, sample: &[f64]) -> Result<f64, TreeError> {
        let (positive, negative) = self.leaf_counts(sample)?;
        Ok(positive as f64 / (positive + negative).max(1) as f64)
    }

    fn leaf_counts(&self, sample: &[f64]) -> Result<(usize, usize), TreeError> {
        let mut node = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        if sample.len() != self.n_features {
            return Err(TreeError::FeatureMismatch {
                index: 0,
                found: sample.len(),
                expected: self.n_features,
            });
        }

        loop {
            match node {
                TreeNode::Leaf { positive, negative } => return Ok((*positive, *negative)),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map(TreeNode::depth).unwrap_or(0)
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map(TreeNode::n_leaves).unwrap_or(0)
    }
}

fn count_classes(labels: &[bool], indices: &[usize]) -> (usize, usize) {
    let positive = indices.iter().filter(|&&i| labels[i]).count();
    (positive, indices.len() - positive)
}

fn gini(positive: usize, negative: usize) -> f64 {
    let total = (positive + negative) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let p = positive as f64 / total;
    let n = negative as f64 / total;
    1.0 - p * p - n * n
}
