//! Machine learning models

pub mod decision_tree;

pub use decision_tree::{DecisionTree, TreeConfig, TreeError};
