//! Trained classifier artifacts and the loader that brings them into memory.

mod artifact;
mod loader;

pub use artifact::{ClassifierSpec, DecisionTree, ModelArtifact, TreeNode};
pub use loader::{LoadedModel, ModelLoader};

/// Two-call contract the scoring adapter needs from a trained binary classifier.
pub trait BinaryClassifier: Send + Sync {
    /// Column names the classifier expects, in order.
    fn feature_names(&self) -> &[String];

    /// Class distribution `[p(label 0), p(label 1)]` for one row.
    fn predict_proba(&self, row: &[f64]) -> [f64; 2];

    /// Hard decision: the class with the higher probability, ties going to 0.
    fn predict(&self, row: &[f64]) -> u8 {
        let [negative, positive] = self.predict_proba(row);
        u8::from(positive > negative)
    }
}
