use serde::{Deserialize, Serialize};

const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// Serialized classifier as exported by the training notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Column names the classifier was fitted on, in fit order.
    pub feature_names: Vec<String>,
    pub classifier: ClassifierSpec,
}

fn default_model_name() -> String {
    "unnamed".to_string()
}

/// Supported binary classifier families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// Random-forest style ensemble: the probability is the mean leaf distribution.
    TreeEnsemble { trees: Vec<DecisionTree> },
}

/// Flat node list; node 0 is the root and children always follow their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Rows with `row[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class distribution `[p(no default), p(default)]`.
    Leaf { value: [f64; 2] },
}

impl ModelArtifact {
    /// Structural checks run once at load time so scoring never walks a broken tree.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.is_empty() {
            return Err("artifact declares no feature names".to_string());
        }

        let width = self.feature_names.len();
        match &self.classifier {
            ClassifierSpec::LogisticRegression {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != width {
                    return Err(format!(
                        "expected {width} coefficients, found {}",
                        coefficients.len()
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("logistic parameters must be finite".to_string());
                }
            }
            ClassifierSpec::TreeEnsemble { trees } => {
                if trees.is_empty() {
                    return Err("tree ensemble contains no trees".to_string());
                }
                for (index, tree) in trees.iter().enumerate() {
                    tree.validate(width)
                        .map_err(|reason| format!("tree {index}: {reason}"))?;
                }
            }
        }

        Ok(())
    }

    pub fn positive_probability(&self, row: &[f64]) -> f64 {
        match &self.classifier {
            ClassifierSpec::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let margin = coefficients
                    .iter()
                    .zip(row)
                    .fold(*intercept, |acc, (coefficient, value)| {
                        acc + coefficient * value
                    });
                sigmoid(margin)
            }
            ClassifierSpec::TreeEnsemble { trees } => {
                let total: f64 = trees.iter().map(|tree| tree.leaf(row)[1]).sum();
                total / trees.len() as f64
            }
        }
    }
}

impl DecisionTree {
    fn validate(&self, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= width {
                        return Err(format!(
                            "node {index} splits on feature {feature} of {width}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {index} has a non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("node {index} points at invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    let in_range = value.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p));
                    let total = value[0] + value[1];
                    if !in_range || (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
                        return Err(format!("leaf {index} is not a probability distribution"));
                    }
                }
            }
        }

        Ok(())
    }

    fn leaf(&self, row: &[f64]) -> [f64; 2] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

fn sigmoid(margin: f64) -> f64 {
    if margin >= 0.0 {
        1.0 / (1.0 + (-margin).exp())
    } else {
        let exp = margin.exp();
        exp / (1.0 + exp)
    }
}
