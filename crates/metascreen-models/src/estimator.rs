//! Estimator parameter sets and their `predict_proba`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    RandomForest {
        trees: Vec<Tree>,
    },
    /// One coefficient row per class (softmax), or a single row for a
    /// binary problem (sigmoid of the second class).
    Logistic {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
}

/// Decision tree in flat node form; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class sample counts or weights at the leaf.
    Leaf(Vec<f64>),
}

impl Estimator {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        match self {
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random forest has no trees".into());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(n_features, n_classes)
                        .map_err(|e| format!("tree {i}: {e}"))?;
                }
                Ok(())
            }
            Estimator::Logistic {
                coefficients,
                intercepts,
            } => {
                let binary = n_classes == 2 && coefficients.len() == 1;
                if !binary && coefficients.len() != n_classes {
                    return Err(format!(
                        "{} coefficient rows for {n_classes} classes",
                        coefficients.len()
                    ));
                }
                if intercepts.len() != coefficients.len() {
                    return Err(format!(
                        "{} intercepts for {} coefficient rows",
                        intercepts.len(),
                        coefficients.len()
                    ));
                }
                for row in coefficients {
                    if row.len() != n_features {
                        return Err(format!(
                            "coefficient row has {} entries, expected {n_features}",
                            row.len()
                        ));
                    }
                }
                if coefficients.iter().flatten().chain(intercepts).any(|v| !v.is_finite()) {
                    return Err("non-finite logistic parameter".into());
                }
                Ok(())
            }
        }
    }

    /// Class probabilities in `[0, 1]`, one per class.
    pub fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        match self {
            Estimator::RandomForest { trees } => {
                let mut sum: Vec<f64> = Vec::new();
                for tree in trees {
                    let dist = tree.predict_proba(x);
                    if sum.is_empty() {
                        sum = vec![0.0; dist.len()];
                    }
                    for (acc, p) in sum.iter_mut().zip(dist) {
                        *acc += p;
                    }
                }
                let n = trees.len() as f64;
                sum.into_iter().map(|s| s / n).collect()
            }
            Estimator::Logistic {
                coefficients,
                intercepts,
            } => {
                let logits: Vec<f64> = coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b)
                    .collect();
                if let [z] = logits[..] {
                    let p = sigmoid(z);
                    vec![1.0 - p, p]
                } else {
                    softmax(&logits)
                }
            }
        }
    }
}

impl Tree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("no nodes".into());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} uses feature {feature}, model has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite threshold"));
                    }
                    // children after parents rules out cycles
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child {child}"));
                        }
                    }
                }
                Node::Leaf(dist) => {
                    if dist.len() != n_classes {
                        return Err(format!(
                            "leaf {idx} has {} values for {n_classes} classes",
                            dist.len()
                        ));
                    }
                    if dist.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("leaf {idx} has an invalid value"));
                    }
                    if dist.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {idx} is empty"));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf(dist) => {
                    let total: f64 = dist.iter().sum();
                    return dist.iter().map(|v| v / total).collect();
                }
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
