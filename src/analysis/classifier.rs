//! Three-way spending classification over two fixed linear decision
//! boundaries.
//!
//! The boundaries come from a logistic regression trained offline; inference
//! here is the explicit sigmoid-of-linear-score formula rather than a model
//! runtime, which is numerically identical to `predict_proba` on a fitted
//! two-feature model.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::analysis::model::BoundaryModel;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("degenerate decision boundary '{name}': vertical-axis coefficient is zero")]
    DegenerateBoundary { name: String },
}

/// A linear classifier in (margin-or-ratio, total-spending) space:
/// a 2-element coefficient vector plus an intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBoundary {
    pub coefficients: [f64; 2],
    pub intercept: f64,
}

impl DecisionBoundary {
    /// Predicted probability of the positive class for the point (x, y).
    pub fn probability(&self, x: f64, y: f64) -> f64 {
        let [w0, w1] = self.coefficients;
        sigmoid(w0 * x + w1 * y + self.intercept)
    }

    /// The boundary as y(x) = -(w0*x + c) / w1, evaluated at each sample.
    /// Errors when w1 is zero instead of emitting infinite coordinates.
    pub fn line(&self, name: &str, xs: &[f64]) -> Result<Vec<[f64; 2]>, ClassifierError> {
        let [w0, w1] = self.coefficients;
        if w1 == 0.0 {
            return Err(ClassifierError::DegenerateBoundary {
                name: name.to_string(),
            });
        }
        Ok(xs
            .iter()
            .map(|&x| [x, -(w0 * x + self.intercept) / w1])
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Saver,
    Balanced,
    #[serde(rename = "Over-Spender")]
    OverSpender,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Saver => "Saver",
            Category::Balanced => "Balanced",
            Category::OverSpender => "Over-Spender",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boundary polylines returned for visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCoordinates {
    pub saver_balanced: Vec<[f64; 2]>,
    pub balanced_overspender: Vec<[f64; 2]>,
}

/// Two-stage threshold cascade, first boundary wins.
///
/// Below the saver/balanced boundary (p < 0.5) the point is a Saver; below
/// the balanced/over-spender boundary it is Balanced; anything else,
/// including exact 0.5 ties, is an Over-Spender.
pub fn classify(model: &BoundaryModel, x: f64, y: f64) -> Category {
    if model.saver_balanced.probability(x, y) < 0.5 {
        Category::Saver
    } else if model.balanced_overspender.probability(x, y) < 0.5 {
        Category::Balanced
    } else {
        Category::OverSpender
    }
}

/// Evaluates both boundary lines over the given x samples.
pub fn boundary_lines(
    model: &BoundaryModel,
    xs: &[f64],
) -> Result<BoundaryCoordinates, ClassifierError> {
    Ok(BoundaryCoordinates {
        saver_balanced: model.saver_balanced.line("saver_balanced", xs)?,
        balanced_overspender: model.balanced_overspender.line("balanced_overspender", xs)?,
    })
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
