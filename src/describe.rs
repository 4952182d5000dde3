//! Post-hoc explanation of a trained model.
//!
//! The attribution computation itself (SHAP or similar) lives behind the
//! [`Explainer`] trait; this module only wires it to the model's training
//! features and checks what comes back.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Model;

/// Computes one attribution per (sample, feature) of a feature matrix.
pub trait Explainer {
    fn attributions(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

impl<F> Explainer for F
where
    F: Fn(ArrayView2<'_, f64>) -> Result<Array2<f64>>,
{
    fn attributions(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self(features)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Description {
    feature_names: Vec<String>,
    attributions: Array2<f64>,
}

impl Description {
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Shaped like the training feature matrix.
    pub fn attributions(&self) -> &Array2<f64> {
        &self.attributions
    }

    pub fn shape(&self) -> (usize, usize) {
        self.attributions.dim()
    }

    /// Features ranked by mean absolute attribution, largest first.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let means: Array1<f64> = self
            .attributions
            .mapv(f64::abs)
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.attributions.ncols()));
        let mut ranked: Vec<(String, f64)> = means
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let name = self.feature_names.get(i).cloned().unwrap_or_else(|| format!("f{i}"));
                (name, *m)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// A model whose predictions can be explained feature by feature.
pub trait Describable: Model {
    /// The matrix the model was trained on, if it has been prepared.
    fn training_features(&self) -> Option<ArrayView2<'_, f64>>;

    fn feature_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn explainer(&self) -> &dyn Explainer;

    fn describe(&self) -> Result<Description> {
        let features = self.training_features().ok_or(Error::NotTrained)?;
        let attributions = self.explainer().attributions(features)?;

        if attributions.dim() != features.dim() {
            return Err(Error::AttributionShape {
                expected: features.dim(),
                actual: attributions.dim(),
            });
        }

        debug!(n_samples = features.nrows(), n_features = features.ncols(), "described model");

        Ok(Description {
            feature_names: self.feature_names(),
            attributions,
        })
    }
}
