//! The lifecycle every concrete model follows:
//! `load_data -> prep_data -> train -> evaluate / predict`.

use std::collections::HashMap;

use crate::error::Result;

/// Named evaluation scores, e.g. `"mape" -> 7.4`.
pub type Metrics = HashMap<String, f64>;

pub trait Model {
    /// Raw data as loaded from its source
    type Dataset;
    /// Data after splitting / feature preparation
    type Prepared;
    type Input;
    type Output;

    fn load_data(&mut self) -> Result<Self::Dataset>;

    fn prep_data(&mut self, data: Self::Dataset) -> Result<Self::Prepared>;

    fn train(&mut self, prepared: &Self::Prepared) -> Result<()>;

    fn evaluate(&mut self, prepared: &Self::Prepared) -> Result<Metrics>;

    fn predict(&self, input: &Self::Input) -> Result<Self::Output>;
}
