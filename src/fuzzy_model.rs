use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::inference::{ControlSystem, InferenceConfig};
use crate::inputs::Inputs;
use crate::model::{Metrics, Model};
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::variable::Variables;

/// Setup hooks of an expert-specified fuzzy model.
///
/// `add_variables` runs first, then `add_rules` with the finished registry.
/// The result is compiled once into a [`ControlSystem`].
pub trait FuzzyRuleset {
    fn add_variables(&self, vars: &mut Variables) -> Result<()>;

    fn add_rules(&self, vars: &Variables, rules: &mut Rules) -> Result<()>;

    fn config(&self) -> InferenceConfig {
        InferenceConfig::default()
    }
}

/// A labelled case: crisp inputs and the outputs an expert expects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    pub inputs: Inputs,
    pub expected: HashMap<String, f64>,
}

impl Sample {
    pub fn new(inputs: Inputs) -> Self {
        Self {
            inputs,
            expected: HashMap::new(),
        }
    }

    pub fn expect(mut self, var: impl Into<String>, val: f64) -> Self {
        self.expected.insert(var.into(), val);
        self
    }
}

#[derive(Debug)]
pub struct FuzzyLogicModel {
    system: ControlSystem,
    samples: Vec<Sample>,
}

impl FuzzyLogicModel {
    pub fn build(ruleset: &impl FuzzyRuleset) -> Result<Self> {
        let mut vars = Variables::new();
        ruleset.add_variables(&mut vars)?;

        let mut rules = Rules::new();
        ruleset.add_rules(&vars, &mut rules)?;

        let system = ControlSystem::new(vars, rules, ruleset.config())?;

        Ok(Self {
            system,
            samples: Vec::new(),
        })
    }

    /// Cases returned by [`Model::load_data`].
    pub fn with_samples(mut self, samples: Vec<Sample>) -> Self {
        self.samples = samples;
        self
    }

    pub fn control_system(&self) -> &ControlSystem {
        &self.system
    }

    pub fn predict(&self, inputs: &Inputs) -> Result<Outputs> {
        self.system.predict(inputs)
    }
}

impl Model for FuzzyLogicModel {
    type Dataset = Vec<Sample>;
    type Prepared = Vec<Sample>;
    type Input = Inputs;
    type Output = Outputs;

    fn load_data(&mut self) -> Result<Vec<Sample>> {
        Ok(self.samples.clone())
    }

    fn prep_data(&mut self, data: Vec<Sample>) -> Result<Vec<Sample>> {
        Ok(data)
    }

    /// Rules come from the expert, so there is nothing to fit.
    fn train(&mut self, prepared: &Vec<Sample>) -> Result<()> {
        debug!(n_samples = prepared.len(), "fuzzy model has no trainable parameters");
        Ok(())
    }

    /// Mean absolute error per consequent, reported as `mae_<name>`.
    fn evaluate(&mut self, prepared: &Vec<Sample>) -> Result<Metrics> {
        let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();

        for sample in prepared {
            let outputs = self.system.predict(&sample.inputs)?;

            for (var, expected) in &sample.expected {
                let actual = outputs.get(var).ok_or_else(|| Error::UnknownVariable { name: var.clone() })?;
                let (sum, n) = totals.entry(var.as_str()).or_default();

                *sum += (actual - expected).abs();
                *n += 1;
            }
        }

        Ok(totals
            .into_iter()
            .map(|(var, (sum, n))| (format!("mae_{var}"), sum / n as f64))
            .collect())
    }

    fn predict(&self, input: &Inputs) -> Result<Outputs> {
        self.system.predict(input)
    }
}
