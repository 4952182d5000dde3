use tracing::debug;

use crate::dsl::Expr;
use crate::error::{Error, Result};
use crate::variable::{Role, TermHandle};

#[derive(Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Adds `if_ => then_` under `name`.
    ///
    /// Names need not be unique: every rule is kept, and rules concluding the
    /// same term are combined by the aggregation operator at inference time.
    pub fn add_rule(&mut self, name: impl Into<String>, if_: impl Into<Expr>, then_: TermHandle) -> Result<()> {
        let name = name.into();
        let premise = if_.into();

        if then_.role() != Role::Consequent {
            return Err(Error::InvalidRule {
                rule: name,
                reason: "conclusion must be a consequent term".into(),
            });
        }
        if premise.terms().iter().any(|t| t.role() != Role::Antecedent) {
            return Err(Error::InvalidRule {
                rule: name,
                reason: "premise may only reference antecedent terms".into(),
            });
        }

        debug!(rule = %name, n_terms = premise.terms().len(), "registered rule");

        self.0.push(Rule {
            name,
            premise,
            consequence: then_,
        });

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) premise: Expr,
    pub(crate) consequence: TermHandle,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    pub fn consequence(&self) -> TermHandle {
        self.consequence
    }
}
