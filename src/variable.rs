use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::error::{Error, Result};
use crate::membership::MembershipFunc;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

// Slotmap keys repeat across registries, so handles also carry their registry
static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(0);

/// Whether a variable is read in rule premises or written by rule conclusions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Antecedent,
    Consequent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Antecedent => f.write_str("antecedent"),
            Self::Consequent => f.write_str("consequent"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "antecedent" => Ok(Self::Antecedent),
            "consequent" => Ok(Self::Consequent),
            _ => Err(Error::InvalidRole { role: s.to_owned() }),
        }
    }
}

/// A typed reference to one membership term of one variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TermHandle {
    pub(crate) registry: u64,
    pub(crate) var: VariableKey,
    pub(crate) term: usize,
    pub(crate) role: Role,
}

impl TermHandle {
    pub fn role(&self) -> Role {
        self.role
    }
}

#[derive(Debug)]
pub(crate) struct Term {
    pub(crate) name: String,
    pub(crate) membership: Vec<f64>,
}

#[derive(Debug)]
pub struct Variable {
    registry: u64,
    key: VariableKey,
    name: String,
    role: Role,
    pub(crate) universe: Vec<f64>,
    pub(crate) terms: Vec<Term>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.name.as_str())
    }

    pub fn get_term(&self, name: &str) -> Result<TermHandle> {
        self.terms
            .iter()
            .position(|t| t.name == name)
            .map(|term| TermHandle {
                registry: self.registry,
                var: self.key,
                term,
                role: self.role,
            })
            .ok_or_else(|| Error::UnknownTerm {
                variable: self.name.clone(),
                term: name.to_owned(),
            })
    }

    /// The membership curve of `term`, one degree per universe sample.
    pub fn membership(&self, term: &str) -> Option<&[f64]> {
        self.terms
            .iter()
            .find(|t| t.name == term)
            .map(|t| t.membership.as_slice())
    }

    pub(crate) fn term(&self, handle: TermHandle) -> &Term {
        &self.terms[handle.term]
    }
}

#[derive(Debug)]
pub struct Variables {
    pub(crate) id: u64,
    pub(crate) vars: SlotMap<VariableKey, Variable>,
    by_name: HashMap<String, VariableKey>,
}

impl Default for Variables {
    fn default() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            vars: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variable over `domain` with one term per membership function.
    ///
    /// Nothing is registered unless every curve builds.
    pub fn add_variable(
        &mut self,
        domain: impl Into<Vec<f64>>,
        name: impl Into<String>,
        membership_funcs: impl IntoIterator<Item = MembershipFunc>,
        role: Role,
    ) -> Result<&Variable> {
        let name = name.into();
        let universe = domain.into();

        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateName { name });
        }
        validate_domain(&name, &universe)?;

        let mut terms: Vec<Term> = Vec::new();

        for mf in membership_funcs {
            if terms.iter().any(|t| t.name == mf.term) {
                return Err(Error::DuplicateName {
                    name: format!("{name}.{}", mf.term),
                });
            }

            let membership = mf.build(&universe)?;

            terms.push(Term {
                name: mf.term,
                membership,
            });
        }

        debug!(variable = %name, %role, n_samples = universe.len(), n_terms = terms.len(), "registered variable");

        let registry = self.id;
        let key = self.vars.insert_with_key(|key| Variable {
            registry,
            key,
            name: name.clone(),
            role,
            universe,
            terms,
        });
        self.by_name.insert(name, key);

        Ok(&self.vars[key])
    }

    /// Same as [`Variables::add_variable`] with the role given as a keyword.
    pub fn add_variable_str(
        &mut self,
        domain: impl Into<Vec<f64>>,
        name: impl Into<String>,
        membership_funcs: impl IntoIterator<Item = MembershipFunc>,
        role: &str,
    ) -> Result<&Variable> {
        let role = role.parse()?;

        self.add_variable(domain, name, membership_funcs, role)
    }

    pub fn get_variable(&self, name: &str) -> Result<&Variable> {
        self.by_name
            .get(name)
            .map(|key| &self.vars[*key])
            .ok_or_else(|| Error::UnknownVariable { name: name.to_owned() })
    }

    /// Shorthand for `get_variable(variable)?.get_term(term)`.
    pub fn term(&self, variable: &str, term: &str) -> Result<TermHandle> {
        self.get_variable(variable)?.get_term(term)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.values()
    }

    pub(crate) fn contains(&self, handle: TermHandle) -> bool {
        handle.registry == self.id
            && self
                .vars
                .get(handle.var)
                .is_some_and(|v| handle.term < v.terms.len() && v.role == handle.role)
    }
}

fn validate_domain(name: &str, universe: &[f64]) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidDomain {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    if universe.is_empty() {
        return Err(invalid("domain is empty"));
    }
    if universe.iter().any(|u| !u.is_finite()) {
        return Err(invalid("domain contains a non-finite value"));
    }
    if universe.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("domain is not strictly increasing"));
    }

    Ok(())
}
