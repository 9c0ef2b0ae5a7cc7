//! The transformation catalogue and the registry built from configuration.

use std::collections::HashSet;

use refract_syntax::SupportedLanguage;

use crate::error::RegistryError;
use crate::rules::{
    AssignmentToIncrement, CompoundOperator, ContractCompound, ExpandCompound, ForToWhile,
    IncrementToAssignment, ReturnTypeDeduction, ReturnTypeToAuto, WhileToFor,
};
use crate::transformation::Transformation;

const C_FAMILY: &[SupportedLanguage] = &[SupportedLanguage::Cpp, SupportedLanguage::C];
const CPP_ONLY: &[SupportedLanguage] = &[SupportedLanguage::Cpp];

/// Returns every available transformation in catalogue order.
#[must_use]
pub fn catalogue() -> Vec<Transformation> {
    let mut all = vec![
        Transformation::new(
            "increment_to_assignment",
            "x++ / --x in statement position becomes x = x + 1 / x = x - 1",
            C_FAMILY,
            IncrementToAssignment,
        ),
        Transformation::new(
            "assignment_to_increment",
            "x = x + 1 / x = x - 1 in statement position becomes x++ / x--",
            C_FAMILY,
            AssignmentToIncrement,
        ),
        Transformation::new(
            "return_type_deduction",
            "an auto return type becomes the type every return statement yields",
            CPP_ONLY,
            ReturnTypeDeduction,
        ),
        Transformation::new(
            "return_type_to_auto",
            "a concrete return type becomes auto",
            CPP_ONLY,
            ReturnTypeToAuto,
        ),
    ];

    for operator in CompoundOperator::ALL {
        let stem = operator.stem();
        let compound = operator.compound();
        let binary = operator.binary();
        all.push(Transformation::new(
            format!("{stem}_to_expanded"),
            format!("x {compound} e becomes x = x {binary} e"),
            C_FAMILY,
            ExpandCompound::new(operator),
        ));
        all.push(Transformation::new(
            format!("expanded_to_{stem}"),
            format!("x = x {binary} e becomes x {compound} e"),
            C_FAMILY,
            ContractCompound::new(operator),
        ));
    }

    all.push(Transformation::new(
        "for_to_while",
        "a for loop without continue becomes a while loop in its own block",
        C_FAMILY,
        ForToWhile,
    ));
    all.push(Transformation::new(
        "while_to_for",
        "while (cond) becomes for (; cond;)",
        C_FAMILY,
        WhileToFor,
    ));
    all
}

/// Looks up a single catalogue entry by name.
#[must_use]
pub fn lookup(name: &str) -> Option<Transformation> {
    catalogue()
        .into_iter()
        .find(|transformation| transformation.name() == name)
}

/// The ordered, immutable set of transformations enabled for a run.
#[derive(Debug, Clone)]
pub struct Registry {
    language: SupportedLanguage,
    enabled: Vec<Transformation>,
}

impl Registry {
    /// Builds a registry from configured names, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the list is empty or when a name is
    /// unknown, repeated or unsupported for `language`.
    pub fn from_names<S>(names: &[S], language: SupportedLanguage) -> Result<Self, RegistryError>
    where
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Err(RegistryError::Empty);
        }

        let available = catalogue();
        let mut seen = HashSet::new();
        let mut enabled = Vec::with_capacity(names.len());

        for requested in names {
            let name = requested.as_ref();
            if !seen.insert(name) {
                return Err(RegistryError::Duplicate {
                    name: name.to_owned(),
                });
            }
            let transformation = available
                .iter()
                .find(|candidate| candidate.name() == name)
                .ok_or_else(|| RegistryError::Unknown {
                    name: name.to_owned(),
                })?;
            if !transformation.supports(language) {
                return Err(RegistryError::UnsupportedLanguage {
                    name: name.to_owned(),
                    language,
                });
            }
            enabled.push(transformation.clone());
        }

        Ok(Self { language, enabled })
    }

    /// The language every enabled transformation supports.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Iterates the enabled transformations in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &Transformation> {
        self.enabled.iter()
    }

    /// Names of the enabled transformations in configured order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(Transformation::name)
    }

    /// Returns the enabled transformation called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Transformation> {
        self.enabled
            .iter()
            .find(|transformation| transformation.name() == name)
    }

    /// Number of enabled transformations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.enabled.len()
    }

    /// Always false for a constructed registry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Transformation;
    type IntoIter = std::slice::Iter<'a, Transformation>;

    fn into_iter(self) -> Self::IntoIter {
        self.enabled.iter()
    }
}
