//! Case registry.
//!
//! Build-time populated, read-only during a run. Registration order is
//! the report order.

use indexmap::IndexMap;
use thiserror::Error;

use attest_domain::{CaseId, TestCase};

/// Errors raised while populating the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two cases share an identifier.
    #[error("duplicate case id: {0}")]
    DuplicateId(CaseId),

    /// A case has an empty identifier.
    #[error("case id must not be empty")]
    EmptyId,
}

/// Ordered collection of registered test cases.
#[derive(Debug, Clone, Default)]
pub struct CaseRegistry {
    cases: IndexMap<CaseId, TestCase>,
}

impl CaseRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cases: IndexMap::new(),
        }
    }

    /// Builds a registry from an ordered case list.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] on the first duplicate or empty id.
    pub fn from_cases(cases: impl IntoIterator<Item = TestCase>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for case in cases {
            registry.register(case)?;
        }
        Ok(registry)
    }

    /// Registers a case.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if a case with the same id
    /// is already registered, [`RegistryError::EmptyId`] if the id is
    /// empty.
    pub fn register(&mut self, case: TestCase) -> Result<(), RegistryError> {
        if case.id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if self.cases.contains_key(&case.id) {
            return Err(RegistryError::DuplicateId(case.id));
        }
        self.cases.insert(case.id.clone(), case);
        Ok(())
    }

    /// Returns the cases in registration order.
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.values()
    }

    /// Returns the number of registered cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true if no case is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use attest_domain::HttpMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = CaseRegistry::new();
        registry
            .register(TestCase::new("b", HttpMethod::Get, "/b"))
            .unwrap();
        registry
            .register(TestCase::new("a", HttpMethod::Get, "/a"))
            .unwrap();
        registry
            .register(TestCase::new("c", HttpMethod::Get, "/c"))
            .unwrap();

        let ids: Vec<_> = registry.cases().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = CaseRegistry::new();
        registry
            .register(TestCase::new("dup", HttpMethod::Get, "/x"))
            .unwrap();

        let result = registry.register(TestCase::new("dup", HttpMethod::Post, "/y"));
        assert_eq!(
            result,
            Err(RegistryError::DuplicateId(CaseId::new("dup")))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut registry = CaseRegistry::new();
        let result = registry.register(TestCase::new("", HttpMethod::Get, "/x"));
        assert_eq!(result, Err(RegistryError::EmptyId));
    }

    #[test]
    fn test_from_cases() {
        let registry = CaseRegistry::from_cases(vec![
            TestCase::new("one", HttpMethod::Get, "/1"),
            TestCase::new("two", HttpMethod::Get, "/2"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);

        let result = CaseRegistry::from_cases(vec![
            TestCase::new("one", HttpMethod::Get, "/1"),
            TestCase::new("one", HttpMethod::Get, "/1"),
        ]);
        assert!(result.is_err());
    }
}
