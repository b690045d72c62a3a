//! File and namespace locations for declarations.

/// A place output can go: a file, optionally inside a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub file_name: String,
    pub namespace: Option<Vec<String>>,
}

impl Location {
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            namespace: None,
        }
    }

    #[must_use]
    pub fn with_namespace(file_name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            file_name: file_name.into(),
            namespace: Some(namespace),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name)?;
        if let Some(namespace) = &self.namespace {
            for part in namespace {
                write!(f, "::{part}")?;
            }
        }
        Ok(())
    }
}

/// A location plus the declaration's name; unique per program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclarationLocation {
    pub location: Location,
    pub name: String,
}

impl DeclarationLocation {
    #[must_use]
    pub fn new(location: Location, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.location.file_name
    }
}

impl std::fmt::Display for DeclarationLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.location, self.name)
    }
}

/// Whether two locations point at the same file.
#[must_use]
pub fn file_name_equal(a: &Location, b: &Location) -> bool {
    a.file_name == b.file_name
}

/// Whether two locations carry the same namespace. Absence equals
/// absence; present namespaces compare element-wise.
#[must_use]
pub fn namespace_equal(a: &Location, b: &Location) -> bool {
    match (&a.namespace, &b.namespace) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Whether two locations agree on both file and namespace.
#[must_use]
pub fn file_and_namespace_equal(a: &Location, b: &Location) -> bool {
    file_name_equal(a, b) && namespace_equal(a, b)
}

#[cfg(test)]
#[path = "../tests/location_tests.rs"]
mod tests;
