//! Collision-free name generation for passes that introduce new declarations.

use std::collections::{HashMap, HashSet};

/// A set of names already in use, able to mint fresh ones.
///
/// Passes that add ports or declarations to a module seed a namespace with
/// every name the module already declares and then ask it for new names.
/// A requested name is returned unchanged when it is free; otherwise a
/// `_<n>` suffix is appended with the smallest `n` that is free.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    used: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a namespace in which every name of `names` is already taken.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            used: names.into_iter().map(Into::into).collect(),
            next_suffix: HashMap::new(),
        }
    }

    /// Returns `true` if `name` is already taken.
    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Marks `name` as taken. Returns `false` if it already was.
    pub fn reserve(&mut self, name: impl Into<String>) -> bool {
        self.used.insert(name.into())
    }

    /// Returns a name starting with `base` that is not yet taken, and takes it.
    pub fn fresh(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let counter = self.next_suffix.entry(base.to_string()).or_insert(0);
        loop {
            let candidate = format!("{base}_{counter}");
            *counter += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Returns the number of names taken.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Returns `true` if no names are taken.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
