use super::ast::Symbol;
use super::error::RuntimeError;
use std::{collections::BTreeMap, fmt::Display, rc::Rc};

/// Variable store threaded through evaluation.
///
/// Clones share the underlying map; an update on a shared store copies it
/// first, so a store handed to one branch is never changed by another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Store {
    bindings: Rc<BTreeMap<Symbol, Option<i64>>>,
    /// Value read for absent or undefined names. `None` makes such reads fault.
    fallback: Option<i64>,
}

impl Store {
    /// Partial store: reading an absent or undefined name faults.
    pub fn new() -> Store {
        Store {
            bindings: Rc::new(BTreeMap::new()),
            fallback: None,
        }
    }

    /// Total store: every name reads as 0 until assigned.
    pub fn zeroed() -> Store {
        Store {
            bindings: Rc::new(BTreeMap::new()),
            fallback: Some(0),
        }
    }

    /// Partial store with each name bound to undefined.
    pub fn declared<'a, I: IntoIterator<Item = &'a Symbol>>(names: I) -> Store {
        let mut store = Store::new();
        for name in names {
            store.bind(name.clone());
        }
        store
    }

    /// Builder-style assignment.
    pub fn with(mut self, name: Symbol, value: i64) -> Store {
        self.assign(name, value);
        self
    }

    /// Binds `name` to the undefined value.
    pub fn bind(&mut self, name: Symbol) {
        Rc::make_mut(&mut self.bindings).insert(name, None);
    }

    pub fn assign(&mut self, name: Symbol, value: i64) {
        Rc::make_mut(&mut self.bindings).insert(name, Some(value));
    }

    pub fn lookup(&self, name: &Symbol) -> Result<i64, RuntimeError> {
        match (self.bindings.get(name), self.fallback) {
            (Some(Some(value)), _) => Ok(*value),
            (_, Some(value)) => Ok(value),
            (Some(None), None) => Err(RuntimeError::Uninitialized { id: name.clone() }),
            (None, None) => Err(RuntimeError::UnboundVariable { id: name.clone() }),
        }
    }

    /// The raw binding: `None` if absent, `Some(None)` if undefined.
    pub fn get(&self, name: &Symbol) -> Option<Option<i64>> {
        self.bindings.get(name).copied()
    }

    /// Looks a name up by its string form; handy in tests.
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.bindings
            .iter()
            .find(|(id, _)| id.as_str() == name)
            .and_then(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, Option<i64>)> {
        self.bindings.iter().map(|(id, value)| (id, *value))
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

impl Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bindings = self
            .iter()
            .map(|(id, value)| match value {
                Some(n) => format!("{} = {}", id, n),
                None => format!("{} = undefined", id),
            })
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{{{}}}", bindings)
    }
}
