//! Host expressions.
//!
//! `[( ... )]` inside a rule does not embed code. The trimmed text between
//! the delimiters is a key into a `HostRegistry` supplied by the caller when
//! the tokenizer is built, and the registered callback runs against the
//! `ScanContext` of the call in progress.

use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    sync::Arc,
};

use crate::{spec::types::Definition, tokenizer::context::ScanContext};

pub type HostTestFn = dyn Fn(&ScanContext) -> bool + Send + Sync;
pub type HostActionFn = dyn Fn(&mut ScanContext) -> Result<(), String> + Send + Sync;

/// A resolved test callback.
#[derive(Clone)]
pub struct HostTest {
    pub expression: String,
    callback: Arc<HostTestFn>,
}

impl HostTest {
    pub fn call(&self, context: &ScanContext) -> bool {
        (self.callback)(context)
    }
}

impl Debug for HostTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostTest([({})])", self.expression)
    }
}

/// A resolved action callback.
#[derive(Clone)]
pub struct HostAction {
    pub expression: String,
    callback: Arc<HostActionFn>,
}

impl HostAction {
    pub fn call(&self, context: &mut ScanContext) -> Result<(), String> {
        (self.callback)(context)
    }
}

impl Debug for HostAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostAction([({})])", self.expression)
    }
}

/// Callbacks available to `[( ... )]` expressions of a specification.
#[derive(Clone, Default)]
pub struct HostRegistry {
    tests: HashMap<String, Arc<HostTestFn>>,
    actions: HashMap<String, Arc<HostActionFn>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the callback used when `[(expression)]` appears in a test.
    pub fn with_test<F>(mut self, expression: &str, callback: F) -> Self
    where
        F: Fn(&ScanContext) -> bool + Send + Sync + 'static,
    {
        self.tests
            .insert(expression.trim().to_string(), Arc::new(callback));
        self
    }

    /// Registers the callback used when `[(expression)]` appears in an action.
    pub fn with_action<F>(mut self, expression: &str, callback: F) -> Self
    where
        F: Fn(&mut ScanContext) -> Result<(), String> + Send + Sync + 'static,
    {
        self.actions
            .insert(expression.trim().to_string(), Arc::new(callback));
        self
    }

    pub fn resolve_test(&self, expression: &str) -> Option<HostTest> {
        self.tests.get(expression).map(|callback| HostTest {
            expression: expression.to_string(),
            callback: Arc::clone(callback),
        })
    }

    pub fn resolve_action(&self, expression: &str) -> Option<HostAction> {
        self.actions.get(expression).map(|callback| HostAction {
            expression: expression.to_string(),
            callback: Arc::clone(callback),
        })
    }
}

impl Debug for HostRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostRegistry")
            .field("tests", &self.tests.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Names a rule clause may refer to while it is compiled.
pub struct CompileScope<'a> {
    definitions: HashSet<String>,
    hosts: &'a HostRegistry,
}

impl<'a> CompileScope<'a> {
    pub fn new(definitions: &[Definition], hosts: &'a HostRegistry) -> Self {
        CompileScope {
            definitions: definitions
                .iter()
                .map(|definition| definition.name.clone())
                .collect(),
            hosts,
        }
    }

    pub fn is_definition(&self, name: &str) -> bool {
        self.definitions.contains(name)
    }

    pub fn hosts(&self) -> &HostRegistry {
        self.hosts
    }
}
