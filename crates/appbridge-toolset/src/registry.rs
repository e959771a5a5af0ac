//! Name-keyed tool registry.

use appbridge_openapi::RestApiTool;
use std::collections::HashMap;
use std::sync::Arc;

/// An insertion-ordered, name-keyed collection of generated tools.
///
/// Populated exactly once during toolset construction and never mutated after; reads
/// are therefore safe from any number of threads. Duplicate names are last-write-wins:
/// the later tool replaces the earlier one at its original position, so iteration order
/// stays the order the parser first produced each name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<RestApiTool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool keyed by its name, replacing any earlier tool with the same name.
    ///
    /// Returns the replaced tool, if any.
    pub(crate) fn insert(&mut self, tool: RestApiTool) -> Option<Arc<RestApiTool>> {
        let tool = Arc::new(tool);
        match self.index.get(tool.name.as_str()) {
            Some(&slot) => Some(std::mem::replace(&mut self.tools[slot], tool)),
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
                None
            }
        }
    }

    /// All tools, in insertion order.
    #[must_use]
    pub fn tools(&self) -> &[Arc<RestApiTool>] {
        &self.tools
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<RestApiTool>> {
        self.index.get(name).map(|&slot| &self.tools[slot])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
