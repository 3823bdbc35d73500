// ABOUTME: Central registry for MCP tools with lookup, schemas, and execution.
// ABOUTME: Provides tool discovery, category grouping, and feature-flag-based registration.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Tool Registry
//!
//! Central registry for MCP tools, providing:
//! - Tool registration and lookup
//! - Category grouping
//! - Feature-flag-based conditional registration
//! - Schema generation for MCP tools/list responses

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{AppResult, ToolError};
use crate::mcp::schema::ToolSchema;

use super::context::ToolExecutionContext;
use super::result::ToolResult;
use super::traits::McpTool;

/// Central registry for MCP tools.
///
/// Built once at startup and then used immutably for lookups. All
/// registered tools are `Arc`-wrapped.
///
/// # Example
///
/// ```
/// use nightscout_mcp_server::tools::registry::ToolRegistry;
///
/// let mut registry = ToolRegistry::new();
/// registry.register_builtin_tools();
/// assert!(registry.contains("glucose_current"));
/// ```
pub struct ToolRegistry {
    /// Registered tools by name
    tools: HashMap<String, Arc<dyn McpTool>>,
    /// Tool categories for organization
    categories: HashMap<String, Vec<String>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Registry with every tool enabled by cargo features
    #[must_use]
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_tools();
        registry
    }

    /// Register a tool in the registry
    ///
    /// # Returns
    ///
    /// `true` if the tool was registered, `false` if a tool with the same name exists
    pub fn register(&mut self, tool: Arc<dyn McpTool>) -> bool {
        let name = tool.name().to_owned();

        if self.tools.contains_key(&name) {
            warn!("Tool '{}' is already registered, skipping", name);
            return false;
        }

        debug!(
            "Registering tool '{}' with capabilities: {}",
            name,
            tool.capabilities().describe()
        );
        self.tools.insert(name, tool);
        true
    }

    /// Register a tool and categorize it
    pub fn register_with_category(&mut self, tool: Arc<dyn McpTool>, category: &str) {
        let name = tool.name().to_owned();
        if self.register(tool) {
            self.categories
                .entry(category.to_owned())
                .or_default()
                .push(name);
        }
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn McpTool>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tool names, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// List tool names in a specific category
    #[must_use]
    pub fn tools_in_category(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// List all categories, sorted
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Schemas of every registered tool, sorted by name
    #[must_use]
    pub fn all_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .map(|tool| ToolSchema {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema(),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Execute a tool by name
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the tool is not found or its execution fails
    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        context: &ToolExecutionContext,
    ) -> AppResult<ToolResult> {
        let tool = self.get(name).ok_or_else(|| ToolError::not_found(name))?;
        tool.execute(args, context).await
    }

    /// Register all built-in tools based on feature flags
    pub fn register_builtin_tools(&mut self) {
        info!("Registering built-in tools...");

        #[cfg(feature = "tools-glucose")]
        self.register_glucose_tools();

        #[cfg(feature = "tools-analytics")]
        self.register_analytics_tools();

        #[cfg(feature = "tools-care")]
        self.register_care_tools();

        #[cfg(feature = "tools-system")]
        self.register_system_tools();

        for category in self.categories() {
            debug!(category, tools = ?self.tools_in_category(category), "Tool category ready");
        }
        info!("Registered {} built-in tools", self.len());
    }

    /// Register glucose reading tools
    #[cfg(feature = "tools-glucose")]
    fn register_glucose_tools(&mut self) {
        use super::implementations::glucose::create_glucose_tools;

        for tool in create_glucose_tools() {
            self.register_with_category(Arc::from(tool), "glucose");
        }

        debug!(
            "Registered glucose tools (registry now has {} tools)",
            self.tools.len()
        );
    }

    /// Register statistics tools
    #[cfg(feature = "tools-analytics")]
    fn register_analytics_tools(&mut self) {
        use super::implementations::analytics::create_analytics_tools;

        for tool in create_analytics_tools() {
            self.register_with_category(Arc::from(tool), "analytics");
        }

        debug!(
            "Registered analytics tools (registry now has {} tools)",
            self.tools.len()
        );
    }

    /// Register treatment and device tools
    #[cfg(feature = "tools-care")]
    fn register_care_tools(&mut self) {
        use super::implementations::care::create_care_tools;

        for tool in create_care_tools() {
            self.register_with_category(Arc::from(tool), "care");
        }

        debug!(
            "Registered care tools (registry now has {} tools)",
            self.tools.len()
        );
    }

    /// Register server status tools
    #[cfg(feature = "tools-system")]
    fn register_system_tools(&mut self) {
        use super::implementations::system::create_system_tools;

        for tool in create_system_tools() {
            self.register_with_category(Arc::from(tool), "system");
        }

        debug!(
            "Registered system tools (registry now has {} tools)",
            self.tools.len()
        );
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.tool_names())
            .field("categories", &self.categories())
            .finish()
    }
}

#[cfg(all(
    test,
    feature = "tools-glucose",
    feature = "tools-analytics",
    feature = "tools-care",
    feature = "tools-system"
))]
mod tests {
    use super::*;
    use crate::tools::implementations::system::StatusTool;

    #[test]
    fn test_builtin_tools_grouped_by_category() {
        let registry = ToolRegistry::with_builtin_tools();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.categories(), vec!["analytics", "care", "glucose", "system"]);
        assert_eq!(
            registry.tools_in_category("analytics"),
            vec!["analyze", "analyze_monthly"]
        );
        assert!(registry.tools_in_category("nutrition").is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut registry = ToolRegistry::with_builtin_tools();
        assert!(!registry.register(Arc::new(StatusTool)));
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.tools_in_category("system"), vec!["status"]);
    }
}
