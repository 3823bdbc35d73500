// ABOUTME: MCP protocol schema definitions and message structures
// ABOUTME: Type-safe initialize, tool listing, and tool result payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! MCP Protocol Schema Definitions
//!
//! Type-safe definitions for the MCP messages this server exchanges. Tool
//! input schemas are declared by each tool and collected by the registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// MCP Tool Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// What the tool does, shown to the model
    pub description: String,
    /// JSON Schema of the arguments object
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Always `object` for tool arguments
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Argument properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    /// Required argument names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl JsonSchema {
    /// Schema for a tool without arguments
    #[must_use]
    pub fn empty() -> Self {
        Self {
            schema_type: "object".into(),
            properties: Some(HashMap::new()),
            required: None,
        }
    }

    /// Schema with the given properties and required names
    #[must_use]
    pub fn object(properties: Vec<(&str, PropertySchema)>, required: &[&str]) -> Self {
        Self {
            schema_type: "object".into(),
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_owned(), schema))
                    .collect(),
            ),
            required: (!required.is_empty())
                .then(|| required.iter().map(|name| (*name).to_owned()).collect()),
        }
    }
}

/// Tool Call for executing a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name
    pub name: String,
    /// Arguments object
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Tool Response after execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Human-readable content blocks
    pub content: Vec<Content>,
    /// Whether the tool failed
    #[serde(rename = "isError")]
    pub is_error: bool,
    /// Machine-readable payload
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

/// Content types for MCP messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    /// Plain text block
    #[serde(rename = "text")]
    Text {
        /// Text body
        text: String,
    },
}

/// JSON Schema Property Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name
    #[serde(rename = "type")]
    pub property_type: String,
    /// Shown to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inclusive lower bound for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    /// Inclusive upper bound for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    /// Value used when the argument is omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    /// Bounded integer property
    #[must_use]
    pub fn integer(description: &str, minimum: i64, maximum: i64, default: Option<i64>) -> Self {
        Self {
            property_type: "integer".into(),
            description: Some(description.to_owned()),
            minimum: Some(minimum),
            maximum: Some(maximum),
            default: default.map(Value::from),
        }
    }

    /// String property
    #[must_use]
    pub fn string(description: &str, default: Option<&str>) -> Self {
        Self {
            property_type: "string".into(),
            description: Some(description.to_owned()),
            minimum: None,
            maximum: None,
            default: default.map(Value::from),
        }
    }
}

/// MCP Server Capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
    /// Resource support (always an empty list here)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ListCapability>,
    /// Prompt support (always an empty list here)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<ListCapability>,
}

/// Tools capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    /// Whether the tool list can change at runtime
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Resources or prompts capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCapability {
    /// Whether the list can change at runtime
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Complete MCP Initialize Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    /// Negotiated protocol revision
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server identity
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Advertised capabilities
    pub capabilities: ServerCapabilities,
    /// Usage hints for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResponse {
    /// Create a new initialize response with current server configuration
    #[must_use]
    pub fn new(protocol_version: String, server_name: String, server_version: String) -> Self {
        Self {
            protocol_version,
            server_info: ServerInfo {
                name: server_name,
                version: server_version,
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ListCapability {
                    list_changed: Some(false),
                }),
                prompts: Some(ListCapability {
                    list_changed: Some(false),
                }),
            },
            instructions: Some("This server reads continuous glucose monitoring data from a Nightscout site. Use `glucose_current` for the latest reading, `glucose_history` for recent readings, `analyze` and `analyze_monthly` for time-in-range statistics, and `treatments`, `devices` and `status` for care and site information.".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_response_field_names() {
        let response = ToolResponse {
            content: vec![Content::Text {
                text: "hello".into(),
            }],
            is_error: false,
            structured_content: Some(serde_json::json!({"ok": true})),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["isError"], false);
        assert_eq!(value["structuredContent"]["ok"], true);
    }

    #[test]
    fn test_object_schema_required() {
        let schema = JsonSchema::object(
            vec![("year", PropertySchema::integer("Year", 2015, 2100, None))],
            &["year"],
        );
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["required"][0], "year");
        assert_eq!(value["properties"]["year"]["minimum"], 2015);
        assert!(JsonSchema::empty().required.is_none());
    }
}
