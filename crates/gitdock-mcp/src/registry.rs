//! Static declaration of the five tools and their argument shapes.
//!
//! The registry is the single source for both `tools/list` schemas and
//! request validation, so the advertised shape and the enforced shape can
//! never disagree.

use serde_json::{Value, json};

/// One declared argument of a tool. Every argument in this protocol is a
/// JSON string.
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Declared shape of one tool.
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

/// The fixed set of operations this server accepts.
pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "load_config",
        description: "Set the working directory all git commands run in. \
                      The directory is created if missing.",
        fields: &[FieldSpec {
            name: "working_dir",
            required: true,
            description: "Absolute or relative path to the working directory",
        }],
    },
    ToolSpec {
        name: "get_config",
        description: "Report the current working directory and log file path.",
        fields: &[],
    },
    ToolSpec {
        name: "get_init",
        description: "Initialize a git repository in the working directory \
                      and set its origin remote.",
        fields: &[
            FieldSpec {
                name: "remoteUrl",
                required: true,
                description: "URL of the origin remote",
            },
            FieldSpec {
                name: "defaultBranch",
                required: false,
                description: "Rename the default branch to this name",
            },
        ],
    },
    ToolSpec {
        name: "get_pull",
        description: "Pull from a remote into the working directory.",
        fields: &[
            FieldSpec {
                name: "branch",
                required: false,
                description: "Branch to pull (defaults to the current branch)",
            },
            FieldSpec {
                name: "remote",
                required: false,
                description: "Remote to pull from (defaults to origin)",
            },
        ],
    },
    ToolSpec {
        name: "get_push",
        description: "Stage all changes, commit them, and push to a remote.",
        fields: &[
            FieldSpec {
                name: "commitMessage",
                required: true,
                description: "Commit message for the staged changes",
            },
            FieldSpec {
                name: "branch",
                required: false,
                description: "Branch to push (detected when omitted)",
            },
            FieldSpec {
                name: "remote",
                required: false,
                description: "Remote to push to (defaults to origin)",
            },
        ],
    },
];

/// Look a tool up by its wire name.
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

impl ToolSpec {
    /// JSON schema for this tool's `arguments` object.
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for field in self.fields {
            properties.insert(
                field.name.to_string(),
                json!({"type": "string", "description": field.description}),
            );
            if field.required {
                required.push(field.name);
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// The `tools/list` entry for this tool.
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_declares_exactly_five_tools() {
        let names: Vec<&str> = TOOLS.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["load_config", "get_config", "get_init", "get_pull", "get_push"]
        );
    }

    #[test]
    fn find_is_exact_match_only() {
        assert!(find("get_push").is_some());
        assert!(find("get_push ").is_none());
        assert!(find("push").is_none());
    }

    #[test]
    fn schema_lists_required_fields() {
        let schema = find("get_init").unwrap().input_schema();
        assert_eq!(schema["required"], json!(["remoteUrl"]));
        assert_eq!(schema["properties"]["defaultBranch"]["type"], "string");
    }

    #[test]
    fn get_config_takes_no_arguments() {
        let schema = find("get_config").unwrap().input_schema();
        assert_eq!(schema["required"], json!([]));
        assert!(schema["properties"].as_object().unwrap().is_empty());
    }
}
