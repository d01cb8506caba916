//! Request validation and routing.
//!
//! The dispatcher is the single seam where every failure shape -- unknown
//! tool, argument violations, missing state, subprocess exits -- converges
//! into the two-variant [`ToolResult`].

use std::collections::HashMap;

use serde_json::Value;

use gitdock_core::{GitToolError, ToolResult};
use gitdock_git::GitService;

use crate::registry::{self, ToolSpec};

/// Default remote applied when a pull/push request omits one.
const DEFAULT_REMOTE: &str = "origin";

/// Validates incoming tool requests and routes them to the git service.
pub struct Dispatcher {
    service: GitService,
}

impl Dispatcher {
    /// Create a dispatcher over the given service.
    pub const fn new(service: GitService) -> Self {
        Self { service }
    }

    /// Handle one `tools/call` request. Never returns a transport error:
    /// every failure becomes the failure variant of the result.
    pub async fn dispatch(&self, name: &str, arguments: &Value) -> ToolResult {
        match self.call(name, arguments).await {
            Ok(text) => ToolResult::success(text),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }

    async fn call(&self, name: &str, arguments: &Value) -> Result<String, GitToolError> {
        let spec =
            registry::find(name).ok_or_else(|| GitToolError::UnknownTool(name.to_string()))?;
        let args = validate(spec, arguments)?;

        let branch = args.get("branch").map(String::as_str);
        let remote = args.get("remote").map_or(DEFAULT_REMOTE, String::as_str);

        match spec.name {
            "load_config" => self.service.load_config(&args["working_dir"]).await,
            "get_config" => Ok(self.service.get_config().await),
            "get_init" => {
                self.service
                    .init(
                        &args["remoteUrl"],
                        args.get("defaultBranch").map(String::as_str),
                    )
                    .await
            }
            "get_pull" => self.service.pull(remote, branch).await,
            "get_push" => {
                self.service
                    .push(&args["commitMessage"], remote, branch)
                    .await
            }
            other => Err(GitToolError::UnknownTool(other.to_string())),
        }
    }
}

/// Check `arguments` against the tool's declared shape, enumerating every
/// violation rather than stopping at the first. Validation is pure: it never
/// touches the filesystem or spawns a process.
fn validate(spec: &ToolSpec, arguments: &Value) -> Result<HashMap<String, String>, GitToolError> {
    let mut violations = Vec::new();
    let mut collected = HashMap::new();

    let empty = serde_json::Map::new();
    let object = match arguments {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => {
            return Err(GitToolError::Validation {
                tool: spec.name.to_string(),
                violations: vec!["arguments must be an object".to_string()],
            });
        }
    };

    for field in spec.fields {
        match object.get(field.name) {
            Some(Value::String(value)) => {
                collected.insert(field.name.to_string(), value.clone());
            }
            Some(_) => violations.push(format!("`{}` must be a string", field.name)),
            None if field.required => {
                violations.push(format!("missing required field `{}`", field.name));
            }
            None => {}
        }
    }

    if violations.is_empty() {
        Ok(collected)
    } else {
        Err(GitToolError::Validation {
            tool: spec.name.to_string(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validate_enumerates_every_violation() {
        let spec = registry::find("get_push").unwrap();
        let err = validate(spec, &json!({"commitMessage": 7, "branch": true})).unwrap_err();

        let GitToolError::Validation { violations, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.contains("commitMessage")));
        assert!(violations.iter().any(|v| v.contains("branch")));
    }

    #[test]
    fn validate_reports_missing_required_field() {
        let spec = registry::find("get_init").unwrap();
        let err = validate(spec, &json!({})).unwrap_err();

        assert!(err.to_string().contains("missing required field `remoteUrl`"));
    }

    #[test]
    fn validate_accepts_null_arguments_for_optional_shapes() {
        let spec = registry::find("get_pull").unwrap();
        let args = validate(spec, &Value::Null).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn validate_rejects_non_object_arguments() {
        let spec = registry::find("get_config").unwrap();
        let err = validate(spec, &json!("not an object")).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn validate_ignores_undeclared_fields() {
        let spec = registry::find("get_pull").unwrap();
        let args = validate(spec, &json!({"branch": "main", "extra": 1})).unwrap();
        assert_eq!(args.get("branch").unwrap(), "main");
        assert!(!args.contains_key("extra"));
    }
}
