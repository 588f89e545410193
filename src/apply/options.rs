//! Apply options.

use serde::{Deserialize, Serialize};

/// Field manager used when neither the applier nor the options name one.
pub const DEFAULT_FIELD_MANAGER: &str = "work-agent";

/// Settings of the server-side apply strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideApplyConfig {
    /// Take ownership of fields currently owned by other managers.
    #[serde(default)]
    pub force: bool,
    /// Overrides the applier's field manager for this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_manager: Option<String>,
}

/// UpdateStrategy selects the write protocol of one apply call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UpdateStrategy {
    /// Full update of the live object.
    Update,
    /// Create if absent, never modify afterwards.
    CreateOnly,
    /// Only read the live object.
    ReadOnly,
    /// Merge the document into the live object, tracking field ownership.
    ServerSideApply(ServerSideApplyConfig),
}

impl UpdateStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateStrategy::Update => "Update",
            UpdateStrategy::CreateOnly => "CreateOnly",
            UpdateStrategy::ReadOnly => "ReadOnly",
            UpdateStrategy::ServerSideApply(_) => "ServerSideApply",
        }
    }
}

impl Default for UpdateStrategy {
    fn default() -> Self {
        UpdateStrategy::ServerSideApply(ServerSideApplyConfig::default())
    }
}

/// ApplyOptions configure a single apply call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOptions {
    #[serde(default)]
    pub update_strategy: UpdateStrategy,
}

impl ApplyOptions {
    pub fn new(update_strategy: UpdateStrategy) -> Self {
        ApplyOptions { update_strategy }
    }

    /// Server-side apply with the given force flag.
    pub fn server_side_apply(force: bool) -> Self {
        Self::new(UpdateStrategy::ServerSideApply(ServerSideApplyConfig {
            force,
            field_manager: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_server_side_apply() {
        assert_eq!(ApplyOptions::default(), ApplyOptions::server_side_apply(false));
    }

    #[test]
    fn test_strategy_decode() {
        let opts: ApplyOptions = serde_yaml::from_str(
            "updateStrategy:\n  type: ServerSideApply\n  force: true\n  fieldManager: hub\n",
        )
        .unwrap();
        assert_eq!(
            opts.update_strategy,
            UpdateStrategy::ServerSideApply(ServerSideApplyConfig {
                force: true,
                field_manager: Some("hub".to_string()),
            })
        );

        let opts: ApplyOptions =
            serde_json::from_str(r#"{"updateStrategy":{"type":"CreateOnly"}}"#).unwrap();
        assert_eq!(opts.update_strategy.name(), "CreateOnly");
    }

    #[test]
    fn test_unknown_strategy_fails_to_decode() {
        let res: Result<ApplyOptions, _> =
            serde_json::from_str(r#"{"updateStrategy":{"type":"Replace"}}"#);
        assert!(res.is_err());
    }
}
