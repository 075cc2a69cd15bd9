//! Signing workflow configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Known trigger names.
pub mod triggers {
    pub const ON_DOCUMENT_CREATED: &str = "on_document_created";
    pub const ON_PREVIOUS_ROLES_SIGNED: &str = "on_previous_roles_signed";
    pub const ON_TURN_TO_SIGN: &str = "on_turn_to_sign";
    pub const ON_ALL_SIGNATURES_COMPLETE: &str = "on_all_signatures_complete";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningWorkflowConfig {
    pub order_mode: OrderMode,
    pub notifications: NotificationConfig,
}

impl Default for SigningWorkflowConfig {
    fn default() -> Self {
        let mut global = TriggerMap::new();
        global.insert(triggers::ON_DOCUMENT_CREATED.to_string(), TriggerSettings::enabled(false));
        global.insert(triggers::ON_TURN_TO_SIGN.to_string(), TriggerSettings::enabled(true));
        global.insert(
            triggers::ON_ALL_SIGNATURES_COMPLETE.to_string(),
            TriggerSettings::enabled(false),
        );

        Self {
            order_mode: OrderMode::Sequential,
            notifications: NotificationConfig {
                scope: NotificationScope::Global,
                global_triggers: global,
                role_configs: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    Parallel,
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationScope {
    Global,
    Individual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    pub scope: NotificationScope,
    #[serde(default)]
    pub global_triggers: TriggerMap,
    #[serde(default)]
    pub role_configs: Vec<RoleNotificationConfig>,
}

/// Trigger name -> settings. Ordered so serialization is stable.
pub type TriggerMap = BTreeMap<String, TriggerSettings>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSettings {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_roles_config: Option<PreviousRolesConfig>,
}

impl TriggerSettings {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled,
            previous_roles_config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousRolesConfig {
    pub mode: PreviousRolesMode,
    #[serde(default)]
    pub selected_role_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviousRolesMode {
    Auto,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleNotificationConfig {
    pub role_id: String,
    #[serde(default)]
    pub triggers: TriggerMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_workflow_is_sequential_global() {
        let wf = SigningWorkflowConfig::default();
        assert_eq!(wf.order_mode, OrderMode::Sequential);
        assert_eq!(wf.notifications.scope, NotificationScope::Global);
        assert!(wf.notifications.global_triggers[triggers::ON_TURN_TO_SIGN].enabled);
        assert!(wf.notifications.role_configs.is_empty());
    }

    #[test]
    fn previous_roles_wire_form() {
        let wf: SigningWorkflowConfig = serde_json::from_value(json!({
            "orderMode": "sequential",
            "notifications": {
                "scope": "individual",
                "globalTriggers": {},
                "roleConfigs": [{
                    "roleId": "r2",
                    "triggers": {
                        "on_previous_roles_signed": {
                            "enabled": true,
                            "previousRolesConfig": { "mode": "custom", "selectedRoleIds": ["r1"] }
                        }
                    }
                }]
            }
        }))
        .unwrap();

        let cfg = &wf.notifications.role_configs[0].triggers[triggers::ON_PREVIOUS_ROLES_SIGNED];
        let prev = cfg.previous_roles_config.as_ref().unwrap();
        assert_eq!(prev.mode, PreviousRolesMode::Custom);
        assert_eq!(prev.selected_role_ids, vec!["r1".to_string()]);
    }
}
