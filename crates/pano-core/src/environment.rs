//! Environment registry and per-environment manifest documents.

use crate::constants::{FALLBACK_ENVIRONMENT, FALLBACK_IMG_PATH, MANIFEST_FILE};
use crate::lenient::lenient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub img_path: String,
    #[serde(deserialize_with = "lenient")]
    pub preset_path: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

fn join(base: &str, leaf: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        leaf.trim_start_matches('/')
    )
}

impl Environment {
    pub fn image_url(&self, file: &str) -> String {
        join(&self.img_path, file)
    }

    pub fn manifest_url(&self) -> String {
        join(&self.img_path, MANIFEST_FILE)
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Registry entries with an id; anything else is skipped.
pub fn parse_registry(text: &str) -> Vec<Environment> {
    let raw: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("[env] unparsable environment registry: {}", e);
            return Vec::new();
        }
    };
    let Value::Array(items) = raw else {
        log::warn!("[env] environment registry is not a list");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<Environment>(v) {
            Ok(env) if !env.id.is_empty() => Some(env),
            Ok(_) => {
                log::warn!("[env] skipping environment without id");
                None
            }
            Err(e) => {
                log::warn!("[env] skipping environment: {}", e);
                None
            }
        })
        .collect()
}

/// String entries of a manifest, duplicates dropped, order kept.
pub fn parse_manifest(text: &str) -> Vec<String> {
    let raw: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("[env] unparsable manifest: {}", e);
            return Vec::new();
        }
    };
    let Value::Array(items) = raw else {
        log::warn!("[env] manifest is not a list");
        return Vec::new();
    };
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) if !s.is_empty() => {
                if out.contains(&s) {
                    log::warn!("[env] duplicate manifest entry {:?}", s);
                } else {
                    out.push(s);
                }
            }
            other => log::warn!("[env] skipping manifest entry {}", other),
        }
    }
    out
}

/// `?env=` when registered, else the first entry, else the fallback id.
pub fn initial_environment(registry: &[Environment], requested: Option<&str>) -> String {
    if let Some(id) = requested.filter(|id| registry.iter().any(|e| e.id == *id)) {
        return id.to_string();
    }
    if let Some(r) = requested {
        log::info!("[env] requested environment {:?} is not registered", r);
    }
    registry
        .first()
        .map(|e| e.id.clone())
        .unwrap_or_else(|| FALLBACK_ENVIRONMENT.to_string())
}

pub fn find<'a>(registry: &'a [Environment], id: &str) -> Option<&'a Environment> {
    registry.iter().find(|e| e.id == id)
}

/// Registered entry for `id`; the fallback id also resolves without a
/// registry, to the legacy image folder and no preset.
pub fn lookup(registry: &[Environment], id: &str) -> Option<Environment> {
    find(registry, id).cloned().or_else(|| {
        (id == FALLBACK_ENVIRONMENT).then(|| Environment {
            id: FALLBACK_ENVIRONMENT.to_string(),
            name: FALLBACK_ENVIRONMENT.to_string(),
            img_path: FALLBACK_IMG_PATH.to_string(),
            preset_path: String::new(),
            thumbnail: None,
        })
    })
}
