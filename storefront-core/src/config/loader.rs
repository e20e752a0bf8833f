use std::collections::HashMap;
use std::path::Path;

use super::value::ConfigValue;
use super::ConfigError;

/// Load and parse a YAML file, flattening it into the values map.
///
/// A missing file is not an error; every layer is optional.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    if path.exists() {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        load_yaml_str(&content, values)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
    }
    Ok(())
}

pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten_yaml("", &yaml, values);
    Ok(())
}

/// Flatten a YAML tree into dot-separated keys.
pub(crate) fn flatten_yaml(
    prefix: &str,
    value: &serde_yaml::Value,
    out: &mut HashMap<String, ConfigValue>,
) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                let full_key = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_yaml(&full_key, v, out);
            }
        }
        leaf => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
            }
        }
    }
}

/// Environment variable name for a config key: `database.max_connections`
/// becomes `DATABASE_MAX_CONNECTIONS`.
pub(crate) fn env_name(key: &str) -> String {
    key.replace('.', "_").to_uppercase()
}

/// Overlay environment variables onto `values`.
///
/// Keys already present (from YAML or defaults) are matched by their
/// environment name, so underscores inside a key survive. Unknown variables
/// land under the lowercase dotted form.
pub(crate) fn overlay_env(
    values: &mut HashMap<String, ConfigValue>,
    env: impl IntoIterator<Item = (String, String)>,
) {
    let known: HashMap<String, String> = values.keys().map(|k| (env_name(k), k.clone())).collect();
    for (env_key, env_val) in env {
        let config_key = match known.get(&env_key) {
            Some(key) => key.clone(),
            None => env_key.to_lowercase().replace('_', "."),
        };
        values.insert(config_key, ConfigValue::String(env_val));
    }
}
