use std::path::{Path, PathBuf};

use crate::error::NeoError;

use super::env::expand_config;
use super::types::NeoConfig;

/// Strip JSONC comments (// line comments and /* */ block comments) from input.
pub fn strip_jsonc_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(ch) = chars.next() {
        if in_string {
            result.push(ch);
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(ch);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    // Keep line numbers stable for parse errors.
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
            }
            _ => result.push(ch),
        }
    }

    result
}

/// Discover config files in precedence order (highest first).
///
/// 1. `--config` CLI flag
/// 2. `NEO_CONFIG` env var
/// 3. `./config/neo.json` (project-level)
/// 4. `~/.neo/neo.json` or `~/.neo/neo.jsonc`
pub fn discover_config_files(cli_config: Option<&str>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = cli_config {
        candidates.push(PathBuf::from(path));
    }
    if let Ok(env_path) = std::env::var("NEO_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }
    candidates.push(PathBuf::from("./config/neo.json"));
    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".neo");
        let json = dir.join("neo.json");
        candidates.push(if json.exists() { json } else { dir.join("neo.jsonc") });
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for path in candidates {
        if path.exists() && !files.contains(&path) {
            files.push(path);
        }
    }
    files
}

/// Load a single config file, stripping JSONC comments before parsing.
fn load_config_file(path: &Path) -> Result<NeoConfig, NeoError> {
    let content = std::fs::read_to_string(path).map_err(|e| NeoError::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;

    let stripped = strip_jsonc_comments(&content);
    serde_json::from_str::<NeoConfig>(&stripped).map_err(|e| NeoError::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Invalid JSON: {e}"),
    })
}

/// Credentials from `NEO_CLIENT` / `NEO_SECRET`, lowest precedence.
fn config_from_env() -> NeoConfig {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    NeoConfig {
        client_id: var("NEO_CLIENT"),
        client_secret: var("NEO_SECRET"),
        device_id: var("NEO_DEVICE_ID"),
        ..Default::default()
    }
}

/// Load, merge, and expand all configuration.
///
/// Earlier sources win field by field; the environment fills whatever the
/// files leave unset. `${VAR}` references are expanded last.
pub fn load_config(cli_config: Option<&str>) -> Result<NeoConfig, NeoError> {
    if let Some(path) = cli_config {
        if !Path::new(path).exists() {
            return Err(NeoError::ConfigError {
                path: PathBuf::from(path),
                detail: "Cannot read file: not found".into(),
            });
        }
    }

    let mut config = NeoConfig::default();
    for path in discover_config_files(cli_config) {
        tracing::debug!(path = %path.display(), "loading config");
        config.merge(load_config_file(&path)?);
    }
    config.merge(config_from_env());
    expand_config(&mut config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_comments() {
        let input = r#"{
  // This is a comment
  "key": "value" // inline comment
}"#;
        let result = strip_jsonc_comments(input);
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["key"], "value");
    }

    #[test]
    fn strip_multiline_block_comments() {
        let input = r#"{
  /*
   * multi-line
   */
  "a": 1, /* inline */ "b": 2
}"#;
        let result = strip_jsonc_comments(input);
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["a"], 1);
        assert_eq!(parsed["b"], 2);
    }

    #[test]
    fn preserve_strings_with_slashes() {
        let input = r#"{"baseUrl": "https://sandbox.neonomics.io", "p": "a//b", "q": "x\"//y"}"#;
        let result = strip_jsonc_comments(input);
        assert_eq!(result, input);
    }

    #[test]
    fn load_config_file_parses_jsonc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neo.jsonc");
        std::fs::write(
            &path,
            r#"{
  // sandbox credentials
  "clientId": "cid",
  "clientSecret": "secret"
}"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.client_id.as_deref(), Some("cid"));
        assert_eq!(config.client_secret.as_deref(), Some("secret"));
    }

    #[test]
    fn load_config_file_error_on_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not valid json at all").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn load_config_errors_on_missing_cli_path() {
        let err = load_config(Some("/nonexistent/neo.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read file"));
    }

    #[test]
    fn load_config_from_cli_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neo.json");
        std::fs::write(
            &path,
            r#"{"clientId": "from-file", "clientSecret": "s", "deviceId": "d1"}"#,
        )
        .unwrap();

        let config = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.client_id.as_deref(), Some("from-file"));
        assert_eq!(config.device_id.as_deref(), Some("d1"));
    }

    #[test]
    fn discover_only_returns_existing_files() {
        let files = discover_config_files(Some("/nonexistent/path/config.json"));
        for f in &files {
            assert!(f.exists());
        }
    }
}
