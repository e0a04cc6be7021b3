use crate::error::NeoError;

use super::types::NeoConfig;

/// Expand environment variable references in a string.
///
/// Supported syntaxes:
/// - `${VAR}` - replaced with env var value; error if unset
/// - `${VAR:-fallback}` - env var value, or fallback if unset or empty
/// - `$env:VAR` - same as `${VAR}`
pub fn expand_env_vars(input: &str) -> Result<String, NeoError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        if let Some(expr) = tail.strip_prefix('{') {
            let end = expr
                .find('}')
                .ok_or_else(|| env_error(format!("Unclosed variable reference: ${{{expr}")))?;
            let body = &expr[..end];
            match body.split_once(":-") {
                Some((name, fallback)) => match std::env::var(name) {
                    Ok(val) if !val.is_empty() => out.push_str(&val),
                    _ => out.push_str(fallback),
                },
                None => out.push_str(&lookup(body)?),
            }
            rest = &expr[end + 1..];
        } else if let Some(after) = tail.strip_prefix("env:") {
            let len = after
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if len == 0 {
                return Err(env_error("Empty variable name in $env: reference".into()));
            }
            out.push_str(&lookup(&after[..len])?);
            rest = &after[len..];
        } else {
            out.push('$');
            rest = tail;
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn lookup(name: &str) -> Result<String, NeoError> {
    std::env::var(name)
        .map_err(|_| env_error(format!("Environment variable '{name}' is not set")))
}

/// Expand environment variables in every string field of a config.
pub fn expand_config(config: &mut NeoConfig) -> Result<(), NeoError> {
    for field in [
        &mut config.client_id,
        &mut config.client_secret,
        &mut config.base_url,
        &mut config.device_id,
        &mut config.platform_domain,
        &mut config.token_path,
    ] {
        if let Some(value) = field.as_mut() {
            *value = expand_env_vars(value)?;
        }
    }
    Ok(())
}

fn env_error(detail: String) -> NeoError {
    NeoError::ConfigError {
        path: std::path::PathBuf::from("<env>"),
        detail,
    }
}
