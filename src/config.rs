use std::{env, fs, io, path::PathBuf};

use tracing::warn;

use crate::prompt::SYSTEM_PROMPT;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_MAX_TOKENS: u32 = 600;
pub const DEFAULT_ORIGINS: [&str; 2] = ["https://ouroffering.org", "https://www.ouroffering.org"];

/// Reply used when the provider answers successfully but without usable text.
pub const FALLBACK_ANSWER: &str = "I’m here, but I was not able to form a clear reply. You might try asking in a slightly different way.";

/// Everything the handler needs, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub upstream_url: String,
    pub timeout_ms: Option<u64>,
    pub allowed_origins: Vec<String>,
    pub completion: CompletionSettings,
}

/// Fixed parts of every upstream request.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_ms: None,
            allowed_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
            completion: CompletionSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(var: F) -> io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("Invalid PORT='{}', falling back to {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let timeout_ms = var("UPSTREAM_TIMEOUT_MS").and_then(|raw| {
            raw.parse::<u64>()
                .map_err(|_| warn!("Invalid UPSTREAM_TIMEOUT_MS='{}', ignoring", raw))
                .ok()
        });

        let api_key = var(API_KEY_VAR).filter(|key| !key.is_empty());

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        let system_prompt = match var("SYSTEM_PROMPT_PATH") {
            Some(path) => read_prompt(PathBuf::from(path))?,
            None => defaults.completion.system_prompt,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            api_key,
            upstream_url: var("OPENAI_API_URL").unwrap_or(defaults.upstream_url),
            timeout_ms,
            allowed_origins,
            completion: CompletionSettings {
                model: var("OPENAI_MODEL").unwrap_or(defaults.completion.model),
                system_prompt,
                temperature: defaults.completion.temperature,
                max_tokens: defaults.completion.max_tokens,
            },
        })
    }
}

/// Splits a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_prompt(path: PathBuf) -> io::Result<String> {
    let prompt = fs::read_to_string(&path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("failed to read system prompt {}: {e}", path.display()),
        )
    })?;
    Ok(prompt.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn parses_origin_list() {
        assert_eq!(
            parse_origins(" https://a.example/, ,https://b.example "),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn defaults_match_published_contract() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.allowed_origins[0], "https://ouroffering.org");
        assert_eq!(cfg.completion.model, "gpt-4.1-mini");
        assert_eq!(cfg.completion.max_tokens, 600);
        assert!(cfg.api_key.is_none());
        assert!(cfg.timeout_ms.is_none());
    }

    fn load(vars: &[(&str, &str)]) -> io::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(cfg.completion.system_prompt, SYSTEM_PROMPT);
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("PORT", "8081"),
            ("UPSTREAM_TIMEOUT_MS", "2500"),
            ("OPENAI_API_KEY", "sk-live"),
            ("OPENAI_API_URL", "http://localhost:9000/v1/chat/completions"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("ALLOWED_ORIGINS", "https://a.example,https://b.example"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.timeout_ms, Some(2500));
        assert_eq!(cfg.api_key.as_deref(), Some("sk-live"));
        assert_eq!(cfg.upstream_url, "http://localhost:9000/v1/chat/completions");
        assert_eq!(cfg.completion.model, "gpt-4o-mini");
        assert_eq!(cfg.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = load(&[("PORT", "http"), ("UPSTREAM_TIMEOUT_MS", "-5")]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.timeout_ms, None);
    }

    #[test]
    fn empty_api_key_is_unset() {
        assert!(load(&[("OPENAI_API_KEY", "")]).unwrap().api_key.is_none());
    }

    #[test]
    fn blank_origin_list_keeps_defaults() {
        let cfg = load(&[("ALLOWED_ORIGINS", " , ,")]).unwrap();
        assert_eq!(cfg.allowed_origins, DEFAULT_ORIGINS.to_vec());
    }

    #[test]
    fn system_prompt_file_replaces_builtin() {
        let path = std::env::temp_dir().join(format!("dialogue-prompt-{}.txt", std::process::id()));
        fs::write(&path, "  Answer in one word.\n").unwrap();

        let cfg = load(&[("SYSTEM_PROMPT_PATH", path.to_str().unwrap())]).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(cfg.completion.system_prompt, "Answer in one word.");
    }

    #[test]
    fn unreadable_system_prompt_is_an_error() {
        let err = load(&[("SYSTEM_PROMPT_PATH", "/nonexistent/dialogue/prompt.txt")]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/nonexistent/dialogue/prompt.txt"));
    }
}
