use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub literal_tasks: bool,
    pub theme: Option<ThemeMode>,
    pub accent: Option<String>,
    pub store: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            literal_tasks: self.literal_tasks || other.literal_tasks,
            theme: other.theme.or(self.theme),
            accent: other.accent.clone().or_else(|| self.accent.clone()),
            store: other.store.clone().or_else(|| self.store.clone()),
            host: other.host.clone().or_else(|| self.host.clone()),
            port: other.port.or(self.port),
            root: other.root.clone().or_else(|| self.root.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpad")
                .join("config");
        }
    }

    PathBuf::from(".markpadrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpadrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# markpad defaults (saved with --save)".to_string());
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    if let Some(accent) = &flags.accent {
        lines.push(format!("--accent {accent}"));
    }
    if flags.literal_tasks {
        lines.push("--literal-tasks".to_string());
    }
    if let Some(store) = &flags.store {
        lines.push(format!("--store {}", store.display()));
    }
    if let Some(host) = &flags.host {
        lines.push(format!("--host {host}"));
    }
    if let Some(port) = flags.port {
        lines.push(format!("--port {port}"));
    }
    if let Some(root) = &flags.root {
        lines.push(format!("--root {}", root.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--literal-tasks" {
            flags.literal_tasks = true;
        } else if let Some((name, value)) = split_valued(token, tokens.get(i + 1)) {
            if !token.contains('=') {
                i += 1;
            }
            apply_value(&mut flags, name, value);
        }
        i += 1;
    }
    flags
}

const VALUED_FLAGS: &[&str] = &["--theme", "--accent", "--store", "--host", "--port", "--root"];

/// Match `--name value` or `--name=value` for a flag that takes a value.
fn split_valued<'a>(token: &'a str, next: Option<&'a String>) -> Option<(&'a str, &'a str)> {
    if let Some((name, value)) = token.split_once('=') {
        return VALUED_FLAGS.contains(&name).then_some((name, value));
    }
    if VALUED_FLAGS.contains(&token) {
        return next.map(|value| (token, value.as_str()));
    }
    None
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--theme" => flags.theme = parse_theme(value),
        "--accent" => flags.accent = Some(value.to_string()),
        "--store" => flags.store = Some(PathBuf::from(value)),
        "--host" => flags.host = Some(value.to_string()),
        "--port" => flags.port = value.parse().ok(),
        "--root" => flags.root = Some(PathBuf::from(value)),
        _ => {}
    }
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "markpad".to_string(),
            "--literal-tasks".to_string(),
            "--theme".to_string(),
            "dark".to_string(),
            "--accent=#ff6600".to_string(),
            "--port".to_string(),
            "9000".to_string(),
            "serve".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.literal_tasks);
        assert_eq!(flags.theme, Some(ThemeMode::Dark));
        assert_eq!(flags.accent.as_deref(), Some("#ff6600"));
        assert_eq!(flags.port, Some(9000));
        assert_eq!(flags.host, None);
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_port() {
        let args = vec!["--port=eighty".to_string()];
        assert_eq!(parse_flag_tokens(&args).port, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            literal_tasks: true,
            theme: Some(ThemeMode::Light),
            port: Some(8080),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            theme: Some(ThemeMode::Dark),
            accent: Some("#000000".to_string()),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.literal_tasks);
        assert_eq!(merged.theme, Some(ThemeMode::Dark));
        assert_eq!(merged.port, Some(8080));
        assert_eq!(merged.accent.as_deref(), Some("#000000"));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".markpadrc");
        let flags = ConfigFlags {
            literal_tasks: true,
            theme: Some(ThemeMode::Dark),
            accent: Some("#35B378".to_string()),
            store: Some(PathBuf::from("store.json")),
            host: Some("0.0.0.0".to_string()),
            port: Some(8001),
            root: Some(PathBuf::from("web")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}
