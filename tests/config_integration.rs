use std::path::PathBuf;

use markpad::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markpadrc");
    let content = r"
# comment
--literal-tasks

--theme light

--store=/tmp/markpad.json
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.literal_tasks);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.store, Some(PathBuf::from("/tmp/markpad.json")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markpadrc");
    let content = "--literal-tasks\n--theme light\n--root site\n--port 8080\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "markpad".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--port=9000".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.literal_tasks, "file flags should remain enabled");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(effective.port, Some(9000), "cli should override port");
    assert_eq!(
        effective.root,
        Some(PathBuf::from("site")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "markpad".to_string(),
        "--theme=dark".to_string(),
        "--host=0.0.0.0".to_string(),
        "--accent=#123456".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(flags.accent.as_deref(), Some("#123456"));
}

#[test]
fn test_valued_flag_at_end_without_value_is_ignored() {
    let args = vec!["markpad".to_string(), "--accent".to_string()];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
