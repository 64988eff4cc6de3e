use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use markdown_docx_config::{
    Config, ConfigError, ConfigSourceKind, LoadOptions, OutputFormat, StyleSettings,
};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.conversion.input, None);
    assert_eq!(config.conversion.output, None);
    assert_eq!(config.conversion.format, OutputFormat::WordXml);
    assert_eq!(config.style, StyleSettings::default());
    assert_eq!(config.style.body_font, "Calibri");
    assert_eq!(config.style.code_font, "Courier New");
    assert_eq!(config.style.max_heading_level, 4);
    assert_eq!(config.style.header_fill.as_str(), "003366");
    assert_eq!(config.style.header_text_color.as_str(), "FFFFFF");

    assert_eq!(config.sources.working_directory, working_dir);
    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn applies_precedence_and_merges_fields() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".markdown-docx.toml"),
        r#"
        [conversion]
        input = "docs/How_It_Works.md"
        output = "docs/How_It_Works.xml"

        [style]
        body_font = "Arial"
        header_fill = "D9E2F3"
        max_heading_level = 3
        "#,
    );

    let nested = git_root.join("docs");
    fs::create_dir(&nested).expect("create nested dir");
    write_file(
        nested.join(".markdown-docx.toml"),
        r##"
        [conversion]
        format = "json"

        [style]
        header_fill = "#336699"
        code_size_pt = 8
        "##,
    );

    let config = Config::load(LoadOptions::default().with_working_dir(&nested)).expect("load");

    assert_eq!(
        config.conversion.input,
        Some(git_root.join("docs/How_It_Works.md"))
    );
    assert_eq!(
        config.conversion.output,
        Some(git_root.join("docs/How_It_Works.xml"))
    );
    assert_eq!(config.conversion.format, OutputFormat::Json);
    assert_eq!(config.style.body_font, "Arial");
    assert_eq!(config.style.header_fill.as_str(), "336699");
    assert_eq!(config.style.max_heading_level, 3);
    assert_eq!(config.style.code_size_pt, 8.0);
    assert_eq!(config.style.body_size_pt, 11.0);

    let kinds: Vec<ConfigSourceKind> = config.sources.layers.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local
        ]
    );
}

#[test]
fn override_path_wins_over_local_config() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    write_file(
        working_dir.join(".markdown-docx.toml"),
        "[conversion]\noutput = \"local.xml\"\n",
    );
    write_file(
        working_dir.join("release.toml"),
        "[conversion]\noutput = \"out/release.xml\"\n",
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("release.toml"),
    )
    .expect("load");

    assert_eq!(
        config.conversion.output,
        Some(working_dir.join("out/release.xml"))
    );
    assert_eq!(
        config.sources.layers.last().map(|layer| layer.kind),
        Some(ConfigSourceKind::Override)
    );
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(temp.path())
            .with_override_path("absent.toml"),
    )
    .expect_err("override should be missing");

    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn reports_parse_errors_with_path() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(working_dir.join(".markdown-docx.toml"), "[style\nbody_font = 1");

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("parse should fail");

    match err {
        ConfigError::Parse { path, .. } => {
            assert_eq!(path, working_dir.join(".markdown-docx.toml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn collects_every_validation_error() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".markdown-docx.toml"),
        r#"
        [conversion]
        format = "pdf"

        [style]
        header_fill = "navy"
        max_heading_level = 12
        body_size_pt = 0
        code_font = "  "
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("validation should fail");

    let ConfigError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    let contexts: Vec<String> = errors
        .iter()
        .filter_map(|error| error.context.clone())
        .collect();
    assert_eq!(
        contexts,
        vec![
            "conversion.format",
            "style.body_size_pt",
            "style.max_heading_level",
            "style.header_fill",
            "style.code_font",
        ]
    );

    let rendered = errors.to_string();
    assert!(rendered.starts_with("- conversion.format: unknown output format 'pdf'"));
    assert!(rendered.contains("local config at"));
}
