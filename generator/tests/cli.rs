use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

fn sitegen(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sitegen"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn setup(config: &str, templates: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.json"), config).unwrap();
    fs::create_dir(dir.path().join("templates")).unwrap();
    for (name, content) in templates {
        fs::write(dir.path().join("templates").join(name), content).unwrap();
    }
    dir
}

const HELLO_CONFIG: &str = r#"[{"template": "index.html", "context": {"name": "Ada"}, "url": "/"}]"#;

#[test]
fn default_output_dir() {
    let dir = setup(HELLO_CONFIG, &[("index.html", "Hello, {{ name }}")]);

    let output = sitegen(&[dir.path()]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(dir.path().join("html/index.html")).unwrap(),
        "Hello, Ada"
    );
}

#[test]
fn custom_output_dir() {
    let dir = setup(HELLO_CONFIG, &[("index.html", "Hello, {{ name }}")]);
    let out = dir.path().join("nested/site");

    let output = sitegen(&[dir.path(), Path::new("-o"), out.as_path()]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(out.join("index.html").is_file());
    assert!(!dir.path().join("html").exists());
}

#[test]
fn verbose_names_dirs() {
    let dir = setup(HELLO_CONFIG, &[("index.html", "Hello, {{ name }}")]);

    let output = sitegen(&[Path::new("--verbose"), dir.path()]);

    assert!(output.status.success());
    let err = stderr(&output);
    assert!(err.contains("input_dir="), "{err}");
    assert!(err.contains("output_dir="), "{err}");

    // dirs are reported once the output dir exists
    let created = err.find("create dest dir").unwrap();
    assert!(created < err.find("input_dir=").unwrap(), "{err}");

    assert_eq!(
        fs::read_to_string(dir.path().join("html/index.html")).unwrap(),
        "Hello, Ada"
    );
}

#[test]
fn existing_output_dir() {
    let dir = setup(HELLO_CONFIG, &[("index.html", "Hello, {{ name }}")]);
    fs::create_dir(dir.path().join("html")).unwrap();

    let output = sitegen(&[dir.path()]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("sitegen error: "), "{err}");
    assert!(err.contains("already exists"), "{err}");
    assert!(!dir.path().join("html/index.html").exists());
}

#[test]
fn missing_config() {
    let dir = tempfile::tempdir().unwrap();

    let output = sitegen(&[dir.path()]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("sitegen error: "), "{err}");
    assert!(err.contains("config.json"), "{err}");
    assert!(err.contains("not found"), "{err}");
}

#[test]
fn malformed_config() {
    let dir = setup("[\n  {\"url\": }\n]", &[]);

    let output = sitegen(&[dir.path()]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("sitegen error: "), "{err}");
    assert!(err.contains("line 2"), "{err}");
}

#[test]
fn missing_template() {
    let dir = setup(
        r#"[
            {"template": "index.html", "context": {}, "url": "/a"},
            {"template": "nope.html", "context": {}, "url": "/b"},
            {"template": "index.html", "context": {}, "url": "/c"}
        ]"#,
        &[("index.html", "page")],
    );

    let output = sitegen(&[dir.path()]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("sitegen error: "), "{err}");
    assert!(err.contains("nope.html"), "{err}");
    assert!(dir.path().join("html/a/index.html").is_file());
    assert!(!dir.path().join("html/b").exists());
    assert!(!dir.path().join("html/c").exists());
}

#[test]
fn missing_input_dir() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope");

    let output = sitegen(&[missing.as_path()]);

    assert!(!output.status.success());
    assert!(!missing.exists());
}
