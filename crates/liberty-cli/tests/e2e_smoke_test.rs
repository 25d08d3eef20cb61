use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use liberty_cli::{Args, CliError, OutputFormat, run};
use liberty_parser::ErrorCode;

/// Collects all .lib files from a directory
fn collect_lib_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("lib")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Samples live at the workspace root, not in the crate
fn samples_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("samples")
}

fn args(input: &Path, output: PathBuf, format: OutputFormat) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format,
        config: None,
        accumulate_errors: false,
        comments: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_samples = collect_lib_files(samples_path());
    assert!(!valid_samples.is_empty(), "No valid samples found in samples/");

    let mut failed_samples = Vec::new();

    for sample_path in &valid_samples {
        for format in [OutputFormat::Summary, OutputFormat::Tree, OutputFormat::Json] {
            let output_filename = format!(
                "{}.{format:?}.txt",
                sample_path.file_stem().unwrap().to_string_lossy()
            );
            let output_path = temp_dir.path().join(output_filename);

            if let Err(e) = run(&args(sample_path, output_path, format)) {
                failed_samples.push((sample_path.clone(), e));
            }
        }
    }

    if !failed_samples.is_empty() {
        eprintln!("\nValid samples that failed:");
        for (path, err) in &failed_samples {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid sample run(s) failed unexpectedly", failed_samples.len());
    }

    println!("✅ All {} valid samples passed", valid_samples.len());
}

#[test]
fn e2e_smoke_test_error_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_samples = collect_lib_files(samples_path().join("errors"));
    assert!(
        !error_samples.is_empty(),
        "No error samples found in samples/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for sample_path in &error_samples {
        let output_filename = format!(
            "error_{}.txt",
            sample_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(&output_filename);

        if run(&args(sample_path, output_path.clone(), OutputFormat::Summary)).is_ok() {
            unexpectedly_succeeded.push(sample_path.clone());
        }
        assert!(!output_path.exists(), "{output_filename} written for a failed parse");
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError samples that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error sample(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error samples failed as expected",
        error_samples.len()
    );
}

#[test]
fn e2e_error_samples_report_expected_codes() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let errors_path = samples_path().join("errors");

    let expected = [
        ("missing_value.lib", ErrorCode::E100),
        ("stray_character.lib", ErrorCode::E002),
        ("trailing_input.lib", ErrorCode::E102),
        ("unterminated_comment.lib", ErrorCode::E003),
        ("unterminated_group.lib", ErrorCode::E101),
        ("unterminated_string.lib", ErrorCode::E001),
    ];

    for (file, code) in expected {
        let input = errors_path.join(file);
        let output = temp_dir.path().join("out.txt");

        match run(&args(&input, output, OutputFormat::Summary)) {
            Err(CliError::Parse { err, src }) => {
                assert_eq!(err.diagnostics()[0].code(), Some(code), "{file}");
                assert_eq!(src, fs::read_to_string(&input).unwrap());
            }
            other => panic!("Expected a parse error for {file}, got {other:?}"),
        }
    }
}

#[test]
fn e2e_json_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = samples_path().join("sample.lib");
    let output = temp_dir.path().join("sample.json");

    run(&args(&input, output.clone(), OutputFormat::Json)).expect("Failed to run");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["root"]["type"], "group");
    assert_eq!(json["root"]["name"]["value"], "library");
    assert_eq!(json["root"]["args"][0]["value"], "sample");
}

#[test]
fn e2e_config_file_and_flags() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("empty_pin.lib");
    fs::write(&input, "/* pins */\ncell (X) {\n  pin (A) { }\n}\n").unwrap();

    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[parser]\nempty-groups = \"reject\"\n").unwrap();

    let output = temp_dir.path().join("out.txt");
    let mut args = args(&input, output.clone(), OutputFormat::Tree);
    run(&args).expect("Empty groups are allowed by default");
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "cell(X) {\n  pin(A) { }\n}\n"
    );

    args.config = Some(config.to_string_lossy().to_string());
    match run(&args) {
        Err(CliError::Parse { err, .. }) => {
            assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E104));
        }
        other => panic!("Expected an empty group error, got {other:?}"),
    }

    args.config = Some(temp_dir.path().join("missing.toml").to_string_lossy().to_string());
    assert!(matches!(run(&args), Err(CliError::Config(_))));
}
