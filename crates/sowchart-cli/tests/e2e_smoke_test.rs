use std::{fs, path::Path};

use tempfile::tempdir;

use sowchart::{FailureKind, SowchartError};
use sowchart_cli::{Args, Command, FormatArg, run};

const CORPUS: &str = r#"
[[product]]
id = "demo"
name = "Demo Flow"
description = "A two-step flow"
source = '''
flowchart LR
    A[Start] --> B[End]
'''
"#;

/// Writes a small corpus and a config sending exports into `dir/out`.
fn write_fixtures(dir: &Path) -> (String, String) {
    let corpus = dir.join("products.toml");
    fs::write(&corpus, CORPUS).unwrap();

    let config = dir.join("config.toml");
    let out_dir = dir.join("out");
    fs::write(
        &config,
        format!(
            "[engine]\nkind = \"native\"\n\n[export]\noutput_dir = {:?}\n",
            out_dir.to_string_lossy()
        ),
    )
    .unwrap();

    (
        corpus.to_string_lossy().to_string(),
        config.to_string_lossy().to_string(),
    )
}

fn args(command: Command, corpus: Option<String>, config: Option<String>) -> Args {
    Args {
        command,
        config,
        corpus,
        log_level: "off".to_string(),
    }
}

fn exported_files(out: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(out)
        .unwrap()
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn e2e_bundled_products_export_all_formats() {
    let dir = tempdir().unwrap();
    let (_, config) = write_fixtures(dir.path());
    fs::remove_file(dir.path().join("products.toml")).unwrap();
    let out = dir.path().join("out");

    for id in ["nao", "login"] {
        let command = Command::Export {
            product: id.to_string(),
            format: FormatArg::All,
            out_dir: None,
        };
        run(&args(command, None, Some(config.clone()))).await.unwrap();
    }

    let exported = exported_files(&out);
    assert_eq!(exported.len(), 4, "{exported:?}");
    for prefix in ["login-flowchart-", "nao-flowchart-"] {
        for extension in [".png", ".svg"] {
            assert!(
                exported
                    .iter()
                    .any(|name| name.starts_with(prefix) && name.ends_with(extension)),
                "no {prefix}*{extension} in {exported:?}"
            );
        }
    }

    for name in &exported {
        let bytes = fs::read(out.join(name)).unwrap();
        assert!(!bytes.is_empty(), "{name} is empty");
        if name.ends_with(".png") {
            assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "{name} is not a PNG");
        } else {
            let svg = String::from_utf8(bytes).unwrap();
            assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        }
    }
}

#[tokio::test]
async fn e2e_corpus_beside_config_replaces_bundled() {
    let dir = tempdir().unwrap();
    let (_, config) = write_fixtures(dir.path());

    let command = Command::Export {
        product: "demo".to_string(),
        format: FormatArg::Svg,
        out_dir: None,
    };
    run(&args(command, None, Some(config.clone()))).await.unwrap();
    assert_eq!(exported_files(&dir.path().join("out")).len(), 1);

    let command = Command::Show {
        product: "nao".to_string(),
    };
    let err = run(&args(command, None, Some(config))).await.unwrap_err();
    assert!(matches!(err, SowchartError::UnknownProduct(ref id) if id == "nao"));
}

#[tokio::test]
async fn e2e_invalid_theme_is_a_config_error() {
    let dir = tempdir().unwrap();
    let (corpus, _) = write_fixtures(dir.path());
    let config = dir.path().join("zero-font.toml");
    fs::write(&config, "[engine]\nkind = \"native\"\n\n[theme]\nfont_size = 0.0\n").unwrap();

    let command = Command::Export {
        product: "demo".to_string(),
        format: FormatArg::Svg,
        out_dir: Some(dir.path().join("out").to_string_lossy().to_string()),
    };
    let err = run(&args(
        command,
        Some(corpus),
        Some(config.to_string_lossy().to_string()),
    ))
    .await
    .unwrap_err();

    assert!(matches!(err, SowchartError::Config(ref msg) if msg.contains("zero-font.toml")));
    assert_eq!(err.kind(), None);
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn e2e_export_all_formats() {
    let dir = tempdir().unwrap();
    let (corpus, config) = write_fixtures(dir.path());

    let command = Command::Export {
        product: "demo".to_string(),
        format: FormatArg::All,
        out_dir: None,
    };
    run(&args(command, Some(corpus), Some(config))).await.unwrap();

    let exported = exported_files(&dir.path().join("out"));

    assert_eq!(exported.len(), 2);
    assert!(exported[0].starts_with("demo-flow-flowchart-"));
    assert!(exported[0].ends_with(".png"));
    assert!(exported[1].ends_with(".svg"));

    let svg = fs::read_to_string(dir.path().join("out").join(&exported[1])).unwrap();
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
}

#[tokio::test]
async fn e2e_out_dir_overrides_config() {
    let dir = tempdir().unwrap();
    let (corpus, config) = write_fixtures(dir.path());
    let elsewhere = dir.path().join("elsewhere");

    let command = Command::Export {
        product: "demo".to_string(),
        format: FormatArg::Svg,
        out_dir: Some(elsewhere.to_string_lossy().to_string()),
    };
    run(&args(command, Some(corpus), Some(config))).await.unwrap();

    assert_eq!(fs::read_dir(&elsewhere).unwrap().count(), 1);
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn e2e_show_product() {
    let dir = tempdir().unwrap();
    let (corpus, config) = write_fixtures(dir.path());

    let command = Command::Show {
        product: "demo".to_string(),
    };
    run(&args(command, Some(corpus), Some(config))).await.unwrap();
}

#[tokio::test]
async fn e2e_unknown_product() {
    let dir = tempdir().unwrap();
    let (corpus, config) = write_fixtures(dir.path());

    let command = Command::Show {
        product: "missing".to_string(),
    };
    let err = run(&args(command, Some(corpus), Some(config)))
        .await
        .unwrap_err();

    assert!(matches!(err, SowchartError::UnknownProduct(ref id) if id == "missing"));
    assert_eq!(err.kind(), Some(FailureKind::NotFound));
}

#[tokio::test]
async fn e2e_missing_engine_command() {
    let dir = tempdir().unwrap();
    let (corpus, _) = write_fixtures(dir.path());
    let config = dir.path().join("command.toml");
    fs::write(
        &config,
        "[engine]\nkind = \"command\"\ncommand = \"sowchart-no-such-mermaid-cli\"\n",
    )
    .unwrap();

    let command = Command::Export {
        product: "demo".to_string(),
        format: FormatArg::Svg,
        out_dir: Some(dir.path().join("out").to_string_lossy().to_string()),
    };
    let err = run(&args(
        command,
        Some(corpus),
        Some(config.to_string_lossy().to_string()),
    ))
    .await
    .unwrap_err();

    assert_eq!(err.kind(), Some(FailureKind::EnvironmentMissing));
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn e2e_duplicate_corpus_ids_rejected() {
    let dir = tempdir().unwrap();
    let (_, config) = write_fixtures(dir.path());
    let corpus = dir.path().join("dup.toml");
    fs::write(&corpus, format!("{CORPUS}{CORPUS}")).unwrap();

    let err = run(&args(
        Command::List,
        Some(corpus.to_string_lossy().to_string()),
        Some(config),
    ))
    .await
    .unwrap_err();

    assert!(matches!(err, SowchartError::Corpus(_)));
}
