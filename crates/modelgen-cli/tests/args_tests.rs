use super::*;

#[test]
fn parses_defaults() {
    let args =
        CliArgs::try_parse_from(["modelgen", "model.json"]).expect("default args should parse");

    assert_eq!(args.model, PathBuf::from("model.json"));
    assert!(args.settings.is_none());
    assert!(!args.published_interfaces);
    assert!(args.types.is_empty());
    assert_eq!(args.format, OutputFormat::Text);
    assert!(!args.no_color);
    assert_eq!(args.verbose, 0);
}

#[test]
fn parses_all_flags() {
    let args = CliArgs::try_parse_from([
        "modelgen",
        "--settings",
        "settings.json",
        "--published-interfaces",
        "-t",
        "HomePolicy",
        "--type",
        "FireCoverage",
        "--format",
        "JSON",
        "--no-color",
        "-vv",
        "model.json",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.settings.as_deref(), Some(std::path::Path::new("settings.json")));
    assert!(args.published_interfaces);
    assert_eq!(args.types, vec!["HomePolicy", "FireCoverage"]);
    assert_eq!(args.format, OutputFormat::Json);
    assert!(args.no_color);
    assert_eq!(args.verbose, 2);
}

#[test]
fn requires_model_path() {
    assert!(CliArgs::try_parse_from(["modelgen"]).is_err());
}

#[test]
fn rejects_unknown_format() {
    assert!(CliArgs::try_parse_from(["modelgen", "--format", "yaml", "model.json"]).is_err());
}
