use super::*;

#[test]
fn no_arguments_uses_discovery_and_defaults() {
    let cli = Cli::try_parse_from(["ytlikes"]).expect("expected valid cli args");

    assert!(cli.csv_path.is_none());
    assert!(cli.output_dir.is_none());
    assert_eq!(cli.top, 10);
    assert!(!cli.no_html);
    assert!(!cli.no_csv);
}

#[test]
fn parses_positional_csv_path() {
    let cli = Cli::try_parse_from(["ytlikes", "Takeout/YouTube/comments/comments.csv"])
        .expect("expected valid cli args");

    assert_eq!(
        cli.csv_path.as_deref(),
        Some(std::path::Path::new("Takeout/YouTube/comments/comments.csv"))
    );
}

#[test]
fn parses_all_flags() {
    let cli = Cli::try_parse_from([
        "ytlikes",
        "comments.csv",
        "--output-dir",
        "out",
        "--top",
        "25",
        "--no-html",
        "--no-csv",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
    assert_eq!(cli.top, 25);
    assert!(cli.no_html);
    assert!(cli.no_csv);
}

#[test]
fn rejects_non_numeric_top() {
    assert!(Cli::try_parse_from(["ytlikes", "--top", "many"]).is_err());
}

#[test]
fn rejects_second_positional() {
    assert!(Cli::try_parse_from(["ytlikes", "a.csv", "b.csv"]).is_err());
}
