use super::*;

#[test]
fn outline_report_lists_records_edges_and_positions() {
    let report = outline_report("Home\n  About\n  Contact\n    Team", Spacing::default()).unwrap();

    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[3]["name"], "Team");
    assert_eq!(records[3]["depth"], 2);

    let edges = report["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[2]["parent_index"], 2);
    assert_eq!(edges[2]["child_index"], 3);

    assert_eq!(report["positions"][2]["x"], 250.0);
    assert_eq!(report["positions"][3]["y"], 400.0);
}

#[test]
fn grid_report_adds_padding() {
    let spec = GridSpec::with_frame(300.0, 200.0);
    let text = (0..6).map(|i| format!("P{i}")).collect::<Vec<_>>().join("\n");
    let report = grid_report(&text, &spec).unwrap();

    let slots = report["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 6);
    assert_eq!(slots[5]["row"], 1);
    assert_eq!(slots[5]["col"], 0);
    assert_eq!(slots[5]["x"], 100.0);
    assert_eq!(slots[5]["y"], 400.0);
}

#[test]
fn grid_report_rejects_bad_frame_size() {
    let spec = GridSpec::with_frame(-1.0, 200.0);
    assert!(matches!(grid_report("Home", &spec), Err(CliError::Grid(_))));
}

#[test]
fn export_body_omits_missing_sizes() {
    let body = export_body("Home".into(), Some(375.0), None);
    assert_eq!(body["frameWidth"], 375.0);
    assert!(body.get("frameHeight").is_none());
}

#[test]
fn mode_names_match_server() {
    assert_eq!(Mode::DeleteAll.as_str(), "delete-all");
    assert_eq!(Editor::Design.as_str(), "design");
}

#[test]
fn cli_parses_sitemap_build() {
    let cli = Cli::try_parse_from([
        "sitemap",
        "sitemap",
        "build",
        "00000000-0000-0000-0000-000000000000",
        "site.txt",
        "--mode",
        "delete-all",
    ])
    .unwrap();
    let Command::Sitemap(SitemapCommand { command: SitemapSubcommand::Build { input, mode, .. } }) = cli.command else {
        panic!("expected sitemap build");
    };
    assert_eq!(input, "site.txt");
    assert_eq!(mode, Mode::DeleteAll);
}

#[test]
fn cli_parses_doc_close() {
    let cli = Cli::try_parse_from(["sitemap", "doc", "close", "00000000-0000-0000-0000-000000000000"]).unwrap();
    let Command::Doc(DocCommand { command: DocSubcommand::Close { doc_id } }) = cli.command else {
        panic!("expected doc close");
    };
    assert_eq!(doc_id, Uuid::nil());
}
