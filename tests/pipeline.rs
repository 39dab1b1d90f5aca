use std::fs;
use std::path::{Path, PathBuf};

use emx_rank::{Cli, Config, IssueKind, Settings};
use tempfile::TempDir;

/// A small vault:
/// - hub: links to a, b, c (3 out), linked by a and b (2 in) -> 5
/// - a: links to hub, b (2 out), linked by hub (1 in) -> 3
/// - b: links to hub (1 out), linked by hub, a (2 in) -> 3
/// - c: no links, linked by hub -> 1, tagged #draft
/// - broken.md: invalid UTF-8, skipped
fn vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("hub.md"), "# Hub\n[[a]] [[b|Bee]] [[c]]\n```\n[[a]] #code\n```\n").unwrap();
    fs::write(root.join("a.md"), "A note #topic\n[[hub]] [[b]]").unwrap();
    fs::write(root.join("b.md"), "B note #topic\n[[hub#Intro]]").unwrap();
    fs::write(root.join("c.md"), "#draft #topic").unwrap();
    fs::write(root.join("broken.md"), [0xc3, 0x28, 0xa0, 0xa1]).unwrap();
    fs::write(root.join("notes.txt"), "[[hub]]").unwrap();
    dir
}

fn cli(input: &Path, out: &Path) -> Cli {
    Cli {
        input_dir: input.to_path_buf(),
        output_csv: Some(out.join("links.csv")),
        ..Cli::default()
    }
}

fn settings(cli: &Cli) -> Settings {
    Settings::resolve(cli, Config::default()).unwrap()
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}

#[test]
fn csv_lists_every_admissible_note_in_rank_order() {
    let input = vault();
    let out = TempDir::new().unwrap();

    let summary = emx_rank::run(&settings(&cli(input.path(), out.path()))).unwrap();

    let csv = fs::read_to_string(out.path().join("links.csv")).unwrap();
    assert_eq!(
        csv,
        "filename;outgoing_links;incoming_links;total_links;file_size\n\
         hub.md;3;2;5;48\n\
         a.md;2;1;3;27\n\
         b.md;1;2;3;27\n\
         c.md;0;1;1;13\n"
    );
    assert_eq!(summary.scanned, 4);
    assert_eq!(summary.dangling_links, 0);
}

#[test]
fn unreadable_file_is_reported_and_excluded() {
    let input = vault();
    let out = TempDir::new().unwrap();

    let summary = emx_rank::run(&settings(&cli(input.path(), out.path()))).unwrap();

    assert_eq!(summary.issues.len(), 1);
    assert_eq!(summary.issues[0].kind, IssueKind::Decode);
    assert!(summary.issues[0].path.ends_with("broken.md"));
    assert!(summary.selected.iter().all(|s| s.identity != "broken"));
    let csv = fs::read_to_string(out.path().join("links.csv")).unwrap();
    assert!(!csv.contains("broken"));
}

#[test]
fn tag_filter_and_constraints_drive_copy_and_combine() {
    let input = vault();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("best");
    let combined = out.path().join("combined.md");

    let mut args = cli(input.path(), out.path());
    args.select_tags = vec!["topic".to_string()];
    args.ignore_tags = vec!["#draft".to_string()];
    args.copy_top = Some(2);
    args.copy_dest = Some(dest.clone());
    args.combine_md = Some(combined.clone());

    let summary = emx_rank::run(&settings(&args)).unwrap();

    // hub has no #topic, c is #draft
    assert_eq!(summary.admissible, 2);
    let order: Vec<_> = summary.selected.iter().map(|s| s.filename.as_str()).collect();
    assert_eq!(order, vec!["a.md", "b.md"]);
    assert_eq!(summary.copied, 2);
    assert_eq!(list_dir(&dest), vec![dest.join("a.md"), dest.join("b.md")]);
    assert_eq!(
        fs::read_to_string(&combined).unwrap(),
        "A note #topic\n[[hub]] [[b]]\n\nB note #topic\n[[hub#Intro]]"
    );
}

#[test]
fn size_budget_limits_selection() {
    let input = vault();
    let out = TempDir::new().unwrap();

    let mut args = cli(input.path(), out.path());
    args.no_csv = true;
    args.output_csv = None;
    args.copy_top = Some(3);
    // 48 + 27 bytes fit, the third note does not
    args.copy_until_size = Some(80.0 / (1024.0 * 1024.0));
    args.combine_md = Some(out.path().join("combined.md"));

    let summary = emx_rank::run(&settings(&args)).unwrap();

    let order: Vec<_> = summary.selected.iter().map(|s| s.identity.as_str()).collect();
    assert_eq!(order, vec!["hub", "a"]);
    assert!(!out.path().join("links.csv").exists());
}

#[test]
fn dry_run_selects_the_same_notes_and_writes_nothing() {
    let input = vault();
    let real_out = TempDir::new().unwrap();
    let dry_out = TempDir::new().unwrap();

    let configure = |out: &Path, dry_run: bool| {
        let mut args = cli(input.path(), out);
        args.copy_top_percent = Some(50.0);
        args.copy_dest = Some(out.join("best"));
        args.combine_md = Some(out.join("combined.md"));
        args.dry_run = dry_run;
        settings(&args)
    };

    let before = list_dir(input.path());
    let real = emx_rank::run(&configure(real_out.path(), false)).unwrap();
    let dry = emx_rank::run(&configure(dry_out.path(), true)).unwrap();

    let ids = |s: &emx_rank::RunSummary| s.selected.iter().map(|n| n.identity.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&real), ids(&dry));
    assert_eq!(ids(&dry), vec!["hub", "a"]);

    assert!(list_dir(dry_out.path()).is_empty());
    assert_eq!(dry.copied, 0);
    assert!(dry.csv_written.is_none() && dry.combined_written.is_none());

    assert_eq!(real.copied, 2);
    assert!(real_out.path().join("links.csv").exists());
    assert_eq!(list_dir(input.path()), before);
}

#[test]
fn reruns_are_deterministic() {
    let input = vault();
    let out = TempDir::new().unwrap();
    let mut args = cli(input.path(), out.path());
    args.no_csv = true;

    let first = emx_rank::run(&settings(&args)).unwrap();
    let second = emx_rank::run(&settings(&args)).unwrap();

    let rows = |s: &emx_rank::RunSummary| {
        s.selected
            .iter()
            .map(|n| (n.identity.clone(), n.total, n.size_bytes))
            .collect::<Vec<_>>()
    };
    assert_eq!(rows(&first), rows(&second));
}

#[test]
fn summary_serializes_to_json() {
    let input = vault();
    let out = TempDir::new().unwrap();
    let mut args = cli(input.path(), out.path());
    args.no_csv = true;
    args.json = true;

    let summary = emx_rank::run(&settings(&args)).unwrap();
    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["scanned"], 4);
    assert_eq!(json["selected"][0]["identity"], "hub");
    assert_eq!(json["issues"][0]["kind"], "decode");
    assert!(json["generated_at"].is_string());
}
