//! Integration tests for lscsv


use std::fs;

use harness::{TempTree, parse_header, parse_rows, run_lscsv};

#[test]
fn scans_small_tree_with_hashing() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "12345");
    tree.add_file("sub/b.txt", "");

    let (stdout, _stderr, success) = run_lscsv(
        tree.path(),
        &["--hash", "--relative-to", ".", "."],
    );
    assert!(success, "lscsv should succeed");

    let rows = parse_rows(&stdout);
    assert_eq!(rows.len(), 3, "3 data rows expected: {}", stdout);

    let paths: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(paths, ["a.txt", "sub", "sub/b.txt"]);

    // a.txt: file, 5 bytes, non-empty digest
    assert_eq!(rows[0][1], "file");
    assert_eq!(rows[0][2], "5");
    assert_eq!(rows[0][3], "5 B");
    assert!(!rows[0][6].is_empty(), "a.txt should have a digest");
    assert_eq!(rows[0][7], "", "no error expected");

    // sub: directory row before its children, no size
    assert_eq!(rows[1][1], "directory");
    assert_eq!(rows[1][2], "");
    assert_eq!(rows[1][6], "");

    // b.txt: zero bytes, digest of empty input still present
    assert_eq!(rows[2][1], "file");
    assert_eq!(rows[2][2], "0");
    assert!(!rows[2][6].is_empty(), "empty file should have a digest");
}

#[test]
fn header_names_every_column() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "x");

    let (stdout, _stderr, success) = run_lscsv(tree.path(), &["."]);
    assert!(success);
    assert_eq!(
        parse_header(&stdout),
        [
            "path",
            "kind",
            "size_bytes",
            "size_human",
            "mtime_epoch",
            "mtime_iso",
            "digest",
            "error"
        ]
    );
}

#[test]
fn row_count_matches_reachable_nodes() {
    let tree = TempTree::new();
    tree.add_file("one.txt", "1");
    tree.add_file("two.txt", "2");
    tree.add_file("d1/three.txt", "3");
    tree.add_file("d1/d2/four.txt", "4");
    tree.add_dir("empty");

    let (stdout, _stderr, success) = run_lscsv(tree.path(), &["."]);
    assert!(success);
    // 4 files + 3 directories (d1, d1/d2, empty); the target root itself
    // gets no row.
    assert_eq!(parse_rows(&stdout).len(), 7);
}

#[test]
fn bare_exclude_pattern_hides_matching_files() {
    let tree = TempTree::new();
    tree.add_file("keep.txt", "k");
    tree.add_file("drop.log", "d");
    tree.add_file("sub/also.log", "d");

    let (stdout, _stderr, success) =
        run_lscsv(tree.path(), &["-e", "*.log", "--relative-to", ".", "."]);
    assert!(success);

    let paths: Vec<String> = parse_rows(&stdout).iter().map(|r| r[0].clone()).collect();
    assert!(paths.contains(&"keep.txt".to_string()));
    assert!(paths.contains(&"sub".to_string()));
    assert!(
        !paths.iter().any(|p| p.ends_with(".log")),
        "no .log rows expected: {:?}",
        paths
    );
}

#[test]
fn excluded_directory_subtree_never_appears() {
    let tree = TempTree::new();
    tree.add_file("keep.txt", "k");
    tree.add_file("node_modules/pkg/index.js", "x");
    tree.add_file("node_modules/deep/nested/file.js", "y");

    let (stdout, _stderr, success) =
        run_lscsv(tree.path(), &["-e", "node_modules", "--relative-to", ".", "."]);
    assert!(success);

    let rows = parse_rows(&stdout);
    assert_eq!(rows.len(), 1, "only keep.txt: {}", stdout);
    assert_eq!(rows[0][0], "keep.txt");
}

#[test]
fn output_file_is_written_and_never_scanned() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "data");

    // The output lands inside the scanned tree; it must not show up as a row.
    let (_stdout, _stderr, success) =
        run_lscsv(tree.path(), &["-o", "out.csv", "--relative-to", ".", "."]);
    assert!(success);

    let written = fs::read_to_string(tree.path().join("out.csv")).unwrap();
    let paths: Vec<String> = parse_rows(&written).iter().map(|r| r[0].clone()).collect();
    assert!(paths.contains(&"a.txt".to_string()));
    assert!(
        !paths.contains(&"out.csv".to_string()),
        "output must exclude itself: {:?}",
        paths
    );
}

#[test]
fn non_canonical_output_path_still_excludes_itself() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "data");
    tree.add_dir("x");

    // Spelled with a `..` component, the destination still resolves to the
    // same file the walker will encounter.
    let (_stdout, _stderr, success) = run_lscsv(tree.path(), &["-o", "x/../out.csv", "."]);
    assert!(success);

    let written = fs::read_to_string(tree.path().join("out.csv")).unwrap();
    let paths: Vec<String> = parse_rows(&written).iter().map(|r| r[0].clone()).collect();
    assert!(paths.iter().any(|p| p.ends_with("a.txt")));
    assert!(
        !paths.iter().any(|p| p.ends_with("out.csv")),
        "output must exclude itself: {:?}",
        paths
    );
}

#[test]
fn failed_run_leaves_no_output_file_behind() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "data");

    let (_stdout, _stderr, success) = run_lscsv(tree.path(), &["-o", "out.csv", "missing-target"]);
    assert!(!success);
    assert!(
        !tree.path().join("out.csv").exists(),
        "aborted startup must not create the output file"
    );

    // The corrected retry is not blocked by a leftover file.
    let (_stdout, _stderr, success) = run_lscsv(tree.path(), &["-o", "out.csv", "a.txt"]);
    assert!(success);
    let written = fs::read_to_string(tree.path().join("out.csv")).unwrap();
    assert_eq!(parse_rows(&written).len(), 1);
}

#[test]
fn log_file_receives_entries_and_is_excluded() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "data");

    let (stdout, _stderr, success) = run_lscsv(
        tree.path(),
        &["-v", "-l", "scan.log", "--relative-to", ".", "."],
    );
    assert!(success);

    let log = fs::read_to_string(tree.path().join("scan.log")).unwrap();
    assert!(!log.is_empty(), "log file should have entries");

    let paths: Vec<String> = parse_rows(&stdout).iter().map(|r| r[0].clone()).collect();
    assert!(paths.contains(&"a.txt".to_string()));
    assert!(
        !paths.contains(&"scan.log".to_string()),
        "log must exclude itself: {:?}",
        paths
    );
}

#[test]
fn digests_are_deterministic_across_runs() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "stable content");

    let (first, _, ok1) = run_lscsv(tree.path(), &["--hash", "--relative-to", ".", "."]);
    let (second, _, ok2) = run_lscsv(tree.path(), &["--hash", "--relative-to", ".", "."]);
    assert!(ok1 && ok2);

    assert_eq!(parse_rows(&first)[0][6], parse_rows(&second)[0][6]);
}

#[test]
fn non_ancestor_relative_base_leaves_paths_absolute() {
    let tree = TempTree::new();
    let file = tree.add_file("a.txt", "x");
    let elsewhere = TempTree::new();

    let (stdout, _stderr, success) = run_lscsv(
        tree.path(),
        &["--relative-to", &elsewhere.path().to_string_lossy(), "."],
    );
    assert!(success);

    let rows = parse_rows(&stdout);
    assert_eq!(
        rows[0][0],
        file.canonicalize().unwrap().to_string_lossy(),
        "path should pass through unchanged"
    );
}

#[test]
fn multiple_targets_in_argument_order() {
    let tree = TempTree::new();
    let zebra = tree.add_file("zebra/z.txt", "z");
    let alpha = tree.add_file("alpha/a.txt", "a");

    let (stdout, _stderr, success) = run_lscsv(
        tree.path(),
        &[
            &zebra.parent().unwrap().to_string_lossy(),
            &alpha.parent().unwrap().to_string_lossy(),
        ],
    );
    assert!(success);

    let rows = parse_rows(&stdout);
    assert_eq!(rows.len(), 2);
    assert!(rows[0][0].ends_with("z.txt"), "zebra target first: {:?}", rows);
    assert!(rows[1][0].ends_with("a.txt"));
}

#[test]
fn delay_option_is_accepted() {
    let tree = TempTree::new();
    tree.add_file("a.txt", "x");

    let (stdout, _stderr, success) = run_lscsv(tree.path(), &["--delay", "1ms", "."]);
    assert!(success);
    assert_eq!(parse_rows(&stdout).len(), 1);
}

mod cli_failures {
    use assert_cmd::Command;
    use predicates::prelude::*;

    use super::harness::TempTree;

    fn lscsv() -> Command {
        Command::cargo_bin("lscsv").expect("binary should build")
    }

    #[test]
    fn missing_target_fails_with_message() {
        let tree = TempTree::new();
        lscsv()
            .current_dir(tree.path())
            .arg("does-not-exist")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("does-not-exist"));
    }

    #[test]
    fn existing_output_file_is_refused() {
        let tree = TempTree::new();
        tree.add_file("a.txt", "x");
        tree.add_file("out.csv", "already here");

        lscsv()
            .current_dir(tree.path())
            .args(["-o", "out.csv", "."])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("out.csv"));

        // The existing file is left untouched.
        let content = std::fs::read_to_string(tree.path().join("out.csv")).unwrap();
        assert_eq!(content, "already here");
    }

    #[test]
    fn invalid_exclude_pattern_is_rejected() {
        let tree = TempTree::new();
        tree.add_file("a.txt", "x");

        lscsv()
            .current_dir(tree.path())
            .args(["-e", "[", "."])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("pattern"));
    }

    #[test]
    fn no_paths_is_a_usage_error() {
        lscsv().assert().failure();
    }
}
