use std::{
    fs,
    path::{Path, PathBuf},
};

use rawgrades::{Config, MergePolicy, Points, RawGradesError, Warning, pipeline};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("rawgrades-pipeline-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn write(root: &Path, name: &str, contents: &str) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn config(root: &Path, grades: &str, partners: Option<&str>) -> Config {
    let grades = write(root, "grades.txt", grades);
    let output = root.join("out.csv");
    match partners {
        Some(partners) => Config::builder()
            .points(Points::parse("10").unwrap())
            .assignment("Project 4")
            .output_file(output)
            .grades(grades)
            .partners(write(root, "partners.csv", partners))
            .build(),
        None => Config::builder()
            .points(Points::parse("10").unwrap())
            .assignment("Project 4")
            .output_file(output)
            .grades(grades)
            .build(),
    }
}

fn read_back(csv_text: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes())
        .records()
        .map(|r| r.expect("valid csv").iter().map(str::to_owned).collect())
        .collect()
}

#[test]
fn partners_share_the_higher_score() {
    let root = temp_root();
    let config = config(&root, "alice,8\nbob,6\ncarol,10\n", Some("student,partner\nalice,bob\n"));

    let conversion = pipeline::convert(&config).expect("convert");
    let written = fs::read_to_string(root.join("out.csv")).expect("output written");
    assert_eq!(written, ",Project 4\nPoints Possible,10\nalice,8\nbob,8\ncarol,10\n");
    assert_eq!(written, conversion.rendered());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_partner_gets_no_fabricated_row() {
    let root = temp_root();
    let config = config(&root, "dave,9\n", Some("student,partner\ndave,erin\n"));

    let conversion = pipeline::run(&config).expect("run");
    let ids: Vec<&str> = conversion
        .results()
        .iter()
        .map(|r| r.identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["dave"]);
    assert!(
        conversion
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::PartnerMissingSubmission { .. }))
    );

    let _ = fs::remove_dir_all(root);
}

#[test]
fn output_round_trips_through_a_csv_reader() {
    let root = temp_root();
    let config = config(
        &root,
        "Alice\t8\nbob\t6.5\ncarol\t10\ndan\t0\n",
        Some("a,b\ncarol,dan\n"),
    );

    let conversion = pipeline::run(&config).expect("run");
    let rows = read_back(conversion.rendered());

    assert_eq!(rows[0], vec!["", "Project 4"]);
    assert_eq!(rows[1], vec!["Points Possible", "10"]);
    let recovered: Vec<(String, f64)> = rows[2..]
        .iter()
        .map(|r| (r[0].clone(), r[1].parse().expect("numeric score")))
        .collect();
    let merged: Vec<(String, f64)> = conversion
        .results()
        .iter()
        .map(|r| (r.identifier.to_string(), r.score))
        .collect();
    assert_eq!(recovered, merged);
    assert_eq!(
        merged,
        vec![
            ("alice".to_string(), 8.0),
            ("bob".to_string(), 6.5),
            ("carol".to_string(), 10.0),
            ("dan".to_string(), 10.0)
        ]
    );

    let _ = fs::remove_dir_all(root);
}

#[test]
fn byte_order_mark_does_not_break_partner_matching() {
    let root = temp_root();
    let config = config(&root, "\u{feff}alice,8\nbob,6\n", Some("student,partner\nalice,bob\n"));

    let conversion = pipeline::convert(&config).expect("convert");
    let written = fs::read_to_string(root.join("out.csv")).expect("output written");
    assert_eq!(written, ",Project 4\nPoints Possible,10\nalice,8\nbob,8\n");
    assert!(
        !conversion
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::PartnerMissingSubmission { .. }))
    );

    let _ = fs::remove_dir_all(root);
}

#[test]
fn malformed_record_aborts_before_writing() {
    let root = temp_root();
    let config = config(&root, "bob,6\nalice,,10\n", None);

    let err = pipeline::convert(&config).unwrap_err();
    assert!(matches!(err, RawGradesError::MalformedRecord { line_number: 2, .. }));
    assert!(err.to_string().contains("alice,,10"));
    assert!(!root.join("out.csv").exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn pair_conflict_aborts_before_writing() {
    let root = temp_root();
    let config = config(
        &root,
        "alice,8\nbob,6\ncarol,7\n",
        Some("a,b\nalice,bob\nalice,carol\n"),
    );

    let err = pipeline::convert(&config).unwrap_err();
    assert!(matches!(err, RawGradesError::PairConflict { row: 3, .. }));
    assert!(!root.join("out.csv").exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn scores_over_points_warn_but_still_convert() {
    let root = temp_root();
    let config = config(&root, "alice,12\n", None);

    let conversion = pipeline::convert(&config).expect("extra credit is allowed");
    assert_eq!(conversion.results()[0].score, 12.0);
    assert!(matches!(
        conversion.warnings(),
        [Warning::ScoreExceedsPointsPossible { line_number: 1, .. }]
    ));
    assert!(root.join("out.csv").exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn config_file_drives_the_whole_run() {
    let root = temp_root();
    write(&root, "grades.txt", "alice,8\nbob,6\n");
    write(&root, "partners.csv", "x,y\nalice,bob\n");
    let config_path = write(
        &root,
        "config.json",
        &serde_json::json!({
            "points": "10",
            "assignment": "Project 4",
            "output_file": root.join("project4.canvas"),
            "grades": root.join("grades.txt"),
            "partners": root.join("partners.csv"),
            "merge_policy": "lowest"
        })
        .to_string(),
    );

    let config = Config::load(&config_path).expect("load config");
    assert_eq!(config.merge_policy(), MergePolicy::Lowest);
    pipeline::convert(&config).expect("convert");

    let written = fs::read_to_string(root.join("project4.canvas")).expect("output written");
    assert_eq!(written, ",Project 4\nPoints Possible,10\nalice,6\nbob,6\n");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_grades_file_is_an_io_error() {
    let root = temp_root();
    let config = Config::builder()
        .points(Points::parse("5").unwrap())
        .assignment("Lab")
        .output_file(root.join("out.csv"))
        .grades(root.join("nope.txt"))
        .build();

    assert!(matches!(pipeline::run(&config), Err(RawGradesError::Io { .. })));

    let _ = fs::remove_dir_all(root);
}
