use rawgrades::grades::parser::report;

#[test]
fn delimited_record_splits_on_any_listed_separator() {
    let seps = ['\t', ','];
    assert_eq!(report::delimited_record("alice,8", &seps).unwrap(), ("alice", 8.0));
    assert_eq!(report::delimited_record("bob\t6.25", &seps).unwrap(), ("bob", 6.25));
    assert_eq!(report::delimited_record("carol ,  .5 ", &seps).unwrap(), ("carol", 0.5));
}

#[test]
fn delimited_record_keeps_inner_spaces_in_identifiers() {
    let (id, score) = report::delimited_record("Jane Doe,10", &[',']).expect("parse spaced id");
    assert_eq!(id, "Jane Doe");
    assert_eq!(score, 10.0);
}

#[test]
fn delimited_record_rejects_malformed_lines() {
    let seps = [','];
    for line in ["alice,,10", "alice,8,9", "alice", ",8", "alice,-2", "alice,1e3"] {
        assert!(
            report::delimited_record(line, &seps).is_err(),
            "`{line}` should be rejected"
        );
    }
}

#[test]
fn scores_too_large_for_a_float_are_rejected() {
    let line = format!("alice,{}", "9".repeat(400));
    assert!(report::delimited_record(&line, &[',']).is_err());
    assert!(report::whitespace_record(&format!("alice {}", "9".repeat(400))).is_err());
}

#[test]
fn whitespace_record_needs_exactly_two_fields() {
    assert_eq!(report::whitespace_record("  student1 \t 8.0").unwrap(), ("student1", 8.0));
    assert!(report::whitespace_record("student 3 4.123").is_err());
    assert!(report::whitespace_record("student1").is_err());
}

#[test]
fn parse_errors_say_what_was_expected() {
    let err = report::delimited_record("alice,x", &[',']).unwrap_err();
    assert_eq!(err.location.column, 7);
    assert!(!err.expected.to_string().is_empty());
}
