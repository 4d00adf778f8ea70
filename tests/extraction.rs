use sqldash::placeholder::{self, Segment};
use sqldash::ParamError;

#[test]
fn no_placeholders_extracts_nothing() {
    assert!(placeholder::extract("select * from t where a = 1").unwrap().is_empty());
    assert!(placeholder::extract("").unwrap().is_empty());
}

#[test]
fn triples_follow_textual_order_with_repeats() {
    let sql = "select %(a)s, %(b)0.2d, %(c).3d, %(d)b, %(e)d, %(a)s";
    let triples = placeholder::triples(sql).unwrap();
    let expected = vec![
        ("a".to_string(), String::new(), 's'),
        ("b".to_string(), "2".to_string(), 'd'),
        ("c".to_string(), "3".to_string(), 'd'),
        ("d".to_string(), String::new(), 'b'),
        ("e".to_string(), String::new(), 'd'),
        ("a".to_string(), String::new(), 's'),
    ];
    assert_eq!(triples, expected);
}

#[test]
fn hint_and_span_are_captured() {
    let sql = "select 1 limit %(limit:50)d";
    let found = placeholder::extract(sql).unwrap();
    assert_eq!(found.len(), 1);
    let p = &found[0];
    assert_eq!(p.name, "limit");
    assert_eq!(p.hint.as_deref(), Some("50"));
    assert_eq!(p.suffix, 'd');
    assert_eq!(&sql[p.span.clone()], "%(limit:50)d");
    assert!(!p.is_bare());
}

#[test]
fn names_may_contain_dashes_and_underscores() {
    let found = placeholder::extract("where d >= %(start-date:2020-01-01)s and %(max_rows)d").unwrap();
    assert_eq!(found[0].name, "start-date");
    assert_eq!(found[0].hint.as_deref(), Some("2020-01-01"));
    assert_eq!(found[1].name, "max_rows");
}

#[test]
fn bad_suffix_is_an_invalid_placeholder() {
    let err = placeholder::extract("select %(n)x from t").unwrap_err();
    assert_eq!(err, ParamError::InvalidPlaceholder { placeholder: "%(n)x".into(), offset: 7 });

    let err = placeholder::extract("select %(n).d").unwrap_err();
    assert!(matches!(err, ParamError::InvalidPlaceholder { offset: 7, .. }));

    // nothing follows the head at all
    let err = placeholder::extract("select %(n)").unwrap_err();
    assert_eq!(err, ParamError::InvalidPlaceholder { placeholder: "%(n)".into(), offset: 7 });
}

#[test]
fn bad_hint_is_an_invalid_placeholder() {
    let err = placeholder::extract("select %(n:two words)s").unwrap_err();
    assert!(matches!(err, ParamError::InvalidPlaceholder { .. }));
    let err = placeholder::extract("select %(n:)s").unwrap_err();
    assert!(matches!(err, ParamError::InvalidPlaceholder { .. }));
}

#[test]
fn unclosed_or_lone_percent_is_plain_text() {
    assert!(placeholder::extract("select '%(foo' as x").unwrap().is_empty());
    assert!(placeholder::extract("select * from t where a like 'x%'").unwrap().is_empty());
}

#[test]
fn doubled_percent_never_opens_a_placeholder() {
    let sql = "select '%%(x)s', %(y)d";
    let segments = placeholder::tokenize(sql).unwrap();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[0], Segment::Text("select '"));
    assert_eq!(segments[1], Segment::Percent);
    assert_eq!(segments[2], Segment::Text("(x)s', "));
    assert!(matches!(&segments[3], Segment::Placeholder(p) if p.name == "y"));
}

#[test]
fn name_pattern_ignores_hint_and_suffix() {
    let sql = "%(n)d %(n:5)d %(n)0.2d %(nn)d %(n)s";
    assert_eq!(placeholder::occurrences(sql, "n"), 4);
    assert_eq!(placeholder::occurrences(sql, "nn"), 1);
    assert_eq!(placeholder::occurrences(sql, "missing"), 0);
    // regex metacharacters in a name are taken literally
    assert_eq!(placeholder::occurrences("%(a-b)s", "a.b"), 0);
}

#[test]
fn decimal_counts_are_ascii_and_fit_a_u32() {
    let err = placeholder::extract("select %(x)0.\u{0663}d").unwrap_err();
    assert!(matches!(err, ParamError::InvalidPlaceholder { offset: 7, .. }));

    let err = placeholder::extract("select %(x)0.99999999999d").unwrap_err();
    assert_eq!(err, ParamError::InvalidPlaceholder { placeholder: "%(x)0.99999999999d".into(), offset: 7 });

    let found = placeholder::extract("select %(x)0.4294967295d").unwrap();
    assert_eq!(found[0].decimals, "4294967295");
}

#[test]
fn names_are_ascii_words() {
    assert!(placeholder::extract("select '%(\u{00e9}t\u{00e9})s'").unwrap().is_empty());
}
