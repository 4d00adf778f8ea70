use sqldash::{ParamError, ParamType, ParameterSet, TypedParameter};

#[test]
fn first_seen_order_and_one_entry_per_name() {
    let set = ParameterSet::from_sql("select %(b)s, %(a)d, %(b)s, %(c)b").unwrap();
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.get("a").unwrap().kind(), ParamType::DecimalNumber { places: 0 });
    assert!(set.get("zzz").is_none());
}

#[test]
fn number_then_string_is_inconsistent() {
    let err = ParameterSet::from_sql("select %(x)d, %(x)s").unwrap_err();
    assert_eq!(
        err,
        ParamError::InconsistentType { name: "x".into(), found: "string", previous: "decimal-number" }
    );
}

#[test]
fn string_then_number_is_inconsistent() {
    let err = ParameterSet::from_sql("select %(x)s, %(x)0.2d").unwrap_err();
    assert!(matches!(err, ParamError::InconsistentType { found: "decimal-number", previous: "string", .. }));
}

#[test]
fn differing_precisions_conflict() {
    let err = ParameterSet::from_sql("select %(x)0.2d, %(x)0.3d").unwrap_err();
    assert_eq!(err, ParamError::InconsistentPrecision { name: "x".into(), found: 3, previous: 2 });
}

#[test]
fn zero_precision_has_no_opinion_either_way() {
    let set = ParameterSet::from_sql("select %(x)0.2d, %(x)d").unwrap();
    assert_eq!(set.get("x").unwrap().decimal_places(), 2);

    let set = ParameterSet::from_sql("select %(x)d, %(x)0.2d, %(x)d").unwrap();
    assert_eq!(set.get("x").unwrap().decimal_places(), 2);
}

#[test]
fn conflicting_defaults_are_rejected() {
    let err = ParameterSet::from_sql("limit %(n:10)d offset %(n:20)d").unwrap_err();
    assert_eq!(
        err,
        ParamError::InconsistentDefault { name: "n".into(), found: "20".into(), previous: "10".into() }
    );
}

#[test]
fn a_later_default_fills_in_a_missing_one() {
    let set = ParameterSet::from_sql("select %(n)d, %(n:5)d").unwrap();
    let n = set.get("n").unwrap();
    assert!(n.has_nominal_default());
    assert_eq!(n.default_value(), "5");

    let set = ParameterSet::from_sql("select %(n:5)d, %(n)d").unwrap();
    assert_eq!(set.get("n").unwrap().default_value(), "5");
}

#[test]
fn explicit_registration_is_checked_too() {
    let mut set = ParameterSet::new();
    set.register(TypedParameter::with_type("x", "", ParamType::Boolean)).unwrap();
    let err = set.register(TypedParameter::new("x", "", 'd', "")).unwrap_err();
    assert!(matches!(err, ParamError::InconsistentType { found: "decimal-number", previous: "boolean", .. }));
    // the failed registration leaves the set untouched
    assert_eq!(set.get("x").unwrap().kind(), ParamType::Boolean);
}

#[test]
fn placeholder_default_must_fit_the_type() {
    let err = ParameterSet::from_sql("where active = %(flag:maybe)b").unwrap_err();
    assert_eq!(
        err,
        ParamError::InvalidBooleanValue { name: "flag".into(), value: "maybe".into(), for_default: true }
    );
    assert_eq!(err.to_string(), "Invalid default value for bool parameter 'flag': 'maybe'");

    let err = ParameterSet::from_sql("limit %(n:ten)d").unwrap_err();
    assert!(matches!(err, ParamError::InvalidNumberValue { for_default: true, .. }));
}

#[test]
fn consistency_against_a_previous_parameter() {
    let previous = TypedParameter::new("x", "", 'd', "2");
    assert!(TypedParameter::new("x", "", 'd', "").ensure_consistency(&previous).is_ok());
    assert!(TypedParameter::new("x", "", 'd', "2").ensure_consistency(&previous).is_ok());
    assert!(TypedParameter::new("x", "", 'd', "4").ensure_consistency(&previous).is_err());

    // zero on the registered side never conflicts either
    let previous = TypedParameter::new("x", "", 'd', "");
    assert!(TypedParameter::new("x", "", 'd', "4").ensure_consistency(&previous).is_ok());
}
