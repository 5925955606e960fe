use pretty_assertions::assert_eq;
use vouch_assert::Recorder;
use vouch_value::{anything, is_type, IntoMatcher, Value};

use super::*;

fn arguments(values: &[Value]) -> Arguments {
    Arguments::new(values.to_vec())
}

#[test]
fn typed_accessors() {
    let args = arguments(&[
        Value::int(-4),
        Value::uint(7),
        Value::float(0.5),
        Value::bool(true),
        Value::string("hi"),
    ]);
    assert_eq!(args.int(0), -4);
    assert_eq!(args.uint(1), 7);
    assert_eq!(args.float(2), 0.5);
    assert!(args.bool(3));
    assert_eq!(args.string(4), "hi");
    assert_eq!(args.typed::<String>(4), "hi");
    assert_eq!(args.typed::<Option<i64>>(0), Some(-4));
}

#[test]
#[should_panic(expected = "cannot get(3) because there are 1 argument(s)")]
fn get_out_of_range() {
    arguments(&[Value::int(1)]).get(3);
}

#[test]
#[should_panic(expected = "string(0) failed because object wasn't correct type")]
fn mistyped_accessor() {
    arguments(&[Value::int(1)]).string(0);
}

#[test]
fn error_accessor() {
    let args = arguments(&[Value::Nil, Value::opaque(std::fmt::Error)]);
    assert_eq!(args.error::<std::fmt::Error>(0), None);
    assert_eq!(args.error::<std::fmt::Error>(1), Some(std::fmt::Error));
}

#[test]
fn diff_renders_each_position() {
    let args = arguments(&[Value::string("example.com"), Value::int(3)]);
    let (rendered, differences) = args.diff(&["example.com".into_matcher()]).unwrap();
    assert_eq!(differences, 1);
    assert_eq!(
        rendered,
        "0: PASS:  \"example.com\" == \"example.com\"\n1: FAIL:  3 != (Missing)"
    );

    let (_, differences) = args.diff(&[anything(), is_type::<i64>()]).unwrap();
    assert_eq!(differences, 0);
}

#[test]
fn diff_reports_missing_arguments() {
    let args = arguments(&[]);
    let (rendered, differences) = args.diff(&[anything()]).unwrap();
    assert_eq!(differences, 1);
    assert_eq!(rendered, "0: FAIL:  (Missing) != <anything>");
}

#[test]
fn assert_reports_differences() {
    let r = Recorder::new();
    let args = arguments(&[Value::int(1), Value::int(2)]);
    assert!(args.assert(&r, &[1i64.into_matcher(), 2i64.into_matcher()], ()));
    assert!(!args.assert(&r, &[1i64.into_matcher(), 5i64.into_matcher()], "second"));
    let errors = r.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Arguments do not match: 1 difference(s)"));
    assert!(errors[0].contains("1: FAIL:  2 != 5"));
    assert!(errors[0].contains("second"));
}

#[test]
fn is_same_uses_identity_for_references() {
    let target = Value::pointer(Value::int(1));
    let twin = Value::pointer(Value::int(1));
    let args = arguments(&[target.clone(), Value::string("x")]);
    assert!(args.is_same(&[target, Value::string("x")]));
    assert!(!args.is_same(&[twin, Value::string("x")]));
    assert!(!args.is_same(&[]));
}

#[test]
fn is_same_falls_back_to_deep_equality_for_plain_values() {
    let args = arguments(&[Value::int(7), Value::string("x")]);
    assert!(args.is_same(&[Value::int(7), Value::string("x")]));
    assert!(!args.is_same(&[Value::int(8), Value::string("x")]));
    assert!(!Value::int(7).same(&Value::int(7)));
}

#[test]
fn display_joins_values() {
    let args = arguments(&[Value::int(1), Value::string("a"), Value::Nil]);
    assert_eq!(args.to_string(), "1, \"a\", nil");
}
