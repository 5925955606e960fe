use super::*;
use crate::ToValue;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::int(42)), "42");
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::string("hello")), "\"hello\"");
    assert_eq!(format!("{}", Value::float(2.0)), "2.0");
    assert_eq!(format!("{}", Value::bytes(*b"hi")), "b\"hi\"");
    assert_eq!(format!("{}", Value::Nil), "nil");
}

#[test]
fn test_collection_display() {
    let list = vec![1i32, 2, 3].to_value();
    assert_eq!(list.to_string(), "[1, 2, 3]");
    assert_eq!(Value::list(vec![]).to_string(), "[]");
    assert_eq!(Value::nil_seq("Vec<i32>").to_string(), "nil");

    let map = Value::map("Map<String, i32>", vec![("a".to_value(), 1i32.to_value())]);
    assert_eq!(map.to_string(), "{\"a\": 1}");
}

#[test]
fn test_record_display() {
    let rec = Value::record("app::User")
        .field("Name", "John")
        .field("Age", 30i32)
        .build();
    assert_eq!(rec.to_string(), "User { Name: \"John\", Age: 30 }");
    assert_eq!(
        rec.render_pretty(),
        "User {\n    Name: \"John\",\n    Age: 30,\n}"
    );
    assert_eq!(Value::record("Empty").build().to_string(), "Empty {}");
}

#[test]
fn test_render_typed() {
    assert_eq!(1i32.to_value().render_typed(), "i32(1)");
    assert_eq!(1i64.to_value().render_typed(), "i64(1)");
    assert_eq!(format!("{:?}", 7u8.to_value()), "u8(7)");
}

#[test]
fn test_cyclic_value_renders() {
    let cell = Value::pointer_to("&Node", Value::Nil);
    let node = Value::record("Node").field("next", cell.clone()).build();
    assert!(cell.as_ref_value().unwrap().store(node));
    assert_eq!(cell.to_string(), "&Node { next: &<cycle> }");
}

#[test]
fn test_nil_of_each_kind() {
    assert!(Value::Nil.is_nil());
    assert!(Value::nil_bytes().is_nil());
    assert!(Value::nil_seq("Vec<i32>").is_nil());
    assert!(Value::nil_map("Map<String, i32>").is_nil());
    assert!(Value::nil_pointer("&i32").is_nil());
    assert!(Value::nil_func("fn()").is_nil());
    assert!(Value::nil_chan("chan i32").is_nil());

    assert!(!Value::bytes(Vec::new()).is_nil());
    assert!(!Value::list(vec![]).is_nil());
    assert!(!Value::int(0).is_nil());
    assert!(!Value::int(0).is_nillable());
}

#[test]
fn test_len() {
    assert_eq!("héllo".to_value().len(), Some(6));
    assert_eq!(vec![1u8, 2].to_value().len(), Some(2));
    assert_eq!(Value::nil_map("M").len(), Some(0));
    assert_eq!(Value::int(3).len(), None);

    let chan = Value::channel("chan i32", Some(4));
    assert!(chan.as_chan().unwrap().send(1i32.to_value()));
    assert_eq!(chan.len(), Some(1));
}

#[test]
fn test_same_is_pointer_identity() {
    let p = Value::pointer(Value::int(1));
    let q = Value::pointer(Value::int(1));
    assert!(p.same(&p.clone()));
    assert!(!p.same(&q));
    assert!(!Value::int(1).same(&Value::int(1)));
    assert!(!Value::nil_pointer("&i64").same(&Value::nil_pointer("&i64")));
}

#[test]
fn test_simple_type_name() {
    let rec = Value::record("my_crate::model::User").build();
    assert_eq!(rec.simple_type_name(), "User");
    assert_eq!(
        vec![rec].to_value().type_name(),
        "Vec<Value>",
        "a Vec<Value> keeps its declared element type"
    );
}

#[test]
fn test_accessors() {
    let rec = Value::record("Req")
        .field("host", "example.com")
        .hidden("token", 7u32)
        .build();
    assert_eq!(rec.field("host").and_then(Value::as_str), Some("example.com"));
    assert_eq!(rec.field("token").and_then(Value::as_u64), Some(7));
    assert!(!rec.as_record().unwrap().fields()[1].is_exported());
    assert_eq!(Value::int(5).get::<i64>(), Some(5));
    assert_eq!(Value::int(5).get::<i32>(), None);
}

#[test]
fn test_ref_load_and_store() {
    let p = Value::pointer(Value::int(1));
    let r = p.as_ref_value().unwrap();
    assert_eq!(r.load(), Some(Value::int(1)));
    assert!(r.store(Value::int(2)));
    assert_eq!(r.load(), Some(Value::int(2)));
    assert!(!Value::nil_pointer("&i64").as_ref_value().unwrap().store(Value::int(3)));
}

#[test]
fn test_func_call() {
    let double = Value::func("fn(i64) -> i64", |args| {
        vec![Value::int(args[0].as_i64().unwrap_or(0) * 2)]
    });
    let out = double.as_func().unwrap().call(&[Value::int(21)]);
    assert_eq!(out, Some(vec![Value::int(42)]));
    assert_eq!(Value::nil_func("fn()").as_func().unwrap().call(&[]), None);
}
