//! Whole-pipeline checks through the public `shapecheck` surface.

use rayon::prelude::*;
use shapecheck::{
    CheckOptions, ClassRef, ConstructError, Descriptor, FunctionValue, Mismatch, Nominal,
    RecordSchema, SubtypeFailureReason, Value, check_type, check_type_pair,
    explain_subtype_failure, is_subtype, is_type, tracing_config,
};

fn ints(items: impl IntoIterator<Item = i64>) -> Value {
    Value::list(items.into_iter().map(Value::Int))
}

#[test]
fn list_of_ints() {
    let list_int = Descriptor::list(Descriptor::int());
    assert_eq!(check_type_pair(&ints([1, 2, 3]), &list_int), (true, None));

    let mixed = Value::list([Value::Int(1), Value::from("x"), Value::Int(3)]);
    let (ok, message) = check_type_pair(&mixed, &list_int);
    assert!(!ok);
    let message = message.expect("a failed check carries a message");
    assert!(message.contains("\"x\""), "unexpected message: {message}");
}

#[test]
fn mapping_with_union_values() {
    let payload = Value::dict([
        (Value::from("a"), Value::Int(1)),
        (Value::from("b"), Value::from("y")),
    ]);
    let expected = Descriptor::dict(
        Descriptor::str(),
        Descriptor::union([Descriptor::int(), Descriptor::str()]),
    );
    assert_eq!(check_type_pair(&payload, &expected), (true, None));

    let narrow = Descriptor::dict(Descriptor::str(), Descriptor::int());
    assert!(!is_type(&payload, &narrow));
}

#[test]
fn record_constructor() {
    let schema = RecordSchema::builder("Point")
        .field("a", Descriptor::int())
        .build()
        .expect("well-formed schema");

    let empty: [(&str, Value); 0] = [];
    assert!(matches!(
        schema.construct(empty),
        Err(ConstructError::MissingArgument { .. })
    ));
    assert!(matches!(
        schema.construct([("a", "1")]),
        Err(ConstructError::TypeMismatch {
            source: Mismatch::Type { .. },
            ..
        })
    ));
    let instance = schema.construct([("a", 1_i64)]).expect("1 is an int");
    assert!(matches!(instance.get("a"), Some(Value::Int(1))));
}

#[test]
fn values_and_descriptors_agree() {
    // A value conforming to a narrower descriptor conforms to its supertypes.
    let narrow = Descriptor::list(Descriptor::int());
    let wide = Descriptor::list(Descriptor::optional(Descriptor::int()));
    assert!(is_subtype(&narrow, &wide));
    assert!(!is_subtype(&wide, &narrow));

    let value = ints([4, 5]);
    assert!(is_type(&value, &narrow));
    assert!(is_type(&value, &wide));

    let reason = explain_subtype_failure(&wide, &narrow).expect("not a subtype");
    assert!(matches!(reason, SubtypeFailureReason::ElementMismatch { .. }));
}

#[test]
fn callables_and_user_classes() {
    let animal = ClassRef::new("Animal", []);
    let dog = ClassRef::new("Dog", [Nominal::Class(animal.clone())]);

    let feed = FunctionValue::new("feed")
        .param("pet", Descriptor::class(&animal))
        .returns(Descriptor::none());
    let takes_animal = Descriptor::callable([Descriptor::class(&animal)], Descriptor::none());
    assert!(is_type(&feed.into_value(), &takes_animal));

    assert!(is_type(&Value::object(&dog), &Descriptor::class(&animal)));
    assert!(check_type(&Value::object(&animal), &Descriptor::class(&dog)).is_err());
    assert!(is_subtype(&Descriptor::class(&dog), &Descriptor::class(&animal)));
}

#[test]
fn options_tune_record_checking() {
    let strict = RecordSchema::builder("Config")
        .field("tags", Descriptor::list(Descriptor::str()))
        .options(CheckOptions::default().with_max_depth(1))
        .build()
        .expect("well-formed schema");
    let tags = Value::list([Value::from("a")]);
    assert!(matches!(
        strict.construct([("tags", tags)]),
        Err(ConstructError::TypeMismatch {
            source: Mismatch::DepthExceeded { limit: 1 },
            ..
        })
    ));
}

#[test]
fn shared_schema_across_threads() {
    let schema = RecordSchema::builder("Sample")
        .field("id", Descriptor::int())
        .field("name", Descriptor::optional(Descriptor::str()))
        .build()
        .expect("well-formed schema");

    let failures = (0..256_i64)
        .into_par_iter()
        .filter(|&i| {
            let name = if i % 4 == 0 { Value::Int(i) } else { Value::None };
            schema.construct([("id", Value::Int(i)), ("name", name)]).is_err()
        })
        .count();
    assert_eq!(failures, 64);
}

#[test]
fn log_format_names() {
    use tracing_config::LogFormat;
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    assert_eq!(LogFormat::default(), LogFormat::Text);
}
