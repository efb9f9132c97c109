use super::*;
use crate::config::DatastoreOptions;
use crate::key_factory::DatastoreKeyFactory;
use crate::value_provider::EntityPropertyValueProvider;
use datastore_types::{FullEntityBuilder, LatLng};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Color {
    Red,
    Green,
}

fn key_factory() -> Arc<dyn ObjectToKeyFactory> {
    Arc::new(DatastoreKeyFactory::new(DatastoreOptions::new("test-project")))
}

fn conversions_with(converters: Vec<Arc<dyn Converter>>) -> TwoStepsConversions {
    TwoStepsConversions::new(
        CustomConversions::new(converters),
        key_factory(),
        Arc::new(MappingContext::default()),
    )
}

fn conversions() -> TwoStepsConversions {
    conversions_with(Vec::new())
}

fn color_converters() -> Vec<Arc<dyn Converter>> {
    vec![
        converter(|c: &Color| {
            Some(match c {
                Color::Red => vec![1u8],
                Color::Green => vec![2u8],
            })
        }),
        converter(|bytes: &Vec<u8>| match bytes.as_slice() {
            [1] => Some(Color::Red),
            [2] => Some(Color::Green),
            _ => None,
        }),
    ]
}

#[test]
fn test_read_null_is_null() {
    let result = conversions()
        .convert_on_read(&Value::null(), None, TypeKey::of::<String>())
        .unwrap();
    assert!(result.is_null());
}

#[test]
fn test_read_collection_and_element_types() {
    let list = Value::from(vec![Value::from("128"), Value::from("256")]);
    let result = conversions()
        .convert_on_read(&list, Some(CollectionKind::Set), TypeKey::of::<i32>())
        .unwrap();
    assert_eq!(result, PropertyValue::set(vec![256i32, 128]));
}

#[test]
fn test_read_simple_element_type() {
    let result = conversions()
        .convert_on_read(&Value::from("512"), None, TypeKey::of::<i32>())
        .unwrap();
    assert_eq!(result.into_option::<i32>().unwrap(), Some(512));
}

#[test]
fn test_read_incompatible_type_fails() {
    let err = conversions()
        .convert_on_read(&Value::from(3i64), None, TypeKey::of::<LatLng>())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Unable to convert i64 to {}", std::any::type_name::<LatLng>())
    );
}

#[test]
fn test_read_uses_custom_converter() {
    const NAMES: [&str; 6] = ["zero", "one", "two", "three", "four", "five"];
    let english = conversions_with(vec![converter(|n: &i64| {
        usize::try_from(*n)
            .ok()
            .and_then(|i| NAMES.get(i))
            .map(|name| name.to_string())
    })]);

    let result = english
        .convert_on_read(&Value::from(3i64), None, TypeKey::of::<String>())
        .unwrap();
    assert_eq!(result.into_option::<String>().unwrap().as_deref(), Some("three"));

    let declined = english.convert_on_read(&Value::from(7i64), None, TypeKey::of::<String>());
    assert!(matches!(declined, Err(DataError::Unconvertible { .. })));
}

#[test]
fn test_collection_target_with_scalar_value_reads_scalar() {
    let result = conversions()
        .convert_on_read(&Value::from("a"), Some(CollectionKind::List), TypeKey::of::<String>())
        .unwrap();
    assert_eq!(result.into_option::<String>().unwrap().as_deref(), Some("a"));
}

#[test]
fn test_collection_element_failure_is_wrapped() {
    let list = Value::from(vec![Value::from("1"), Value::from("x")]);
    let err = conversions()
        .convert_on_read(&list, Some(CollectionKind::List), TypeKey::of::<i32>())
        .unwrap_err();
    assert_eq!(err.to_string(), "Unable to process elements of a collection");
    assert!(matches!(err.root_cause(), DataError::Unconvertible { .. }));
}

#[test]
fn test_write_single_native_and_null() {
    let conversions = conversions();
    assert!(conversions.convert_on_write_single(None).unwrap().is_null());
    assert_eq!(
        conversions.convert_on_write_single(Some(&"s".to_string())).unwrap(),
        Value::from("s")
    );
    assert_eq!(
        conversions.convert_on_write_single(Some(&42i32)).unwrap(),
        Value::from(42i64)
    );
    assert_eq!(
        conversions.convert_on_write_single(Some(&1.5f32)).unwrap(),
        Value::from(1.5f64)
    );
}

#[test]
fn test_write_internal_step_only() {
    let conversions = conversions();
    let bytes = vec![1u8, 2, 3];
    let written = conversions.convert_on_write_single(Some(&bytes)).unwrap();
    assert_eq!(written.as_blob().map(|b| b.as_bytes()), Some(&bytes[..]));

    let read = conversions
        .convert_on_read(&written, None, TypeKey::of::<Vec<u8>>())
        .unwrap();
    assert_eq!(read.into_option::<Vec<u8>>().unwrap(), Some(bytes));
}

#[test]
fn test_two_step_round_trip() {
    let conversions = conversions_with(color_converters());
    let targets = conversions.compute_type_targets(TypeKey::of::<Color>());
    assert_eq!(targets.first_step_target(), Some(TypeKey::of::<Vec<u8>>()));
    assert_eq!(targets.second_step_target(), Some(TypeKey::of::<Blob>()));

    let written = conversions.convert_on_write_single(Some(&Color::Green)).unwrap();
    assert_eq!(written.as_blob().map(Blob::as_bytes), Some(&[2u8][..]));

    let read = conversions
        .convert_on_read(&written, None, TypeKey::of::<Color>())
        .unwrap();
    assert_eq!(read.into_option::<Color>().unwrap(), Some(Color::Green));
}

#[test]
fn test_first_step_only_round_trip() {
    let conversions = conversions_with(vec![
        converter(|id: &Uuid| Some(id.to_string())),
        converter(|s: &String| Uuid::parse_str(s).ok()),
    ]);
    let id = Uuid::new_v4();
    let targets = conversions.compute_type_targets(TypeKey::of::<Uuid>());
    assert_eq!(targets.first_step_target(), Some(TypeKey::of::<String>()));
    assert_eq!(targets.second_step_target(), None);

    let written = conversions.convert_on_write_single(Some(&id)).unwrap();
    assert_eq!(written.as_str(), Some(id.to_string().as_str()));
    let read = conversions
        .convert_on_read(&written, None, TypeKey::of::<Uuid>())
        .unwrap();
    assert_eq!(read.into_option::<Uuid>().unwrap(), Some(id));
}

#[test]
fn test_declined_write_fails() {
    let conversions = conversions_with(vec![
        converter(|_: &Color| None::<Vec<u8>>),
        converter(|_: &Vec<u8>| None::<Color>),
    ]);
    let err = conversions
        .convert_on_write_single(Some(&Color::Red))
        .unwrap_err();
    assert!(err.to_string().starts_with("Unable to convert"));
}

#[test]
fn test_unsupported_write_fails() {
    let err = conversions()
        .convert_on_write_single(Some(&Color::Red))
        .unwrap_err();
    assert!(matches!(err, DataError::UnsupportedValue(_)));
    assert!(err.to_string().contains("Color"));
}

#[test]
fn test_datastore_compatible_type() {
    let conversions = conversions();
    assert_eq!(
        conversions.get_datastore_compatible_type(TypeKey::of::<String>()),
        Some(TypeKey::of::<String>())
    );
    assert_eq!(
        conversions.get_datastore_compatible_type(TypeKey::of::<i32>()),
        Some(TypeKey::of::<i64>())
    );
    assert_eq!(
        conversions.get_datastore_compatible_type(TypeKey::of::<DateTime<Utc>>()),
        Some(TypeKey::of::<Timestamp>())
    );
    assert_eq!(conversions.get_datastore_compatible_type(TypeKey::of::<Color>()), None);
}

#[test]
fn test_compatible_type_requires_both_directions() {
    let one_way = TwoStepsConversions::builder(
        CustomConversions::default(),
        key_factory(),
        Arc::new(MappingContext::default()),
    )
    .internal_converter(converter(|c: &Color| Some(format!("{c:?}"))))
    .build();
    assert_eq!(one_way.get_datastore_compatible_type(TypeKey::of::<Color>()), None);

    let both_ways = TwoStepsConversions::builder(
        CustomConversions::default(),
        key_factory(),
        Arc::new(MappingContext::default()),
    )
    .internal_converter(converter(|c: &Color| Some(format!("{c:?}"))))
    .internal_converter(converter(|s: &String| match s.as_str() {
        "Red" => Some(Color::Red),
        "Green" => Some(Color::Green),
        _ => None,
    }))
    .build();
    assert_eq!(
        both_ways.get_datastore_compatible_type(TypeKey::of::<Color>()),
        Some(TypeKey::of::<String>())
    );
}

#[test]
fn test_write_targets_are_cached() {
    let cache = Arc::new(WriteTargetCache::new());
    let conversions = TwoStepsConversions::builder(
        CustomConversions::default(),
        key_factory(),
        Arc::new(MappingContext::default()),
    )
    .write_target_cache(cache.clone())
    .build();

    conversions.convert_on_write_single(Some(&vec![7u8])).unwrap();
    conversions.convert_on_write_single(Some(&"native".to_string())).unwrap();
    assert!(conversions.convert_on_write_single(Some(&Color::Red)).is_err());

    assert_eq!(cache.get(TypeKey::of::<Vec<u8>>()), Some(Some(TypeKey::of::<Blob>())));
    assert_eq!(cache.get(TypeKey::of::<Color>()), Some(None));
    assert_eq!(cache.get(TypeKey::of::<String>()), None);
}

#[test]
fn test_write_list_preserves_order() {
    let conversions = conversions();
    let property = PersistentProperty::new("numbers", TypeInfo::list_of::<i32>());
    let written = conversions
        .convert_on_write(&PropertyValue::list(vec![3i32, 1, 2]), &property)
        .unwrap();
    assert_eq!(
        written,
        Value::from(vec![Value::from(3i64), Value::from(1i64), Value::from(2i64)])
    );

    let read = conversions
        .convert_on_read_typed(&written, EmbeddedType::NotEmbedded, property.type_info())
        .unwrap();
    assert_eq!(read.into_vec::<i32>().unwrap(), vec![3, 1, 2]);
}

#[test]
fn test_write_failure_names_type_and_field() {
    let property = PersistentProperty::new("color", TypeInfo::of::<Color>());
    let err = conversions()
        .convert_on_write(&PropertyValue::scalar(Color::Red), &property)
        .unwrap_err();
    assert!(err.to_string().contains("Color"));
    assert!(err.to_string().contains("'color'"));
}

#[test]
fn test_embedded_entity_without_bridge_fails() {
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Inner;

    let property = PersistentProperty::new("inner", TypeInfo::of::<Inner>())
        .with_embedded_type(EmbeddedType::EmbeddedEntity);
    let err = conversions()
        .convert_on_write(&PropertyValue::scalar(Inner), &property)
        .unwrap_err();
    assert!(matches!(err.root_cause(), DataError::NoEntityConverter));
}

#[test]
fn test_embedded_strategy_rejects_non_entity_value() {
    let err = conversions()
        .convert_on_read_typed(
            &Value::from(1i64),
            EmbeddedType::EmbeddedMap,
            &TypeInfo::map_of::<String, i64>(),
        )
        .unwrap_err();
    assert!(matches!(err, DataError::EmbeddedMapExpected(_)));

    let err = conversions()
        .convert_on_read_typed(
            &Value::from(1i64),
            EmbeddedType::EmbeddedEntity,
            &TypeInfo::of::<String>(),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Embedded entity was expected, but LONG found");
}

#[test]
fn test_property_provider_wraps_read_failures() {
    let mut builder = FullEntityBuilder::new();
    builder.set("boolField", 1i64);
    let entity = builder.build();
    let conversions = conversions();
    let provider = EntityPropertyValueProvider::new(&entity, &conversions);

    let property = PersistentProperty::new("boolField", TypeInfo::of::<bool>());
    let err = provider.get_property_value(&property).unwrap_err();
    assert_eq!(err.to_string(), "Unable to read property boolField");

    let missing = PersistentProperty::new("missing", TypeInfo::of::<bool>());
    assert!(provider.get_property_value(&missing).unwrap().is_null());
}
