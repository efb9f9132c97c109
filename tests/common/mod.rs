//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use datastore_mapping::{
    converter, entity_converter_with, Converter, CustomConversions, DatastoreKeyFactory,
    DatastoreOptions, DefaultEntityConverter, EntityConverter, EntityMapping, FullEntity,
    FullEntityBuilder, MappingContext, ObjectToKeyFactory, PersistentProperty, PropertyValue,
    TypeInfo, TypeKey,
};
use std::sync::Arc;

pub const PROJECT_ID: &str = "test-project";

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("datastore_convert=debug,datastore_mapping=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Color {
    #[default]
    Red,
    Green,
    Blue,
}

/// `Color` ⇄ `Vec<u8>`, so colors are stored as blobs in two steps.
pub fn color_converters() -> Vec<Arc<dyn Converter>> {
    vec![
        converter(|c: &Color| {
            Some(vec![match c {
                Color::Red => 0u8,
                Color::Green => 1,
                Color::Blue => 2,
            }])
        }),
        converter(|bytes: &Vec<u8>| match bytes.as_slice() {
            [0] => Some(Color::Red),
            [1] => Some(Color::Green),
            [2] => Some(Color::Blue),
            _ => None,
        }),
    ]
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Person {
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
    pub tags: Vec<String>,
    pub home: Option<Address>,
    pub previous: Vec<Address>,
    pub scores: Vec<(String, i64)>,
    pub favorite: Color,
    pub joined: Option<DateTime<Utc>>,
    pub bio: Vec<String>,
}

pub fn address_mapping() -> EntityMapping<Address> {
    EntityMapping::<Address>::new("address")
        .scalar("street", |a: &Address| a.street.clone(), |a, s| a.street = s)
        .scalar("city", |a: &Address| a.city.clone(), |a, c| a.city = c)
}

/// `home` and `bio` are unindexed.
pub fn person_mapping() -> EntityMapping<Person> {
    EntityMapping::<Person>::new("person")
        .id("id", |p: &Person| p.id, |p, id| p.id = Some(id))
        .scalar("name", |p: &Person| p.name.clone(), |p, n| p.name = n)
        .scalar("age", |p: &Person| p.age, |p, a| p.age = a)
        .list("tags", |p: &Person| p.tags.clone(), |p, t| p.tags = t)
        .property(
            PersistentProperty::new("home", TypeInfo::of::<Address>()).as_unindexed(),
            |p: &Person| PropertyValue::from_option(p.home.clone()),
            |p, v| {
                p.home = v.into_option::<Address>()?;
                Ok(())
            },
        )
        .list("previous", |p: &Person| p.previous.clone(), |p, a| p.previous = a)
        .map("scores", |p: &Person| p.scores.clone(), |p, s| p.scores = s)
        .scalar("favorite", |p: &Person| p.favorite, |p, c| p.favorite = c)
        .optional("joined", |p: &Person| p.joined, |p, j| p.joined = Some(j))
        .property(
            PersistentProperty::new("bio", TypeInfo::list_of::<String>()).as_unindexed(),
            |p: &Person| PropertyValue::list(p.bio.clone()),
            |p, v| {
                p.bio = v.into_vec::<String>()?;
                Ok(())
            },
        )
}

pub fn mapping_context() -> MappingContext {
    MappingContext::builder()
        .register(address_mapping())
        .register(person_mapping())
        .build()
}

pub fn options() -> DatastoreOptions {
    DatastoreOptions::new(PROJECT_ID)
}

pub fn person_converter() -> Arc<DefaultEntityConverter> {
    entity_converter_with(
        options(),
        mapping_context(),
        CustomConversions::new(color_converters()),
    )
    .unwrap()
}

pub fn sample_person() -> Person {
    Person {
        id: Some(42),
        name: "Ada".to_string(),
        age: 36,
        tags: vec!["math".to_string(), "engines".to_string()],
        home: Some(Address {
            street: "12 St James's Square".to_string(),
            city: "London".to_string(),
        }),
        previous: vec![
            Address {
                street: "Piccadilly Terrace".to_string(),
                city: "London".to_string(),
            },
            Address {
                street: "Fordhook".to_string(),
                city: "Ealing".to_string(),
            },
        ],
        scores: vec![("algebra".to_string(), 10), ("poetry".to_string(), 7)],
        favorite: Color::Blue,
        joined: DateTime::from_timestamp(1_700_000_000, 0),
        bio: vec!["first".to_string(), "second".to_string()],
    }
}

/// Write `person` into an entity keyed by its id.
pub fn write_person(converter: &DefaultEntityConverter, person: &Person) -> FullEntity {
    let entity = converter
        .mapping_context()
        .persistent_entity(TypeKey::of::<Person>())
        .unwrap();
    let key = DatastoreKeyFactory::new(options())
        .get_key_from_object(person, entity)
        .unwrap();

    let mut builder = FullEntityBuilder::new();
    builder.set_key(key);
    converter.write(person, &mut builder).unwrap();
    builder.build()
}

pub fn read_person(converter: &DefaultEntityConverter, entity: &FullEntity) -> Person {
    converter
        .read(TypeKey::of::<Person>(), entity)
        .unwrap()
        .downcast::<Person>()
        .unwrap()
}
