use std::borrow::Cow;
use tessera::core::{DescriptorType, KindBundle};
use tessera::prelude::*;

fn hero_registry() -> Registry {
    let registry = Registry::new();
    registry
        .define_schema("hero", |s| {
            s.field(Field::string("name").min(4.0).required())
                .field(Field::array("friends", "hero"))
        })
        .unwrap();
    registry
}

#[test]
fn test_hero_validation_reports_and_normalizes() {
    let registry = hero_registry();
    let outcome = Validator::new(&registry)
        .validate_schema("hero", &json!({"name": "Th", "friends": [{"name": "Iron Man"}]}))
        .unwrap();

    assert_eq!(outcome.errors.to_value(), json!({"name": ["too short"]}));
    assert_eq!(
        outcome.value,
        json!({"name": "Th", "friends": [{"name": "Iron Man", "friends": []}]})
    );
    assert!(!outcome.is_valid());
}

#[test]
fn test_nested_errors_keep_their_path() {
    let registry = hero_registry();
    let outcome = Validator::new(&registry)
        .validate_schema(
            "hero",
            &json!({"name": "Thor", "friends": [{"name": "Sif"}, {"name": "Loki"}, {}]}),
        )
        .unwrap();

    assert_eq!(
        outcome.errors.to_value(),
        json!({"friends": {"0": {"name": ["too short"]}, "2": {"name": ["is required"]}}})
    );
    assert_eq!(outcome.errors.messages_at("friends.2.name"), ["is required"]);
    assert_eq!(outcome.errors.total_errors(), 2);

    let response = outcome.to_json();
    assert_eq!(response["error"]["code"], "validation_failed");
}

#[test]
fn test_validated_value_serializes_to_the_same_shape() {
    let registry = hero_registry();
    let outcome = Validator::new(&registry)
        .validate_schema("hero", &json!({"name": "Thor", "friends": [{"name": "Loki"}]}))
        .unwrap();
    let value = outcome.into_result().unwrap();

    let serialized = Serializer::new(&registry).serialize_schema("hero", &value).unwrap();
    assert_eq!(serialized, value);
}

#[test]
fn test_typed_host_objects() {
    #[derive(Serialize)]
    struct Hero {
        name: String,
        friends: Vec<Hero>,
        secret: String,
    }

    let registry = hero_registry();
    let thor = Hero {
        name: "Thor".to_string(),
        friends: vec![Hero {
            name: "Heimdall".to_string(),
            friends: Vec::new(),
            secret: "sees all".to_string(),
        }],
        secret: "Donald Blake".to_string(),
    };

    let output = Serializer::new(&registry).serialize_host("hero", &thor).unwrap();
    assert_eq!(
        output,
        json!({"name": "Thor", "friends": [{"name": "Heimdall", "friends": []}]})
    );

    let input = host_value(&thor).unwrap();
    assert!(Validator::new(&registry).validate_schema("hero", &input).unwrap().is_valid());
}

struct EmailBundle;

impl KindBundle for EmailBundle {
    fn kind_name(&self) -> &str {
        "email"
    }

    fn coerce<'v>(&self, value: &'v Value, _config: &EngineConfig) -> Option<Cow<'v, Value>> {
        match value.as_str() {
            Some(text) if text.contains('@') => Some(Cow::Borrowed(value)),
            _ => None,
        }
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::with_format("string", "email")
    }
}

#[test]
fn test_custom_kinds_and_hooks() {
    let registry = Registry::new();
    registry.register_kind(EmailBundle);
    registry.register_predicate("is_company", |host| host["company"] == json!(true));
    registry.register_validator("even", |value| match value.as_i64() {
        Some(n) if n % 2 == 0 => Ok(()),
        _ => Err("must be even".to_string()),
    });
    registry
        .define_schema("account", |s| {
            s.field(Field::custom("email", "email").required())
                .field(Field::string("vat").required().when_named("is_company"))
                .field(Field::integer("seats").validate_named("even"))
        })
        .unwrap();

    let validator = Validator::new(&registry);
    let personal = validator
        .validate_schema("account", &json!({"email": "thor.asgard", "seats": 3}))
        .unwrap();
    assert_eq!(
        personal.errors.to_value(),
        json!({"email": ["is not email"], "seats": ["must be even"]})
    );

    let company = validator
        .validate_schema("account", &json!({"email": "thor@asgard", "company": true, "seats": 2}))
        .unwrap();
    assert_eq!(company.errors.to_value(), json!({"vat": ["is required"]}));
    assert_eq!(company.value, json!({"email": "thor@asgard", "seats": 2}));

    let mut generator = OpenApiGenerator::new(OpenApiConfig::default());
    let spec = generator.generate(&registry).unwrap();
    let email = spec.component("account").unwrap().properties.get("email").unwrap();
    assert_eq!(email.format.as_deref(), Some("email"));
}

#[test]
fn test_strict_configuration() {
    let registry = Registry::new().with_config(EngineConfig::strict());
    registry
        .define_schema("stats", |s| {
            s.field(Field::integer("power").required())
                .field(Field::string("motto").default("Hammer time"))
        })
        .unwrap();

    let outcome = Validator::new(&registry)
        .validate_schema("stats", &json!({"power": "9", "motto": null}))
        .unwrap();
    assert_eq!(
        outcome.errors.to_value(),
        json!({"power": ["is not integer"], "motto": ["is not string"]})
    );
}
