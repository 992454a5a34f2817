use crate::error::{Error, ErrorType};
use crate::options::ValidateOptions;
use crate::plugin::{ErrorOrMessage, ValidationPluginOptions};
use crate::schema::{
    resolver, ExecutableSchema, FieldConfig, InputField, InputObjectType, SchemaBuilder,
    Selection, TypeRef,
};
use crate::validator::{Action, BoundValue, Check, Primitive, Validator};
use serde_json::{json, Value};
use std::sync::Arc;

fn capitalized(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|text| text.chars().next().is_some_and(char::is_uppercase))
}

/// Builds the example schema the end-to-end tests run against.
fn example_schema(options: ValidationPluginOptions<()>) -> ExecutableSchema<()> {
    SchemaBuilder::with_options(options)
        .enum_type("Enum1")
        .input_object(
            InputObjectType::new("Recursive")
                .validate(ValidateOptions::new().check(
                    Check::new(|fields| fields.get("number").and_then(Value::as_i64) != Some(3))
                        .message("number must not be 3"),
                ))
                .field(
                    InputField::new("number", TypeRef::named("Int").non_null())
                        .validate(ValidateOptions::new().max_value(5)),
                )
                .field(
                    InputField::new("float", TypeRef::named("Float").non_null()).validate(
                        ValidateOptions::new().check(Check::new(|value| {
                            value.as_f64().is_some_and(|given| given % 1.0 != 0.0)
                        })),
                    ),
                )
                .field(InputField::new("recurse", TypeRef::named("Recursive"))),
        )
        .input_object(
            InputObjectType::new("ContactInfo")
                .field(
                    InputField::new("name", TypeRef::named("String").non_null()).validate(
                        ValidateOptions::new().max_length(30).check(
                            Check::async_fn(|name| async move { capitalized(&name) })
                                .message("Name should be capitalized"),
                        ),
                    ),
                )
                .field(
                    InputField::new("aliases", TypeRef::named("String").list()).validate(
                        ValidateOptions::new()
                            .items(ValidateOptions::new().max_length(30))
                            .check(
                                Check::new(|list| {
                                    list.as_array()
                                        .is_some_and(|items| items.iter().all(capitalized))
                                })
                                .message("Aliases should be capitalized"),
                            ),
                    ),
                )
                .field(
                    InputField::new("email", TypeRef::named("String").non_null()).validate(
                        ValidateOptions::new().email(true).check(
                            Check::new(|value| {
                                value
                                    .as_str()
                                    .is_some_and(|text| text.split('@').nth(1) != Some("example.com"))
                            })
                            .message("no example.com email addresses"),
                        ),
                    ),
                )
                .field(
                    InputField::new("phone", TypeRef::named("String")).validate(
                        ValidateOptions::new()
                            .trim()
                            .regex_str(r"^\d{3}-\d{3}-\d{4}$")
                            .length(12),
                    ),
                ),
        )
        .input_object(
            InputObjectType::new("Nested").field(
                InputField::new("id", TypeRef::named("ID")).validate(
                    ValidateOptions::new().schema(
                        Validator::Primitive(Primitive::String).pipe(Action::MinLength(2, None)),
                    ),
                ),
            ),
        )
        .input_object(
            InputObjectType::new("SoloNested")
                .field(InputField::new("nested", TypeRef::named("Nested"))),
        )
        .input_object(
            InputObjectType::new("NestedObjectList")
                .field(InputField::new("nested", TypeRef::named("Nested").list())),
        )
        .input_object(
            InputObjectType::new("WithSchemaInput").field(
                InputField::new("name", TypeRef::named("String")).validate(
                    ValidateOptions::new().schema(
                        Validator::Primitive(Primitive::String).pipe(Action::MinLength(2, None)),
                    ),
                ),
            ),
        )
        .input_object(
            InputObjectType::new("WithValidation")
                .validate(
                    ValidateOptions::new()
                        .check(
                            Check::new(|fields| fields["name"] == json!("secret"))
                                .message("Incorrect name given"),
                        )
                        .check(
                            Check::new(|fields| fields["age"] == json!(100))
                                .message("Incorrect age given"),
                        ),
                )
                .field(InputField::new("name", TypeRef::named("String")))
                .field(InputField::new("age", TypeRef::named("Float"))),
        )
        .field(
            FieldConfig::new("simple", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(
                InputField::new("email", TypeRef::named("String"))
                    .validate(ValidateOptions::new().email(true)),
            )
            .argument(
                InputField::new("phone", TypeRef::named("String")).validate(
                    ValidateOptions::new()
                        .schema(Validator::Primitive(Primitive::String).pipe(Action::Trim)),
                ),
            )
            .validate(ValidateOptions::new().check(Check::async_fn(|args| async move {
                !args["phone"].is_null() || !args["email"].is_null()
            }))),
        )
        .field(
            FieldConfig::new("withMessage", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(
                InputField::new("email", TypeRef::named("String"))
                    .validate(ValidateOptions::new().email((true, "invalid email address"))),
            )
            .argument(InputField::new("phone", TypeRef::named("String")))
            .validate(
                ValidateOptions::new().check(
                    Check::new(|args| !args["phone"].is_null() || !args["email"].is_null())
                        .message("Must provide either phone number or email address"),
                ),
            ),
        )
        .field(
            FieldConfig::new("list", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(
                InputField::new("list", TypeRef::named("String").list()).validate(
                    ValidateOptions::new()
                        .items(ValidateOptions::new().max_length(3))
                        .max_length(3),
                ),
            ),
        )
        .field(
            FieldConfig::new("echo", resolver(|args, _ctx, _info| async move {
                Ok(args["phone"].clone())
            }))
            .argument(
                InputField::new("phone", TypeRef::named("String")).validate(
                    ValidateOptions::new()
                        .trim()
                        .regex_str(r"^\d{3}-\d{3}-\d{4}$")
                        .length(12),
                ),
            ),
        )
        .field(
            FieldConfig::new("exampleField", resolver(|args, _ctx, _info| async move {
                Ok(args["odd"].clone())
            }))
            .argument(
                InputField::new("enum1", TypeRef::named("Enum1").list()).validate(
                    ValidateOptions::new().check(Check::new(|value| {
                        value
                            .as_array()
                            .and_then(|items| items.first())
                            .and_then(Value::as_str)
                            == Some("One")
                    })),
                ),
            )
            .argument(InputField::new(
                "recursive",
                TypeRef::named("Recursive").non_null(),
            ))
            .argument(
                InputField::new("odd", TypeRef::named("Int").non_null()).validate(
                    ValidateOptions::new().max_value(5).check(
                        Check::new(|value| value.as_i64().is_some_and(|given| given % 2 == 1))
                            .message("number must be odd"),
                    ),
                ),
            )
            .argument(
                InputField::new("contactInfo", TypeRef::named("ContactInfo")).validate(
                    ValidateOptions::new().refine(|schema| {
                        schema.with_check(
                            Check::new(|info| {
                                info["email"]
                                    .as_str()
                                    .is_some_and(|email| email.to_lowercase() == email)
                            })
                            .message("email should be lowercase")
                            .forward(&["email"]),
                        )
                    }),
                ),
            )
            .validate(ValidateOptions::new().refine(|schema| {
                schema.with_check(
                    Check::new(|args| {
                        args["contactInfo"]["aliases"]
                            .as_array()
                            .map_or(0, Vec::len)
                            > 1
                    })
                    .message("contactInfo should include at least 2 aliases")
                    .forward(&["contactInfo", "aliases"]),
                )
            })),
        )
        .field(
            FieldConfig::new("argsSchema", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(
                InputField::new("num", TypeRef::named("Float")).validate(
                    ValidateOptions::new().schema(
                        Validator::Primitive(Primitive::Number)
                            .pipe(Action::MinValue(BoundValue::Float(2.0), None)),
                    ),
                ),
            )
            .argument(
                InputField::new("string", TypeRef::named("String")).validate(
                    ValidateOptions::new().schema(
                        Validator::Primitive(Primitive::String).pipe(Action::MinLength(2, None)),
                    ),
                ),
            ),
        )
        .field(
            FieldConfig::new("soloNested", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(InputField::new("input", TypeRef::named("SoloNested"))),
        )
        .field(
            FieldConfig::new("nestedObjectList", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(InputField::new(
                "input",
                TypeRef::named("NestedObjectList"),
            )),
        )
        .field(
            FieldConfig::new("withSchemaInput", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(InputField::new("input", TypeRef::named("WithSchemaInput"))),
        )
        .field(
            FieldConfig::new("withSchemaInputList", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(InputField::new(
                "input",
                TypeRef::named("WithSchemaInput").list(),
            )),
        )
        .field(
            FieldConfig::new("withValidationInput", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(InputField::new("input", TypeRef::named("WithValidation"))),
        )
        .field(
            FieldConfig::new(
                "withValidationAndFieldValidator",
                resolver(|_args, _ctx, _info| async move { Ok(json!(true)) }),
            )
            .argument(
                InputField::new("input", TypeRef::named("WithValidation"))
                    .validate(ValidateOptions::new().check(Check::new(|input| {
                        input.get("name").is_some()
                    }))),
            ),
        )
        .build()
        .unwrap()
}

fn schema() -> ExecutableSchema<()> {
    example_schema(ValidationPluginOptions::default())
}

async fn resolve(schema: &ExecutableSchema<()>, field: &str, args: Value) -> Result<Value, Error> {
    schema.resolve_field(field, args, Arc::new(())).await
}

async fn resolve_err(schema: &ExecutableSchema<()>, field: &str, args: Value) -> String {
    resolve(schema, field, args)
        .await
        .unwrap_err()
        .print(true)
}

#[tokio::test]
async fn valid_query() {
    let schema = schema();
    let result = resolve(
        &schema,
        "exampleField",
        json!({
            "odd": 1,
            "recursive": {
                "float": 1.1,
                "number": 2,
                "recurse": { "float": 1.1, "number": 1 },
            },
            "contactInfo": {
                "name": "Deathman",
                "email": "deathman@test.com",
                "phone": " 555-123-4567 ",
                "aliases": ["Deathman92", "Deathman2292"],
            },
            "enum1": ["One", "Two"],
        }),
    )
    .await;
    assert_eq!(result.unwrap(), json!(1));
}

#[tokio::test]
async fn invalid_query_aggregates_every_violation() {
    let schema = schema();
    let error = resolve_err(
        &schema,
        "exampleField",
        json!({
            "odd": 2,
            "recursive": {
                "float": 1,
                "number": 2,
                "recurse": {
                    "float": 1,
                    "number": 6,
                    "recurse": { "float": 1.1, "number": 3 },
                },
            },
            "contactInfo": {
                "name": "deathman",
                "email": "Deathman@example.com",
                "phone": " 555-123-4567 ",
                "aliases": ["deathman92"],
            },
            "enum1": ["Two", "One"],
        }),
    )
    .await;
    assert_eq!(
        error,
        "Validation Error: Input failed validation\n\
         - enum1: Invalid input: Received Array\n\
         - recursive.float: Invalid input: Received 1\n\
         - recursive.recurse.number: Invalid value: Expected <=5 but received 6\n\
         - recursive.recurse.float: Invalid input: Received 1\n\
         - recursive.recurse.recurse: number must not be 3\n\
         - odd: number must be odd\n\
         - contactInfo.name: Name should be capitalized\n\
         - contactInfo.aliases: Aliases should be capitalized\n\
         - contactInfo.email: no example.com email addresses\n\
         - contactInfo.email: email should be lowercase\n\
         - contactInfo.aliases: contactInfo should include at least 2 aliases"
    );
}

#[tokio::test]
async fn recursive_inputs_fail_exactly_at_the_offending_level() {
    let schema = schema();
    let error = resolve_err(
        &schema,
        "exampleField",
        json!({
            "odd": 1,
            "recursive": {
                "float": 1.5,
                "number": 2,
                "recurse": {
                    "float": 1.5,
                    "number": 1,
                    "recurse": { "float": 1.5, "number": 3 },
                },
            },
            "contactInfo": {
                "name": "Deathman",
                "email": "deathman@test.com",
                "aliases": ["A", "B"],
            },
            "enum1": ["One"],
        }),
    )
    .await;
    assert_eq!(
        error,
        "Validation Error: Input failed validation\n\
         - recursive.recurse.recurse: number must not be 3"
    );
}

#[tokio::test]
async fn simple_fields_and_messages() {
    let schema = schema();

    assert_eq!(
        resolve(&schema, "simple", json!({"email": "abc@def.com"})).await.unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(&schema, "simple", json!({"email": "abc"})).await,
        "Validation Error: Input failed validation\n- email: Invalid email: Received \"abc\""
    );
    // With no arguments at all, only the field-level check fails, with the default message.
    assert_eq!(
        resolve_err(&schema, "simple", json!({})).await,
        "Validation Error: Input failed validation\n- Invalid input: Received Object"
    );

    assert_eq!(
        resolve(&schema, "withMessage", json!({"email": "abc@def.com"})).await.unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(&schema, "withMessage", json!({"email": "abc"})).await,
        "Validation Error: Input failed validation\n- email: invalid email address"
    );
    assert_eq!(
        resolve_err(&schema, "withMessage", json!({})).await,
        "Validation Error: Input failed validation\n\
         - Must provide either phone number or email address"
    );
}

#[tokio::test]
async fn list_arguments_validate_items_and_length() {
    let schema = schema();

    assert_eq!(
        resolve(&schema, "list", json!({"list": ["abc", "def", "ghi"]})).await.unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(&schema, "list", json!({"list": ["abcdef", "ghi"]})).await,
        "Validation Error: Input failed validation\n\
         - list.0: Invalid length: Expected <=3 but received 6"
    );
    assert_eq!(
        resolve_err(&schema, "list", json!({"list": ["a", "b", "c", "d"]})).await,
        "Validation Error: Input failed validation\n\
         - list: Invalid length: Expected <=3 but received 4"
    );
}

#[tokio::test]
async fn resolvers_receive_coerced_arguments() {
    let schema = schema();
    let result = resolve(&schema, "echo", json!({"phone": " 555-123-4567 "})).await;
    assert_eq!(result.unwrap(), json!("555-123-4567"));
}

#[tokio::test]
async fn argument_aggregation_reports_both_arguments() {
    let schema = schema();

    assert_eq!(
        resolve(&schema, "argsSchema", json!({"num": 3, "string": "abc"})).await.unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(&schema, "argsSchema", json!({"num": 1, "string": "a"})).await,
        "Validation Error: Input failed validation\n\
         - num: Invalid value: Expected >=2 but received 1\n\
         - string: Invalid length: Expected >=2 but received 1"
    );
}

#[tokio::test]
async fn nested_input_objects_with_schema_options() {
    let schema = schema();

    assert_eq!(
        resolve(&schema, "soloNested", json!({"input": {"nested": {"id": "12"}}})).await.unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(&schema, "soloNested", json!({"input": {"nested": {"id": "1"}}})).await,
        "Validation Error: Input failed validation\n\
         - input.nested.id: Invalid length: Expected >=2 but received 1"
    );

    assert_eq!(
        resolve(
            &schema,
            "nestedObjectList",
            json!({"input": {"nested": [{"id": "12"}]}}),
        )
        .await
        .unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(
            &schema,
            "nestedObjectList",
            json!({"input": {"nested": [{"id": "1"}]}}),
        )
        .await,
        "Validation Error: Input failed validation\n\
         - input.nested.0.id: Invalid length: Expected >=2 but received 1"
    );

    assert_eq!(
        resolve(&schema, "withSchemaInput", json!({"input": {"name": "abc"}})).await.unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(&schema, "withSchemaInput", json!({"input": {"name": "a"}})).await,
        "Validation Error: Input failed validation\n\
         - input.name: Invalid length: Expected >=2 but received 1"
    );
    assert_eq!(
        resolve_err(
            &schema,
            "withSchemaInputList",
            json!({"input": [{"name": "a"}]}),
        )
        .await,
        "Validation Error: Input failed validation\n\
         - input.0.name: Invalid length: Expected >=2 but received 1"
    );
}

#[tokio::test]
async fn input_type_level_options_apply_wherever_referenced() {
    let schema = schema();

    assert_eq!(
        resolve(
            &schema,
            "withValidationInput",
            json!({"input": {"name": "secret", "age": 100}}),
        )
        .await
        .unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(
            &schema,
            "withValidationInput",
            json!({"input": {"name": "not secret", "age": 101}}),
        )
        .await,
        "Validation Error: Input failed validation\n\
         - input: Incorrect name given\n\
         - input: Incorrect age given"
    );
    assert_eq!(
        resolve_err(
            &schema,
            "withValidationInput",
            json!({"input": {"name": "not secret", "age": 100}}),
        )
        .await,
        "Validation Error: Input failed validation\n- input: Incorrect name given"
    );
    assert_eq!(
        resolve_err(
            &schema,
            "withValidationInput",
            json!({"input": {"name": "secret", "age": 101}}),
        )
        .await,
        "Validation Error: Input failed validation\n- input: Incorrect age given"
    );

    assert_eq!(
        resolve(
            &schema,
            "withValidationAndFieldValidator",
            json!({"input": {"name": "secret", "age": 100}}),
        )
        .await
        .unwrap(),
        json!(true)
    );
    assert_eq!(
        resolve_err(
            &schema,
            "withValidationAndFieldValidator",
            json!({"input": {"name": "not secret", "age": 101}}),
        )
        .await,
        "Validation Error: Input failed validation\n\
         - input: Incorrect name given\n\
         - input: Incorrect age given"
    );
}

#[tokio::test]
async fn execute_follows_the_partial_response_model() {
    let schema = schema();
    let response = schema
        .execute(
            &[
                Selection::new("simple", json!({"email": "abc@def.com"})).alias("simpleValid"),
                Selection::new("simple", json!({"email": "abc"})).alias("simpleInvalid"),
                Selection::new("list", json!({"list": ["abc"]})).alias("listValid"),
            ],
            Arc::new(()),
        )
        .await;

    assert_eq!(response.data["simpleValid"], json!(true));
    assert_eq!(response.data["simpleInvalid"], json!(null));
    assert_eq!(response.data["listValid"], json!(true));
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0]
        .message
        .contains("email: Invalid email: Received \"abc\""));

    let serialized = serde_json::to_value(&response).unwrap();
    assert!(serialized.get("errors").is_some());

    let clean = schema
        .execute(&[Selection::new("simple", json!({"email": "abc@def.com"}))], Arc::new(()))
        .await;
    let serialized = serde_json::to_value(&clean).unwrap();
    assert!(serialized.get("errors").is_none());
}

#[tokio::test]
async fn validation_error_callback_maps_failures() {
    let schema = example_schema(ValidationPluginOptions {
        validation_error: Some(Arc::new(|issues, _args, _ctx, info| {
            ErrorOrMessage::Message(format!(
                "{} rejected {} argument value(s)",
                info.field_name,
                issues.len()
            ))
        })),
    });

    assert_eq!(
        resolve_err(&schema, "argsSchema", json!({"num": 1, "string": "a"})).await,
        "Validation Error: argsSchema rejected 2 argument value(s)"
    );
    // Valid input never reaches the callback.
    assert_eq!(
        resolve(&schema, "argsSchema", json!({"num": 3, "string": "abc"})).await.unwrap(),
        json!(true)
    );
}

#[tokio::test]
async fn validation_error_callback_may_raise_its_own_error() {
    let schema = example_schema(ValidationPluginOptions {
        validation_error: Some(Arc::new(|_issues, args, _ctx, _info| {
            ErrorOrMessage::Error(Error::new(
                format!("rejected arguments: {args}"),
                Some(ErrorType::Validation),
            ))
        })),
    });

    let error = resolve_err(&schema, "simple", json!({"email": "abc"})).await;
    assert_eq!(
        error,
        "Validation Error: rejected arguments: {\"email\":\"abc\"}"
    );
}

#[test]
fn list_fields_reject_non_array_options() {
    let error = SchemaBuilder::<()>::new()
        .field(
            FieldConfig::new("broken", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(
                InputField::new("list", TypeRef::named("String").list())
                    .validate(ValidateOptions::new().email(true)),
            ),
        )
        .build()
        .unwrap_err();
    assert_eq!(
        error.print(false),
        "Schema Error: Expected valid array validator for Query.broken(list)"
    );
}

#[test]
fn unmatched_option_keys_abort_the_build() {
    let error = SchemaBuilder::<()>::new()
        .field(
            FieldConfig::new("broken", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(
                InputField::new("value", TypeRef::named("String"))
                    .validate(ValidateOptions::new().integer(true).max_length(3)),
            ),
        )
        .build()
        .unwrap_err();
    assert_eq!(
        error.print(false),
        "Schema Error: No type validator can implement every constraint in (integer, maxLength)"
    );
}

#[test]
fn unknown_type_references_abort_the_build() {
    let error = SchemaBuilder::<()>::new()
        .field(
            FieldConfig::new("broken", resolver(|_args, _ctx, _info| async move {
                Ok(json!(true))
            }))
            .argument(InputField::new("value", TypeRef::named("Mystery"))),
        )
        .build()
        .unwrap_err();
    assert_eq!(
        error.print(false),
        "Schema Error: Unknown type Mystery referenced by broken.value"
    );
}

#[tokio::test]
async fn unvalidated_fields_keep_their_resolver_untouched() {
    let schema = SchemaBuilder::<()>::new()
        .field(
            FieldConfig::new("plain", resolver(|args, _ctx, _info| async move {
                Ok(args)
            }))
            .argument(InputField::new("anything", TypeRef::named("String"))),
        )
        .build()
        .unwrap();

    // Nothing validates, so even a value that no validator would accept passes through.
    let result = resolve(&schema, "plain", json!({"anything": [1, 2, 3]})).await;
    assert_eq!(result.unwrap(), json!({"anything": [1, 2, 3]}));
}
