//! End-to-end engine scenarios against the in-memory library.

use std::sync::Arc;

use serde_json::json;
use shelfql_graphql::schema::{FieldDef, TypeDef, TypeRef};
use shelfql_graphql::{
    CallCounter, Executor, GraphQLConfig, RequestContext, ResolverContext, ResolverError,
    ResolverTable, SchemaRegistry, library_executor, parse_operation,
};
use tokio_test::assert_ok;

fn executor() -> Executor {
    let storage = assert_ok!(shelfql_db_memory::create_sample_storage());
    assert_ok!(library_executor(storage, &GraphQLConfig::default()))
}

async fn run(executor: &Executor, query: &str) -> shelfql_graphql::ExecutionResponse {
    let operation = assert_ok!(parse_operation(query, None));
    let ctx = Arc::new(RequestContext::new("it-test"));
    assert_ok!(executor.execute(&operation, ctx).await)
}

#[tokio::test]
async fn books_with_nested_authors() {
    let response = run(
        &executor(),
        "{ books { id title author { userId firstName lastName } } }",
    )
    .await;

    assert!(response.is_ok());
    assert_eq!(
        response.data,
        json!({
            "books": [
                {
                    "id": "0",
                    "title": "Gang of Four",
                    "author": { "userId": "52", "firstName": "Aayush", "lastName": "Vyas" }
                },
                {
                    "id": "1",
                    "title": "Typescript the best",
                    "author": { "userId": "78", "firstName": "Pranav", "lastName": "Vyas" }
                }
            ]
        })
    );
}

#[tokio::test]
async fn author_lookup_by_id() {
    let executor = executor();

    let response = run(&executor, "{ author(id: 1) { userId firstName } }").await;
    assert_eq!(
        response.data,
        json!({ "author": { "userId": "78", "firstName": "Pranav" } })
    );

    // String ids are accepted for ID arguments
    let response = run(&executor, r#"{ author(id: "0") { firstName } }"#).await;
    assert_eq!(response.data, json!({ "author": { "firstName": "Aayush" } }));

    for missing in ["99", "-1", "\"abc\""] {
        let response = run(&executor, &format!("{{ author(id: {missing}) {{ userId }} }}")).await;
        assert!(response.is_ok(), "id {missing} should not error");
        assert_eq!(response.data, json!({ "author": null }));
    }
}

#[tokio::test]
async fn create_book_then_list() {
    let executor = executor();

    let response = run(
        &executor,
        r#"mutation {
            createBook(request: {title: "X", author: {firstName: "A", lastName: "B"}}) {
                id
                title
                author { userId firstName lastName }
            }
        }"#,
    )
    .await;
    assert!(response.is_ok());
    assert_eq!(
        response.data,
        json!({
            "createBook": {
                "id": "2",
                "title": "X",
                "author": { "userId": "2", "firstName": "A", "lastName": "B" }
            }
        })
    );

    // A book without an author resolves `author` to null
    let response = run(
        &executor,
        r#"mutation { createBook(request: {title: "Solo"}) { id author { firstName } } }"#,
    )
    .await;
    assert_eq!(
        response.data,
        json!({ "createBook": { "id": "3", "author": null } })
    );

    let response = run(&executor, "{ books { title } authors { firstName } }").await;
    assert_eq!(
        response.data,
        json!({
            "books": [
                { "title": "Gang of Four" },
                { "title": "Typescript the best" },
                { "title": "X" },
                { "title": "Solo" }
            ],
            "authors": [
                { "firstName": "Aayush" },
                { "firstName": "Pranav" },
                { "firstName": "A" }
            ]
        })
    );
}

#[tokio::test]
async fn response_follows_selection_order() {
    let response = run(&executor(), "{ books { title author { lastName } id } }").await;
    let first = &response.data["books"][0];
    let keys: Vec<_> = first.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["title", "author", "id"]);
}

#[tokio::test]
async fn concurrent_requests_share_one_executor() {
    let executor = Arc::new(executor());

    let mut handles = Vec::new();
    for i in 0..8 {
        let executor = executor.clone();
        handles.push(tokio::spawn(async move {
            let operation = parse_operation("{ authors { firstName } }", None).unwrap();
            let ctx = Arc::new(RequestContext::new(format!("req-{i}")));
            executor.execute(&operation, ctx).await.unwrap()
        }));
    }
    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.data["authors"][1]["firstName"], "Pranav");
    }
}

#[tokio::test]
async fn custom_schema_scenarios() {
    let schema = SchemaRegistry::new()
        .with_type(
            TypeDef::object("Item")
                .field(FieldDef::new("a", TypeRef::named("String")))
                .field(FieldDef::new("b", TypeRef::named("String"))),
        )
        .and_then(|r| {
            r.with_type(
                TypeDef::object("Query")
                    .field(FieldDef::new("items", TypeRef::named_list("Item")))
                    .field(FieldDef::new("nothing", TypeRef::named_list("Item"))),
            )
        })
        .map(|r| r.query_type("Query"))
        .and_then(|r| r.finish());
    let schema = Arc::new(assert_ok!(schema));

    let mut table = ResolverTable::new();
    table.register("Query", "items", |_ctx: ResolverContext| async {
        Ok::<_, ResolverError>(json!([{ "a": "x", "b": "y" }, { "b": "only-b" }]))
    });
    table.register("Query", "nothing", |_ctx: ResolverContext| async {
        Ok::<_, ResolverError>(json!([]))
    });
    let counter = Arc::new(CallCounter::new());
    let executor = assert_ok!(Executor::new(schema, table)).with_hooks(counter.clone());

    let response = run(&executor, "{ nothing { a } items { b a } }").await;

    // Empty list stays an empty list
    assert_eq!(response.data["nothing"], json!([]));

    // The second item has no `a`: only that field fails
    assert_eq!(
        response.data["items"],
        json!([{ "b": "y", "a": "x" }, { "b": "only-b", "a": null }])
    );
    let errors = response.field_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].extensions.code, "MISSING_DEFAULT_FIELD");
    assert_eq!(
        serde_json::to_value(&errors[0].path).unwrap(),
        json!(["items", 1, "a"])
    );
    assert_eq!(counter.total(), 2);

    let first = response.into_result().unwrap_err();
    assert_eq!(first.error_code(), "MISSING_DEFAULT_FIELD");
}
