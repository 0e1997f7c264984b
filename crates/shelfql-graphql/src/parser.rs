//! GraphQL query text to [`Operation`].
//!
//! Parsing is delegated to `async-graphql-parser`; this module lowers the
//! document into a selection tree. Only the subset the executor supports is
//! accepted: query and mutation operations with nested fields, aliases and
//! literal arguments. Everything else is rejected with
//! [`GraphQLError::InvalidQuery`].

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{self as ast, ExecutableDocument, OperationDefinition};
use async_graphql_value::Name;
use tracing::trace;

use crate::error::GraphQLError;
use crate::selection::{Arguments, Operation, OperationType, SelectionNode};

/// Parses a query document and picks the operation to execute.
///
/// # Errors
///
/// Returns `GraphQLError::InvalidQuery` for syntax errors, unsupported
/// language features, or when the operation to run is ambiguous.
pub fn parse_operation(query: &str, operation_name: Option<&str>) -> Result<Operation, GraphQLError> {
    let document: ExecutableDocument = async_graphql_parser::parse_query(query)
        .map_err(|e| GraphQLError::InvalidQuery(e.to_string()))?;

    if !document.fragments.is_empty() {
        return Err(unsupported("fragments"));
    }

    let operations: Vec<_> = document.operations.iter().collect();
    let (name, definition) = match operation_name {
        Some(wanted) => operations
            .into_iter()
            .find(|(name, _)| name.is_some_and(|n| n.as_str() == wanted))
            .ok_or_else(|| GraphQLError::InvalidQuery(format!("unknown operation named '{wanted}'")))?,
        None => {
            let mut operations = operations.into_iter();
            match (operations.next(), operations.next()) {
                (Some(only), None) => only,
                (None, _) => {
                    return Err(GraphQLError::InvalidQuery("document has no operations".into()));
                }
                (Some(_), Some(_)) => {
                    return Err(GraphQLError::InvalidQuery(
                        "operationName is required when the document has several operations"
                            .into(),
                    ));
                }
            }
        }
    };

    let mut operation = lower_operation(&definition.node)?;
    if let Some(name) = name {
        operation = operation.with_name(name.as_str());
    }
    trace!(kind = %operation.kind, name = ?operation.name, "Parsed operation");
    Ok(operation)
}

fn lower_operation(definition: &OperationDefinition) -> Result<Operation, GraphQLError> {
    let kind = match definition.ty {
        ast::OperationType::Query => OperationType::Query,
        ast::OperationType::Mutation => OperationType::Mutation,
        ast::OperationType::Subscription => return Err(unsupported("subscriptions")),
    };
    if !definition.variable_definitions.is_empty() {
        return Err(unsupported("variables"));
    }
    if !definition.directives.is_empty() {
        return Err(unsupported("directives"));
    }

    Ok(Operation {
        kind,
        name: None,
        selection: lower_selection_set(&definition.selection_set.node)?,
    })
}

fn lower_selection_set(set: &ast::SelectionSet) -> Result<Vec<SelectionNode>, GraphQLError> {
    set.items.iter().map(|item| lower_selection(&item.node)).collect()
}

fn lower_selection(selection: &ast::Selection) -> Result<SelectionNode, GraphQLError> {
    let field = match selection {
        ast::Selection::Field(field) => &field.node,
        ast::Selection::FragmentSpread(_) => return Err(unsupported("fragment spreads")),
        ast::Selection::InlineFragment(_) => return Err(unsupported("inline fragments")),
    };
    if !field.directives.is_empty() {
        return Err(unsupported("directives"));
    }

    let mut arguments = Arguments::new();
    for (name, value) in &field.arguments {
        arguments.insert(name.node.as_str(), lower_value(name, value)?);
    }

    Ok(SelectionNode {
        name: field.name.node.to_string(),
        alias: field.alias.as_ref().map(|alias| alias.node.to_string()),
        arguments,
        children: lower_selection_set(&field.selection_set.node)?,
    })
}

fn lower_value(
    name: &Positioned<Name>,
    value: &Positioned<async_graphql_value::Value>,
) -> Result<serde_json::Value, GraphQLError> {
    let constant = value.node.clone().into_const().ok_or_else(|| {
        GraphQLError::InvalidQuery(format!(
            "argument '{}' uses a variable, which is not supported",
            name.node
        ))
    })?;
    constant.into_json().map_err(|e| {
        GraphQLError::InvalidQuery(format!("argument '{}' is not representable: {e}", name.node))
    })
}

fn unsupported(feature: &str) -> GraphQLError {
    GraphQLError::InvalidQuery(format!("{feature} are not supported"))
}
