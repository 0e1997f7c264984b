//! Request-shape validation.
//!
//! Runs before any resolver is invoked. A failure here rejects the whole
//! request, so resolvers never see a selection the schema does not allow.

use crate::error::ExecutionError;
use crate::schema::{Schema, TypeDef, TypeKind};
use crate::selection::{Operation, SelectionNode};

/// Checks an operation against the schema.
///
/// # Errors
///
/// Returns the first shape problem found, walking the selection in order.
pub fn validate_operation(
    schema: &Schema,
    operation: &Operation,
    max_depth: usize,
) -> Result<(), ExecutionError> {
    let root = schema
        .root(operation.kind)
        .ok_or_else(|| ExecutionError::UnknownOperation(operation.kind.to_string()))?;

    if operation.selection.is_empty() {
        return Err(ExecutionError::EmptySelection);
    }

    let depth = operation.depth();
    if depth > max_depth {
        return Err(ExecutionError::DepthExceeded {
            actual: depth,
            max: max_depth,
        });
    }

    for node in &operation.selection {
        validate_node(schema, root, node)?;
    }
    Ok(())
}

fn validate_node(
    schema: &Schema,
    parent: &TypeDef,
    node: &SelectionNode,
) -> Result<(), ExecutionError> {
    let field = parent
        .field_def(&node.name)
        .ok_or_else(|| ExecutionError::UnknownField {
            type_name: parent.name.clone(),
            field_name: node.name.clone(),
        })?;

    for name in node.arguments.names() {
        if field.argument_def(name).is_none() {
            return Err(ExecutionError::UnknownArgument {
                type_name: parent.name.clone(),
                field_name: field.name.clone(),
                argument: name.to_string(),
            });
        }
    }

    for arg in field.arguments.iter().filter(|a| a.ty.is_non_null()) {
        let provided = node.arguments.get(&arg.name).is_some_and(|v| !v.is_null());
        if !provided {
            return Err(ExecutionError::MissingArgument {
                type_name: parent.name.clone(),
                field_name: field.name.clone(),
                argument: arg.name.clone(),
            });
        }
    }

    let field_type = schema
        .lookup(field.ty.type_name())
        .map_err(|_| ExecutionError::UnknownType(field.ty.type_name().to_string()))?;

    match field_type.kind {
        TypeKind::Object => {
            if node.children.is_empty() {
                return Err(ExecutionError::MissingSubSelection {
                    type_name: parent.name.clone(),
                    field_name: field.name.clone(),
                    field_type: field.ty.to_string(),
                });
            }
            for child in &node.children {
                validate_node(schema, field_type, child)?;
            }
        }
        TypeKind::Scalar | TypeKind::Input => {
            if !node.children.is_empty() {
                return Err(ExecutionError::UnexpectedChildSelection {
                    type_name: parent.name.clone(),
                    field_name: field.name.clone(),
                });
            }
        }
    }

    Ok(())
}
