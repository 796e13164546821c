use std::collections::HashSet;

use async_graphql_parser::{
    Positioned,
    types::{Directive, Field, Selection, SelectionSet},
};
use async_graphql_value::ConstValue;
use indexmap::IndexMap;

use super::ExecutionContext;
use crate::{
    coercion::coerce_argument_values,
    registry::{MetaType, ObjectType, Schema},
};

/// Fields grouped by response key, in the order the keys first appear.
pub(crate) type GroupedFields<'a> = IndexMap<&'a str, Vec<&'a Positioned<Field>>>;

pub(crate) fn collect_fields<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &ObjectType,
    selection_set: &'a SelectionSet,
) -> GroupedFields<'a> {
    let mut grouped = GroupedFields::new();
    collect_fields_inner(ctx, object_type, selection_set, &mut HashSet::new(), &mut grouped);
    grouped
}

/// Merges the sub-selections of every field node of a response key.
pub(crate) fn collect_subfields<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &ObjectType,
    fields: &[&'a Positioned<Field>],
) -> GroupedFields<'a> {
    let mut grouped = GroupedFields::new();
    let mut visited = HashSet::new();
    for field in fields {
        collect_fields_inner(ctx, object_type, &field.node.selection_set.node, &mut visited, &mut grouped);
    }
    grouped
}

fn collect_fields_inner<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &ObjectType,
    selection_set: &'a SelectionSet,
    visited_fragments: &mut HashSet<&'a str>,
    grouped: &mut GroupedFields<'a>,
) {
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => {
                if !should_include(ctx, &field.node.directives) {
                    continue;
                }
                grouped
                    .entry(field.node.response_key().node.as_str())
                    .or_default()
                    .push(field);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if visited_fragments.contains(name) || !should_include(ctx, &spread.node.directives) {
                    continue;
                }
                visited_fragments.insert(name);

                let Some(fragment) = ctx.fragments.get(name) else {
                    tracing::trace!(fragment = name, "unknown fragment");
                    continue;
                };
                let condition = fragment.node.type_condition.node.on.node.as_str();
                if !does_fragment_type_apply(ctx.schema, object_type, condition) {
                    continue;
                }

                collect_fields_inner(
                    ctx,
                    object_type,
                    &fragment.node.selection_set.node,
                    visited_fragments,
                    grouped,
                );
            }
            Selection::InlineFragment(inline) => {
                if !should_include(ctx, &inline.node.directives) {
                    continue;
                }
                if let Some(condition) = &inline.node.type_condition {
                    if !does_fragment_type_apply(ctx.schema, object_type, &condition.node.on.node) {
                        continue;
                    }
                }

                collect_fields_inner(
                    ctx,
                    object_type,
                    &inline.node.selection_set.node,
                    visited_fragments,
                    grouped,
                );
            }
        }
    }
}

fn does_fragment_type_apply(schema: &Schema, object_type: &ObjectType, condition: &str) -> bool {
    match schema.lookup(condition) {
        Some(MetaType::Object(object)) => object.name == object_type.name,
        Some(MetaType::Interface(_) | MetaType::Union(_)) => schema.is_possible_type(condition, &object_type.name),
        _ => false,
    }
}

/// `@skip(if: true)` excludes a selection, so does `@include(if: false)`.
fn should_include(ctx: &ExecutionContext<'_>, directives: &[Positioned<Directive>]) -> bool {
    directive_condition(ctx, directives, "skip") != Some(true)
        && directive_condition(ctx, directives, "include") != Some(false)
}

fn directive_condition(ctx: &ExecutionContext<'_>, directives: &[Positioned<Directive>], name: &str) -> Option<bool> {
    let directive = directives.iter().find(|directive| directive.node.name.node == name)?;
    let definition = ctx.schema.directive(name)?;

    match coerce_argument_values(
        ctx.schema,
        &definition.args,
        &directive.node.arguments,
        ctx.variables,
        directive.pos,
    ) {
        Ok(arguments) => match arguments.get("if") {
            Some(ConstValue::Boolean(condition)) => Some(*condition),
            _ => None,
        },
        Err(err) => {
            tracing::debug!(directive = name, error = %err, "ignoring directive with invalid arguments");
            None
        }
    }
}
