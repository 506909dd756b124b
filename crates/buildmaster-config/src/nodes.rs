//! Helpers for extracting values from KDL nodes.

use kdl::{KdlNode, KdlValue};

/// Node name with underscores folded to dashes, so `build_timeout` and
/// `build-timeout` are the same key.
pub(crate) fn key(node: &KdlNode) -> String {
    node.name().value().replace('_', "-")
}

pub(crate) fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// First positional argument rendered as text, whatever its KDL type.
pub(crate) fn get_first_scalar_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| scalar_to_string(e.value()))
}

pub(crate) fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}

/// All positional string arguments, each split on lines; blank lines dropped.
pub(crate) fn get_line_list(node: &KdlNode) -> Vec<String> {
    get_all_string_args(node)
        .iter()
        .flat_map(|arg| arg.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// All positional string arguments, each split on whitespace.
pub(crate) fn get_word_list(node: &KdlNode) -> Vec<String> {
    get_all_string_args(node)
        .iter()
        .flat_map(|arg| arg.split_whitespace())
        .map(str::to_string)
        .collect()
}

/// First positional argument as a flag: KDL booleans, or `yes`/`true`/`y`.
pub(crate) fn get_flag_arg(node: &KdlNode) -> bool {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| match e.value().as_bool() {
            Some(b) => b,
            None => matches!(
                scalar_to_string(e.value()).trim().to_lowercase().as_str(),
                "yes" | "true" | "y"
            ),
        })
        .unwrap_or(false)
}

fn scalar_to_string(value: &KdlValue) -> String {
    if let Some(s) = value.as_string() {
        s.to_string()
    } else if let Some(i) = value.as_integer() {
        i.to_string()
    } else if let Some(f) = value.as_float() {
        f.to_string()
    } else if let Some(b) = value.as_bool() {
        b.to_string()
    } else {
        String::new()
    }
}
