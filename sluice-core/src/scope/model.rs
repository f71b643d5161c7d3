// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Dotted-path access into the JSON model held by a scope.
//!
//! `""` addresses the whole model; `"user.name"` walks nested objects.
//! Missing keys read as `Null`; writes create intermediate objects.

use serde_json::{Map, Value};

fn segments(expr: &str) -> impl Iterator<Item = &str> {
    expr.split('.').filter(|segment| !segment.is_empty())
}

pub(super) fn lookup(model: &Value, expr: &str) -> Value {
    segments(expr)
        .try_fold(model, |node, key| node.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced by an object"),
    }
}

pub(super) fn assign(model: &mut Value, expr: &str, value: Value) {
    let path: Vec<&str> = segments(expr).collect();
    let Some((last, parents)) = path.split_last() else {
        *model = value;
        return;
    };

    let mut node = model;
    for key in parents {
        node = ensure_object(node)
            .entry(*key)
            .or_insert(Value::Null);
    }
    ensure_object(node).insert((*last).to_owned(), value);
}
