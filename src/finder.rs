use serde_json::{Map, Value};

use crate::bcid::BcId;

const ID_FIELDS: [&str; 4] = ["id", "bcId", "bc_id", "bcid"];

/// Pre-order walk: a node, then its children (object values in key order, array items by index).
pub fn walk<'a, F>(node: &'a Value, visit: &mut F)
where
    F: FnMut(&'a Value),
{
    visit(node);
    match node {
        Value::Object(map) => { for v in map.values() { walk(v, visit); } }
        Value::Array(items) => { for v in items { walk(v, visit); } }
        _ => {}
    }
}

/// Objects with an identifier-shaped string field, in encounter order.
///
/// Candidates are the well-known id fields first, then every string value on the object.
/// The first candidate whose identifier passes `target` (any, when `None`) admits the node.
/// Nodes are not deduplicated: the same object reachable twice is reported twice.
pub fn find_bc_objects<'a>(tree: &'a Value, target: Option<&BcId>) -> Vec<&'a Map<String, Value>> {
    let mut out = Vec::new();
    walk(tree, &mut |node| {
        let Value::Object(obj) = node else { return };
        if candidates(obj).any(|c| accepts(c, target)) { out.push(obj); }
    });
    out
}

fn candidates(obj: &Map<String, Value>) -> impl Iterator<Item = &str> {
    let named = ID_FIELDS.iter().filter_map(|k| obj.get(*k)).filter_map(Value::as_str);
    let all = obj.values().filter_map(Value::as_str);
    named.chain(all)
}

fn accepts(candidate: &str, target: Option<&BcId>) -> bool {
    match target {
        Some(want) => want.matches_first_in(candidate),
        None => BcId::find_in(candidate).is_some(),
    }
}
