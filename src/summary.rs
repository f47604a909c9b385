use serde_json::{Map, Value};

pub const KEYS_OF_INTEREST: [&str; 12] = [
    "id", "bcId", "name", "title", "displayName", "description",
    "createdAt", "updatedAt", "ownerId", "visibility", "slug", "type",
];

const SPARSE_THRESHOLD: usize = 2;
const RAW_FIELD_CAP: usize = 10;

/// Project an object down to the interesting fields. When at most two of those are present,
/// pad with the object's first ten fields (in original order) so the summary is not empty-ish.
pub fn summarize(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut summary = Map::new();
    for key in KEYS_OF_INTEREST {
        if let Some(v) = obj.get(key) { summary.insert(key.to_string(), v.clone()); }
    }
    if summary.len() <= SPARSE_THRESHOLD {
        for (k, v) in obj.iter().take(RAW_FIELD_CAP) {
            if !summary.contains_key(k) { summary.insert(k.clone(), v.clone()); }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v { Value::Object(m) => m, _ => panic!("not an object") }
    }

    #[test]
    fn sparse_object_is_padded_in_original_order() {
        let mut src = Map::new();
        src.insert("id".into(), json!("bc-00000000-0000-0000-0000-000000000000"));
        src.insert("name".into(), json!("X"));
        for i in 1..=15 { src.insert(format!("extra{i}"), json!(i)); }

        let s = summarize(&src);
        let keys: Vec<&str> = s.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "extra1", "extra2", "extra3", "extra4", "extra5", "extra6", "extra7", "extra8"]);
    }

    #[test]
    fn rich_object_keeps_only_allowlist() {
        let src = obj(json!({
            "id": "bc-1", "name": "n", "title": "t", "noise": 1, "type": "agent"
        }));
        let s = summarize(&src);
        let keys: Vec<&str> = s.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "title", "type"]);
    }

    #[test]
    fn allowlist_order_not_source_order() {
        let src = obj(json!({"slug": "s", "visibility": "public", "bcId": "b", "z": 0}));
        let s = summarize(&src);
        let keys: Vec<&str> = s.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["bcId", "visibility", "slug"]);
    }

    #[test]
    fn never_exceeds_bound_or_mutates_source() {
        let src = obj(json!({"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7,"h":8,"i":9,"j":10,"k":11,"l":12}));
        let before = src.clone();
        let s = summarize(&src);
        assert_eq!(s.len(), 10);
        assert!(s.len() <= KEYS_OF_INTEREST.len() + RAW_FIELD_CAP);
        assert_eq!(src, before);
    }
}
