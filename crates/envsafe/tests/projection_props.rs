//! Property tests: validation is a projection of the raw mapping onto the
//! schema's declared fields.

use std::collections::BTreeMap;

use envsafe::{from_memory, EnvError, FieldRule, FieldSchema};
use proptest::prelude::*;
use serde_json::{json, Value};

fn string_mapping() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[A-Z][A-Z0-9_]{0,8}", "[ -~]{0,24}", 1..12)
}

proptest! {
    /// Every declared field present as a string yields a record equal to the
    /// projection of the mapping onto the declared fields.
    #[test]
    fn record_equals_projection(
        mapping in string_mapping(),
        mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let declared: Vec<&String> = mapping
            .keys()
            .zip(mask.iter())
            .filter_map(|(k, keep)| keep.then_some(k))
            .collect();
        let schema = declared
            .iter()
            .fold(FieldSchema::new(), |s, k| s.field(k.as_str(), FieldRule::string()));

        let env = from_memory(&schema, mapping.clone()).unwrap();

        let expected: serde_json::Map<String, Value> = declared
            .iter()
            .map(|k| ((*k).clone(), json!(mapping[*k])))
            .collect();
        prop_assert_eq!(env.record().to_value(), Value::Object(expected));
        for k in &declared {
            prop_assert_eq!(env.get(k).unwrap(), &json!(mapping[*k]));
        }
    }

    /// Replacing declared string values with numbers reports each replaced
    /// field, not only the first.
    #[test]
    fn every_non_conforming_field_is_reported(
        mapping in string_mapping(),
        replace in prop::collection::vec(any::<bool>(), 12),
    ) {
        let schema = mapping
            .keys()
            .fold(FieldSchema::new(), |s, k| s.field(k.as_str(), FieldRule::string()));

        let mut raw: BTreeMap<String, Value> =
            mapping.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
        let mut replaced: Vec<String> = Vec::new();
        for (k, swap) in mapping.keys().zip(replace.iter()) {
            if *swap {
                raw.insert(k.clone(), json!(1));
                replaced.push(k.clone());
            }
        }

        match from_memory(&schema, raw) {
            Ok(_) => prop_assert!(replaced.is_empty()),
            Err(EnvError::Validation { violations, .. }) => {
                let paths: Vec<String> = violations.paths().into_iter().map(str::to_string).collect();
                prop_assert_eq!(paths, replaced);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
