//! Navigating and modifying settings trees with dotted keys.
//!
//! Reads and deletes are strict: they never create anything and fail with
//! `KeyNotFound` when a segment is missing. Writes create missing
//! intermediate trees but refuse to replace a plain value sitting where a
//! tree is needed.

use crate::key::{validate_key, Key};
use crate::{Error, Tree, Value};

/// Get the value stored at `key`.
///
/// The returned value may itself be a subtree.
pub fn get<'a>(tree: &'a Tree, key: &str, sep: char) -> Result<&'a Value, Error> {
    let parsed = Key::parse_with(key, sep)?;

    let mut cursor = tree;
    for segment in parsed.parents() {
        cursor = match cursor.get(segment) {
            Some(Value::Tree(child)) => child,
            _ => return Err(Error::not_found(key)),
        };
    }

    cursor
        .get(parsed.last())
        .ok_or_else(|| Error::not_found(key))
}

/// Check whether `key` resolves to a value, without raising `KeyNotFound`.
pub fn contains(tree: &Tree, key: &str, sep: char) -> Result<bool, Error> {
    match get(tree, key, sep) {
        Ok(_) => Ok(true),
        Err(Error::KeyNotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Store `value` at `key`, creating intermediate trees as needed.
///
/// Overwrites whatever was at the final segment, including a whole subtree.
/// Fails with `MappingConflict` (naming the offending segment) when an
/// intermediate segment holds a non-tree value; the tree is left untouched
/// in that case.
pub fn set(tree: &mut Tree, key: &str, value: Value, sep: char) -> Result<(), Error> {
    if value.is_null() {
        return Err(Error::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    let parsed = Key::parse_with(key, sep)?;
    validate_value(key, &value, sep)?;

    // Check the whole path before creating anything so a conflict deep in
    // the key cannot leave freshly created empty trees behind.
    let mut probe = Some(&*tree);
    for segment in parsed.parents() {
        probe = match probe.and_then(|t| t.get(segment)) {
            None => None,
            Some(Value::Tree(child)) => Some(child),
            Some(_) => return Err(Error::conflict(segment.as_str())),
        };
    }

    let cursor = vivify(tree, &parsed)?;
    cursor.insert(parsed.last().to_string(), value);

    Ok(())
}

/// Walk to the tree holding the last segment of `key`, creating missing
/// trees on the way.
fn vivify<'a>(tree: &'a mut Tree, key: &Key) -> Result<&'a mut Tree, Error> {
    let mut cursor = tree;
    for segment in key.parents() {
        let entry = cursor
            .entry(segment.clone())
            .or_insert_with(Value::tree);
        cursor = entry
            .as_tree_mut()
            .ok_or_else(|| Error::conflict(segment.as_str()))?;
    }
    Ok(cursor)
}

/// Remove the entry at `key`, keeping its siblings.
pub fn delete(tree: &mut Tree, key: &str, sep: char) -> Result<Value, Error> {
    let parsed = Key::parse_with(key, sep)?;

    let mut cursor = tree;
    for segment in parsed.parents() {
        cursor = match cursor.get_mut(segment) {
            None => return Err(Error::not_found(key)),
            Some(Value::Tree(child)) => child,
            Some(_) => return Err(Error::conflict(segment.as_str())),
        };
    }

    cursor
        .shift_remove(parsed.last())
        .ok_or_else(|| Error::not_found(key))
}

/// Validate every key and value of a tree.
///
/// Keys are split on `sep` and each segment checked, so both dotted keys
/// (`"a.b": 1`) and nested trees (`"a": {"b": 1}`) are accepted. Entries
/// are checked in insertion order and the first violation is returned.
pub fn validate_tree(tree: &Tree, sep: char) -> Result<(), Error> {
    for (key, value) in tree {
        validate_key(key, sep)?;
        validate_value(key, value, sep)?;
    }
    Ok(())
}

/// Validate a value about to be stored under `key`.
///
/// Rejects `Null` anywhere inside the value, and recurses into subtrees so
/// nested keys obey the same grammar.
pub fn validate_value(key: &str, value: &Value, sep: char) -> Result<(), Error> {
    match value {
        Value::Null => Err(Error::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| validate_value(key, item, sep)),
        Value::Tree(child) => validate_tree(child, sep),
        _ => Ok(()),
    }
}

/// Count every entry at every depth.
///
/// A subtree counts once for itself plus once per descendant, so
/// `{a: {b: {c: 1}}}` counts 3. Arrays count as a single entry.
pub fn count(tree: &Tree) -> usize {
    tree.values()
        .map(|value| match value {
            Value::Tree(child) => 1 + count(child),
            _ => 1,
        })
        .sum()
}

/// Seed `defaults` into `tree` without overwriting existing settings.
///
/// Dotted keys in `defaults`, at any depth, are first expanded into nested
/// trees, so `{"a.b": 1}` and `{"a": {"b": 1}}` always seed the same thing.
/// The expanded defaults are then merged one segment at a time:
/// - absent in `tree`: the default is set;
/// - present and both sides are trees: recurse;
/// - present otherwise: the existing value wins.
///
/// Returns how many entries were written.
///
/// # Errors
///
/// `InvalidKey` / `InvalidValue` for malformed defaults, and
/// `MappingConflict` when two defaults contradict each other, e.g.
/// `{"a.b": 1, "a.b.c": 2}`. Never fails because of what `tree` holds.
pub fn merge_defaults(tree: &mut Tree, defaults: &Tree, sep: char) -> Result<usize, Error> {
    validate_tree(defaults, sep)?;
    let expanded = expand(defaults, sep)?;
    Ok(merge_expanded(tree, expanded))
}

/// Rewrite a tree so that every key is a single segment.
fn expand(tree: &Tree, sep: char) -> Result<Tree, Error> {
    let mut expanded = Tree::new();
    for (key, value) in tree {
        expand_into(&mut expanded, key, value.clone(), sep)?;
    }
    Ok(expanded)
}

fn expand_into(target: &mut Tree, key: &str, value: Value, sep: char) -> Result<(), Error> {
    let parsed = Key::parse_with(key, sep)?;
    let value = match value {
        Value::Tree(child) => Value::Tree(expand(&child, sep)?),
        other => other,
    };

    let cursor = vivify(target, &parsed)?;
    let last = parsed.last();
    let existing_is_tree = cursor.get(last).map(Value::is_tree);
    match (existing_is_tree, value) {
        (Some(true), Value::Tree(incoming)) => {
            if let Some(Value::Tree(existing)) = cursor.get_mut(last) {
                for (child_key, child_value) in incoming {
                    expand_into(existing, &child_key, child_value, sep)?;
                }
            }
        }
        (Some(true), _) | (Some(false), Value::Tree(_)) => return Err(Error::conflict(last)),
        (_, value) => {
            cursor.insert(last.to_string(), value);
        }
    }
    Ok(())
}

fn merge_expanded(tree: &mut Tree, defaults: Tree) -> usize {
    let mut seeded = 0;
    for (key, default) in defaults {
        match tree.get_mut(&key) {
            None => {
                tree.insert(key, default);
                seeded += 1;
            }
            Some(Value::Tree(existing)) => {
                if let Value::Tree(nested) = default {
                    seeded += merge_expanded(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
    seeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    fn test_tree() -> Tree {
        tree! {
            "name" => "Alice",
            "age" => 30,
            "address" => tree! {
                "city" => "NYC",
                "geo" => tree! { "lat" => 40.7, "lon" => -74.0 },
            },
            "scores" => vec![90, 85, 95],
        }
    }

    // ==================== get tests ====================

    #[test]
    fn get_direct_child() {
        let tree = test_tree();
        assert_eq!(get(&tree, "name", '.').unwrap(), &Value::from("Alice"));
    }

    #[test]
    fn get_nested_child() {
        let tree = test_tree();
        assert_eq!(get(&tree, "address.city", '.').unwrap(), &Value::from("NYC"));
        assert_eq!(get(&tree, "address.geo.lat", '.').unwrap(), &Value::from(40.7));
    }

    #[test]
    fn get_returns_subtree() {
        let tree = test_tree();
        let geo = get(&tree, "address.geo", '.').unwrap();
        assert_eq!(geo, &Value::from(tree! { "lat" => 40.7, "lon" => -74.0 }));
    }

    #[test]
    fn get_missing_carries_full_key() {
        let tree = test_tree();
        assert_eq!(
            get(&tree, "address.missing.deep", '.').unwrap_err(),
            Error::KeyNotFound {
                key: "address.missing.deep".to_string()
            }
        );
    }

    #[test]
    fn get_through_scalar_is_not_found() {
        let tree = test_tree();
        assert!(matches!(
            get(&tree, "name.first", '.'),
            Err(Error::KeyNotFound { key }) if key == "name.first"
        ));
        // Arrays are leaves; segments never index into them.
        assert!(matches!(
            get(&tree, "scores.0", '.'),
            Err(Error::KeyNotFound { .. })
        ));
    }

    #[test]
    fn get_is_case_sensitive() {
        let tree = test_tree();
        assert!(get(&tree, "Name", '.').is_err());
    }

    #[test]
    fn get_invalid_key() {
        let tree = test_tree();
        assert!(matches!(
            get(&tree, "address..city", '.'),
            Err(Error::InvalidKey { .. })
        ));
    }

    #[test]
    fn get_with_custom_separator() {
        let tree = test_tree();
        assert_eq!(get(&tree, "address/city", '/').unwrap(), &Value::from("NYC"));
    }

    #[test]
    fn contains_works() {
        let tree = test_tree();
        assert!(contains(&tree, "address.geo", '.').unwrap());
        assert!(!contains(&tree, "address.zip", '.').unwrap());
        assert!(contains(&tree, "bad key", '.').is_err());
    }

    // ==================== set tests ====================

    #[test]
    fn set_then_get() {
        let mut tree = Tree::new();
        set(&mut tree, "a.b.c", Value::from(1), '.').unwrap();
        assert_eq!(get(&tree, "a.b.c", '.').unwrap(), &Value::from(1));
        assert!(get(&tree, "a", '.').unwrap().is_tree());
        assert!(get(&tree, "a.b", '.').unwrap().is_tree());
    }

    #[test]
    fn set_overwrites_scalar() {
        let mut tree = test_tree();
        set(&mut tree, "name", Value::from("Bob"), '.').unwrap();
        assert_eq!(get(&tree, "name", '.').unwrap(), &Value::from("Bob"));
    }

    #[test]
    fn set_replaces_subtree() {
        let mut tree = test_tree();
        set(&mut tree, "address", Value::from("unknown"), '.').unwrap();
        assert_eq!(get(&tree, "address", '.').unwrap(), &Value::from("unknown"));
    }

    #[test]
    fn set_keeps_insertion_order() {
        let mut tree = test_tree();
        set(&mut tree, "age", Value::from(31), '.').unwrap();
        set(&mut tree, "new_key", Value::from(true), '.').unwrap();
        let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age", "address", "scores", "new_key"]);
    }

    #[test]
    fn set_through_scalar_is_conflict() {
        let mut tree = tree! { "a" => 1 };
        let err = set(&mut tree, "a.b", Value::from(2), '.').unwrap_err();
        assert_eq!(err, Error::MappingConflict { key: "a".to_string() });
        assert_eq!(tree, tree! { "a" => 1 });
    }

    #[test]
    fn set_conflict_deep_leaves_tree_untouched() {
        let mut tree = tree! { "a" => tree! { "b" => "leaf" } };
        let before = tree.clone();
        let err = set(&mut tree, "a.b.c.d", Value::from(1), '.').unwrap_err();
        assert_eq!(err, Error::MappingConflict { key: "b".to_string() });
        assert_eq!(tree, before);
    }

    #[test]
    fn set_null_is_invalid_value() {
        let mut tree = Tree::new();
        let err = set(&mut tree, "a", Value::Null, '.').unwrap_err();
        assert_eq!(
            err,
            Error::InvalidValue {
                key: "a".to_string(),
                value: "null".to_string()
            }
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn set_rejects_null_nested_in_value() {
        let mut tree = Tree::new();
        let value = Value::from(tree! { "inner" => Value::Null });
        assert!(matches!(
            set(&mut tree, "outer", value, '.'),
            Err(Error::InvalidValue { .. })
        ));
        let value = Value::Array(vec![Value::from(1), Value::Null]);
        assert!(set(&mut tree, "list", value, '.').is_err());
        assert!(tree.is_empty());
    }

    #[test]
    fn set_rejects_subtree_with_invalid_keys() {
        let mut tree = Tree::new();
        let value = Value::from(tree! { "bad key" => 1 });
        assert!(matches!(
            set(&mut tree, "outer", value, '.'),
            Err(Error::InvalidKey { key }) if key == "bad key"
        ));
    }

    #[test]
    fn set_invalid_key_does_not_mutate() {
        let mut tree = test_tree();
        let before = tree.clone();
        for key in ["", "a..b", "has space", "quo'te", "a."] {
            assert!(matches!(
                set(&mut tree, key, Value::from(1), '.'),
                Err(Error::InvalidKey { .. })
            ));
        }
        assert_eq!(tree, before);
    }

    // ==================== delete tests ====================

    #[test]
    fn delete_keeps_siblings() {
        let mut tree = test_tree();
        let removed = delete(&mut tree, "address.city", '.').unwrap();
        assert_eq!(removed, Value::from("NYC"));
        assert!(get(&tree, "address.city", '.').is_err());
        assert!(get(&tree, "address.geo.lat", '.').is_ok());
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let mut tree = Tree::new();
        set(&mut tree, "nested.key", Value::from("v"), '.').unwrap();
        delete(&mut tree, "nested.key", '.').unwrap();
        assert!(matches!(
            get(&tree, "nested.key", '.'),
            Err(Error::KeyNotFound { .. })
        ));
        // The now-empty parent stays behind.
        assert_eq!(get(&tree, "nested", '.').unwrap(), &Value::tree());
    }

    #[test]
    fn delete_missing_final_segment() {
        let mut tree = test_tree();
        assert_eq!(
            delete(&mut tree, "address.zip", '.').unwrap_err(),
            Error::KeyNotFound {
                key: "address.zip".to_string()
            }
        );
    }

    #[test]
    fn delete_missing_intermediate() {
        let mut tree = test_tree();
        assert_eq!(
            delete(&mut tree, "nope.zip", '.').unwrap_err(),
            Error::KeyNotFound {
                key: "nope.zip".to_string()
            }
        );
    }

    #[test]
    fn delete_through_scalar_is_conflict() {
        let mut tree = test_tree();
        assert_eq!(
            delete(&mut tree, "name.first", '.').unwrap_err(),
            Error::MappingConflict {
                key: "name".to_string()
            }
        );
    }

    #[test]
    fn delete_invalid_key() {
        let mut tree = test_tree();
        assert!(matches!(
            delete(&mut tree, "a b", '.'),
            Err(Error::InvalidKey { .. })
        ));
    }

    // ==================== validate_tree tests ====================

    #[test]
    fn validate_accepts_dotted_and_nested() {
        let dotted = tree! { "a.b" => 1, "a.c" => "x" };
        let nested = tree! { "a" => tree! { "b" => 1, "c" => tree! { "d.e" => true } } };
        assert!(validate_tree(&dotted, '.').is_ok());
        assert!(validate_tree(&nested, '.').is_ok());
    }

    #[test]
    fn validate_rejects_bad_nested_key() {
        let t = tree! {
            "settings" => tree! { "name" => "MyName" },
            "dictionary" => tree! { "key1'invalid'" => "value1", "key2" => "value2" },
        };
        assert!(matches!(
            validate_tree(&t, '.'),
            Err(Error::InvalidKey { key }) if key == "key1'invalid'"
        ));
    }

    #[test]
    fn validate_rejects_bad_dotted_segment() {
        let t = tree! { "dictionary.subdict'invalid.key1" => 1 };
        assert!(matches!(
            validate_tree(&t, '.'),
            Err(Error::InvalidKey { .. })
        ));
    }

    #[test]
    fn validate_rejects_null() {
        let t = tree! { "ok" => 1, "missing" => Value::Null };
        assert_eq!(
            validate_tree(&t, '.').unwrap_err(),
            Error::InvalidValue {
                key: "missing".to_string(),
                value: "null".to_string()
            }
        );
    }

    #[test]
    fn validate_reports_first_violation_in_order() {
        let t = tree! { "first bad" => 1, "second" => Value::Null };
        assert!(matches!(
            validate_tree(&t, '.'),
            Err(Error::InvalidKey { .. })
        ));
    }

    // ==================== count tests ====================

    #[test]
    fn count_nested() {
        let t = tree! { "a" => tree! { "b" => tree! { "c" => 1 } } };
        assert_eq!(count(&t), 3);
    }

    #[test]
    fn count_mixed() {
        // name, age, address, city, geo, lat, lon, scores
        assert_eq!(count(&test_tree()), 8);
        assert_eq!(count(&Tree::new()), 0);
    }

    // ==================== merge_defaults tests ====================

    #[test]
    fn merge_into_empty() {
        let mut t = Tree::new();
        let defaults = tree! { "a" => tree! { "b" => "v" } };
        assert_eq!(merge_defaults(&mut t, &defaults, '.').unwrap(), 1);
        assert_eq!(get(&t, "a.b", '.').unwrap(), &Value::from("v"));
        assert_eq!(get(&t, "a", '.').unwrap(), &Value::from(tree! { "b" => "v" }));
    }

    #[test]
    fn merge_dotted_and_nested_are_equivalent() {
        let dotted = tree! {
            "key1" => "value1",
            "key3.subkey1" => "subvalue1",
            "key3.subkey3.subsubkey1" => "subsubvalue1",
            "key5.subkey1" => vec!["a", "b"],
        };
        let nested = tree! {
            "key1" => "value1",
            "key3" => tree! {
                "subkey1" => "subvalue1",
                "subkey3" => tree! { "subsubkey1" => "subsubvalue1" },
            },
            "key5" => tree! { "subkey1" => vec!["a", "b"] },
        };

        let mut from_dotted = Tree::new();
        let mut from_nested = Tree::new();
        merge_defaults(&mut from_dotted, &dotted, '.').unwrap();
        merge_defaults(&mut from_nested, &nested, '.').unwrap();
        assert_eq!(from_dotted, from_nested);
        assert_eq!(count(&from_dotted), 7);
    }

    #[test]
    fn merge_existing_values_win() {
        let mut t = tree! { "a" => tree! { "b" => "mine" }, "c" => 1 };
        let defaults = tree! {
            "a" => tree! { "b" => "default", "d" => "added" },
            "c" => tree! { "e" => 2 },
        };
        assert_eq!(merge_defaults(&mut t, &defaults, '.').unwrap(), 1);
        assert_eq!(get(&t, "a.b", '.').unwrap(), &Value::from("mine"));
        assert_eq!(get(&t, "a.d", '.').unwrap(), &Value::from("added"));
        assert_eq!(get(&t, "c", '.').unwrap(), &Value::from(1));
    }

    #[test]
    fn merge_descends_with_dotted_parent() {
        let mut t = tree! { "a" => tree! { "b" => tree! { "keep" => 1 } } };
        let defaults = tree! { "a.b" => tree! { "keep" => 0, "new" => 2 } };
        merge_defaults(&mut t, &defaults, '.').unwrap();
        assert_eq!(get(&t, "a.b.keep", '.').unwrap(), &Value::from(1));
        assert_eq!(get(&t, "a.b.new", '.').unwrap(), &Value::from(2));
    }

    #[test]
    fn merge_dotted_default_skips_existing_plain_value() {
        let mut from_dotted = tree! { "a" => 1 };
        let mut from_nested = tree! { "a" => 1 };

        let seeded = merge_defaults(&mut from_dotted, &tree! { "a.b" => 2 }, '.').unwrap();
        merge_defaults(&mut from_nested, &tree! { "a" => tree! { "b" => 2 } }, '.').unwrap();

        assert_eq!(seeded, 0);
        assert_eq!(from_dotted, tree! { "a" => 1 });
        assert_eq!(from_dotted, from_nested);
    }

    #[test]
    fn merge_expands_dotted_keys_inside_subtrees() {
        let mut t = Tree::new();
        merge_defaults(&mut t, &tree! { "a" => tree! { "b.c" => 1 } }, '.').unwrap();
        assert_eq!(get(&t, "a.b.c", '.').unwrap(), &Value::from(1));
        assert_eq!(t, tree! { "a" => tree! { "b" => tree! { "c" => 1 } } });
    }

    #[test]
    fn merge_shape_does_not_depend_on_existing_parent() {
        let defaults = tree! { "a" => tree! { "b.c" => 1 } };
        let mut t = tree! { "a" => tree! { "x" => 0 } };
        assert_eq!(merge_defaults(&mut t, &defaults, '.').unwrap(), 1);
        assert_eq!(
            t,
            tree! { "a" => tree! { "x" => 0, "b" => tree! { "c" => 1 } } }
        );
    }

    #[test]
    fn merge_combines_dotted_and_nested_entries_for_one_parent() {
        let mut t = Tree::new();
        let defaults = tree! {
            "a.b" => 1,
            "a" => tree! { "c" => 2 },
        };
        assert_eq!(merge_defaults(&mut t, &defaults, '.').unwrap(), 1);
        assert_eq!(t, tree! { "a" => tree! { "b" => 1, "c" => 2 } });
    }

    #[test]
    fn merge_tree_default_contradicting_plain_default() {
        let mut t = Tree::new();
        let defaults = tree! {
            "a.b.c" => 1,
            "a.b" => 5,
        };
        assert_eq!(
            merge_defaults(&mut t, &defaults, '.').unwrap_err(),
            Error::MappingConflict {
                key: "b".to_string()
            }
        );
        assert!(t.is_empty());
    }

    #[test]
    fn merge_invalid_defaults() {
        let mut t = Tree::new();
        let err = merge_defaults(&mut t, &tree! { "a" => tree! { "b c" => 1 } }, '.').unwrap_err();
        assert!(matches!(err, Error::InvalidKey { .. }));
        let err = merge_defaults(&mut t, &tree! { "a.b" => Value::Null }, '.').unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn merge_conflicting_defaults() {
        let mut t = Tree::new();
        let defaults = tree! {
            "key1.subkey" => "value1",
            "key1.subkey.subsubkey" => "value2",
        };
        assert_eq!(
            merge_defaults(&mut t, &defaults, '.').unwrap_err(),
            Error::MappingConflict {
                key: "subkey".to_string()
            }
        );
    }
}
