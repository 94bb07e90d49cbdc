use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::errors::{ImportError, Result};
use crate::types::{Choice, EntityKind, Identifier, Item};

/// Identifier lookup table borrowing the entities it indexes.
pub type Index<'a, E> = HashMap<Identifier, &'a E>;

/// Builds an index over `entities` keyed by `key_of`.
///
/// Keys must be unique: the first repeated key fails with
/// `DuplicateIdentifier` rather than replacing the earlier entry.
pub fn build_index<'a, E, I, F>(kind: EntityKind, entities: I, key_of: F) -> Result<Index<'a, E>>
where
    E: 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&E) -> Identifier,
{
    let mut index = HashMap::new();

    for entity in entities {
        let id = key_of(entity);
        match index.entry(id) {
            Entry::Occupied(_) => return Err(ImportError::DuplicateIdentifier { kind, id }),
            Entry::Vacant(slot) => {
                slot.insert(entity);
            }
        }
    }

    Ok(index)
}

/// Indexes the items of every choice group in one flattened pass, so an id
/// shared by items of two different groups is also a duplicate.
pub fn build_item_index(choices: &[Choice]) -> Result<Index<'_, Item>> {
    build_index(
        EntityKind::Item,
        choices.iter().flat_map(|choice| choice.items.iter()),
        |item| item.id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, name: &str) -> Item {
        Item {
            id: Identifier::Numeric(id),
            name: name.to_string(),
            sort: 0,
        }
    }

    #[test]
    fn test_build_index_keys_every_entity() {
        let items = vec![item(1, "Rust"), item(2, "Go")];
        let index = build_index(EntityKind::Item, &items, |i| i.id).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&Identifier::Numeric(2)].name, "Go");
    }

    #[test]
    fn test_build_index_rejects_duplicate() {
        let items = vec![item(7, "A"), item(7, "B")];
        let err = build_index(EntityKind::Room, &items, |i| i.id).unwrap_err();
        match err {
            ImportError::DuplicateIdentifier { kind, id } => {
                assert_eq!(kind, EntityKind::Room);
                assert_eq!(id, Identifier::Numeric(7));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
