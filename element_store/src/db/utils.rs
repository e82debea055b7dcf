// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::{BTreeSet, HashMap};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::errors::ElementStoreError;
use crate::db::models::VariantRow;
use crate::db::types::{CertificateElement, ElementId, ElementKind, TextProps, TextPropsId};

/// Returns a comma separated list of `count` positional parameters starting at `$start`.
///
/// Used to build `IN (..)` clauses for batch queries.
pub(crate) fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|index| format!("${}", index))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Removes duplicates from a list of ids before it is used in an `IN (..)` clause.
pub(crate) fn unique_ids(ids: &[i64]) -> Vec<i64> {
    ids.iter()
        .copied()
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect()
}

/// Serializes a value into the JSON text stored in the database.
pub(crate) fn encode_json<T: Serialize>(value: &T) -> Result<String, ElementStoreError> {
    Ok(serde_json::to_string(value)?)
}

/// Parses JSON text stored in the database.
pub(crate) fn decode_json<T: DeserializeOwned>(value: &str) -> Result<T, ElementStoreError> {
    Ok(serde_json::from_str(value)?)
}

/// Joins variant rows onto the base elements they belong to.
///
/// Every base gets an entry in the returned map. A base without a variant row or one which fails
/// to convert gets an error in its slot, the other entries are not affected.
pub(crate) fn pair_with_bases<R, V, F>(
    kind: ElementKind,
    bases: Vec<CertificateElement>,
    rows: Vec<R>,
    mut build: F,
) -> HashMap<ElementId, Result<V, ElementStoreError>>
where
    R: VariantRow,
    F: FnMut(CertificateElement, R) -> Result<V, ElementStoreError>,
{
    let mut rows: HashMap<ElementId, R> =
        rows.into_iter().map(|row| (row.element_id(), row)).collect();

    bases
        .into_iter()
        .map(|base| {
            let id = base.id;
            let result = match rows.remove(&id) {
                Some(row) => build(base, row),
                None => {
                    let message = format!("Element {} has no row in {}", id, kind.variant_table());
                    warn!("{}", message);
                    Err(ElementStoreError::FatalStorageError(message))
                }
            };

            (id, result)
        })
        .collect()
}

/// Takes the text properties with the given id out of a batch loaded set.
pub(crate) fn take_text_props(
    props: &mut HashMap<TextPropsId, TextProps>,
    id: TextPropsId,
) -> Result<TextProps, ElementStoreError> {
    props.remove(&id).ok_or_else(|| {
        ElementStoreError::FatalStorageError(format!("Text properties {} are missing", id))
    })
}

#[cfg(test)]
mod tests {
    use crate::db::errors::ElementStoreError;
    use crate::db::models::GenderElementRow;
    use crate::db::types::ElementKind;
    use crate::test_utils::certificate_element;

    use super::{pair_with_bases, placeholders, unique_ids};

    #[test]
    fn numbered_placeholders() {
        assert_eq!(placeholders(1, 3), "$1, $2, $3");
        assert_eq!(placeholders(4, 1), "$4");
        assert_eq!(placeholders(1, 0), "");
    }

    #[test]
    fn deduplicates_ids() {
        assert_eq!(unique_ids(&[7, 5, 7, 1]), vec![1, 5, 7]);
        assert!(unique_ids(&[]).is_empty());
    }

    #[test]
    fn missing_variant_rows_fail_their_slot_only() {
        let mut first = certificate_element(ElementKind::Gender);
        first.id = 1;
        let mut second = certificate_element(ElementKind::Gender);
        second.id = 2;

        let rows = vec![GenderElementRow {
            element_id: 2,
            text_props_id: 8,
        }];

        let paired = pair_with_bases(
            ElementKind::Gender,
            vec![first, second],
            rows,
            |base, row| Ok((base.id, row.text_props_id)),
        );

        assert!(matches!(
            paired.get(&1),
            Some(Err(ElementStoreError::FatalStorageError(_)))
        ));
        assert_eq!(paired.get(&2), Some(&Ok((2, 8))));
    }
}
