// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::{HashMap, HashSet};

use log::debug;
use sqlx::{query_as, query_scalar};

use crate::db::errors::{ElementStoreError, Resource};
use crate::db::models::ElementRow;
use crate::db::stores::element::SELECT_ELEMENTS;
use crate::db::types::{Element, ElementId, TemplateId};
use crate::db::utils::{placeholders, unique_ids};
use crate::db::SqlStore;

/// Batch loaders resolving many keys with a fixed number of queries.
///
/// Both loaders return one result per requested key in the order of the keys, so that callers can
/// correlate errors with the key which caused them.
impl SqlStore {
    /// Loads fully typed elements of any kind.
    ///
    /// Missing elements fail with `NotFound` in their slot, elements with a kind this store does
    /// not know fail with `UnsupportedKind`. Other slots are not affected.
    pub async fn load_elements_by_ids(
        &self,
        ids: &[ElementId],
    ) -> Result<Vec<Result<Element, ElementStoreError>>, ElementStoreError> {
        debug!("Loading {} elements by id", ids.len());

        let rows: Vec<ElementRow> = self
            .fetch_rows_by_ids(SELECT_ELEMENTS, "id", &unique_ids(ids))
            .await?;
        let elements = self.elements_from_rows(rows).await?;

        let results = ids
            .iter()
            .map(|id| match elements.get(id) {
                Some(result) => result.clone(),
                None => Err(ElementStoreError::NotFound(Resource::Element, *id)),
            })
            .collect();

        Ok(results)
    }

    /// Loads all elements of many templates, each list ordered by z-index.
    ///
    /// Unknown templates fail with `NotFound`. If any element of a template can not be loaded the
    /// slot of that template holds the error of its first failing element instead of a list.
    pub async fn load_elements_by_template_ids(
        &self,
        template_ids: &[TemplateId],
    ) -> Result<Vec<Result<Vec<Element>, ElementStoreError>>, ElementStoreError> {
        let unique = unique_ids(template_ids);
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Loading elements of {} templates", unique.len());

        let sql = format!(
            "SELECT id FROM templates WHERE id IN ({})",
            placeholders(1, unique.len())
        );

        let mut existing = query_scalar::<_, i64>(&sql);
        for id in &unique {
            existing = existing.bind(*id);
        }
        let existing: HashSet<TemplateId> =
            existing.fetch_all(&self.pool).await?.into_iter().collect();

        let sql = format!(
            "{} WHERE template_id IN ({}) ORDER BY template_id ASC, z_index ASC",
            SELECT_ELEMENTS,
            placeholders(1, unique.len())
        );

        let mut rows = query_as::<_, ElementRow>(&sql);
        for id in &unique {
            rows = rows.bind(*id);
        }
        let rows = rows.fetch_all(&self.pool).await?;

        // Remember the z-index order of every template before the rows get consumed
        let mut order: HashMap<TemplateId, Vec<ElementId>> = HashMap::new();
        for row in &rows {
            order.entry(row.template_id).or_default().push(row.id);
        }

        let elements = self.elements_from_rows(rows).await?;

        let results = template_ids
            .iter()
            .map(|template_id| {
                if !existing.contains(template_id) {
                    return Err(ElementStoreError::NotFound(
                        Resource::Template,
                        *template_id,
                    ));
                }

                match order.get(template_id) {
                    Some(ids) => ids
                        .iter()
                        .map(|id| match elements.get(id) {
                            Some(result) => result.clone(),
                            None => Err(ElementStoreError::NotFound(Resource::Element, *id)),
                        })
                        .collect(),
                    None => Ok(Vec::new()),
                }
            })
            .collect();

        Ok(results)
    }
}
