// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;
use std::convert::TryFrom;

use sqlx::any::AnyRow;
use sqlx::{query_as, FromRow};

use crate::db::errors::{ElementStoreError, Resource};
use crate::db::models::ElementRow;
use crate::db::stores::element::SELECT_ELEMENTS;
use crate::db::traits::ElementVariant;
use crate::db::types::{
    CertificateElement, CountryElement, DateElement, Element, ElementId, ElementKind,
    GenderElement, ImageElement, NumberElement, QrCodeElement, TextElement,
};
use crate::db::utils::{placeholders, unique_ids};
use crate::db::SqlStore;

/// Loaded elements keyed by their id, each entry failed or succeeded on its own.
pub(crate) type ElementResults = HashMap<ElementId, Result<Element, ElementStoreError>>;

/// Generic loaders for elements of one known kind.
impl SqlStore {
    /// Get an element of the kind `V`.
    ///
    /// Returns `None` if no element with this id exists and errors with `Conflict` if the element
    /// has a different kind.
    pub async fn find_variant<V: ElementVariant>(
        &self,
        id: ElementId,
    ) -> Result<Option<V>, ElementStoreError> {
        match self.find_element(id).await? {
            Some(base) => Ok(Some(self.variant_from_base(base).await?)),
            None => Ok(None),
        }
    }

    /// Get an element of the kind `V`, errors with `NotFound` if it does not exist.
    pub async fn get_variant<V: ElementVariant>(
        &self,
        id: ElementId,
    ) -> Result<V, ElementStoreError> {
        self.find_variant(id)
            .await?
            .ok_or(ElementStoreError::NotFound(Resource::Element, id))
    }

    /// Completes an already fetched base element with the rows of its variant table.
    pub async fn variant_from_base<V: ElementVariant>(
        &self,
        base: CertificateElement,
    ) -> Result<V, ElementStoreError> {
        ensure_kind::<V>(&base)?;

        let id = base.id;
        let mut loaded = V::load_for_bases(self, vec![base]).await?;

        loaded.remove(&id).unwrap_or_else(|| {
            Err(ElementStoreError::FatalStorageError(format!(
                "Element {} was not returned by its loader",
                id
            )))
        })
    }

    /// Batch loads elements of the kind `V`.
    ///
    /// Returns one result per requested id in the same order. Missing elements fail with
    /// `NotFound`, elements of another kind with `Conflict`.
    pub async fn find_variants<V: ElementVariant + Clone>(
        &self,
        ids: &[ElementId],
    ) -> Result<Vec<Result<V, ElementStoreError>>, ElementStoreError> {
        let rows: Vec<ElementRow> = self
            .fetch_rows_by_ids(SELECT_ELEMENTS, "id", &unique_ids(ids))
            .await?;

        let mut failed: HashMap<ElementId, ElementStoreError> = HashMap::new();
        let mut bases = Vec::new();

        for row in rows {
            let id = row.id;
            match CertificateElement::try_from(row) {
                Ok(base) => match ensure_kind::<V>(&base) {
                    Ok(()) => bases.push(base),
                    Err(err) => {
                        failed.insert(id, err);
                    }
                },
                Err(err) => {
                    failed.insert(id, err);
                }
            }
        }

        let loaded = V::load_for_bases(self, bases).await?;

        let results = ids
            .iter()
            .map(|id| match (failed.get(id), loaded.get(id)) {
                (Some(err), _) => Err(err.clone()),
                (None, Some(result)) => result.clone(),
                (None, None) => Err(ElementStoreError::NotFound(Resource::Element, *id)),
            })
            .collect();

        Ok(results)
    }

    /// Loads rows of any table by a list of ids with one query.
    pub(crate) async fn fetch_rows_by_ids<R>(
        &self,
        select: &str,
        column: &str,
        ids: &[i64],
    ) -> Result<Vec<R>, ElementStoreError>
    where
        R: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{} WHERE {} IN ({})",
            select,
            column,
            placeholders(1, ids.len())
        );

        let mut rows = query_as::<_, R>(&sql);
        for id in ids {
            rows = rows.bind(*id);
        }

        Ok(rows.fetch_all(&self.pool).await?)
    }

    /// Completes base rows of any kind into typed elements.
    ///
    /// Rows with a kind this store does not know fail with `UnsupportedKind` in their own slot.
    pub(crate) async fn elements_from_rows(
        &self,
        rows: Vec<ElementRow>,
    ) -> Result<ElementResults, ElementStoreError> {
        let mut results = ElementResults::new();
        let mut bases = Vec::with_capacity(rows.len());

        for row in rows {
            let id = row.id;
            match CertificateElement::try_from(row) {
                Ok(base) => bases.push(base),
                Err(err) => {
                    results.insert(id, Err(err));
                }
            }
        }

        results.extend(self.variants_from_bases(bases).await?);
        Ok(results)
    }

    /// Completes base elements of any kind, the variant tables are queried concurrently.
    pub(crate) async fn variants_from_bases(
        &self,
        bases: Vec<CertificateElement>,
    ) -> Result<ElementResults, ElementStoreError> {
        let mut groups: HashMap<ElementKind, Vec<CertificateElement>> = HashMap::new();
        for base in bases {
            groups.entry(base.kind).or_default().push(base);
        }

        let mut take = |kind: ElementKind| groups.remove(&kind).unwrap_or_default();
        let text = take(ElementKind::Text);
        let date = take(ElementKind::Date);
        let number = take(ElementKind::Number);
        let country = take(ElementKind::Country);
        let gender = take(ElementKind::Gender);
        let image = take(ElementKind::Image);
        let qr_code = take(ElementKind::QrCode);

        let (text, date, number, country, gender, image, qr_code) = futures::try_join!(
            TextElement::load_for_bases(self, text),
            DateElement::load_for_bases(self, date),
            NumberElement::load_for_bases(self, number),
            CountryElement::load_for_bases(self, country),
            GenderElement::load_for_bases(self, gender),
            ImageElement::load_for_bases(self, image),
            QrCodeElement::load_for_bases(self, qr_code),
        )?;

        let mut results = ElementResults::new();
        merge_into(&mut results, text);
        merge_into(&mut results, date);
        merge_into(&mut results, number);
        merge_into(&mut results, country);
        merge_into(&mut results, gender);
        merge_into(&mut results, image);
        merge_into(&mut results, qr_code);

        Ok(results)
    }
}

fn ensure_kind<V: ElementVariant>(base: &CertificateElement) -> Result<(), ElementStoreError> {
    if base.kind != V::KIND {
        return Err(ElementStoreError::Conflict {
            id: base.id,
            expected: V::KIND,
            found: base.kind,
        });
    }

    Ok(())
}

fn merge_into<V: ElementVariant>(
    results: &mut ElementResults,
    loaded: HashMap<ElementId, Result<V, ElementStoreError>>,
) {
    results.extend(
        loaded
            .into_iter()
            .map(|(id, result)| (id, result.map(V::into_element))),
    );
}
