// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;

use crate::db::errors::ElementStoreError;
use crate::db::types::{CertificateElement, Element, ElementId, ElementKind};
use crate::db::SqlStore;

/// Typed shape of one element kind, stored in the base table plus one variant table.
///
/// Implemented by each of the seven element structs. Generic loaders on [`SqlStore`] use it to
/// fetch elements of a known kind and to reject elements of any other kind.
#[async_trait]
pub trait ElementVariant: Sized + Send {
    /// Kind stored in the base row of every element of this shape.
    const KIND: ElementKind;

    /// Loads the variant rows of already fetched base elements of this kind.
    ///
    /// Issues one query per table regardless of the number of bases. Returns an entry for every
    /// given base, a base whose rows are missing or corrupt gets an error in its slot.
    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError>;

    /// Fields shared by all kinds.
    fn base(&self) -> &CertificateElement;

    /// Wraps this value in the sum type of all kinds.
    fn into_element(self) -> Element;
}
