// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::query;

use crate::db::errors::ElementStoreError;
use crate::db::models::TextElementRow;
use crate::db::stores::element::{insert_element_row, update_element_row};
use crate::db::stores::text_props::{insert_text_props_row, update_text_props_row};
use crate::db::traits::ElementVariant;
use crate::db::types::{
    patch_required, CertificateElement, Element, ElementId, ElementKind, NewTextElement,
    TextElement, TextElementUpdate,
};
use crate::db::utils::{decode_json, encode_json, pair_with_bases, take_text_props};
use crate::db::SqlStore;

/// Methods to interact with the `text_elements` table in the database.
impl SqlStore {
    /// Creates a text element, its text properties and its base row in one transaction.
    pub async fn create_text_element(
        &self,
        element: NewTextElement,
    ) -> Result<TextElement, ElementStoreError> {
        self.validate_new_element(&element.base).await?;
        self.validate_text_props(&element.text_props).await?;

        let mut tx = self.pool.begin().await?;

        let text_props = insert_text_props_row(&mut tx, &element.text_props).await?;
        let base = insert_element_row(&mut tx, ElementKind::Text, &element.base).await?;

        query(
            "
            INSERT INTO
                text_elements (
                    element_id,
                    text_props_id,
                    data_source
                )
            VALUES
                ($1, $2, $3)
            ",
        )
        .bind(base.id)
        .bind(text_props.id)
        .bind(encode_json(&element.data_source)?)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_created(&base);

        Ok(TextElement {
            base,
            text_props,
            data_source: element.data_source,
        })
    }

    /// Applies a patch to a text element.
    ///
    /// Errors with `Conflict` if the element is not a text element.
    pub async fn update_text_element(
        &self,
        id: ElementId,
        update: TextElementUpdate,
    ) -> Result<TextElement, ElementStoreError> {
        let current: TextElement = self.get_variant(id).await?;

        let base = update.base.apply(&current.base)?;
        let text_props = self
            .patch_text_props(update.text_props, &current.text_props)
            .await?;
        let data_source = patch_required("data_source", update.data_source, current.data_source)?;

        let mut tx = self.pool.begin().await?;

        let base = update_element_row(&mut tx, &base).await?;
        let text_props = match text_props {
            Some(props) => update_text_props_row(&mut tx, current.text_props.id, &props).await?,
            None => current.text_props,
        };

        query(
            "
            UPDATE
                text_elements
            SET
                data_source = $1
            WHERE
                element_id = $2
            ",
        )
        .bind(encode_json(&data_source)?)
        .bind(id)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_updated(&base);

        Ok(TextElement {
            base,
            text_props,
            data_source,
        })
    }
}

#[async_trait]
impl ElementVariant for TextElement {
    const KIND: ElementKind = ElementKind::Text;

    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError> {
        let ids: Vec<ElementId> = bases.iter().map(|base| base.id).collect();

        let rows: Vec<TextElementRow> = store
            .fetch_rows_by_ids(
                "SELECT element_id, text_props_id, data_source FROM text_elements",
                "element_id",
                &ids,
            )
            .await?;
        let mut text_props = store.get_text_props_for_rows(&rows).await?;

        Ok(pair_with_bases(Self::KIND, bases, rows, |base, row| {
            Ok(TextElement {
                base,
                text_props: take_text_props(&mut text_props, row.text_props_id)?,
                data_source: decode_json(&row.data_source)?,
            })
        }))
    }

    fn base(&self) -> &CertificateElement {
        &self.base
    }

    fn into_element(self) -> Element {
        Element::Text(self)
    }
}
