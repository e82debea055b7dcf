// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::query;

use crate::db::errors::ElementStoreError;
use crate::db::models::CountryElementRow;
use crate::db::stores::element::{insert_element_row, update_element_row};
use crate::db::stores::text_props::{insert_text_props_row, update_text_props_row};
use crate::db::traits::ElementVariant;
use crate::db::types::{
    patch_required, CertificateElement, CountryElement, CountryElementUpdate, Element, ElementId,
    ElementKind, NewCountryElement,
};
use crate::db::utils::{decode_json, encode_json, pair_with_bases, take_text_props};
use crate::db::SqlStore;

/// Methods to interact with the `country_elements` table in the database.
impl SqlStore {
    pub async fn create_country_element(
        &self,
        element: NewCountryElement,
    ) -> Result<CountryElement, ElementStoreError> {
        self.validate_new_element(&element.base).await?;
        self.validate_text_props(&element.text_props).await?;

        let mut tx = self.pool.begin().await?;

        let text_props = insert_text_props_row(&mut tx, &element.text_props).await?;
        let base = insert_element_row(&mut tx, ElementKind::Country, &element.base).await?;

        query(
            "
            INSERT INTO
                country_elements (
                    element_id,
                    text_props_id,
                    data_source,
                    representation
                )
            VALUES
                ($1, $2, $3, $4)
            ",
        )
        .bind(base.id)
        .bind(text_props.id)
        .bind(encode_json(&element.data_source)?)
        .bind(element.representation.as_str())
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_created(&base);

        Ok(CountryElement {
            base,
            text_props,
            data_source: element.data_source,
            representation: element.representation,
        })
    }

    /// Applies a patch to a country element.
    ///
    /// Errors with `Conflict` if the element is not a country element.
    pub async fn update_country_element(
        &self,
        id: ElementId,
        update: CountryElementUpdate,
    ) -> Result<CountryElement, ElementStoreError> {
        let current: CountryElement = self.get_variant(id).await?;

        let base = update.base.apply(&current.base)?;
        let text_props = self
            .patch_text_props(update.text_props, &current.text_props)
            .await?;
        let data_source = patch_required("data_source", update.data_source, current.data_source)?;
        let representation = patch_required(
            "representation",
            update.representation,
            current.representation,
        )?;

        let mut tx = self.pool.begin().await?;

        let base = update_element_row(&mut tx, &base).await?;
        let text_props = match text_props {
            Some(props) => update_text_props_row(&mut tx, current.text_props.id, &props).await?,
            None => current.text_props,
        };

        query(
            "
            UPDATE
                country_elements
            SET
                data_source = $1,
                representation = $2
            WHERE
                element_id = $3
            ",
        )
        .bind(encode_json(&data_source)?)
        .bind(representation.as_str())
        .bind(id)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_updated(&base);

        Ok(CountryElement {
            base,
            text_props,
            data_source,
            representation,
        })
    }
}

#[async_trait]
impl ElementVariant for CountryElement {
    const KIND: ElementKind = ElementKind::Country;

    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError> {
        let ids: Vec<ElementId> = bases.iter().map(|base| base.id).collect();

        let rows: Vec<CountryElementRow> = store
            .fetch_rows_by_ids(
                "
                SELECT
                    element_id,
                    text_props_id,
                    data_source,
                    representation
                FROM
                    country_elements
                ",
                "element_id",
                &ids,
            )
            .await?;
        let mut text_props = store.get_text_props_for_rows(&rows).await?;

        Ok(pair_with_bases(Self::KIND, bases, rows, |base, row| {
            Ok(CountryElement {
                base,
                text_props: take_text_props(&mut text_props, row.text_props_id)?,
                data_source: decode_json(&row.data_source)?,
                representation: row.representation.parse()?,
            })
        }))
    }

    fn base(&self) -> &CertificateElement {
        &self.base
    }

    fn into_element(self) -> Element {
        Element::Country(self)
    }
}
