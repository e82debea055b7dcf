// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use sqlx::query;

use crate::db::errors::ElementStoreError;
use crate::db::models::NumberElementRow;
use crate::db::stores::element::{insert_element_row, update_element_row};
use crate::db::stores::text_props::{insert_text_props_row, update_text_props_row};
use crate::db::traits::ElementVariant;
use crate::db::types::{
    patch_required, CertificateElement, Element, ElementId, ElementKind, NewNumberElement,
    NumberDataSource, NumberElement, NumberElementUpdate, TemplateId, VariableType,
};
use crate::db::utils::{decode_json, encode_json, pair_with_bases, take_text_props};
use crate::db::SqlStore;

/// Highest number of decimal places a number element can print.
const MAX_DECIMAL_PLACES: i32 = 10;

/// Methods to interact with the `number_elements` table in the database.
impl SqlStore {
    /// Creates a number element, its text properties and its base row in one transaction.
    pub async fn create_number_element(
        &self,
        element: NewNumberElement,
    ) -> Result<NumberElement, ElementStoreError> {
        self.validate_new_element(&element.base).await?;
        self.validate_text_props(&element.text_props).await?;
        self.validate_number_fields(
            element.base.template_id,
            &element.data_source,
            &element.mapping,
            element.decimal_places,
        )
        .await?;

        let mut tx = self.pool.begin().await?;

        let text_props = insert_text_props_row(&mut tx, &element.text_props).await?;
        let base = insert_element_row(&mut tx, ElementKind::Number, &element.base).await?;

        query(
            "
            INSERT INTO
                number_elements (
                    element_id,
                    text_props_id,
                    data_source,
                    variable_id,
                    mapping,
                    decimal_places
                )
            VALUES
                ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(base.id)
        .bind(text_props.id)
        .bind(encode_json(&element.data_source)?)
        .bind(element.data_source.variable_id())
        .bind(encode_json(&element.mapping)?)
        .bind(element.decimal_places)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_created(&base);

        Ok(NumberElement {
            base,
            text_props,
            data_source: element.data_source,
            mapping: element.mapping,
            decimal_places: element.decimal_places,
        })
    }

    /// Applies a patch to a number element.
    ///
    /// Errors with `Conflict` if the element is not a number element.
    pub async fn update_number_element(
        &self,
        id: ElementId,
        update: NumberElementUpdate,
    ) -> Result<NumberElement, ElementStoreError> {
        let current: NumberElement = self.get_variant(id).await?;

        let base = update.base.apply(&current.base)?;
        let text_props = self
            .patch_text_props(update.text_props, &current.text_props)
            .await?;
        let data_source = patch_required("data_source", update.data_source, current.data_source)?;
        let mapping = patch_required("mapping", update.mapping, current.mapping)?;
        let decimal_places =
            patch_required("decimal_places", update.decimal_places, current.decimal_places)?;

        self.validate_number_fields(base.template_id, &data_source, &mapping, decimal_places)
            .await?;

        let mut tx = self.pool.begin().await?;

        let base = update_element_row(&mut tx, &base).await?;
        let text_props = match text_props {
            Some(props) => update_text_props_row(&mut tx, current.text_props.id, &props).await?,
            None => current.text_props,
        };

        query(
            "
            UPDATE
                number_elements
            SET
                data_source = $1,
                variable_id = $2,
                mapping = $3,
                decimal_places = $4
            WHERE
                element_id = $5
            ",
        )
        .bind(encode_json(&data_source)?)
        .bind(data_source.variable_id())
        .bind(encode_json(&mapping)?)
        .bind(decimal_places)
        .bind(id)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_updated(&base);

        Ok(NumberElement {
            base,
            text_props,
            data_source,
            mapping,
            decimal_places,
        })
    }

    async fn validate_number_fields(
        &self,
        template_id: TemplateId,
        data_source: &NumberDataSource,
        mapping: &BTreeMap<String, String>,
        decimal_places: i32,
    ) -> Result<(), ElementStoreError> {
        if !(0..=MAX_DECIMAL_PLACES).contains(&decimal_places) {
            return Err(ElementStoreError::Validation(format!(
                "Decimal places must be between 0 and {}, got {}",
                MAX_DECIMAL_PLACES, decimal_places
            )));
        }

        validate_mapping(mapping)?;

        match data_source {
            NumberDataSource::Static { value } if !value.is_finite() => Err(
                ElementStoreError::Validation("Static number must be finite".into()),
            ),
            NumberDataSource::Static { .. } => Ok(()),
            NumberDataSource::TemplateVariable { variable_id } => {
                self.check_template_variable_id(template_id, *variable_id, VariableType::Number)
                    .await?;
                Ok(())
            }
        }
    }
}

/// Checks that a display mapping only replaces single digits with non-empty glyphs.
fn validate_mapping(mapping: &BTreeMap<String, String>) -> Result<(), ElementStoreError> {
    for (digit, glyph) in mapping {
        let is_digit = digit.len() == 1 && digit.chars().all(|char| char.is_ascii_digit());

        if !is_digit || glyph.is_empty() {
            return Err(ElementStoreError::Validation(format!(
                "Invalid number mapping '{}' => '{}'",
                digit, glyph
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl ElementVariant for NumberElement {
    const KIND: ElementKind = ElementKind::Number;

    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError> {
        let ids: Vec<ElementId> = bases.iter().map(|base| base.id).collect();

        let rows: Vec<NumberElementRow> = store
            .fetch_rows_by_ids(
                "
                SELECT
                    element_id,
                    text_props_id,
                    data_source,
                    variable_id,
                    mapping,
                    decimal_places
                FROM
                    number_elements
                ",
                "element_id",
                &ids,
            )
            .await?;
        let mut text_props = store.get_text_props_for_rows(&rows).await?;

        Ok(pair_with_bases(Self::KIND, bases, rows, |base, row| {
            Ok(NumberElement {
                base,
                text_props: take_text_props(&mut text_props, row.text_props_id)?,
                data_source: decode_json(&row.data_source)?,
                mapping: decode_json(&row.mapping)?,
                decimal_places: row.decimal_places,
            })
        }))
    }

    fn base(&self) -> &CertificateElement {
        &self.base
    }

    fn into_element(self) -> Element {
        Element::Number(self)
    }
}
