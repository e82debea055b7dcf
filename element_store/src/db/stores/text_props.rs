// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;
use std::convert::TryFrom;

use sqlx::any::AnyConnection;
use sqlx::{query, query_as, query_scalar};

use crate::db::errors::{ElementStoreError, Resource};
use crate::db::models::{TextPropsRow, VariantRow};
use crate::db::types::{NewTextProps, TextProps, TextPropsId, TextPropsUpdate};
use crate::db::utils::placeholders;
use crate::db::SqlStore;

const TEXT_PROPS_COLUMNS: &str = "
    id,
    font_kind,
    font_variant_id,
    google_font_family,
    google_font_variant,
    font_size,
    color,
    alignment,
    overflow,
    line_height,
    letter_spacing
";

/// Methods to interact with the `element_text_props` table in the database.
///
/// Every text-bearing element owns exactly one row, rows are never shared between elements.
impl SqlStore {
    /// Inserts a new row of text properties.
    pub async fn create_text_props(
        &self,
        props: NewTextProps,
    ) -> Result<TextProps, ElementStoreError> {
        self.validate_text_props(&props).await?;

        let mut conn = self.pool.acquire().await?;
        insert_text_props_row(&mut conn, &props).await
    }

    /// Applies a patch to stored text properties.
    ///
    /// The three font columns are derived again from the resulting font reference.
    pub async fn update_text_props(
        &self,
        id: TextPropsId,
        update: TextPropsUpdate,
    ) -> Result<TextProps, ElementStoreError> {
        let current = self.get_text_props(id).await?;
        let props = update.apply(&current)?;
        self.validate_text_props(&props).await?;

        let mut conn = self.pool.acquire().await?;
        update_text_props_row(&mut conn, id, &props).await
    }

    pub async fn find_text_props(
        &self,
        id: TextPropsId,
    ) -> Result<Option<TextProps>, ElementStoreError> {
        let mut conn = self.pool.acquire().await?;
        select_text_props(&mut conn, id).await
    }

    pub async fn get_text_props(&self, id: TextPropsId) -> Result<TextProps, ElementStoreError> {
        self.find_text_props(id)
            .await?
            .ok_or(ElementStoreError::NotFound(Resource::TextProps, id))
    }

    /// Deletes a row of text properties, returns `false` if it did not exist.
    ///
    /// Rows still owned by an element are protected by their foreign key, deleting them fails
    /// with `Validation`.
    pub async fn delete_text_props(&self, id: TextPropsId) -> Result<bool, ElementStoreError> {
        let result = query(
            "
            DELETE FROM
                element_text_props
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(sqlx::Error::Database(err)) => Err(ElementStoreError::Validation(format!(
                "Text properties {} are still in use: {}",
                id, err
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Loads many rows of text properties with one query, keyed by their id.
    pub(crate) async fn get_text_props_by_ids(
        &self,
        ids: &[TextPropsId],
    ) -> Result<HashMap<TextPropsId, TextProps>, ElementStoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {} FROM element_text_props WHERE id IN ({})",
            TEXT_PROPS_COLUMNS,
            placeholders(1, ids.len())
        );

        let mut rows = query_as::<_, TextPropsRow>(&sql);
        for id in ids {
            rows = rows.bind(*id);
        }

        rows.fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| TextProps::try_from(row).map(|props| (props.id, props)))
            .collect()
    }

    /// Loads the text properties owned by a batch of variant rows.
    pub(crate) async fn get_text_props_for_rows<R: VariantRow>(
        &self,
        rows: &[R],
    ) -> Result<HashMap<TextPropsId, TextProps>, ElementStoreError> {
        let ids: Vec<TextPropsId> = rows.iter().filter_map(VariantRow::text_props_id).collect();
        self.get_text_props_by_ids(&ids).await
    }

    /// Applies and validates an optional patch of the text properties owned by an element.
    ///
    /// Returns `None` if there was nothing to patch.
    pub(crate) async fn patch_text_props(
        &self,
        update: Option<TextPropsUpdate>,
        current: &TextProps,
    ) -> Result<Option<NewTextProps>, ElementStoreError> {
        match update {
            Some(update) => {
                let props = update.apply(current)?;
                self.validate_text_props(&props).await?;
                Ok(Some(props))
            }
            None => Ok(None),
        }
    }
}

/// Reads a row of text properties.
pub(crate) async fn select_text_props(
    conn: &mut AnyConnection,
    id: TextPropsId,
) -> Result<Option<TextProps>, ElementStoreError> {
    let sql = format!(
        "SELECT {} FROM element_text_props WHERE id = $1",
        TEXT_PROPS_COLUMNS
    );

    let row = query_as::<_, TextPropsRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(TextProps::try_from).transpose()
}

pub(crate) async fn insert_text_props_row(
    conn: &mut AnyConnection,
    props: &NewTextProps,
) -> Result<TextProps, ElementStoreError> {
    let (font_kind, font_variant_id, family, variant) = props.font.to_columns();

    let sql = "
        INSERT INTO
            element_text_props (
                font_kind,
                font_variant_id,
                google_font_family,
                google_font_variant,
                font_size,
                color,
                alignment,
                overflow,
                line_height,
                letter_spacing
            )
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING
            id
        ";

    let id: TextPropsId = query_scalar(sql)
        .bind(font_kind)
        .bind(font_variant_id)
        .bind(family)
        .bind(variant)
        .bind(props.font_size)
        .bind(props.color.clone())
        .bind(props.alignment.as_str())
        .bind(props.overflow.as_str())
        .bind(props.line_height)
        .bind(props.letter_spacing)
        .fetch_one(&mut *conn)
        .await?;

    select_text_props(conn, id).await?.ok_or_else(|| {
        ElementStoreError::FatalStorageError(format!("Inserted text properties {} not found", id))
    })
}

/// Overwrites all columns of a row of text properties.
pub(crate) async fn update_text_props_row(
    conn: &mut AnyConnection,
    id: TextPropsId,
    props: &NewTextProps,
) -> Result<TextProps, ElementStoreError> {
    let (font_kind, font_variant_id, family, variant) = props.font.to_columns();

    let sql = "
        UPDATE
            element_text_props
        SET
            font_kind = $1,
            font_variant_id = $2,
            google_font_family = $3,
            google_font_variant = $4,
            font_size = $5,
            color = $6,
            alignment = $7,
            overflow = $8,
            line_height = $9,
            letter_spacing = $10
        WHERE
            id = $11
        ";

    let result = query(sql)
        .bind(font_kind)
        .bind(font_variant_id)
        .bind(family)
        .bind(variant)
        .bind(props.font_size)
        .bind(props.color.clone())
        .bind(props.alignment.as_str())
        .bind(props.overflow.as_str())
        .bind(props.line_height)
        .bind(props.letter_spacing)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ElementStoreError::NotFound(Resource::TextProps, id));
    }

    select_text_props(conn, id)
        .await?
        .ok_or(ElementStoreError::NotFound(Resource::TextProps, id))
}
