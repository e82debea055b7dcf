// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::query;

use crate::db::errors::ElementStoreError;
use crate::db::models::QrCodeElementRow;
use crate::db::stores::element::{insert_element_row, update_element_row};
use crate::db::traits::ElementVariant;
use crate::db::types::{
    patch_required, validate_color, CertificateElement, Element, ElementId, ElementKind,
    NewQrCodeElement, QrCodeElement, QrCodeElementUpdate,
};
use crate::db::utils::{decode_json, encode_json, pair_with_bases};
use crate::db::SqlStore;

/// Methods to interact with the `qr_code_elements` table in the database.
impl SqlStore {
    pub async fn create_qr_code_element(
        &self,
        element: NewQrCodeElement,
    ) -> Result<QrCodeElement, ElementStoreError> {
        self.validate_new_element(&element.base).await?;
        validate_colors(&element.foreground_color, &element.background_color)?;

        let mut tx = self.pool.begin().await?;

        let base = insert_element_row(&mut tx, ElementKind::QrCode, &element.base).await?;

        query(
            "
            INSERT INTO
                qr_code_elements (
                    element_id,
                    data_source,
                    error_correction,
                    foreground_color,
                    background_color
                )
            VALUES
                ($1, $2, $3, $4, $5)
            ",
        )
        .bind(base.id)
        .bind(encode_json(&element.data_source)?)
        .bind(element.error_correction.as_str())
        .bind(&element.foreground_color)
        .bind(&element.background_color)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_created(&base);

        Ok(QrCodeElement {
            base,
            data_source: element.data_source,
            error_correction: element.error_correction,
            foreground_color: element.foreground_color,
            background_color: element.background_color,
        })
    }

    /// Applies a patch to a QR code element.
    ///
    /// Errors with `Conflict` if the element is not a QR code element.
    pub async fn update_qr_code_element(
        &self,
        id: ElementId,
        update: QrCodeElementUpdate,
    ) -> Result<QrCodeElement, ElementStoreError> {
        let current: QrCodeElement = self.get_variant(id).await?;

        let base = update.base.apply(&current.base)?;
        let data_source = patch_required("data_source", update.data_source, current.data_source)?;
        let error_correction = patch_required(
            "error_correction",
            update.error_correction,
            current.error_correction,
        )?;
        let foreground_color = patch_required(
            "foreground_color",
            update.foreground_color,
            current.foreground_color,
        )?;
        let background_color = patch_required(
            "background_color",
            update.background_color,
            current.background_color,
        )?;

        validate_colors(&foreground_color, &background_color)?;

        let mut tx = self.pool.begin().await?;

        let base = update_element_row(&mut tx, &base).await?;

        query(
            "
            UPDATE
                qr_code_elements
            SET
                data_source = $1,
                error_correction = $2,
                foreground_color = $3,
                background_color = $4
            WHERE
                element_id = $5
            ",
        )
        .bind(encode_json(&data_source)?)
        .bind(error_correction.as_str())
        .bind(&foreground_color)
        .bind(&background_color)
        .bind(id)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_updated(&base);

        Ok(QrCodeElement {
            base,
            data_source,
            error_correction,
            foreground_color,
            background_color,
        })
    }
}

fn validate_colors(foreground: &str, background: &str) -> Result<(), ElementStoreError> {
    validate_color("foreground_color", foreground)?;
    validate_color("background_color", background)
}

#[async_trait]
impl ElementVariant for QrCodeElement {
    const KIND: ElementKind = ElementKind::QrCode;

    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError> {
        let ids: Vec<ElementId> = bases.iter().map(|base| base.id).collect();

        let rows: Vec<QrCodeElementRow> = store
            .fetch_rows_by_ids(
                "
                SELECT
                    element_id,
                    data_source,
                    error_correction,
                    foreground_color,
                    background_color
                FROM
                    qr_code_elements
                ",
                "element_id",
                &ids,
            )
            .await?;

        Ok(pair_with_bases(Self::KIND, bases, rows, |base, row| {
            Ok(QrCodeElement {
                base,
                data_source: decode_json(&row.data_source)?,
                error_correction: row.error_correction.parse()?,
                foreground_color: row.foreground_color,
                background_color: row.background_color,
            })
        }))
    }

    fn base(&self) -> &CertificateElement {
        &self.base
    }

    fn into_element(self) -> Element {
        Element::QrCode(self)
    }
}
