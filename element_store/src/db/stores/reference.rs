// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::{query_as, query_scalar};

use crate::db::errors::ElementStoreError;
use crate::db::models::{FontVariantRow, StorageFileRow};
use crate::db::types::{FontId, FontVariant, FontVariantId, StorageFile, StorageFileId};
use crate::db::SqlStore;

/// Methods to interact with the `storage_files`, `fonts` and `font_variants` tables.
impl SqlStore {
    /// Registers a file which is present in blob storage.
    pub async fn insert_storage_file(&self, path: &str) -> Result<StorageFile, ElementStoreError> {
        self.validate_storage_file_path(path).await?;

        let row = query_as::<_, StorageFileRow>(
            "
            INSERT INTO
                storage_files (path)
            VALUES
                ($1)
            RETURNING
                id,
                path
            ",
        )
        .bind(path)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_storage_file(
        &self,
        id: StorageFileId,
    ) -> Result<Option<StorageFile>, ElementStoreError> {
        let row = query_as::<_, StorageFileRow>(
            "
            SELECT
                id,
                path
            FROM
                storage_files
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StorageFile::from))
    }

    /// Inserts a font family and returns its id.
    pub async fn insert_font(&self, name: &str) -> Result<FontId, ElementStoreError> {
        let id: i64 = query_scalar(
            "
            INSERT INTO
                fonts (name)
            VALUES
                ($1)
            RETURNING
                id
            ",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Adds a style to a font family, backed by a registered storage file.
    pub async fn insert_font_variant(
        &self,
        font_id: FontId,
        variant: &str,
        storage_file_id: StorageFileId,
    ) -> Result<FontVariant, ElementStoreError> {
        self.validate_font_id(font_id).await?;
        self.validate_storage_file_id(storage_file_id).await?;

        let row = query_as::<_, FontVariantRow>(
            "
            INSERT INTO
                font_variants (
                    font_id,
                    variant,
                    storage_file_id
                )
            VALUES
                ($1, $2, $3)
            RETURNING
                id,
                font_id,
                variant,
                storage_file_id
            ",
        )
        .bind(font_id)
        .bind(variant)
        .bind(storage_file_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_font_variant(
        &self,
        id: FontVariantId,
    ) -> Result<Option<FontVariant>, ElementStoreError> {
        let row = query_as::<_, FontVariantRow>(
            "
            SELECT
                id,
                font_id,
                variant,
                storage_file_id
            FROM
                font_variants
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FontVariant::from))
    }

    /// Returns `true` if a font family with this id exists.
    pub async fn font_exists(&self, id: FontId) -> Result<bool, ElementStoreError> {
        let result: Option<i64> = query_scalar(
            "
            SELECT
                id
            FROM
                fonts
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.is_some())
    }
}
