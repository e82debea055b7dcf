// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Representation of a row from the `template_variables` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariableRow {
    pub id: i64,

    pub template_id: i64,

    pub name: String,

    /// One of `TEXT`, `NUMBER`, `DATE` or `SELECT`.
    pub variable_type: String,
}

/// Representation of a row from the `font_variants` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct FontVariantRow {
    pub id: i64,

    pub font_id: i64,

    pub variant: String,

    pub storage_file_id: i64,
}

/// Representation of a row from the `storage_files` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct StorageFileRow {
    pub id: i64,

    /// Path of the file inside blob storage.
    pub path: String,
}
