// SPDX-License-Identifier: AGPL-3.0-or-later

use std::convert::TryFrom;

use crate::db::errors::ElementStoreError;
use crate::db::models::{FontVariantRow, StorageFileRow, TemplateVariableRow};
use crate::db::types::{FontId, FontVariantId, StorageFileId, TemplateId, VariableId};

/// Type of the values a template variable holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    Text,
    Number,
    Date,
    Select,
}

string_enum!(VariableType {
    Text => "TEXT",
    Number => "NUMBER",
    Date => "DATE",
    Select => "SELECT",
});

/// Value a template asks for when certificates get issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariable {
    pub id: VariableId,
    pub template_id: TemplateId,
    pub name: String,
    pub variable_type: VariableType,
}

impl TryFrom<TemplateVariableRow> for TemplateVariable {
    type Error = ElementStoreError;

    fn try_from(row: TemplateVariableRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            template_id: row.template_id,
            name: row.name,
            variable_type: row.variable_type.parse()?,
        })
    }
}

/// Single style of a self-hosted font family, backed by a file in blob storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontVariant {
    pub id: FontVariantId,
    pub font_id: FontId,
    pub variant: String,
    pub storage_file_id: StorageFileId,
}

/// File registered in blob storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFile {
    pub id: StorageFileId,
    pub path: String,
}

impl From<FontVariantRow> for FontVariant {
    fn from(row: FontVariantRow) -> Self {
        Self {
            id: row.id,
            font_id: row.font_id,
            variant: row.variant,
            storage_file_id: row.storage_file_id,
        }
    }
}

impl From<StorageFileRow> for StorageFile {
    fn from(row: StorageFileRow) -> Self {
        Self {
            id: row.id,
            path: row.path,
        }
    }
}
