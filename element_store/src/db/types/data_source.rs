// SPDX-License-Identifier: AGPL-3.0-or-later

//! Descriptions of where the value rendered by an element comes from.
//!
//! Data sources are stored as JSON text next to the variant row. Branches referencing another row
//! are additionally mirrored into their own foreign key column, see `variable_id` and
//! `storage_file_id`.
use serde::{Deserialize, Serialize};

use crate::db::types::{StorageFileId, VariableId};

/// Text fields of the student a certificate is issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentTextField {
    Name,
    Email,
}

/// Date fields of the student a certificate is issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentDateField {
    DateOfBirth,
}

/// Text fields of the issued certificate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateTextField {
    VerificationCode,
}

/// Date fields of the issued certificate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateDateField {
    ReleaseDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDataSource {
    Static { value: String },
    StudentField { field: StudentTextField },
    CertificateField { field: CertificateTextField },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateDataSource {
    /// Fixed date, formatted as `YYYY-MM-DD`.
    Static { value: String },
    StudentField { field: StudentDateField },
    CertificateField { field: CertificateDateField },
    TemplateVariable { variable_id: VariableId },
}

impl DateDataSource {
    /// Id of the referenced template variable, mirrored into the `variable_id` column.
    pub fn variable_id(&self) -> Option<VariableId> {
        match self {
            DateDataSource::TemplateVariable { variable_id } => Some(*variable_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberDataSource {
    Static { value: f64 },
    TemplateVariable { variable_id: VariableId },
}

impl NumberDataSource {
    /// Id of the referenced template variable, mirrored into the `variable_id` column.
    pub fn variable_id(&self) -> Option<VariableId> {
        match self {
            NumberDataSource::TemplateVariable { variable_id } => Some(*variable_id),
            NumberDataSource::Static { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountryDataSource {
    StudentNationality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageDataSource {
    StorageFile { storage_file_id: StorageFileId },
}

impl ImageDataSource {
    /// Id of the referenced file, mirrored into the `storage_file_id` column.
    pub fn storage_file_id(&self) -> StorageFileId {
        match self {
            ImageDataSource::StorageFile { storage_file_id } => *storage_file_id,
        }
    }
}

/// What a QR code encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QrCodeDataSource {
    /// Public URL verifying the issued certificate.
    VerificationUrl,
    VerificationCode,
}

impl Default for QrCodeDataSource {
    fn default() -> Self {
        QrCodeDataSource::VerificationUrl
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DateDataSource, NumberDataSource, StudentTextField, TextDataSource};

    #[test]
    fn tagged_json_representation() {
        let source = TextDataSource::StudentField {
            field: StudentTextField::Name,
        };

        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({ "type": "STUDENT_FIELD", "field": "NAME" })
        );

        let source: DateDataSource =
            serde_json::from_value(json!({ "type": "TEMPLATE_VARIABLE", "variable_id": 12 }))
                .unwrap();
        assert_eq!(source.variable_id(), Some(12));
    }

    #[test]
    fn mirrors_variable_reference() {
        assert_eq!(NumberDataSource::Static { value: 3.0 }.variable_id(), None);
        assert_eq!(
            NumberDataSource::TemplateVariable { variable_id: 5 }.variable_id(),
            Some(5)
        );
        assert_eq!(
            DateDataSource::Static {
                value: "2023-01-01".into()
            }
            .variable_id(),
            None
        );
    }
}
