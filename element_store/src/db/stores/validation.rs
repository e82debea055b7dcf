// SPDX-License-Identifier: AGPL-3.0-or-later

use log::warn;

use crate::db::errors::ElementStoreError;
use crate::db::types::{
    FontId, FontReference, FontVariant, FontVariantId, NewTextProps, StorageFile,
    StorageFileId, TemplateId, TemplateVariable, VariableId, VariableType,
};
use crate::db::SqlStore;

/// Checks run before a write which turn foreign key violations into descriptive errors.
impl SqlStore {
    pub async fn validate_font_id(&self, id: FontId) -> Result<(), ElementStoreError> {
        if !self.font_exists(id).await? {
            return Err(ElementStoreError::Validation(format!(
                "Font {} does not exist",
                id
            )));
        }

        Ok(())
    }

    /// Checks that a font variant exists and that its file is present in storage.
    pub async fn validate_font_variant_id(
        &self,
        id: FontVariantId,
    ) -> Result<FontVariant, ElementStoreError> {
        let variant = self.get_font_variant(id).await?.ok_or_else(|| {
            ElementStoreError::Validation(format!("Font variant {} does not exist", id))
        })?;

        self.validate_storage_file_id(variant.storage_file_id).await?;

        Ok(variant)
    }

    /// Asks the storage service if a file exists under this path.
    pub async fn validate_storage_file_path(&self, path: &str) -> Result<(), ElementStoreError> {
        let exists = self
            .storage
            .file_exists(path)
            .await
            .map_err(|err| {
                warn!("Storage service failed looking up '{}': {}", path, err);
                ElementStoreError::FatalStorageError(err.to_string())
            })?;

        if !exists {
            return Err(ElementStoreError::Validation(format!(
                "File '{}' does not exist in storage",
                path
            )));
        }

        Ok(())
    }

    /// Checks that a storage file is registered and still present in storage.
    pub async fn validate_storage_file_id(
        &self,
        id: StorageFileId,
    ) -> Result<StorageFile, ElementStoreError> {
        let file = self.get_storage_file(id).await?.ok_or_else(|| {
            ElementStoreError::Validation(format!("Storage file {} does not exist", id))
        })?;

        self.validate_storage_file_path(&file.path).await?;

        Ok(file)
    }

    /// Checks that a variable belongs to the template and holds values of the expected type.
    pub async fn check_template_variable_id(
        &self,
        template_id: TemplateId,
        id: VariableId,
        expected: VariableType,
    ) -> Result<TemplateVariable, ElementStoreError> {
        let variable = self.get_template_variable(id).await?.ok_or_else(|| {
            ElementStoreError::Validation(format!("Template variable {} does not exist", id))
        })?;

        if variable.template_id != template_id {
            return Err(ElementStoreError::Validation(format!(
                "Template variable {} belongs to template {}, not {}",
                id, variable.template_id, template_id
            )));
        }

        if variable.variable_type != expected {
            return Err(ElementStoreError::Validation(format!(
                "Template variable {} is of type {}, expected {}",
                id, variable.variable_type, expected
            )));
        }

        Ok(variable)
    }

    /// Checks field constraints and the referenced font of text properties.
    pub(crate) async fn validate_text_props(
        &self,
        props: &NewTextProps,
    ) -> Result<(), ElementStoreError> {
        props.validate()?;

        if let FontReference::SelfHosted { font_variant_id } = props.font {
            self.validate_font_variant_id(font_variant_id).await?;
        }

        Ok(())
    }
}
