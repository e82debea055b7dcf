// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::query;

use crate::db::errors::ElementStoreError;
use crate::db::models::ImageElementRow;
use crate::db::stores::element::{insert_element_row, update_element_row};
use crate::db::traits::ElementVariant;
use crate::db::types::{
    patch_required, CertificateElement, Element, ElementId, ElementKind, ImageElement,
    ImageElementUpdate, NewImageElement,
};
use crate::db::utils::{decode_json, encode_json, pair_with_bases};
use crate::db::SqlStore;

/// Methods to interact with the `image_elements` table in the database.
impl SqlStore {
    /// Creates an image element showing a file from blob storage.
    ///
    /// The file needs to be registered and still present in storage.
    pub async fn create_image_element(
        &self,
        element: NewImageElement,
    ) -> Result<ImageElement, ElementStoreError> {
        self.validate_new_element(&element.base).await?;
        self.validate_storage_file_id(element.data_source.storage_file_id()).await?;

        let mut tx = self.pool.begin().await?;

        let base = insert_element_row(&mut tx, ElementKind::Image, &element.base).await?;

        query(
            "
            INSERT INTO
                image_elements (
                    element_id,
                    data_source,
                    storage_file_id,
                    fit
                )
            VALUES
                ($1, $2, $3, $4)
            ",
        )
        .bind(base.id)
        .bind(encode_json(&element.data_source)?)
        .bind(element.data_source.storage_file_id())
        .bind(element.fit.as_str())
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_created(&base);

        Ok(ImageElement {
            base,
            data_source: element.data_source,
            fit: element.fit,
        })
    }

    /// Applies a patch to an image element.
    ///
    /// Errors with `Conflict` if the element is not an image element.
    pub async fn update_image_element(
        &self,
        id: ElementId,
        update: ImageElementUpdate,
    ) -> Result<ImageElement, ElementStoreError> {
        let current: ImageElement = self.get_variant(id).await?;

        let base = update.base.apply(&current.base)?;
        let file_changed = update.data_source.is_some();
        let data_source = patch_required("data_source", update.data_source, current.data_source)?;
        let fit = patch_required("fit", update.fit, current.fit)?;

        // Files which disappeared from storage only fail elements switching to them
        if file_changed {
            self.validate_storage_file_id(data_source.storage_file_id()).await?;
        }

        let mut tx = self.pool.begin().await?;

        let base = update_element_row(&mut tx, &base).await?;

        query(
            "
            UPDATE
                image_elements
            SET
                data_source = $1,
                storage_file_id = $2,
                fit = $3
            WHERE
                element_id = $4
            ",
        )
        .bind(encode_json(&data_source)?)
        .bind(data_source.storage_file_id())
        .bind(fit.as_str())
        .bind(id)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_updated(&base);

        Ok(ImageElement {
            base,
            data_source,
            fit,
        })
    }
}

#[async_trait]
impl ElementVariant for ImageElement {
    const KIND: ElementKind = ElementKind::Image;

    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError> {
        let ids: Vec<ElementId> = bases.iter().map(|base| base.id).collect();

        let rows: Vec<ImageElementRow> = store
            .fetch_rows_by_ids(
                "
                SELECT
                    element_id,
                    data_source,
                    storage_file_id,
                    fit
                FROM
                    image_elements
                ",
                "element_id",
                &ids,
            )
            .await?;

        Ok(pair_with_bases(Self::KIND, bases, rows, |base, row| {
            Ok(ImageElement {
                base,
                data_source: decode_json(&row.data_source)?,
                fit: row.fit.parse()?,
            })
        }))
    }

    fn base(&self) -> &CertificateElement {
        &self.base
    }

    fn into_element(self) -> Element {
        Element::Image(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::db::errors::ElementStoreError;
    use crate::db::types::{
        ElementUpdate, ImageDataSource, ImageElement, ImageElementUpdate, ImageFit,
        NewImageElement,
    };
    use crate::test_utils::{new_image_element, test_db, TestDatabase, TestDatabaseRunner};

    #[rstest]
    fn create_update_and_load(#[from(test_db)] runner: TestDatabaseRunner) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let created = db
                .store
                .create_image_element(new_image_element(
                    db.test_data.template_id,
                    db.test_data.storage_file_id,
                ))
                .await
                .unwrap();
            assert!(!created.base.kind.has_text_props());

            let loaded: ImageElement = db.store.get_variant(created.base.id).await.unwrap();
            assert_eq!(loaded, created);

            assert!(db.store.insert_storage_file("images/seal.png").await.is_err());

            db.storage.insert("images/seal.png").unwrap();
            let other_file = db
                .store
                .insert_storage_file("images/seal.png")
                .await
                .unwrap();

            let update = ImageElementUpdate {
                base: ElementUpdate {
                    hidden: Some(Some(true)),
                    ..ElementUpdate::default()
                },
                data_source: Some(Some(ImageDataSource::StorageFile {
                    storage_file_id: other_file.id,
                })),
                fit: Some(Some(ImageFit::Cover)),
            };

            let updated = db
                .store
                .update_image_element(created.base.id, update)
                .await
                .unwrap();
            assert!(updated.base.hidden);
            assert_eq!(updated.fit, ImageFit::Cover);
            assert_eq!(updated.data_source.storage_file_id(), other_file.id);

            let loaded: ImageElement = db.store.get_variant(created.base.id).await.unwrap();
            assert_eq!(loaded, updated);
        });
    }

    #[rstest]
    fn rejects_unknown_files(#[from(test_db)] runner: TestDatabaseRunner) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let element = NewImageElement {
                data_source: ImageDataSource::StorageFile {
                    storage_file_id: 4040,
                },
                ..new_image_element(db.test_data.template_id, db.test_data.storage_file_id)
            };

            assert!(matches!(
                db.store.create_image_element(element).await,
                Err(ElementStoreError::Validation(_))
            ));
            assert_eq!(
                db.store
                    .count_elements(db.test_data.template_id)
                    .await
                    .unwrap(),
                0
            );
        });
    }
}
