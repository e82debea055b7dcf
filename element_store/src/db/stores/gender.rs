// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::query;

use crate::db::errors::ElementStoreError;
use crate::db::models::GenderElementRow;
use crate::db::stores::element::{insert_element_row, update_element_row};
use crate::db::stores::text_props::{insert_text_props_row, update_text_props_row};
use crate::db::traits::ElementVariant;
use crate::db::types::{
    CertificateElement, Element, ElementId, ElementKind, GenderElement, GenderElementUpdate,
    NewGenderElement,
};
use crate::db::utils::{pair_with_bases, take_text_props};
use crate::db::SqlStore;

/// Methods to interact with the `gender_elements` table in the database.
///
/// Gender elements carry nothing but their text properties, the printed value comes from the
/// student.
impl SqlStore {
    pub async fn create_gender_element(
        &self,
        element: NewGenderElement,
    ) -> Result<GenderElement, ElementStoreError> {
        self.validate_new_element(&element.base).await?;
        self.validate_text_props(&element.text_props).await?;

        let mut tx = self.pool.begin().await?;

        let text_props = insert_text_props_row(&mut tx, &element.text_props).await?;
        let base = insert_element_row(&mut tx, ElementKind::Gender, &element.base).await?;

        query(
            "
            INSERT INTO
                gender_elements (
                    element_id,
                    text_props_id
                )
            VALUES
                ($1, $2)
            ",
        )
        .bind(base.id)
        .bind(text_props.id)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_created(&base);

        Ok(GenderElement { base, text_props })
    }

    /// Applies a patch to a gender element.
    ///
    /// Errors with `Conflict` if the element is not a gender element.
    pub async fn update_gender_element(
        &self,
        id: ElementId,
        update: GenderElementUpdate,
    ) -> Result<GenderElement, ElementStoreError> {
        let current: GenderElement = self.get_variant(id).await?;

        let base = update.base.apply(&current.base)?;
        let text_props = self
            .patch_text_props(update.text_props, &current.text_props)
            .await?;

        let mut tx = self.pool.begin().await?;

        let base = update_element_row(&mut tx, &base).await?;
        let text_props = match text_props {
            Some(props) => update_text_props_row(&mut tx, current.text_props.id, &props).await?,
            None => current.text_props,
        };

        tx.commit().await?;
        self.element_updated(&base);

        Ok(GenderElement { base, text_props })
    }
}

#[async_trait]
impl ElementVariant for GenderElement {
    const KIND: ElementKind = ElementKind::Gender;

    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError> {
        let ids: Vec<ElementId> = bases.iter().map(|base| base.id).collect();

        let rows: Vec<GenderElementRow> = store
            .fetch_rows_by_ids(
                "SELECT element_id, text_props_id FROM gender_elements",
                "element_id",
                &ids,
            )
            .await?;
        let mut text_props = store.get_text_props_for_rows(&rows).await?;

        Ok(pair_with_bases(Self::KIND, bases, rows, |base, row| {
            Ok(GenderElement {
                base,
                text_props: take_text_props(&mut text_props, row.text_props_id)?,
            })
        }))
    }

    fn base(&self) -> &CertificateElement {
        &self.base
    }

    fn into_element(self) -> Element {
        Element::Gender(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::db::errors::ElementStoreError;
    use crate::db::types::{
        ElementUpdate, GenderElement, GenderElementUpdate, TextAlignment, TextPropsUpdate,
    };
    use crate::test_utils::{new_gender_element, test_db, TestDatabase, TestDatabaseRunner};

    #[rstest]
    fn create_update_and_load(#[from(test_db)] runner: TestDatabaseRunner) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let created = db
                .store
                .create_gender_element(new_gender_element(db.test_data.template_id))
                .await
                .unwrap();

            let update = GenderElementUpdate {
                base: ElementUpdate {
                    rotation: Some(Some(-15.5)),
                    description: Some(Some("Printed below the name".into())),
                    ..ElementUpdate::default()
                },
                text_props: Some(TextPropsUpdate {
                    alignment: Some(Some(TextAlignment::Justify)),
                    line_height: Some(Some(1.4)),
                    ..TextPropsUpdate::default()
                }),
            };

            let updated = db
                .store
                .update_gender_element(created.base.id, update)
                .await
                .unwrap();
            assert_eq!(updated.base.rotation, -15.5);
            assert_eq!(
                updated.base.description.as_deref(),
                Some("Printed below the name")
            );
            assert_eq!(updated.text_props.alignment, TextAlignment::Justify);
            assert_eq!(updated.text_props.line_height, Some(1.4));

            let loaded: GenderElement = db.store.get_variant(created.base.id).await.unwrap();
            assert_eq!(loaded, updated);
        });
    }

    #[rstest]
    fn rejects_invalid_text_props_patch(#[from(test_db)] runner: TestDatabaseRunner) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let created = db
                .store
                .create_gender_element(new_gender_element(db.test_data.template_id))
                .await
                .unwrap();

            let update = GenderElementUpdate {
                text_props: Some(TextPropsUpdate {
                    font_size: Some(Some(-4)),
                    ..TextPropsUpdate::default()
                }),
                ..GenderElementUpdate::default()
            };

            assert!(matches!(
                db.store.update_gender_element(created.base.id, update).await,
                Err(ElementStoreError::Validation(_))
            ));

            let loaded: GenderElement = db.store.get_variant(created.base.id).await.unwrap();
            assert_eq!(loaded, created);
        });
    }
}
