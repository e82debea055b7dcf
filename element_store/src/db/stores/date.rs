// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::query;

use crate::db::errors::ElementStoreError;
use crate::db::models::DateElementRow;
use crate::db::stores::element::{insert_element_row, update_element_row};
use crate::db::stores::text_props::{insert_text_props_row, update_text_props_row};
use crate::db::traits::ElementVariant;
use crate::db::types::{
    patch_nullable, patch_required, CertificateElement, DateDataSource, DateElement,
    DateElementUpdate, Element, ElementId, ElementKind, NewDateElement, TemplateId,
    VariableType,
};
use crate::db::utils::{decode_json, encode_json, pair_with_bases, take_text_props};
use crate::db::SqlStore;

/// Methods to interact with the `date_elements` table in the database.
impl SqlStore {
    /// Creates a date element, its text properties and its base row in one transaction.
    pub async fn create_date_element(
        &self,
        element: NewDateElement,
    ) -> Result<DateElement, ElementStoreError> {
        self.validate_new_element(&element.base).await?;
        self.validate_text_props(&element.text_props).await?;
        self.validate_date_fields(
            element.base.template_id,
            &element.data_source,
            &element.format,
        )
        .await?;

        let mut tx = self.pool.begin().await?;

        let text_props = insert_text_props_row(&mut tx, &element.text_props).await?;
        let base = insert_element_row(&mut tx, ElementKind::Date, &element.base).await?;

        query(
            "
            INSERT INTO
                date_elements (
                    element_id,
                    text_props_id,
                    data_source,
                    variable_id,
                    calendar_type,
                    offset_in_days,
                    format,
                    transformation
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(base.id)
        .bind(text_props.id)
        .bind(encode_json(&element.data_source)?)
        .bind(element.data_source.variable_id())
        .bind(element.calendar_type.as_str())
        .bind(element.offset_in_days)
        .bind(element.format.clone())
        .bind(element.transformation.map(|transformation| transformation.as_str()))
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_created(&base);

        Ok(DateElement {
            base,
            text_props,
            data_source: element.data_source,
            calendar_type: element.calendar_type,
            offset_in_days: element.offset_in_days,
            format: element.format,
            transformation: element.transformation,
        })
    }

    /// Applies a patch to a date element.
    ///
    /// Errors with `Conflict` if the element is not a date element.
    pub async fn update_date_element(
        &self,
        id: ElementId,
        update: DateElementUpdate,
    ) -> Result<DateElement, ElementStoreError> {
        let current: DateElement = self.get_variant(id).await?;

        let base = update.base.apply(&current.base)?;
        let text_props = self
            .patch_text_props(update.text_props, &current.text_props)
            .await?;
        let data_source = patch_required("data_source", update.data_source, current.data_source)?;
        let calendar_type =
            patch_required("calendar_type", update.calendar_type, current.calendar_type)?;
        let offset_in_days =
            patch_required("offset_in_days", update.offset_in_days, current.offset_in_days)?;
        let format = patch_required("format", update.format, current.format)?;
        let transformation = patch_nullable(update.transformation, current.transformation);

        self.validate_date_fields(base.template_id, &data_source, &format)
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
                date_elements
            SET
                data_source = $1,
                variable_id = $2,
                calendar_type = $3,
                offset_in_days = $4,
                format = $5,
                transformation = $6
            WHERE
                element_id = $7
            ",
        )
        .bind(encode_json(&data_source)?)
        .bind(data_source.variable_id())
        .bind(calendar_type.as_str())
        .bind(offset_in_days)
        .bind(format.clone())
        .bind(transformation.map(|transformation| transformation.as_str()))
        .bind(id)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        self.element_updated(&base);

        Ok(DateElement {
            base,
            text_props,
            data_source,
            calendar_type,
            offset_in_days,
            format,
            transformation,
        })
    }

    async fn validate_date_fields(
        &self,
        template_id: TemplateId,
        data_source: &DateDataSource,
        format: &str,
    ) -> Result<(), ElementStoreError> {
        if format.trim().is_empty() {
            return Err(ElementStoreError::Validation(
                "Date format can not be empty".into(),
            ));
        }

        match data_source {
            DateDataSource::Static { value } => validate_static_date(value),
            DateDataSource::TemplateVariable { variable_id } => {
                self.check_template_variable_id(template_id, *variable_id, VariableType::Date)
                    .await?;
                Ok(())
            }
            DateDataSource::StudentField { .. } | DateDataSource::CertificateField { .. } => Ok(()),
        }
    }
}

/// Checks for a calendar date written as `YYYY-MM-DD`.
fn validate_static_date(value: &str) -> Result<(), ElementStoreError> {
    let parts: Vec<&str> = value.split('-').collect();

    let valid = match parts.as_slice() {
        [year, month, day] if year.len() == 4 && month.len() == 2 && day.len() == 2 => {
            match (year.parse::<u16>(), month.parse::<u8>(), day.parse::<u8>()) {
                (Ok(_), Ok(month), Ok(day)) => (1..=12).contains(&month) && (1..=31).contains(&day),
                _ => false,
            }
        }
        _ => false,
    };

    if !valid {
        return Err(ElementStoreError::Validation(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            value
        )));
    }

    Ok(())
}

#[async_trait]
impl ElementVariant for DateElement {
    const KIND: ElementKind = ElementKind::Date;

    async fn load_for_bases(
        store: &SqlStore,
        bases: Vec<CertificateElement>,
    ) -> Result<HashMap<ElementId, Result<Self, ElementStoreError>>, ElementStoreError> {
        let ids: Vec<ElementId> = bases.iter().map(|base| base.id).collect();

        let rows: Vec<DateElementRow> = store
            .fetch_rows_by_ids(
                "
                SELECT
                    element_id,
                    text_props_id,
                    data_source,
                    variable_id,
                    calendar_type,
                    offset_in_days,
                    format,
                    transformation
                FROM
                    date_elements
                ",
                "element_id",
                &ids,
            )
            .await?;
        let mut text_props = store.get_text_props_for_rows(&rows).await?;

        Ok(pair_with_bases(Self::KIND, bases, rows, |base, row| {
            Ok(DateElement {
                base,
                text_props: take_text_props(&mut text_props, row.text_props_id)?,
                data_source: decode_json(&row.data_source)?,
                calendar_type: row.calendar_type.parse()?,
                offset_in_days: row.offset_in_days,
                format: row.format,
                transformation: row
                    .transformation
                    .map(|transformation| transformation.parse())
                    .transpose()?,
            })
        }))
    }

    fn base(&self) -> &CertificateElement {
        &self.base
    }

    fn into_element(self) -> Element {
        Element::Date(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sqlx::query_scalar;

    use crate::db::errors::ElementStoreError;
    use crate::db::types::{
        CalendarType, CertificateDateField, DateDataSource, DateElement, DateElementUpdate,
        DateTransformation, NewDateElement,
    };
    use crate::test_utils::{new_date_element, test_db, TestDatabase, TestDatabaseRunner};

    use super::validate_static_date;

    #[rstest]
    #[case("2023-10-04", true)]
    #[case("1999-12-31", true)]
    #[case("2023-13-01", false)]
    #[case("2023-1-01", false)]
    #[case("04.10.2023", false)]
    #[case("", false)]
    fn static_dates(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_static_date(value).is_ok(), valid);
    }

    async fn stored_variable_id(db: &TestDatabase, id: i64) -> Option<i64> {
        query_scalar("SELECT variable_id FROM date_elements WHERE element_id = $1")
            .bind(id)
            .fetch_one(&db.store.pool)
            .await
            .unwrap()
    }

    #[rstest]
    fn mirrors_template_variable(#[from(test_db)] runner: TestDatabaseRunner) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let variable_id = db.test_data.date_variable_id;
            let element = NewDateElement {
                data_source: DateDataSource::TemplateVariable { variable_id },
                transformation: Some(DateTransformation::AgeCalculation),
                ..new_date_element(db.test_data.template_id)
            };

            let created = db.store.create_date_element(element.clone()).await.unwrap();
            assert_eq!(stored_variable_id(&db, created.base.id).await, Some(variable_id));

            let loaded: DateElement = db.store.get_variant(created.base.id).await.unwrap();
            assert_eq!(loaded, created);
            assert_eq!(loaded.transformation, Some(DateTransformation::AgeCalculation));

            // Switching to another branch clears the mirror column
            let update = DateElementUpdate {
                data_source: Some(Some(DateDataSource::CertificateField {
                    field: CertificateDateField::ReleaseDate,
                })),
                calendar_type: Some(Some(CalendarType::Hijri)),
                transformation: Some(None),
                ..DateElementUpdate::default()
            };

            let updated = db
                .store
                .update_date_element(created.base.id, update)
                .await
                .unwrap();
            assert_eq!(stored_variable_id(&db, created.base.id).await, None);
            assert_eq!(updated.calendar_type, CalendarType::Hijri);
            assert_eq!(updated.transformation, None);
            assert_eq!(updated.format, element.format);

            let loaded: DateElement = db.store.get_variant(created.base.id).await.unwrap();
            assert_eq!(loaded, updated);
        });
    }

    #[rstest]
    fn rejects_variables_of_wrong_type(#[from(test_db)] runner: TestDatabaseRunner) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let element = NewDateElement {
                data_source: DateDataSource::TemplateVariable {
                    variable_id: db.test_data.number_variable_id,
                },
                ..new_date_element(db.test_data.template_id)
            };

            assert!(matches!(
                db.store.create_date_element(element).await,
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

    #[rstest]
    fn rejects_clearing_required_fields(
        #[from(test_db)]
        #[with(2)]
        runner: TestDatabaseRunner,
    ) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let id = db.test_data.elements[1];

            for update in [
                DateElementUpdate {
                    format: Some(None),
                    ..DateElementUpdate::default()
                },
                DateElementUpdate {
                    offset_in_days: Some(None),
                    ..DateElementUpdate::default()
                },
                DateElementUpdate {
                    format: Some(Some(" ".into())),
                    ..DateElementUpdate::default()
                },
            ] {
                assert!(matches!(
                    db.store.update_date_element(id, update).await,
                    Err(ElementStoreError::Validation(_))
                ));
            }
        });
    }
}
