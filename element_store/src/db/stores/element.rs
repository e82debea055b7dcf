// SPDX-License-Identifier: AGPL-3.0-or-later

use std::convert::TryFrom;

use sqlx::any::AnyConnection;
use sqlx::{query, query_as, query_scalar};

use crate::db::errors::{ElementStoreError, Resource};
use crate::db::models::ElementRow;
use crate::db::traits::TemplateProvider;
use crate::db::types::{
    CertificateElement, Element, ElementId, ElementKind, ElementVariantUpdate, NewElement,
    NewElementVariant, TemplateId,
};
use crate::db::SqlStore;
use crate::observer::StoreEvent;

/// Selects all columns of the `certificate_elements` table.
pub(crate) const SELECT_ELEMENTS: &str = "
    SELECT
        id,
        template_id,
        kind,
        name,
        description,
        position_x,
        position_y,
        width,
        height,
        rotation,
        hidden,
        z_index
    FROM
        certificate_elements
";

/// Methods to interact with the `certificate_elements` table in the database.
impl SqlStore {
    /// Get the base fields of an element.
    ///
    /// Returns `None` if no element with this id exists.
    pub async fn find_element(
        &self,
        id: ElementId,
    ) -> Result<Option<CertificateElement>, ElementStoreError> {
        let mut conn = self.pool.acquire().await?;
        select_element(&mut conn, id).await
    }

    /// Get the base fields of an element, errors if it does not exist.
    pub async fn get_element(
        &self,
        id: ElementId,
    ) -> Result<CertificateElement, ElementStoreError> {
        self.find_element(id)
            .await?
            .ok_or(ElementStoreError::NotFound(Resource::Element, id))
    }

    /// Returns `true` if an element with this id exists.
    pub async fn element_exists(&self, id: ElementId) -> Result<bool, ElementStoreError> {
        let result: Option<i64> = query_scalar(
            "
            SELECT
                id
            FROM
                certificate_elements
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.is_some())
    }

    /// Get the base fields of all elements of a template, ordered by their z-index.
    ///
    /// Errors with `NotFound` if the template does not exist.
    pub async fn find_elements_by_template_id(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<CertificateElement>, ElementStoreError> {
        if !self.template_exists(template_id).await? {
            return Err(ElementStoreError::NotFound(
                Resource::Template,
                template_id,
            ));
        }

        let sql = format!(
            "{} WHERE template_id = $1 ORDER BY z_index ASC",
            SELECT_ELEMENTS
        );

        let rows = query_as::<_, ElementRow>(&sql)
            .bind(template_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CertificateElement::try_from).collect()
    }

    /// Returns the number of elements in a template.
    pub async fn count_elements(&self, template_id: TemplateId) -> Result<i64, ElementStoreError> {
        let count: i64 = query_scalar(
            "
            SELECT
                COUNT(id)
            FROM
                certificate_elements
            WHERE
                template_id = $1
            ",
        )
        .bind(template_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Returns the highest z-index in a template, `0` for a template without elements.
    pub async fn max_z_index(&self, template_id: TemplateId) -> Result<i32, ElementStoreError> {
        let mut conn = self.pool.acquire().await?;
        select_max_z_index(&mut conn, template_id).await
    }

    /// Creates an element of any kind.
    pub async fn create_element(
        &self,
        element: NewElementVariant,
    ) -> Result<Element, ElementStoreError> {
        let element = match element {
            NewElementVariant::Text(element) => {
                Element::Text(self.create_text_element(element).await?)
            }
            NewElementVariant::Date(element) => {
                Element::Date(self.create_date_element(element).await?)
            }
            NewElementVariant::Number(element) => {
                Element::Number(self.create_number_element(element).await?)
            }
            NewElementVariant::Country(element) => {
                Element::Country(self.create_country_element(element).await?)
            }
            NewElementVariant::Gender(element) => {
                Element::Gender(self.create_gender_element(element).await?)
            }
            NewElementVariant::Image(element) => {
                Element::Image(self.create_image_element(element).await?)
            }
            NewElementVariant::QrCode(element) => {
                Element::QrCode(self.create_qr_code_element(element).await?)
            }
        };

        Ok(element)
    }

    /// Updates an element of any kind.
    ///
    /// Errors with `Conflict` if the stored kind of the element differs from the kind of the
    /// update, nothing gets written in that case.
    pub async fn update_element(
        &self,
        id: ElementId,
        update: ElementVariantUpdate,
    ) -> Result<Element, ElementStoreError> {
        let element = match update {
            ElementVariantUpdate::Text(update) => {
                Element::Text(self.update_text_element(id, update).await?)
            }
            ElementVariantUpdate::Date(update) => {
                Element::Date(self.update_date_element(id, update).await?)
            }
            ElementVariantUpdate::Number(update) => {
                Element::Number(self.update_number_element(id, update).await?)
            }
            ElementVariantUpdate::Country(update) => {
                Element::Country(self.update_country_element(id, update).await?)
            }
            ElementVariantUpdate::Gender(update) => {
                Element::Gender(self.update_gender_element(id, update).await?)
            }
            ElementVariantUpdate::Image(update) => {
                Element::Image(self.update_image_element(id, update).await?)
            }
            ElementVariantUpdate::QrCode(update) => {
                Element::QrCode(self.update_qr_code_element(id, update).await?)
            }
        };

        Ok(element)
    }

    /// Deletes an element together with its variant row and owned text properties.
    ///
    /// Later siblings move down by one so the positions of the template stay dense. Returns
    /// `false` if the element did not exist.
    pub async fn delete_element(&self, id: ElementId) -> Result<bool, ElementStoreError> {
        let template_id = match self.find_element(id).await? {
            Some(element) => element.template_id,
            None => return Ok(false),
        };

        let mut tx = self.pool.begin().await?;
        lock_template(&mut tx, template_id).await?;

        // Read again after taking the lock, the element might have moved or vanished
        let element = match select_element(&mut tx, id).await? {
            Some(element) => element,
            None => return Ok(false),
        };

        let text_props_id: Option<i64> = if element.kind.has_text_props() {
            let sql = format!(
                "SELECT text_props_id FROM {} WHERE element_id = $1",
                element.kind.variant_table()
            );

            query_scalar(&sql)
                .bind(id)
                .fetch_optional(&mut tx)
                .await?
        } else {
            None
        };

        let sql = format!(
            "DELETE FROM {} WHERE element_id = $1",
            element.kind.variant_table()
        );
        query(&sql).bind(id).execute(&mut tx).await?;

        query(
            "
            DELETE FROM
                certificate_elements
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .execute(&mut tx)
        .await?;

        if let Some(text_props_id) = text_props_id {
            query(
                "
                DELETE FROM
                    element_text_props
                WHERE
                    id = $1
                ",
            )
            .bind(text_props_id)
            .execute(&mut tx)
            .await?;
        }

        // Close the gap, negated values keep the unique constraint satisfied while shifting
        query(
            "
            UPDATE
                certificate_elements
            SET
                z_index = -(z_index - 1)
            WHERE
                template_id = $1
                AND z_index > $2
            ",
        )
        .bind(template_id)
        .bind(element.z_index)
        .execute(&mut tx)
        .await?;

        restore_negated_z_indexes(&mut tx, template_id).await?;

        tx.commit().await?;

        self.observer.on_event(&StoreEvent::ElementDeleted {
            element_id: id,
            template_id,
        });

        Ok(true)
    }

    /// Checks the base fields of a new element and that its template exists.
    pub(crate) async fn validate_new_element(
        &self,
        element: &NewElement,
    ) -> Result<(), ElementStoreError> {
        if !self.template_exists(element.template_id).await? {
            return Err(ElementStoreError::NotFound(
                Resource::Template,
                element.template_id,
            ));
        }

        element.validate()
    }

    pub(crate) fn element_created(&self, element: &CertificateElement) {
        self.observer.on_event(&StoreEvent::ElementCreated {
            element_id: element.id,
            template_id: element.template_id,
            kind: element.kind,
        });
    }

    pub(crate) fn element_updated(&self, element: &CertificateElement) {
        self.observer.on_event(&StoreEvent::ElementUpdated {
            element_id: element.id,
            kind: element.kind,
        });
    }
}

/// Reads the base row of an element.
pub(crate) async fn select_element(
    conn: &mut AnyConnection,
    id: ElementId,
) -> Result<Option<CertificateElement>, ElementStoreError> {
    let sql = format!("{} WHERE id = $1", SELECT_ELEMENTS);

    let row = query_as::<_, ElementRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(CertificateElement::try_from).transpose()
}

pub(crate) async fn select_max_z_index(
    conn: &mut AnyConnection,
    template_id: TemplateId,
) -> Result<i32, ElementStoreError> {
    let max: Option<i32> = query_scalar(
        "
        SELECT
            MAX(z_index)
        FROM
            certificate_elements
        WHERE
            template_id = $1
        ",
    )
    .bind(template_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(max.unwrap_or(0))
}

/// Serializes writes touching the positions of a template until the transaction ends.
///
/// Errors with `NotFound` if the template does not exist.
pub(crate) async fn lock_template(
    conn: &mut AnyConnection,
    template_id: TemplateId,
) -> Result<(), ElementStoreError> {
    let result = query(
        "
        UPDATE
            templates
        SET
            name = name
        WHERE
            id = $1
        ",
    )
    .bind(template_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ElementStoreError::NotFound(
            Resource::Template,
            template_id,
        ));
    }

    Ok(())
}

/// Flips the temporarily negated z-indexes of a template back to positive values.
pub(crate) async fn restore_negated_z_indexes(
    conn: &mut AnyConnection,
    template_id: TemplateId,
) -> Result<(), ElementStoreError> {
    query(
        "
        UPDATE
            certificate_elements
        SET
            z_index = -z_index
        WHERE
            template_id = $1
            AND z_index < 0
        ",
    )
    .bind(template_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts the base row of a new element on top of all other elements of its template.
pub(crate) async fn insert_element_row(
    conn: &mut AnyConnection,
    kind: ElementKind,
    element: &NewElement,
) -> Result<CertificateElement, ElementStoreError> {
    lock_template(conn, element.template_id).await?;
    let z_index = select_max_z_index(conn, element.template_id).await? + 1;

    let sql = "
        INSERT INTO
            certificate_elements (
                template_id,
                kind,
                name,
                description,
                position_x,
                position_y,
                width,
                height,
                rotation,
                hidden,
                z_index
            )
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING
            id
        ";

    let id: ElementId = query_scalar(sql)
        .bind(element.template_id)
        .bind(kind.as_str())
        .bind(element.name.clone())
        .bind(element.description.clone())
        .bind(element.position_x)
        .bind(element.position_y)
        .bind(element.width)
        .bind(element.height)
        .bind(element.rotation)
        .bind(element.hidden)
        .bind(z_index)
        .fetch_one(&mut *conn)
        .await?;

    select_element(conn, id).await?.ok_or_else(|| {
        ElementStoreError::FatalStorageError(format!("Inserted element {} not found", id))
    })
}

/// Writes the mutable base fields of an element, position and kind are left untouched.
///
/// Returns the stored row, errors with `NotFound` if the element vanished in the meantime.
pub(crate) async fn update_element_row(
    conn: &mut AnyConnection,
    element: &CertificateElement,
) -> Result<CertificateElement, ElementStoreError> {
    let sql = "
        UPDATE
            certificate_elements
        SET
            name = $1,
            description = $2,
            position_x = $3,
            position_y = $4,
            width = $5,
            height = $6,
            rotation = $7,
            hidden = $8
        WHERE
            id = $9
        ";

    let result = query(sql)
        .bind(element.name.clone())
        .bind(element.description.clone())
        .bind(element.position_x)
        .bind(element.position_y)
        .bind(element.width)
        .bind(element.height)
        .bind(element.rotation)
        .bind(element.hidden)
        .bind(element.id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ElementStoreError::NotFound(Resource::Element, element.id));
    }

    select_element(conn, element.id)
        .await?
        .ok_or(ElementStoreError::NotFound(Resource::Element, element.id))
}
