// SPDX-License-Identifier: AGPL-3.0-or-later

use std::convert::TryFrom;

use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar};

use crate::db::errors::ElementStoreError;
use crate::db::models::TemplateVariableRow;
use crate::db::traits::TemplateProvider;
use crate::db::types::{TemplateId, TemplateVariable, VariableId, VariableType};
use crate::db::SqlStore;
use crate::observer::StoreEvent;

/// Methods to interact with the `templates` and `template_variables` tables in the database.
impl SqlStore {
    /// Inserts a new template and returns its id.
    pub async fn insert_template(&self, name: &str) -> Result<TemplateId, ElementStoreError> {
        let id: i64 = query_scalar(
            "
            INSERT INTO
                templates (name)
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

    /// Deletes a template with all of its elements, variables and owned text properties.
    ///
    /// Returns `false` if the template did not exist.
    pub async fn delete_template(&self, id: TemplateId) -> Result<bool, ElementStoreError> {
        let mut tx = self.pool.begin().await?;

        // Text properties are referenced by the variant rows, not the other way around, so the
        // cascade does not reach them. Collect them before their owners are gone
        let text_props_ids: Vec<i64> = query_scalar(
            "
            SELECT text_props_id FROM text_elements
                JOIN certificate_elements ON certificate_elements.id = text_elements.element_id
                WHERE certificate_elements.template_id = $1
            UNION
            SELECT text_props_id FROM date_elements
                JOIN certificate_elements ON certificate_elements.id = date_elements.element_id
                WHERE certificate_elements.template_id = $1
            UNION
            SELECT text_props_id FROM number_elements
                JOIN certificate_elements ON certificate_elements.id = number_elements.element_id
                WHERE certificate_elements.template_id = $1
            UNION
            SELECT text_props_id FROM country_elements
                JOIN certificate_elements ON certificate_elements.id = country_elements.element_id
                WHERE certificate_elements.template_id = $1
            UNION
            SELECT text_props_id FROM gender_elements
                JOIN certificate_elements ON certificate_elements.id = gender_elements.element_id
                WHERE certificate_elements.template_id = $1
            ",
        )
        .bind(id)
        .fetch_all(&mut tx)
        .await?;

        // Variant rows reference template variables, remove them together with their elements
        // before the variables cascade away
        for table in ["date_elements", "number_elements"] {
            let sql = format!(
                "
                DELETE FROM
                    {table}
                WHERE
                    element_id IN (
                        SELECT id FROM certificate_elements WHERE template_id = $1
                    )
                ",
                table = table
            );

            query(&sql).bind(id).execute(&mut tx).await?;
        }

        let result = query(
            "
            DELETE FROM
                templates
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .execute(&mut tx)
        .await?;

        for text_props_id in text_props_ids {
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

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.observer
                .on_event(&StoreEvent::TemplateDeleted { template_id: id });
        }

        Ok(deleted)
    }

    /// Inserts a variable into a template.
    pub async fn insert_template_variable(
        &self,
        template_id: TemplateId,
        name: &str,
        variable_type: VariableType,
    ) -> Result<TemplateVariable, ElementStoreError> {
        let row = query_as::<_, TemplateVariableRow>(
            "
            INSERT INTO
                template_variables (
                    template_id,
                    name,
                    variable_type
                )
            VALUES
                ($1, $2, $3)
            RETURNING
                id,
                template_id,
                name,
                variable_type
            ",
        )
        .bind(template_id)
        .bind(name)
        .bind(variable_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        TemplateVariable::try_from(row)
    }

    pub async fn get_template_variable(
        &self,
        id: VariableId,
    ) -> Result<Option<TemplateVariable>, ElementStoreError> {
        let row = query_as::<_, TemplateVariableRow>(
            "
            SELECT
                id,
                template_id,
                name,
                variable_type
            FROM
                template_variables
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TemplateVariable::try_from).transpose()
    }
}

#[async_trait]
impl TemplateProvider for SqlStore {
    async fn template_exists(&self, id: TemplateId) -> Result<bool, ElementStoreError> {
        let result: Option<i64> = query_scalar(
            "
            SELECT
                id
            FROM
                templates
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
