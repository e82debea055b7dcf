// SPDX-License-Identifier: AGPL-3.0-or-later

use std::convert::TryFrom;

use sqlx::{query, query_as};

use crate::db::errors::{ElementStoreError, Resource};
use crate::db::models::ElementRow;
use crate::db::stores::element::{
    lock_template, restore_negated_z_indexes, select_element, select_max_z_index,
    SELECT_ELEMENTS,
};
use crate::db::types::{CertificateElement, ElementId};
use crate::db::SqlStore;
use crate::observer::StoreEvent;

/// Methods maintaining the dense, 1-based z-index sequence of every template.
impl SqlStore {
    /// Moves an element to a new position inside its template.
    ///
    /// Siblings between the old and the new position shift by one towards the old position.
    /// All writes happen in one transaction which also holds the template lock, concurrent moves
    /// inside the same template wait for each other.
    ///
    /// Returns every element which was touched ordered by its new z-index, an empty list if the
    /// element already sits at the requested position. Errors with `Validation` if the position
    /// lies outside of `1..=max`, nothing is written in that case.
    pub async fn move_element(
        &self,
        id: ElementId,
        new_z_index: i32,
    ) -> Result<Vec<CertificateElement>, ElementStoreError> {
        let template_id = self.get_element(id).await?.template_id;

        let mut tx = self.pool.begin().await?;
        lock_template(&mut tx, template_id).await?;

        let element = select_element(&mut tx, id)
            .await?
            .ok_or(ElementStoreError::NotFound(Resource::Element, id))?;
        let max_z_index = select_max_z_index(&mut tx, template_id).await?;

        if new_z_index < 1 || new_z_index > max_z_index {
            return Err(ElementStoreError::Validation(format!(
                "Z-index {} is out of range, template {} has positions 1 to {}",
                new_z_index, template_id, max_z_index
            )));
        }

        let old_z_index = element.z_index;
        if old_z_index == new_z_index {
            return Ok(Vec::new());
        }

        // Park the moved element on 0, a position no sibling can hold
        query(
            "
            UPDATE
                certificate_elements
            SET
                z_index = 0
            WHERE
                id = $1
            ",
        )
        .bind(id)
        .execute(&mut tx)
        .await?;

        // Shifted siblings pass through negative values so that no statement ever sees two rows
        // on the same position
        let (shift, low, high) = if old_z_index < new_z_index {
            ("-(z_index - 1)", old_z_index + 1, new_z_index)
        } else {
            ("-(z_index + 1)", new_z_index, old_z_index - 1)
        };

        let sql = format!(
            "
            UPDATE
                certificate_elements
            SET
                z_index = {}
            WHERE
                template_id = $1
                AND z_index >= $2
                AND z_index <= $3
            ",
            shift
        );

        query(&sql)
            .bind(template_id)
            .bind(low)
            .bind(high)
            .execute(&mut tx)
            .await?;

        restore_negated_z_indexes(&mut tx, template_id).await?;

        query(
            "
            UPDATE
                certificate_elements
            SET
                z_index = $1
            WHERE
                id = $2
            ",
        )
        .bind(new_z_index)
        .bind(id)
        .execute(&mut tx)
        .await?;

        let sql = format!(
            "
            {}
            WHERE
                template_id = $1
                AND z_index >= $2
                AND z_index <= $3
            ORDER BY
                z_index ASC
            ",
            SELECT_ELEMENTS
        );

        let rows = query_as::<_, ElementRow>(&sql)
            .bind(template_id)
            .bind(old_z_index.min(new_z_index))
            .bind(old_z_index.max(new_z_index))
            .fetch_all(&mut tx)
            .await?;

        let touched = rows
            .into_iter()
            .map(CertificateElement::try_from)
            .collect::<Result<Vec<CertificateElement>, ElementStoreError>>()?;

        tx.commit().await?;

        self.observer.on_event(&StoreEvent::ElementsReordered {
            template_id,
            element_ids: touched.iter().map(|element| element.id).collect(),
        });

        Ok(touched)
    }

    /// Moves an element one position up in the stacking order.
    ///
    /// Does nothing if the element is already on top.
    pub async fn increase_element_order(
        &self,
        id: ElementId,
    ) -> Result<Vec<CertificateElement>, ElementStoreError> {
        let element = self.get_element(id).await?;
        let max_z_index = self.max_z_index(element.template_id).await?;

        if element.z_index >= max_z_index {
            return Ok(Vec::new());
        }

        self.move_element(id, element.z_index + 1).await
    }

    /// Moves an element one position down in the stacking order.
    ///
    /// Does nothing if the element is already at the bottom.
    pub async fn decrease_element_order(
        &self,
        id: ElementId,
    ) -> Result<Vec<CertificateElement>, ElementStoreError> {
        let element = self.get_element(id).await?;

        if element.z_index <= 1 {
            return Ok(Vec::new());
        }

        self.move_element(id, element.z_index - 1).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::db::errors::ElementStoreError;
    use crate::db::types::{CertificateElement, ElementId};
    use crate::observer::StoreEvent;
    use crate::test_utils::{test_db, TestDatabase, TestDatabaseRunner};

    /// Element ids of a template ordered by z-index.
    async fn ordered_ids(db: &TestDatabase) -> Vec<ElementId> {
        db.store
            .find_elements_by_template_id(db.test_data.template_id)
            .await
            .unwrap()
            .into_iter()
            .map(|element| element.id)
            .collect()
    }

    fn ids(elements: &[CertificateElement]) -> Vec<ElementId> {
        elements.iter().map(|element| element.id).collect()
    }

    #[rstest]
    fn moves_element_later(
        #[from(test_db)]
        #[with(5)]
        runner: TestDatabaseRunner,
    ) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let e = db.test_data.elements.clone();

            let touched = db.store.move_element(e[1], 5).await.unwrap();

            assert_eq!(ordered_ids(&db).await, vec![e[0], e[2], e[3], e[4], e[1]]);
            assert_eq!(ids(&touched), vec![e[2], e[3], e[4], e[1]]);
            assert_eq!(
                touched.iter().map(|element| element.z_index).collect::<Vec<i32>>(),
                vec![2, 3, 4, 5]
            );
            assert_eq!(
                db.observer.take(),
                vec![StoreEvent::ElementsReordered {
                    template_id: db.test_data.template_id,
                    element_ids: vec![e[2], e[3], e[4], e[1]],
                }]
            );
        });
    }

    #[rstest]
    fn moves_element_earlier(
        #[from(test_db)]
        #[with(5)]
        runner: TestDatabaseRunner,
    ) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let e = db.test_data.elements.clone();

            let touched = db.store.move_element(e[4], 2).await.unwrap();

            assert_eq!(ordered_ids(&db).await, vec![e[0], e[4], e[1], e[2], e[3]]);
            assert_eq!(ids(&touched), vec![e[4], e[1], e[2], e[3]]);
        });
    }

    #[rstest]
    fn move_to_same_position_is_noop(
        #[from(test_db)]
        #[with(3)]
        runner: TestDatabaseRunner,
    ) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let e = db.test_data.elements.clone();

            let touched = db.store.move_element(e[1], 2).await.unwrap();

            assert!(touched.is_empty());
            assert_eq!(ordered_ids(&db).await, e);
            assert!(db.observer.take().is_empty());
        });
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-3)]
    fn rejects_positions_out_of_range(
        #[case] z_index: i32,
        #[from(test_db)]
        #[with(5)]
        runner: TestDatabaseRunner,
    ) {
        runner.with_db_teardown(move |db: TestDatabase| async move {
            let e = db.test_data.elements.clone();

            let result = db.store.move_element(e[2], z_index).await;

            assert!(matches!(result, Err(ElementStoreError::Validation(_))));
            assert_eq!(ordered_ids(&db).await, e);

            let positions: Vec<i32> = db
                .store
                .find_elements_by_template_id(db.test_data.template_id)
                .await
                .unwrap()
                .iter()
                .map(|element| element.z_index)
                .collect();
            assert_eq!(positions, vec![1, 2, 3, 4, 5]);
        });
    }

    #[rstest]
    fn moving_missing_element_fails(#[from(test_db)] runner: TestDatabaseRunner) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            assert!(matches!(
                db.store.move_element(999, 1).await,
                Err(ElementStoreError::NotFound(_, 999))
            ));
        });
    }

    #[rstest]
    fn increase_and_decrease_stop_at_the_boundaries(
        #[from(test_db)]
        #[with(3)]
        runner: TestDatabaseRunner,
    ) {
        runner.with_db_teardown(|db: TestDatabase| async move {
            let e = db.test_data.elements.clone();

            assert!(db.store.decrease_element_order(e[0]).await.unwrap().is_empty());
            assert!(db.store.increase_element_order(e[2]).await.unwrap().is_empty());
            assert_eq!(ordered_ids(&db).await, e);

            let touched = db.store.increase_element_order(e[0]).await.unwrap();
            assert_eq!(ids(&touched), vec![e[1], e[0]]);
            assert_eq!(ordered_ids(&db).await, vec![e[1], e[0], e[2]]);

            let touched = db.store.decrease_element_order(e[2]).await.unwrap();
            assert_eq!(ids(&touched), vec![e[2], e[0]]);
            assert_eq!(ordered_ids(&db).await, vec![e[1], e[2], e[0]]);
        });
    }
}
