// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use sqlx::migrate::MigrateDatabase;
use sqlx::Any;

use crate::db::types::{
    ElementId, ElementKind, FontId, FontVariantId, StorageFileId, TemplateId, VariableId,
    VariableType,
};
use crate::db::{connection_pool, create_database, run_pending_migrations, Pool, SqlStore};
use crate::storage::MemoryStorage;
use crate::test_utils::{new_element_variant, RecordingObserver, TEST_CONFIG};

/// Path of the image file registered in every test database.
pub const TEST_IMAGE_PATH: &str = "images/logo.png";

/// Path of the font file backing the self-hosted font of every test database.
pub const TEST_FONT_PATH: &str = "fonts/amiri-regular.ttf";

/// Create test database.
pub async fn initialize_db() -> Pool {
    initialize_db_with_url(&TEST_CONFIG.database_url).await
}

/// Create test database.
pub async fn initialize_db_with_url(url: &str) -> Pool {
    // Reset database first
    drop_database().await;
    create_database(url).await.unwrap();

    // Create connection pool and run all migrations
    let pool = connection_pool(url, TEST_CONFIG.database_max_connections)
        .await
        .unwrap();
    if let Err(err) = run_pending_migrations(&pool).await {
        pool.close().await;
        panic!("Could not migrate test database: {}", err);
    }

    pool
}

// Delete test database
pub async fn drop_database() {
    if Any::database_exists(&TEST_CONFIG.database_url)
        .await
        .unwrap()
    {
        Any::drop_database(&TEST_CONFIG.database_url).await.unwrap();
    }
}

/// Container for `SqlStore` with access to the in-memory storage, the recorded events and the
/// ids of rows inserted when pre-populating the database.
#[derive(Debug)]
pub struct TestDatabase {
    pub store: SqlStore,
    pub storage: Arc<MemoryStorage>,
    pub observer: Arc<RecordingObserver>,
    pub test_data: TestData,
}

impl TestDatabase {
    pub fn new(pool: Pool) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let observer = Arc::new(RecordingObserver::default());
        let store = SqlStore::new(pool, storage.clone()).with_observer(observer.clone());

        TestDatabase {
            store,
            storage,
            observer,
            test_data: TestData::default(),
        }
    }
}

/// Data collected when populating a `TestDatabase` in order to easily check values which
/// would be otherwise hard or impossible to get through the store methods.
#[derive(Debug, Default, Clone)]
pub struct TestData {
    pub template_id: TemplateId,

    /// Elements of the template in stacking order.
    pub elements: Vec<ElementId>,
    pub storage_file_id: StorageFileId,
    pub font_id: FontId,
    pub font_variant_id: FontVariantId,
    pub text_variable_id: VariableId,
    pub date_variable_id: VariableId,
    pub number_variable_id: VariableId,
}

/// Inserts a template with its variables, a registered image, a self-hosted font and the given
/// number of elements.
///
/// Element kinds cycle through `ElementKind::ALL`, events emitted while populating are dropped.
pub async fn populate_test_db(db: &mut TestDatabase, no_of_elements: usize) {
    let store = &db.store;

    db.storage.insert(TEST_IMAGE_PATH).unwrap();
    db.storage.insert(TEST_FONT_PATH).unwrap();

    let template_id = store.insert_template("Certificate of Completion").await.unwrap();
    let image = store.insert_storage_file(TEST_IMAGE_PATH).await.unwrap();
    let font_file = store.insert_storage_file(TEST_FONT_PATH).await.unwrap();
    let font_id = store.insert_font("Amiri").await.unwrap();
    let font_variant = store
        .insert_font_variant(font_id, "regular", font_file.id)
        .await
        .unwrap();

    let mut variables = Vec::new();
    for (name, variable_type) in [
        ("Course", VariableType::Text),
        ("Graduation date", VariableType::Date),
        ("Final grade", VariableType::Number),
    ] {
        let variable = store
            .insert_template_variable(template_id, name, variable_type)
            .await
            .unwrap();
        variables.push(variable.id);
    }

    db.test_data = TestData {
        template_id,
        elements: Vec::new(),
        storage_file_id: image.id,
        font_id,
        font_variant_id: font_variant.id,
        text_variable_id: variables[0],
        date_variable_id: variables[1],
        number_variable_id: variables[2],
    };

    for index in 0..no_of_elements {
        let kind = ElementKind::ALL[index % ElementKind::ALL.len()];
        let element = store
            .create_element(new_element_variant(kind, &db.test_data))
            .await
            .unwrap();
        db.test_data.elements.push(element.id());
    }

    db.observer.take();
}
