// SPDX-License-Identifier: AGPL-3.0-or-later

use std::panic;

use futures::Future;
use rstest::fixture;
use tokio::runtime::Builder;

use crate::test_utils::{initialize_db, populate_test_db, TestDatabase};

#[async_trait::async_trait]
pub trait AsyncTestFn {
    async fn call(self, db: TestDatabase);
}

#[async_trait::async_trait]
impl<FN, F> AsyncTestFn for FN
where
    FN: FnOnce(TestDatabase) -> F + Sync + Send,
    F: Future<Output = ()> + Send,
{
    async fn call(self, db: TestDatabase) {
        self(db).await
    }
}

/// Runs tests against a freshly migrated and populated database.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestDatabaseRunner {
    no_of_elements: usize,
}

impl TestDatabaseRunner {
    pub fn new(no_of_elements: usize) -> Self {
        Self { no_of_elements }
    }

    /// Provides a safe way to write tests using a database which closes the pool connection
    /// automatically when the test succeeds or fails.
    ///
    /// Takes an (async) test function as an argument and passes over the `TestDatabase` instance
    /// so it can be used inside of it.
    pub fn with_db_teardown<F: AsyncTestFn + Send + Sync + 'static>(&self, test: F) {
        let _ = env_logger::builder().is_test(true).try_init();

        let runtime = Builder::new_current_thread()
            .enable_all()
            .thread_name("with_db_teardown")
            .build()
            .expect("Could not build tokio Runtime for test");

        runtime.block_on(async {
            // Initialise test database
            let pool = initialize_db().await;
            let mut db = TestDatabase::new(pool);

            // Populate the test db
            populate_test_db(&mut db, self.no_of_elements).await;

            // Get a handle of the underlying database connection pool
            let pool = db.store.pool.clone();

            // Spawn the test in a separate task to make sure we have control over the possible
            // panics which might happen inside of it
            let handle = tokio::task::spawn(async move {
                test.call(db).await;
            });

            let result = handle.await;

            // Unwind the test by closing down the connection to the database pool. This will
            // be reached even when the test panicked
            pool.close().await;

            // Panic here when test failed. The test fails within its own async task and stays
            // there, we need to propagate it further to inform the test runtime about the result
            if let Err(err) = result {
                panic::resume_unwind(err.into_panic());
            }
        });
    }
}

/// Fixture for constructing a store backed by a pre-populated database.
///
/// Returns a `TestDatabaseRunner` that bootstraps a safe async test environment connecting to a
/// database. It makes sure the runner disconnects properly from the connection pool after the test
/// succeeded or even failed.
///
/// The database holds one template with a text, a date and a number variable, a registered image
/// file, a self-hosted font and the given number of elements.
#[fixture]
pub fn test_db(
    // Number of elements in the template, kinds cycle through all element kinds
    #[default(0)] no_of_elements: usize,
) -> TestDatabaseRunner {
    TestDatabaseRunner::new(no_of_elements)
}
