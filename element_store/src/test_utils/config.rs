// SPDX-License-Identifier: AGPL-3.0-or-later

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Configuration used in test helper methods.
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct TestConfiguration {
    /// Database url (SQLite or PostgreSQL).
    pub database_url: String,

    /// Connections kept by the pool of every test database.
    pub database_max_connections: u32,
}

impl TestConfiguration {
    /// Reads the configuration from `DATABASE_URL` and friends, falling back to defaults.
    pub fn new() -> Self {
        envy::from_env::<TestConfiguration>()
            .expect("Could not read environment variables for test configuration")
    }
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            // Every pool connecting to this url gets its own database in memory
            database_url: "sqlite::memory:".into(),
            database_max_connections: 8,
        }
    }
}

pub static TEST_CONFIG: Lazy<TestConfiguration> = Lazy::new(TestConfiguration::new);
