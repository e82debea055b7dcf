// SPDX-License-Identifier: AGPL-3.0-or-later

mod config;
mod db;
mod helpers;
mod observer;
mod runner;

pub use config::{TestConfiguration, TEST_CONFIG};
pub use db::{drop_database, initialize_db, populate_test_db, TestData, TestDatabase};
pub use helpers::{
    certificate_element, google_text_props, new_country_element, new_date_element, new_element,
    new_element_variant, new_gender_element, new_image_element, new_number_element,
    new_qr_code_element, new_text_element, text_props,
};
pub use observer::RecordingObserver;
pub use runner::{test_db, TestDatabaseRunner};
