// SPDX-License-Identifier: AGPL-3.0-or-later

//! Structs representing rows in SQL tables. Needed when coercing results returned from a
//! query using the `sqlx` library.
mod element;
mod reference;
mod text_props;
mod variants;

pub use element::ElementRow;
pub use reference::{FontVariantRow, StorageFileRow, TemplateVariableRow};
pub use text_props::TextPropsRow;
pub use variants::{
    CountryElementRow, DateElementRow, GenderElementRow, ImageElementRow, NumberElementRow,
    QrCodeElementRow, TextElementRow, VariantRow,
};
