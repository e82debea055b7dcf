// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Representation of a row from the `element_text_props` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct TextPropsRow {
    pub id: i64,

    /// Either `SELF_HOSTED` or `GOOGLE`, selects which of the following three columns are set.
    pub font_kind: String,

    pub font_variant_id: Option<i64>,

    pub google_font_family: Option<String>,

    pub google_font_variant: Option<String>,

    pub font_size: i32,

    pub color: String,

    pub alignment: String,

    pub overflow: String,

    pub line_height: Option<f64>,

    pub letter_spacing: Option<f64>,
}
