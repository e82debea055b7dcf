// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Representation of a row from the `certificate_elements` table as stored in the database.
///
/// This table holds the fields every element kind shares, the kind specific fields are stored in
/// one variant table per kind.
#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct ElementRow {
    /// Surrogate key of the element.
    pub id: i64,

    /// Template this element belongs to.
    pub template_id: i64,

    /// Discriminant naming the variant table holding the rest of this element.
    pub kind: String,

    pub name: String,

    pub description: Option<String>,

    pub position_x: i32,

    pub position_y: i32,

    pub width: i32,

    pub height: i32,

    pub rotation: f64,

    pub hidden: bool,

    /// Position of the element inside its template.
    pub z_index: i32,
}
