// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Columns every variant table shares.
pub trait VariantRow {
    /// Id of the base element this row belongs to.
    fn element_id(&self) -> i64;

    /// Id of the owned text properties, `None` for kinds without text.
    fn text_props_id(&self) -> Option<i64> {
        None
    }
}

/// Representation of a row from the `text_elements` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct TextElementRow {
    pub element_id: i64,

    pub text_props_id: i64,

    /// JSON encoded data source.
    pub data_source: String,
}

/// Representation of a row from the `date_elements` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct DateElementRow {
    pub element_id: i64,

    pub text_props_id: i64,

    /// JSON encoded data source.
    pub data_source: String,

    /// Mirror of the template variable referenced by the data source.
    pub variable_id: Option<i64>,

    pub calendar_type: String,

    pub offset_in_days: i32,

    pub format: String,

    pub transformation: Option<String>,
}

/// Representation of a row from the `number_elements` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct NumberElementRow {
    pub element_id: i64,

    pub text_props_id: i64,

    /// JSON encoded data source.
    pub data_source: String,

    /// Mirror of the template variable referenced by the data source.
    pub variable_id: Option<i64>,

    /// JSON encoded object mapping digits to their display glyphs.
    pub mapping: String,

    pub decimal_places: i32,
}

/// Representation of a row from the `country_elements` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct CountryElementRow {
    pub element_id: i64,

    pub text_props_id: i64,

    /// JSON encoded data source.
    pub data_source: String,

    pub representation: String,
}

/// Representation of a row from the `gender_elements` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct GenderElementRow {
    pub element_id: i64,

    pub text_props_id: i64,
}

/// Representation of a row from the `image_elements` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ImageElementRow {
    pub element_id: i64,

    /// JSON encoded data source.
    pub data_source: String,

    /// Mirror of the storage file referenced by the data source.
    pub storage_file_id: i64,

    pub fit: String,
}

/// Representation of a row from the `qr_code_elements` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct QrCodeElementRow {
    pub element_id: i64,

    /// JSON encoded data source.
    pub data_source: String,

    pub error_correction: String,

    pub foreground_color: String,

    pub background_color: String,
}

macro_rules! impl_variant_row {
    ($($row:ident),+ $(,)?) => {
        $(
            impl VariantRow for $row {
                fn element_id(&self) -> i64 {
                    self.element_id
                }

                fn text_props_id(&self) -> Option<i64> {
                    Some(self.text_props_id)
                }
            }
        )+
    };
}

impl_variant_row!(
    TextElementRow,
    DateElementRow,
    NumberElementRow,
    CountryElementRow,
    GenderElementRow,
);

impl VariantRow for ImageElementRow {
    fn element_id(&self) -> i64 {
        self.element_id
    }
}

impl VariantRow for QrCodeElementRow {
    fn element_id(&self) -> i64 {
        self.element_id
    }
}
