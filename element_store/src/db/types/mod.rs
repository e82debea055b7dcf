// SPDX-License-Identifier: AGPL-3.0-or-later

//! Typed representations of the data held by the element store.
//!
//! Rows coming from the database are converted into these types, tagged unions which are stored
//! across several nullable columns or as JSON text are reconstructed here. Input types carry the
//! values needed to create a row, update types describe a patch.

/// Implements the string conversions used to store fieldless enums in `TEXT` columns.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $name {
            /// Returns the representation used in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::db::errors::ElementStoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(crate::db::errors::ElementStoreError::FatalStorageError(format!(
                        "Unknown {} '{}' found in database",
                        stringify!($name),
                        s
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

mod data_source;
mod element;
mod patch;
mod reference;
mod text_props;
mod variants;

pub use data_source::{
    CertificateDateField, CertificateTextField, CountryDataSource, DateDataSource,
    ImageDataSource, NumberDataSource, QrCodeDataSource, StudentDateField, StudentTextField,
    TextDataSource,
};
pub use element::{CertificateElement, ElementKind, ElementUpdate, NewElement};
pub use patch::Patch;
pub(crate) use patch::{patch_nullable, patch_required};
pub use reference::{FontVariant, StorageFile, TemplateVariable, VariableType};
pub(crate) use text_props::validate_color;
pub use text_props::{
    FontReference, NewTextProps, TextAlignment, TextOverflow, TextProps, TextPropsUpdate,
};
pub use variants::{
    CalendarType, CountryElement, CountryElementUpdate, CountryRepresentation, DateElement,
    DateElementUpdate, DateTransformation, Element, ElementVariantUpdate, ErrorCorrectionLevel,
    GenderElement, GenderElementUpdate, ImageElement, ImageElementUpdate, ImageFit,
    NewCountryElement, NewDateElement, NewElementVariant, NewGenderElement, NewImageElement,
    NewNumberElement, NewQrCodeElement, NewTextElement, NumberElement, NumberElementUpdate,
    QrCodeElement, QrCodeElementUpdate, TextElement, TextElementUpdate,
};

/// Surrogate key of a row in the base element table.
pub type ElementId = i64;

/// Key of the template owning an element.
pub type TemplateId = i64;

/// Key of a text properties row.
pub type TextPropsId = i64;

/// Key of a template variable.
pub type VariableId = i64;

/// Key of a font family.
pub type FontId = i64;

/// Key of a single style of a font family.
pub type FontVariantId = i64;

/// Key of a file registered in blob storage.
pub type StorageFileId = i64;
