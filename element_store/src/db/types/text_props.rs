// SPDX-License-Identifier: AGPL-3.0-or-later

use std::convert::TryFrom;

use crate::db::errors::ElementStoreError;
use crate::db::models::TextPropsRow;
use crate::db::types::{patch_nullable, patch_required, FontVariantId, Patch, TextPropsId};

const FONT_KIND_SELF_HOSTED: &str = "SELF_HOSTED";

const FONT_KIND_GOOGLE: &str = "GOOGLE";

/// Font used to render text, either uploaded to this service or served by Google Fonts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontReference {
    SelfHosted { font_variant_id: FontVariantId },
    Google { family: String, variant: String },
}

impl FontReference {
    /// Splits the union into the discriminant and the three nullable columns it is stored in.
    pub(crate) fn to_columns(
        &self,
    ) -> (
        &'static str,
        Option<FontVariantId>,
        Option<String>,
        Option<String>,
    ) {
        match self {
            FontReference::SelfHosted { font_variant_id } => {
                (FONT_KIND_SELF_HOSTED, Some(*font_variant_id), None, None)
            }
            FontReference::Google { family, variant } => (
                FONT_KIND_GOOGLE,
                None,
                Some(family.clone()),
                Some(variant.clone()),
            ),
        }
    }

    /// Reassembles the union, only the columns of the stored branch may be set.
    pub(crate) fn from_columns(
        font_kind: &str,
        font_variant_id: Option<FontVariantId>,
        family: Option<String>,
        variant: Option<String>,
    ) -> Result<Self, ElementStoreError> {
        match (font_kind, font_variant_id, family, variant) {
            (FONT_KIND_SELF_HOSTED, Some(font_variant_id), None, None) => {
                Ok(FontReference::SelfHosted { font_variant_id })
            }
            (FONT_KIND_GOOGLE, None, Some(family), Some(variant)) => {
                Ok(FontReference::Google { family, variant })
            }
            (font_kind, ..) => Err(ElementStoreError::FatalStorageError(format!(
                "Inconsistent font reference of kind '{}' found in database",
                font_kind
            ))),
        }
    }
}

/// Horizontal alignment of text inside the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Start,
    Center,
    End,
    Justify,
}

string_enum!(TextAlignment {
    Start => "START",
    Center => "CENTER",
    End => "END",
    Justify => "JUSTIFY",
});

/// What happens with text which does not fit the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOverflow {
    ResizeDown,
    Truncate,
    Ellipse,
    Wrap,
}

string_enum!(TextOverflow {
    ResizeDown => "RESIZE_DOWN",
    Truncate => "TRUNCATE",
    Ellipse => "ELLIPSE",
    Wrap => "WRAP",
});

/// Typography settings owned by exactly one text-bearing element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub id: TextPropsId,
    pub font: FontReference,
    pub font_size: i32,
    pub color: String,
    pub alignment: TextAlignment,
    pub overflow: TextOverflow,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
}

impl TextProps {
    pub(crate) fn from_new(id: TextPropsId, props: NewTextProps) -> Self {
        Self {
            id,
            font: props.font,
            font_size: props.font_size,
            color: props.color,
            alignment: props.alignment,
            overflow: props.overflow,
            line_height: props.line_height,
            letter_spacing: props.letter_spacing,
        }
    }

    /// Returns the values of these props without their id.
    pub(crate) fn to_new(&self) -> NewTextProps {
        NewTextProps {
            font: self.font.clone(),
            font_size: self.font_size,
            color: self.color.clone(),
            alignment: self.alignment,
            overflow: self.overflow,
            line_height: self.line_height,
            letter_spacing: self.letter_spacing,
        }
    }
}

impl TryFrom<TextPropsRow> for TextProps {
    type Error = ElementStoreError;

    fn try_from(row: TextPropsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            font: FontReference::from_columns(
                &row.font_kind,
                row.font_variant_id,
                row.google_font_family,
                row.google_font_variant,
            )?,
            font_size: row.font_size,
            color: row.color,
            alignment: row.alignment.parse()?,
            overflow: row.overflow.parse()?,
            line_height: row.line_height,
            letter_spacing: row.letter_spacing,
        })
    }
}

/// Typography settings for a text-bearing element which is about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTextProps {
    pub font: FontReference,
    pub font_size: i32,
    pub color: String,
    pub alignment: TextAlignment,
    pub overflow: TextOverflow,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
}

impl NewTextProps {
    /// Checks the field constraints which do not need a database lookup.
    pub(crate) fn validate(&self) -> Result<(), ElementStoreError> {
        if self.font_size <= 0 {
            return Err(ElementStoreError::Validation(format!(
                "Font size must be positive, got {}",
                self.font_size
            )));
        }

        validate_color("color", &self.color)?;

        if let Some(line_height) = self.line_height {
            if !line_height.is_finite() || line_height <= 0.0 {
                return Err(ElementStoreError::Validation(
                    "Line height must be a positive number".into(),
                ));
            }
        }

        if let Some(letter_spacing) = self.letter_spacing {
            if !letter_spacing.is_finite() {
                return Err(ElementStoreError::Validation(
                    "Letter spacing must be a finite number".into(),
                ));
            }
        }

        if let FontReference::Google { family, variant } = &self.font {
            if family.trim().is_empty() || variant.trim().is_empty() {
                return Err(ElementStoreError::Validation(
                    "Google font family and variant can not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Patch for text properties.
///
/// The font reference is always replaced as a whole, its stored columns are derived again from
/// the resulting union.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPropsUpdate {
    pub font: Patch<FontReference>,
    pub font_size: Patch<i32>,
    pub color: Patch<String>,
    pub alignment: Patch<TextAlignment>,
    pub overflow: Patch<TextOverflow>,
    pub line_height: Patch<f64>,
    pub letter_spacing: Patch<f64>,
}

impl TextPropsUpdate {
    /// Returns the values of the given props with this patch applied.
    pub(crate) fn apply(self, current: &TextProps) -> Result<NewTextProps, ElementStoreError> {
        let props = NewTextProps {
            font: patch_required("font", self.font, current.font.clone())?,
            font_size: patch_required("font_size", self.font_size, current.font_size)?,
            color: patch_required("color", self.color, current.color.clone())?,
            alignment: patch_required("alignment", self.alignment, current.alignment)?,
            overflow: patch_required("overflow", self.overflow, current.overflow)?,
            line_height: patch_nullable(self.line_height, current.line_height),
            letter_spacing: patch_nullable(self.letter_spacing, current.letter_spacing),
        };

        props.validate()?;
        Ok(props)
    }
}

/// Checks for a `#rrggbb` or `#rrggbbaa` hex color.
pub(crate) fn validate_color(field: &str, color: &str) -> Result<(), ElementStoreError> {
    let valid = color.len() == 7 || color.len() == 9;
    let valid = valid
        && color.starts_with('#')
        && color[1..].chars().all(|char| char.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ElementStoreError::Validation(format!(
            "Invalid {} '{}', expected a hex color like #1a2b3c",
            field, color
        )))
    }
}
