// SPDX-License-Identifier: AGPL-3.0-or-later

use std::convert::TryFrom;

use crate::db::errors::ElementStoreError;
use crate::db::models::ElementRow;
use crate::db::types::{patch_nullable, patch_required, ElementId, Patch, TemplateId};

/// Discriminant selecting which of the seven element shapes an element has.
///
/// Set when the element is created and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Date,
    Number,
    Country,
    Gender,
    Image,
    QrCode,
}

string_enum!(ElementKind {
    Text => "TEXT",
    Date => "DATE",
    Number => "NUMBER",
    Country => "COUNTRY",
    Gender => "GENDER",
    Image => "IMAGE",
    QrCode => "QR_CODE",
});

impl ElementKind {
    /// Every element kind, in the order their variant tables are queried.
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Text,
        ElementKind::Date,
        ElementKind::Number,
        ElementKind::Country,
        ElementKind::Gender,
        ElementKind::Image,
        ElementKind::QrCode,
    ];

    /// Name of the table holding the kind specific columns.
    pub(crate) fn variant_table(&self) -> &'static str {
        match self {
            ElementKind::Text => "text_elements",
            ElementKind::Date => "date_elements",
            ElementKind::Number => "number_elements",
            ElementKind::Country => "country_elements",
            ElementKind::Gender => "gender_elements",
            ElementKind::Image => "image_elements",
            ElementKind::QrCode => "qr_code_elements",
        }
    }

    /// Returns `true` if elements of this kind own a text properties row.
    pub fn has_text_props(&self) -> bool {
        !matches!(self, ElementKind::Image | ElementKind::QrCode)
    }
}

/// Fields shared by all element kinds, as stored in the base element table.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateElement {
    pub id: ElementId,
    pub template_id: TemplateId,
    pub kind: ElementKind,
    pub name: String,
    pub description: Option<String>,
    pub position_x: i32,
    pub position_y: i32,
    pub width: i32,
    pub height: i32,

    /// Rotation in degrees.
    pub rotation: f64,
    pub hidden: bool,

    /// 1-based position inside the template, defines stacking and list order.
    pub z_index: i32,
}

impl TryFrom<ElementRow> for CertificateElement {
    type Error = ElementStoreError;

    fn try_from(row: ElementRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|_| ElementStoreError::UnsupportedKind(row.id, row.kind.clone()))?;

        Ok(Self {
            id: row.id,
            template_id: row.template_id,
            kind,
            name: row.name,
            description: row.description,
            position_x: row.position_x,
            position_y: row.position_y,
            width: row.width,
            height: row.height,
            rotation: row.rotation,
            hidden: row.hidden,
            z_index: row.z_index,
        })
    }
}

/// Base fields of an element which is about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewElement {
    pub template_id: TemplateId,
    pub name: String,
    pub description: Option<String>,
    pub position_x: i32,
    pub position_y: i32,
    pub width: i32,
    pub height: i32,
    pub rotation: f64,
    pub hidden: bool,
}

impl NewElement {
    /// Checks the field constraints which do not need a database lookup.
    pub(crate) fn validate(&self) -> Result<(), ElementStoreError> {
        validate_base_fields(&self.name, self.width, self.height, self.rotation)
    }
}

/// Patch for the base fields of an element, applies to all kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub position_x: Patch<i32>,
    pub position_y: Patch<i32>,
    pub width: Patch<i32>,
    pub height: Patch<i32>,
    pub rotation: Patch<f64>,
    pub hidden: Patch<bool>,
}

impl ElementUpdate {
    /// Returns the element with this patch applied, identity, kind and position stay untouched.
    pub(crate) fn apply(
        self,
        current: &CertificateElement,
    ) -> Result<CertificateElement, ElementStoreError> {
        let element = CertificateElement {
            id: current.id,
            template_id: current.template_id,
            kind: current.kind,
            name: patch_required("name", self.name, current.name.clone())?,
            description: patch_nullable(self.description, current.description.clone()),
            position_x: patch_required("position_x", self.position_x, current.position_x)?,
            position_y: patch_required("position_y", self.position_y, current.position_y)?,
            width: patch_required("width", self.width, current.width)?,
            height: patch_required("height", self.height, current.height)?,
            rotation: patch_required("rotation", self.rotation, current.rotation)?,
            hidden: patch_required("hidden", self.hidden, current.hidden)?,
            z_index: current.z_index,
        };

        validate_base_fields(
            &element.name,
            element.width,
            element.height,
            element.rotation,
        )?;

        Ok(element)
    }
}

fn validate_base_fields(
    name: &str,
    width: i32,
    height: i32,
    rotation: f64,
) -> Result<(), ElementStoreError> {
    if name.trim().is_empty() {
        return Err(ElementStoreError::Validation(
            "Element name can not be empty".into(),
        ));
    }

    if width <= 0 || height <= 0 {
        return Err(ElementStoreError::Validation(format!(
            "Element size must be positive, got {}x{}",
            width, height
        )));
    }

    if !rotation.is_finite() {
        return Err(ElementStoreError::Validation(
            "Element rotation must be a finite number".into(),
        ));
    }

    Ok(())
}
