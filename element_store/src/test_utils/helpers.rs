// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use crate::db::types::{
    CalendarType, CertificateElement, CountryDataSource, CountryRepresentation, DateDataSource,
    ElementKind, ErrorCorrectionLevel, FontReference, ImageDataSource, ImageFit, NewCountryElement,
    NewDateElement, NewElement, NewElementVariant, NewGenderElement, NewImageElement,
    NewNumberElement, NewQrCodeElement, NewTextElement, NewTextProps, NumberDataSource,
    QrCodeDataSource, StorageFileId, StudentDateField, StudentTextField, TemplateId,
    TextAlignment, TextDataSource, TextOverflow, TextProps, TextPropsId,
};
use crate::test_utils::TestData;

/// Base fields of a valid element in the given template.
pub fn new_element(template_id: TemplateId) -> NewElement {
    NewElement {
        template_id,
        name: "Student name".into(),
        description: Some("Printed in the center of the certificate".into()),
        position_x: 120,
        position_y: 340,
        width: 600,
        height: 80,
        rotation: 0.0,
        hidden: false,
    }
}

/// Stored base fields of an element, not backed by any database row.
pub fn certificate_element(kind: ElementKind) -> CertificateElement {
    let element = new_element(1);

    CertificateElement {
        id: 1,
        template_id: element.template_id,
        kind,
        name: element.name,
        description: element.description,
        position_x: element.position_x,
        position_y: element.position_y,
        width: element.width,
        height: element.height,
        rotation: element.rotation,
        hidden: element.hidden,
        z_index: 1,
    }
}

/// Valid text properties using a Google font.
pub fn google_text_props() -> NewTextProps {
    NewTextProps {
        font: FontReference::Google {
            family: "Cairo".into(),
            variant: "regular".into(),
        },
        font_size: 24,
        color: "#1a1a1a".into(),
        alignment: TextAlignment::Center,
        overflow: TextOverflow::ResizeDown,
        line_height: Some(1.2),
        letter_spacing: Some(0.5),
    }
}

/// Stored text properties with the given id, not backed by any database row.
pub fn text_props(id: TextPropsId) -> TextProps {
    TextProps::from_new(id, google_text_props())
}

pub fn new_text_element(template_id: TemplateId) -> NewTextElement {
    NewTextElement {
        base: new_element(template_id),
        text_props: google_text_props(),
        data_source: TextDataSource::Static {
            value: "Certificate of Completion".into(),
        },
    }
}

pub fn new_date_element(template_id: TemplateId) -> NewDateElement {
    NewDateElement {
        base: NewElement {
            name: "Date of birth".into(),
            ..new_element(template_id)
        },
        text_props: google_text_props(),
        data_source: DateDataSource::StudentField {
            field: StudentDateField::DateOfBirth,
        },
        calendar_type: CalendarType::Gregorian,
        offset_in_days: 0,
        format: "dd/MM/yyyy".into(),
        transformation: None,
    }
}

pub fn new_number_element(template_id: TemplateId) -> NewNumberElement {
    NewNumberElement {
        base: NewElement {
            name: "Final grade".into(),
            ..new_element(template_id)
        },
        text_props: google_text_props(),
        data_source: NumberDataSource::Static { value: 97.5 },
        mapping: BTreeMap::new(),
        decimal_places: 2,
    }
}

pub fn new_country_element(template_id: TemplateId) -> NewCountryElement {
    NewCountryElement {
        base: NewElement {
            name: "Nationality".into(),
            ..new_element(template_id)
        },
        text_props: google_text_props(),
        data_source: CountryDataSource::StudentNationality,
        representation: CountryRepresentation::CountryName,
    }
}

pub fn new_gender_element(template_id: TemplateId) -> NewGenderElement {
    NewGenderElement {
        base: NewElement {
            name: "Gender".into(),
            ..new_element(template_id)
        },
        text_props: google_text_props(),
    }
}

pub fn new_image_element(
    template_id: TemplateId,
    storage_file_id: StorageFileId,
) -> NewImageElement {
    NewImageElement {
        base: NewElement {
            name: "Logo".into(),
            width: 200,
            height: 200,
            ..new_element(template_id)
        },
        data_source: ImageDataSource::StorageFile { storage_file_id },
        fit: ImageFit::Contain,
    }
}

pub fn new_qr_code_element(template_id: TemplateId) -> NewQrCodeElement {
    NewQrCodeElement {
        base: NewElement {
            name: "Verification QR code".into(),
            width: 150,
            height: 150,
            ..new_element(template_id)
        },
        data_source: QrCodeDataSource::VerificationUrl,
        error_correction: ErrorCorrectionLevel::M,
        foreground_color: "#000000".into(),
        background_color: "#ffffff".into(),
    }
}

/// Valid element of the given kind for the template of a populated test database.
pub fn new_element_variant(kind: ElementKind, test_data: &TestData) -> NewElementVariant {
    let template_id = test_data.template_id;

    match kind {
        ElementKind::Text => NewElementVariant::Text(NewTextElement {
            data_source: TextDataSource::StudentField {
                field: StudentTextField::Name,
            },
            ..new_text_element(template_id)
        }),
        ElementKind::Date => NewElementVariant::Date(new_date_element(template_id)),
        ElementKind::Number => NewElementVariant::Number(new_number_element(template_id)),
        ElementKind::Country => NewElementVariant::Country(new_country_element(template_id)),
        ElementKind::Gender => NewElementVariant::Gender(new_gender_element(template_id)),
        ElementKind::Image => NewElementVariant::Image(new_image_element(
            template_id,
            test_data.storage_file_id,
        )),
        ElementKind::QrCode => NewElementVariant::QrCode(new_qr_code_element(template_id)),
    }
}
