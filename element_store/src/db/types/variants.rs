// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use crate::db::types::{
    CertificateElement, CountryDataSource, DateDataSource, ElementId, ElementKind, ElementUpdate,
    ImageDataSource, NewElement, NewTextProps, NumberDataSource, Patch, QrCodeDataSource,
    TextDataSource, TextProps, TextPropsUpdate,
};

/// Calendar used when printing a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarType {
    Gregorian,
    Hijri,
}

string_enum!(CalendarType {
    Gregorian => "GREGORIAN",
    Hijri => "HIJRI",
});

/// Computation applied to a date before it gets printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTransformation {
    /// Print the number of years between the date and the release date.
    AgeCalculation,
}

string_enum!(DateTransformation {
    AgeCalculation => "AGE_CALCULATION",
});

/// How a country is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryRepresentation {
    CountryName,
    Nationality,
}

string_enum!(CountryRepresentation {
    CountryName => "COUNTRY_NAME",
    Nationality => "NATIONALITY",
});

/// How an image is scaled into the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    Contain,
    Cover,
    Fill,
}

string_enum!(ImageFit {
    Contain => "CONTAIN",
    Cover => "COVER",
    Fill => "FILL",
});

/// Share of a QR code which can be damaged while it stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrectionLevel {
    L,
    M,
    Q,
    H,
}

string_enum!(ErrorCorrectionLevel {
    L => "L",
    M => "M",
    Q => "Q",
    H => "H",
});

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub base: CertificateElement,
    pub text_props: TextProps,
    pub data_source: TextDataSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateElement {
    pub base: CertificateElement,
    pub text_props: TextProps,
    pub data_source: DateDataSource,
    pub calendar_type: CalendarType,
    pub offset_in_days: i32,

    /// Format string, for example `dd/MM/yyyy`.
    pub format: String,
    pub transformation: Option<DateTransformation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberElement {
    pub base: CertificateElement,
    pub text_props: TextProps,
    pub data_source: NumberDataSource,

    /// Replacement glyphs for digits, for example `"1" => "١"`.
    pub mapping: BTreeMap<String, String>,
    pub decimal_places: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryElement {
    pub base: CertificateElement,
    pub text_props: TextProps,
    pub data_source: CountryDataSource,
    pub representation: CountryRepresentation,
}

/// Prints the gender of the student, which is only known when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct GenderElement {
    pub base: CertificateElement,
    pub text_props: TextProps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub base: CertificateElement,
    pub data_source: ImageDataSource,
    pub fit: ImageFit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QrCodeElement {
    pub base: CertificateElement,
    pub data_source: QrCodeDataSource,
    pub error_correction: ErrorCorrectionLevel,
    pub foreground_color: String,
    pub background_color: String,
}

/// Fully typed certificate element of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextElement),
    Date(DateElement),
    Number(NumberElement),
    Country(CountryElement),
    Gender(GenderElement),
    Image(ImageElement),
    QrCode(QrCodeElement),
}

impl Element {
    /// Returns the fields shared by all kinds.
    pub fn base(&self) -> &CertificateElement {
        match self {
            Element::Text(element) => &element.base,
            Element::Date(element) => &element.base,
            Element::Number(element) => &element.base,
            Element::Country(element) => &element.base,
            Element::Gender(element) => &element.base,
            Element::Image(element) => &element.base,
            Element::QrCode(element) => &element.base,
        }
    }

    pub fn id(&self) -> ElementId {
        self.base().id
    }

    pub fn kind(&self) -> ElementKind {
        self.base().kind
    }

    /// Returns the owned text properties of text-bearing kinds.
    pub fn text_props(&self) -> Option<&TextProps> {
        match self {
            Element::Text(element) => Some(&element.text_props),
            Element::Date(element) => Some(&element.text_props),
            Element::Number(element) => Some(&element.text_props),
            Element::Country(element) => Some(&element.text_props),
            Element::Gender(element) => Some(&element.text_props),
            Element::Image(_) | Element::QrCode(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTextElement {
    pub base: NewElement,
    pub text_props: NewTextProps,
    pub data_source: TextDataSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDateElement {
    pub base: NewElement,
    pub text_props: NewTextProps,
    pub data_source: DateDataSource,
    pub calendar_type: CalendarType,
    pub offset_in_days: i32,
    pub format: String,
    pub transformation: Option<DateTransformation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNumberElement {
    pub base: NewElement,
    pub text_props: NewTextProps,
    pub data_source: NumberDataSource,
    pub mapping: BTreeMap<String, String>,
    pub decimal_places: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCountryElement {
    pub base: NewElement,
    pub text_props: NewTextProps,
    pub data_source: CountryDataSource,
    pub representation: CountryRepresentation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGenderElement {
    pub base: NewElement,
    pub text_props: NewTextProps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewImageElement {
    pub base: NewElement,
    pub data_source: ImageDataSource,
    pub fit: ImageFit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQrCodeElement {
    pub base: NewElement,
    pub data_source: QrCodeDataSource,
    pub error_correction: ErrorCorrectionLevel,
    pub foreground_color: String,
    pub background_color: String,
}

/// Input for creating an element of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NewElementVariant {
    Text(NewTextElement),
    Date(NewDateElement),
    Number(NewNumberElement),
    Country(NewCountryElement),
    Gender(NewGenderElement),
    Image(NewImageElement),
    QrCode(NewQrCodeElement),
}

impl NewElementVariant {
    pub fn kind(&self) -> ElementKind {
        match self {
            NewElementVariant::Text(_) => ElementKind::Text,
            NewElementVariant::Date(_) => ElementKind::Date,
            NewElementVariant::Number(_) => ElementKind::Number,
            NewElementVariant::Country(_) => ElementKind::Country,
            NewElementVariant::Gender(_) => ElementKind::Gender,
            NewElementVariant::Image(_) => ElementKind::Image,
            NewElementVariant::QrCode(_) => ElementKind::QrCode,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextElementUpdate {
    pub base: ElementUpdate,
    pub text_props: Option<TextPropsUpdate>,
    pub data_source: Patch<TextDataSource>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateElementUpdate {
    pub base: ElementUpdate,
    pub text_props: Option<TextPropsUpdate>,
    pub data_source: Patch<DateDataSource>,
    pub calendar_type: Patch<CalendarType>,
    pub offset_in_days: Patch<i32>,
    pub format: Patch<String>,
    pub transformation: Patch<DateTransformation>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberElementUpdate {
    pub base: ElementUpdate,
    pub text_props: Option<TextPropsUpdate>,
    pub data_source: Patch<NumberDataSource>,
    pub mapping: Patch<BTreeMap<String, String>>,
    pub decimal_places: Patch<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryElementUpdate {
    pub base: ElementUpdate,
    pub text_props: Option<TextPropsUpdate>,
    pub data_source: Patch<CountryDataSource>,
    pub representation: Patch<CountryRepresentation>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenderElementUpdate {
    pub base: ElementUpdate,
    pub text_props: Option<TextPropsUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageElementUpdate {
    pub base: ElementUpdate,
    pub data_source: Patch<ImageDataSource>,
    pub fit: Patch<ImageFit>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QrCodeElementUpdate {
    pub base: ElementUpdate,
    pub data_source: Patch<QrCodeDataSource>,
    pub error_correction: Patch<ErrorCorrectionLevel>,
    pub foreground_color: Patch<String>,
    pub background_color: Patch<String>,
}

/// Patch for an element of any kind.
///
/// The variant names the kind the caller expects the element to have.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementVariantUpdate {
    Text(TextElementUpdate),
    Date(DateElementUpdate),
    Number(NumberElementUpdate),
    Country(CountryElementUpdate),
    Gender(GenderElementUpdate),
    Image(ImageElementUpdate),
    QrCode(QrCodeElementUpdate),
}

impl ElementVariantUpdate {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementVariantUpdate::Text(_) => ElementKind::Text,
            ElementVariantUpdate::Date(_) => ElementKind::Date,
            ElementVariantUpdate::Number(_) => ElementKind::Number,
            ElementVariantUpdate::Country(_) => ElementKind::Country,
            ElementVariantUpdate::Gender(_) => ElementKind::Gender,
            ElementVariantUpdate::Image(_) => ElementKind::Image,
            ElementVariantUpdate::QrCode(_) => ElementKind::QrCode,
        }
    }
}
