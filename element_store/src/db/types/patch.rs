// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::errors::ElementStoreError;

/// Change to a single field.
///
/// `None` leaves the field untouched, `Some(None)` clears it and `Some(Some(value))` overwrites
/// it. The same policy applies to every element kind and to text properties.
pub type Patch<T> = Option<Option<T>>;

/// Applies a patch to a field which can not be empty.
pub(crate) fn patch_required<T>(
    field: &str,
    patch: Patch<T>,
    current: T,
) -> Result<T, ElementStoreError> {
    match patch {
        None => Ok(current),
        Some(Some(value)) => Ok(value),
        Some(None) => Err(ElementStoreError::Validation(format!(
            "{} can not be cleared",
            field
        ))),
    }
}

/// Applies a patch to a nullable field.
pub(crate) fn patch_nullable<T>(patch: Patch<T>, current: Option<T>) -> Option<T> {
    match patch {
        None => current,
        Some(value) => value,
    }
}

#[cfg(test)]
mod tests {
    use crate::db::errors::ElementStoreError;

    use super::{patch_nullable, patch_required};

    #[test]
    fn required_fields() {
        assert_eq!(patch_required("width", None, 10).unwrap(), 10);
        assert_eq!(patch_required("width", Some(Some(20)), 10).unwrap(), 20);
        assert!(matches!(
            patch_required("width", Some(None), 10),
            Err(ElementStoreError::Validation(_))
        ));
    }

    #[test]
    fn nullable_fields() {
        assert_eq!(patch_nullable(None, Some(1.5)), Some(1.5));
        assert_eq!(patch_nullable(Some(None), Some(1.5)), None);
        assert_eq!(patch_nullable(Some(Some(2.0)), None), Some(2.0));
    }
}
