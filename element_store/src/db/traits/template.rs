// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;

use crate::db::errors::ElementStoreError;
use crate::db::types::TemplateId;

/// Lookup of the templates owning elements.
///
/// Every element operation first confirms that the owning template is live.
#[async_trait]
pub trait TemplateProvider {
    /// Returns `true` if a template with this id exists.
    async fn template_exists(&self, id: TemplateId) -> Result<bool, ElementStoreError>;
}
