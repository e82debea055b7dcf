// SPDX-License-Identifier: AGPL-3.0-or-later

mod template;
mod variant;

pub use template::TemplateProvider;
pub use variant::ElementVariant;
