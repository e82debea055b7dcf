// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::Debug;

use log::{debug, info};

use crate::db::types::{ElementId, ElementKind, TemplateId};

/// Structured record of a write which was committed to the element store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A new element and its variant rows were inserted.
    ElementCreated {
        element_id: ElementId,
        template_id: TemplateId,
        kind: ElementKind,
    },

    /// Base, variant or text properties of an element changed.
    ElementUpdated {
        element_id: ElementId,
        kind: ElementKind,
    },

    /// An element was removed and the positions of its later siblings were closed up.
    ElementDeleted {
        element_id: ElementId,
        template_id: TemplateId,
    },

    /// Positions inside a template changed, lists every element which was touched.
    ElementsReordered {
        template_id: TemplateId,
        element_ids: Vec<ElementId>,
    },

    /// A template and all of its elements were removed.
    TemplateDeleted { template_id: TemplateId },
}

/// Sink for events emitted by the store.
///
/// An observer is handed to the store when it gets constructed. Implementations need to be cheap,
/// they are called inline after every committed transaction.
pub trait StoreObserver: Debug + Send + Sync {
    fn on_event(&self, event: &StoreEvent);
}

/// Default observer forwarding all events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StoreObserver for LogObserver {
    fn on_event(&self, event: &StoreEvent) {
        match event {
            StoreEvent::ElementCreated {
                element_id,
                template_id,
                kind,
            } => info!(
                "Created {} element {} in template {}",
                kind, element_id, template_id
            ),
            StoreEvent::ElementUpdated { element_id, kind } => {
                debug!("Updated {} element {}", kind, element_id)
            }
            StoreEvent::ElementDeleted {
                element_id,
                template_id,
            } => info!(
                "Deleted element {} from template {}",
                element_id, template_id
            ),
            StoreEvent::ElementsReordered {
                template_id,
                element_ids,
            } => debug!(
                "Reordered {} elements in template {}: {:?}",
                element_ids.len(),
                template_id,
                element_ids
            ),
            StoreEvent::TemplateDeleted { template_id } => {
                info!("Deleted template {} with all its elements", template_id)
            }
        }
    }
}
