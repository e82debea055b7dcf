// SPDX-License-Identifier: AGPL-3.0-or-later

use proptest::collection::vec;
use proptest::prelude::*;

use crate::db::types::ElementKind;

/// Write which changes the stacking order of a template.
///
/// Elements are addressed by their index in the current order, wrapped around the number of
/// elements present when the operation runs.
#[derive(Debug, Clone)]
pub enum OrderOperation {
    Create(ElementKind),
    Move { index: usize, z_index: i32 },
    Increase(usize),
    Decrease(usize),
    Delete(usize),
}

fn element_kind_strategy() -> impl Strategy<Value = ElementKind> {
    (0..ElementKind::ALL.len()).prop_map(|index| ElementKind::ALL[index])
}

fn order_operation_strategy() -> impl Strategy<Value = OrderOperation> {
    prop_oneof![
        3 => element_kind_strategy().prop_map(OrderOperation::Create),
        // Targets reach past both ends to exercise the range checks
        3 => (any::<usize>(), -1..12i32)
            .prop_map(|(index, z_index)| OrderOperation::Move { index, z_index }),
        1 => any::<usize>().prop_map(OrderOperation::Increase),
        1 => any::<usize>().prop_map(OrderOperation::Decrease),
        2 => any::<usize>().prop_map(OrderOperation::Delete),
    ]
}

/// Sequence of order operations applied to a single template.
pub fn order_operations_strategy() -> impl Strategy<Value = Vec<OrderOperation>> {
    vec(order_operation_strategy(), 1..24)
}
