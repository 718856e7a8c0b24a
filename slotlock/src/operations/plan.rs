//! Plan types for block operations.
//!
//! This module defines the plan structures that describe what actions
//! will be taken during an operation, without actually performing them.
//! Plans power dry-run previews for the operator-facing surfaces; the
//! authoritative conflict check still happens at execution time, inside
//! the database transaction.

use crate::block::{BlockId, ReservationBlock};

/// A single action to be taken during plan execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Insert a block through the atomic conflict-checked path.
    CreateBlock(ReservationBlock),

    /// Delete a block by id.
    DeleteBlock(BlockId),

    /// Delete every booking block referencing a cancelled booking.
    CancelBooking(String),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateBlock(block) => format!(
                "Create {} block on {} {} at {}",
                block.kind(),
                block.resource_id(),
                block.date(),
                block.interval()
            ),
            Self::DeleteBlock(id) => format!("Delete block {id}"),
            Self::CancelBooking(booking_ref) => {
                format!("Release blocks for cancelled booking {booking_ref}")
            }
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of actions,
/// and any warnings that should be communicated to the user.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use slotlock::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Register maintenance window");
    /// assert_eq!(plan.description, "Register maintenance window");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockKind, ReservationBlock, ResourceId};
    use chrono::NaiveDate;

    fn test_block() -> ReservationBlock {
        ReservationBlock::builder(
            ResourceId::new("van-07").unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            "10:00-12:00".parse().unwrap(),
            BlockKind::Maintenance,
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_create_action_description() {
        let action = PlanAction::CreateBlock(test_block());
        let desc = action.description();
        assert!(desc.contains("maintenance"));
        assert!(desc.contains("van-07"));
        assert!(desc.contains("2026-05-01"));
        assert!(desc.contains("10:00-12:00"));
    }

    #[test]
    fn test_cancel_booking_action_description() {
        let action = PlanAction::CancelBooking("BK-100".to_string());
        assert!(action.description().contains("BK-100"));
    }

    #[test]
    fn test_operation_plan_new() {
        let plan = OperationPlan::new("Test operation");
        assert_eq!(plan.description, "Test operation");
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn test_operation_plan_builder_pattern() {
        let plan = OperationPlan::new("Test")
            .add_action(PlanAction::CreateBlock(test_block()))
            .add_warning("Warning 1")
            .add_warning("Warning 2")
            .add_action(PlanAction::DeleteBlock(crate::BlockId::from(7)));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.warnings.len(), 2);
        assert!(!plan.is_empty());
    }

    // Property-based tests: plans drive operator previews, so ordering and
    // accumulation must be reliable.
    #[cfg(feature = "property-tests")]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // PROPERTY: actions are accumulated in the order added
            #[test]
            fn prop_actions_preserve_order(count in 0usize..6) {
                let mut plan = OperationPlan::new("test");
                for i in 0..count {
                    #[allow(clippy::cast_possible_wrap)]
                    let id = crate::BlockId::from(i as i64);
                    plan = plan.add_action(PlanAction::DeleteBlock(id));
                }

                prop_assert_eq!(plan.len(), count);
                for (i, action) in plan.actions.iter().enumerate() {
                    #[allow(clippy::cast_possible_wrap)]
                    let expected = crate::BlockId::from(i as i64);
                    prop_assert_eq!(action, &PlanAction::DeleteBlock(expected));
                }
            }
        }

        proptest! {
            // PROPERTY: warnings are accumulated in the order added
            #[test]
            fn prop_warnings_preserve_order(
                warning1 in "[a-z]{5,10}",
                warning2 in "[A-Z]{5,10}",
            ) {
                let plan = OperationPlan::new("test")
                    .add_warning(warning1.clone())
                    .add_warning(warning2.clone());

                prop_assert_eq!(plan.warnings.len(), 2);
                prop_assert_eq!(&plan.warnings[0], &warning1);
                prop_assert_eq!(&plan.warnings[1], &warning2);
            }
        }

        proptest! {
            // PROPERTY: is_empty() == (len() == 0)
            #[test]
            fn prop_is_empty_matches_len(count in 0usize..4) {
                let mut plan = OperationPlan::new("test");
                for _ in 0..count {
                    plan = plan.add_action(PlanAction::CancelBooking("BK-1".to_string()));
                }
                prop_assert_eq!(plan.is_empty(), plan.len() == 0);
            }
        }
    }
}
