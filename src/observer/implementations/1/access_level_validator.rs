// Ring 1: Input Validation - shared fields of every content row
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing, Operation, SyncObserver};
use crate::services::access::{ACCESS_LEVEL_ADMIN, ACCESS_LEVEL_PUBLIC};

#[derive(Default)]
pub struct AccessLevelValidator;

impl Observer for AccessLevelValidator {
    fn name(&self) -> &'static str {
        "AccessLevelValidator"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::InputValidation
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }
}

#[async_trait]
impl SyncObserver for AccessLevelValidator {
    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let event = &ctx.event;
        if !(ACCESS_LEVEL_ADMIN..=ACCESS_LEVEL_PUBLIC).contains(&event.access_level) {
            return Err(ObserverError::ValidationError(format!(
                "access_level must be between {} and {}, got {}",
                ACCESS_LEVEL_ADMIN, ACCESS_LEVEL_PUBLIC, event.access_level
            )));
        }
        if event.progeny_id <= 0 {
            return Err(ObserverError::ValidationError("progeny_id is required".to_string()));
        }
        Ok(())
    }
}
