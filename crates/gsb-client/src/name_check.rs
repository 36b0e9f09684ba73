//! Name availability checks
//!
//! Used while a user types a new entity definition name. Names breaking the
//! naming rules are reported at once, without a request. Uniqueness lookups
//! wait out a short delay; a check started later supersedes any earlier one
//! still pending, which then resolves as [`NameCheck::Superseded`]. This only
//! narrows races between lookups, it does not rule them out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gsb_core::{GsbError, GsbResult};
use gsb_models::{
    is_reserved_property_name, is_valid_name, validate_name, validate_property_name, GsbEntityDef,
};
use tracing::debug;

use crate::services::EntityDefService;

/// Outcome of a name check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCheck {
    /// Breaks the naming rules; carries the reason
    Invalid(String),
    Available,
    Taken,
    /// A newer check replaced this one
    Superseded,
}

impl NameCheck {
    pub fn is_available(&self) -> bool {
        *self == Self::Available
    }
}

fn invalid(e: GsbError) -> NameCheck {
    match e {
        GsbError::InvalidName { reason, .. } => NameCheck::Invalid(reason),
        other => NameCheck::Invalid(other.to_string()),
    }
}

/// Debounced uniqueness checks for entity definition names
#[derive(Debug, Clone)]
pub struct NameChecker {
    service: EntityDefService,
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl NameChecker {
    pub fn new(service: EntityDefService, delay: Duration) -> Self {
        Self {
            service,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Check a new entity definition name
    pub async fn check(&self, name: &str) -> GsbResult<NameCheck> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = validate_name(name) {
            return Ok(invalid(e));
        }

        tokio::time::sleep(self.delay).await;
        if self.is_stale(ticket) {
            debug!(name, "Name check superseded before lookup");
            return Ok(NameCheck::Superseded);
        }

        let available = self.service.is_name_available(name).await?;
        if self.is_stale(ticket) {
            debug!(name, "Name check superseded during lookup");
            return Ok(NameCheck::Superseded);
        }

        Ok(if available {
            NameCheck::Available
        } else {
            NameCheck::Taken
        })
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != ticket
    }
}

/// Check a property name against the definition being edited, locally
///
/// `current` is the property's name before a rename.
pub fn check_property_name(entity_def: &GsbEntityDef, name: &str, current: Option<&str>) -> NameCheck {
    match validate_property_name(entity_def, name, current) {
        Ok(()) => NameCheck::Available,
        // Well-formed and not reserved leaves a collision
        Err(_) if is_valid_name(name) && !is_reserved_property_name(name) => NameCheck::Taken,
        Err(e) => invalid(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_with;
    use crate::transport::MockApiTransport;
    use gsb_models::{GsbDataType, GsbProperty};
    use serde_json::json;

    fn checker(transport: MockApiTransport) -> NameChecker {
        NameChecker::new(client_with(transport).entity_defs(), Duration::from_millis(30))
    }

    #[tokio::test]
    async fn test_invalid_name_skips_lookup() {
        let checker = checker(MockApiTransport::new());
        let result = checker.check("my table").await.unwrap();
        assert_eq!(result, NameCheck::Invalid("may only contain letters and digits".into()));
    }

    #[tokio::test]
    async fn test_available_and_taken() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.body["query"][0]["value"] == json!("Invoice"))
            .returning(|_| Ok(json!({ "entities": [] })));
        transport
            .expect_post()
            .withf(|req| req.body["query"][0]["value"] == json!("Order"))
            .returning(|_| Ok(json!({ "entities": [{ "name": "Order" }] })));

        let checker = checker(transport);
        assert!(checker.check("Invoice").await.unwrap().is_available());
        assert_eq!(checker.check("Order").await.unwrap(), NameCheck::Taken);
    }

    #[tokio::test]
    async fn test_newer_check_supersedes_pending_one() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.body["query"][0]["value"] == json!("Invoice"))
            .times(1)
            .returning(|_| Ok(json!({ "entities": [] })));

        let checker = checker(transport);
        let (first, second) = tokio::join!(checker.check("Invo"), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            checker.check("Invoice").await
        });

        assert_eq!(first.unwrap(), NameCheck::Superseded);
        assert_eq!(second.unwrap(), NameCheck::Available);
    }

    #[tokio::test]
    async fn test_invalid_input_supersedes_pending_check() {
        let checker = checker(MockApiTransport::new());
        let (first, second) = tokio::join!(checker.check("Order"), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            checker.check("Order!").await
        });

        assert_eq!(first.unwrap(), NameCheck::Superseded);
        assert!(matches!(second.unwrap(), NameCheck::Invalid(_)));
    }

    #[test]
    fn test_check_property_name() {
        let def = GsbEntityDef::new("Order")
            .with_property(GsbProperty::new("number", GsbDataType::String));

        assert_eq!(check_property_name(&def, "amount", None), NameCheck::Available);
        assert_eq!(check_property_name(&def, "Number", None), NameCheck::Taken);
        assert_eq!(check_property_name(&def, "number", Some("number")), NameCheck::Available);
        assert_eq!(
            check_property_name(&def, "id", None),
            NameCheck::Invalid("is reserved".into())
        );
        assert!(matches!(check_property_name(&def, "2nd", None), NameCheck::Invalid(_)));
    }
}
