//! Audit Policy Engine
//!
//! Pure decision function mapping transaction facts to an audit flag and a
//! human-readable reason. Rules run in a fixed order and each can set the
//! flag independently; the reason of the LAST matching rule overwrites any
//! earlier one. That ordering is a documented contract, not a severity
//! ranking — do not reorder without changing observable behavior on
//! purpose.
//!
//! Randomness is injected so tests can force deterministic outcomes.

use rust_decimal::Decimal;

/// Fraction of checkouts selected for a random spot check
const SAMPLING_RATE: f64 = 0.10;

/// Totals at or above this are flagged as high-value
const HIGH_VALUE_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// A single line at or above this quantity is flagged as a bulk purchase
const BULK_QUANTITY: i64 = 5;

/// Source of uniform draws in [0, 1)
pub trait UniformSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Production entropy source
pub struct EntropySource;

impl UniformSource for EntropySource {
    fn draw(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Outcome of policy evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditDecision {
    pub requires_audit: bool,
    pub reason: Option<&'static str>,
}

impl AuditDecision {
    fn clear() -> Self {
        Self {
            requires_audit: false,
            reason: None,
        }
    }
}

/// The audit policy. Evaluation never fails.
#[derive(Debug, Default)]
pub struct AuditPolicy;

impl AuditPolicy {
    /// Evaluate the policy over the transaction total and the per-line
    /// quantities. Rules in order; last matching rule's reason wins.
    pub fn evaluate(
        &self,
        source: &dyn UniformSource,
        total_amount: Decimal,
        quantities: &[i64],
    ) -> AuditDecision {
        let mut decision = AuditDecision::clear();

        // Rule 1: random sampling
        if source.draw() < SAMPLING_RATE {
            decision.requires_audit = true;
            decision.reason = Some("Random security check");
        }

        // Rule 2: high-value transaction (overwrites rule 1's reason)
        if total_amount >= HIGH_VALUE_THRESHOLD {
            decision.requires_audit = true;
            decision.reason = Some("High-value transaction");
        }

        // Rule 3: bulk purchase, first qualifying line only
        if quantities.iter().any(|&q| q >= BULK_QUANTITY) {
            decision.requires_audit = true;
            decision.reason = Some("Bulk purchase detected");
        }

        decision
    }
}
