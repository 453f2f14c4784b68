//! Business services
//!
//! - [`audit`] - audit-risk policy engine
//! - [`exit_pass`] - payload signing and QR rendering
//! - [`checkout`] - cart → transaction finalization
//! - [`verify`] - scanned exit-pass verification

pub mod audit;
pub mod checkout;
pub mod exit_pass;
pub mod verify;

pub use audit::{AuditDecision, AuditPolicy, EntropySource, UniformSource};
pub use checkout::CheckoutService;
pub use exit_pass::ExitPassSigner;
pub use verify::VerifyService;
