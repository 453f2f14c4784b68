//! Exit-pass signing and rendering
//!
//! The signer computes an HMAC-SHA256 over the payload's signing base and
//! is fully deterministic and stateless once its secret is resolved. The
//! renderer turns the encoded payload into a scannable QR image; the QR
//! carries exactly the serialized text, nothing else is semantically
//! significant.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};
use sha2::Sha256;

use shared::exit_pass::{ExitPassPayload, PAYLOAD_VERSION, SIGNED_FIELDS};
use shared::util::now_secs;

use crate::core::Config;
use crate::utils::AppError;

/// Last-resort secret so signing never fails outright. Weakens security if
/// it ever reaches production, which is why [`ExitPassSigner::from_config`]
/// refuses to fall back there.
const FALLBACK_SECRET: &str = "smartscan-secret";

/// Pixels per QR module
const MODULE_PIXELS: u32 = 4;

/// Quiet-zone width in modules
const QUIET_ZONE: u32 = 4;

/// Signs and verifies exit-pass payloads with a configured secret
pub struct ExitPassSigner {
    secret: String,
}

impl ExitPassSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Resolve the signing secret from configuration.
    ///
    /// Resolution order: explicit `EXIT_PASS_SECRET`, else the general
    /// `APP_SECRET`, else a fixed fallback. The fallback is an explicit
    /// insecure-development mode: in production a missing secret is a
    /// startup error, not a silent downgrade.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if let Some(secret) = &config.exit_pass_secret {
            return Ok(Self::new(secret.clone()));
        }
        if let Some(secret) = &config.app_secret {
            tracing::info!("EXIT_PASS_SECRET not set, signing exit passes with APP_SECRET");
            return Ok(Self::new(secret.clone()));
        }
        if config.is_production() {
            anyhow::bail!(
                "No exit-pass signing secret configured; set EXIT_PASS_SECRET (or APP_SECRET) in production"
            );
        }
        tracing::warn!(
            "No exit-pass signing secret configured, using the built-in development fallback — exit passes are forgeable"
        );
        Ok(Self::new(FALLBACK_SECRET))
    }

    /// Build a signed payload for a finalized transaction
    pub fn issue(&self, transaction_id: i64, user_id: i64, total_amount: f64) -> ExitPassPayload {
        use rand::Rng;
        let mut nonce = [0u8; 8];
        rand::thread_rng().fill(&mut nonce);

        let mut payload = ExitPassPayload {
            v: PAYLOAD_VERSION,
            tx: transaction_id,
            uid: user_id,
            amt: total_amount,
            ts: now_secs(),
            nonce: hex::encode(nonce),
            sig: String::new(),
            sig_fields: SIGNED_FIELDS.to_string(),
        };
        payload.sig = self.sign(&payload.signing_base());
        payload
    }

    /// HMAC-SHA256 over the signing base, hex-encoded
    fn sign(&self, base: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            // SAFETY: HMAC accepts keys of any length
            .expect("HMAC key of any length is valid");
        mac.update(base.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check a payload's signature against the recomputed MAC.
    ///
    /// Uses constant-time comparison via `Mac::verify_slice`. An absent or
    /// non-hex signature simply fails verification.
    pub fn verify(&self, payload: &ExitPassPayload) -> bool {
        let Ok(sig_bytes) = hex::decode(&payload.sig) else {
            return false;
        };
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            // SAFETY: HMAC accepts keys of any length
            .expect("HMAC key of any length is valid");
        mac.update(payload.signing_base().as_bytes());
        mac.verify_slice(&sig_bytes).is_ok()
    }
}

/// Render the encoded payload text into a scannable PNG, returned as a
/// `data:image/png;base64,...` URL for direct embedding.
pub fn render_exit_pass(payload_text: &str) -> Result<String, AppError> {
    let code = QrCode::new(payload_text.as_bytes())
        .map_err(|e| AppError::internal(format!("QR encoding failed: {e}")))?;

    let width = code.width() as u32;
    let colors = code.to_colors();
    let size = (width + 2 * QUIET_ZONE) * MODULE_PIXELS;
    let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));

    for (index, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let module_x = (index as u32 % width + QUIET_ZONE) * MODULE_PIXELS;
        let module_y = (index as u32 / width + QUIET_ZONE) * MODULE_PIXELS;
        for dy in 0..MODULE_PIXELS {
            for dx in 0..MODULE_PIXELS {
                img.put_pixel(module_x + dx, module_y + dy, Luma([0u8]));
            }
        }
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("PNG encoding failed: {e}")))?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
}
