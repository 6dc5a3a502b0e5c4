//! OTP confirmation flow
//!
//! A checkout form that confirms one payment with an operator-issued code.
//! The flow is idle until the customer submits a code, submitting while the
//! single request is in flight, and resolved once the payment succeeds. Any
//! error puts it back to idle with a message so the customer can try again.

use crate::error::{AppError, AppResult};
use crate::payments::traits::OtpConfirmer;
use crate::payments::types::{PaymentRequest, PaymentResult, PaymentStatus};
use crate::payments::validation::validate_otp;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum OtpState {
    Idle { last_error: Option<String> },
    Submitting,
    Resolved(PaymentResult),
}

impl Default for OtpState {
    fn default() -> Self {
        OtpState::Idle { last_error: None }
    }
}

pub struct OtpConfirmation<C> {
    confirmer: C,
    request: PaymentRequest,
    state: Mutex<OtpState>,
}

impl<C: OtpConfirmer> OtpConfirmation<C> {
    pub fn new(confirmer: C, request: PaymentRequest) -> Self {
        Self {
            confirmer,
            request,
            state: Mutex::new(OtpState::default()),
        }
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    pub fn state(&self) -> OtpState {
        self.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(*self.lock(), OtpState::Submitting)
    }

    /// Message to show next to the form, if the last attempt failed
    pub fn last_error(&self) -> Option<String> {
        match &*self.lock() {
            OtpState::Idle { last_error } => last_error.clone(),
            _ => None,
        }
    }

    /// Submit a code. Only one submission may be in flight, and none once resolved.
    pub async fn submit(&self, otp_code: &str) -> AppResult<PaymentResult> {
        {
            let mut state = self.lock();
            match &*state {
                OtpState::Submitting => {
                    return Err(AppError::validation(
                        "otp_code",
                        "A confirmation is already in progress",
                    ));
                }
                OtpState::Resolved(_) => {
                    return Err(AppError::validation(
                        "otp_code",
                        "This payment has already been confirmed",
                    ));
                }
                OtpState::Idle { .. } => {}
            }

            if let Err(e) = validate_otp(otp_code) {
                *state = OtpState::Idle {
                    last_error: Some(e.user_message()),
                };
                return Err(e);
            }

            *state = OtpState::Submitting;
        }

        let mut guard = SubmitGuard {
            state: &self.state,
            armed: true,
        };

        let outcome = match self.confirmer.confirm_with_otp(&self.request, otp_code).await {
            Ok(result) if result.status == PaymentStatus::Failed => Err(AppError::business(
                result
                    .message
                    .clone()
                    .unwrap_or_else(|| "The payment was declined".to_string()),
                None,
                None,
            )),
            other => other,
        };

        guard.armed = false;
        let mut state = self.lock();
        match &outcome {
            Ok(result) => {
                info!(
                    "OTP confirmation resolved: reference={}, status={}",
                    self.request.reference, result.status
                );
                *state = OtpState::Resolved(result.clone());
            }
            Err(e) => {
                warn!(
                    "OTP confirmation failed: reference={}, error={}",
                    self.request.reference, e
                );
                *state = OtpState::Idle {
                    last_error: Some(e.user_message()),
                };
            }
        }

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, OtpState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<OtpState>) -> MutexGuard<'_, OtpState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// Returns the flow to idle if a submission future is dropped mid-flight
struct SubmitGuard<'a> {
    state: &'a Mutex<OtpState>,
    armed: bool,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            *lock_state(self.state) = OtpState::default();
        }
    }
}
