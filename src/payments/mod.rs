//! Payment dispatch module
//!
//! Clients for the backend's smart-payment aggregation endpoints and for the
//! provider passthrough routes (PayDunya, Pawapay, Orange Money CI), plus the
//! method registry and the OTP confirmation flow.

pub mod http;
pub mod notice;
pub mod otp;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod types;
pub mod validation;

pub use notice::{Notice, NoticeLevel};
pub use otp::{OtpConfirmation, OtpState};
pub use providers::{OrangeMoneyCiClient, PawapayClient, PaydunyaClient, SmartPaymentClient};
pub use registry::{Country, Currency, MethodEntry, Operator, PaymentMethod, Provider};
pub use traits::{OtpConfirmer, PaymentGateway};
pub use types::{
    HealthStatus, MethodAvailability, PaymentRequest, PaymentResult, PaymentStatus, ProviderPair,
    StatusQuery,
};
