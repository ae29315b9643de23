pub mod gateway;
pub mod signature;

pub use gateway::{
    generate_receipt, GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway,
    RazorpayGateway,
};
pub use signature::{HmacSignatureVerifier, SignatureError, VerifySignature};
