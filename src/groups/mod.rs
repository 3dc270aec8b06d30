/// Prime-field multiplicative groups (RFC 5114 and explicit parameters).
pub mod modp;
/// The secp256k1 elliptic curve group.
pub mod secp256k1;

pub use modp::ModpGroup;
pub use secp256k1::Secp256k1;
