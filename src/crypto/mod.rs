/// Modular arithmetic helpers over arbitrary-size integers.
pub mod field;
/// Group trait shared by every scheme.
pub mod group;
/// Cryptographically secure random number generation.
pub mod rng;

pub use group::Group;
pub use rng::SecureRng;
