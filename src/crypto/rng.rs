//! Randomness source for nonces and key generation.

use rand_core::{CryptoRng, OsRng, RngCore};

/// Operating-system CSPRNG handle.
///
/// Holds no state of its own: every call reads fresh entropy from the OS, so independent
/// sessions can each own a `SecureRng` on their own thread without coordination and never
/// observe correlated output.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}
