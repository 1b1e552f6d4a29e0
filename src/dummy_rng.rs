use rand_core::{CryptoRng, RngCore};

/// Stands in for the RNG type parameter of provider calls made without
/// blinding. Never asked for output.
#[derive(Copy, Clone, Debug)]
pub(crate) struct DummyRng;

impl RngCore for DummyRng {
    fn next_u32(&mut self) -> u32 {
        unreachable!("DummyRng is never drawn from");
    }

    fn next_u64(&mut self) -> u64 {
        unreachable!("DummyRng is never drawn from");
    }

    fn fill_bytes(&mut self, _: &mut [u8]) {
        unreachable!("DummyRng is never drawn from");
    }

    fn try_fill_bytes(&mut self, _: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        unreachable!("DummyRng is never drawn from");
    }
}

impl CryptoRng for DummyRng {}
