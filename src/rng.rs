//! The hand-rolled linear congruential generator used for hard-fill
//! tie-breaking jitter.
//!
//! `mul`/`inc`/`mod` are fixed to the values published by the source this
//! spec was distilled from so that jitter is reproducible given the same
//! seed across independent implementations — this is a testable contract,
//! not an implementation detail, so it must not be swapped for `rand`'s own
//! generators.

const MUL: u64 = 1_103_515_245;
const INC: u64 = 12_345;
const MODULUS: u64 = 1 << 31;

#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % MODULUS,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = (MUL.wrapping_mul(self.state).wrapping_add(INC)) % MODULUS;
        self.state as u32
    }

    /// Deterministic jitter in `0..10`, used to perturb hard-fill objective
    /// coefficients per (volunteer, shift) pair.
    pub fn next_jitter(&mut self) -> i64 {
        (self.next_u32() % 10) as i64
    }
}
