//! Packed timelocks: seven phase offsets plus a deployment timestamp,
//! folded into one 256-bit value (spec.md §3, §4.1).
//!
//! Bit layout (big-endian within the 32-byte word), most significant first:
//!
//! ```text
//! byte  0.. 4   deployed_at              (bits 224..255)
//! byte  4.. 8   dst_cancellation         (bits 192..223)
//! byte  8..12   dst_public_withdrawal    (bits 160..191)
//! byte 12..16   dst_withdrawal           (bits 128..159)
//! byte 16..20   src_public_cancellation  (bits  96..127)
//! byte 20..24   src_cancellation         (bits  64.. 95)
//! byte 24..28   src_public_withdrawal    (bits  32.. 63)
//! byte 28..32   src_withdrawal           (bits   0.. 31)
//! ```

use crate::error::SwapError;
use serde::{Deserialize, Serialize};

/// One of the seven named phase boundaries a swap moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    SrcWithdrawal,
    SrcPublicWithdrawal,
    SrcCancellation,
    SrcPublicCancellation,
    DstWithdrawal,
    DstPublicWithdrawal,
    DstCancellation,
}

impl Phase {
    /// Byte offset of this phase's u32 field within the packed 32-byte word.
    fn byte_offset(self) -> usize {
        match self {
            Phase::DstCancellation => 4,
            Phase::DstPublicWithdrawal => 8,
            Phase::DstWithdrawal => 12,
            Phase::SrcPublicCancellation => 16,
            Phase::SrcCancellation => 20,
            Phase::SrcPublicWithdrawal => 24,
            Phase::SrcWithdrawal => 28,
        }
    }
}

/// The seven offsets passed to [`Timelocks::pack`], in the order spec.md
/// §3 declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseOffsets {
    pub src_withdrawal: u32,
    pub src_public_withdrawal: u32,
    pub src_cancellation: u32,
    pub src_public_cancellation: u32,
    pub dst_withdrawal: u32,
    pub dst_public_withdrawal: u32,
    pub dst_cancellation: u32,
}

impl PhaseOffsets {
    fn get(&self, phase: Phase) -> u32 {
        match phase {
            Phase::SrcWithdrawal => self.src_withdrawal,
            Phase::SrcPublicWithdrawal => self.src_public_withdrawal,
            Phase::SrcCancellation => self.src_cancellation,
            Phase::SrcPublicCancellation => self.src_public_cancellation,
            Phase::DstWithdrawal => self.dst_withdrawal,
            Phase::DstPublicWithdrawal => self.dst_public_withdrawal,
            Phase::DstCancellation => self.dst_cancellation,
        }
    }

    /// Phase monotonicity invariant from spec.md §3 / §8 (P2): source side
    /// non-decreasing through its four phases, destination side
    /// non-decreasing through its three, and the destination side closes
    /// strictly before the source side's cancellation window opens.
    pub fn is_well_ordered(&self) -> bool {
        self.src_withdrawal <= self.src_public_withdrawal
            && self.src_public_withdrawal < self.src_cancellation
            && self.src_cancellation <= self.src_public_cancellation
            && self.dst_withdrawal <= self.dst_public_withdrawal
            && self.dst_public_withdrawal < self.dst_cancellation
            && self.dst_cancellation < self.src_cancellation
    }
}

/// A packed 256-bit timelocks word, represented as 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timelocks(#[serde(with = "serde_bytes32")] pub [u8; 32]);

impl Timelocks {
    /// spec.md §4.1: `pack(offsets[7], deployed_at) -> u256`.
    pub fn pack(offsets: PhaseOffsets, deployed_at: u32) -> Self {
        let mut word = [0u8; 32];
        word[0..4].copy_from_slice(&deployed_at.to_be_bytes());
        for phase in [
            Phase::SrcWithdrawal,
            Phase::SrcPublicWithdrawal,
            Phase::SrcCancellation,
            Phase::SrcPublicCancellation,
            Phase::DstWithdrawal,
            Phase::DstPublicWithdrawal,
            Phase::DstCancellation,
        ] {
            let off = phase.byte_offset();
            word[off..off + 4].copy_from_slice(&offsets.get(phase).to_be_bytes());
        }
        Self(word)
    }

    /// Reverses [`Self::pack`]: the offsets and the deployment timestamp.
    pub fn unpack(&self) -> (PhaseOffsets, u32) {
        let deployed_at = self.deployed_at();
        let offsets = PhaseOffsets {
            src_withdrawal: self.offset(Phase::SrcWithdrawal),
            src_public_withdrawal: self.offset(Phase::SrcPublicWithdrawal),
            src_cancellation: self.offset(Phase::SrcCancellation),
            src_public_cancellation: self.offset(Phase::SrcPublicCancellation),
            dst_withdrawal: self.offset(Phase::DstWithdrawal),
            dst_public_withdrawal: self.offset(Phase::DstPublicWithdrawal),
            dst_cancellation: self.offset(Phase::DstCancellation),
        };
        (offsets, deployed_at)
    }

    fn offset(&self, phase: Phase) -> u32 {
        let off = phase.byte_offset();
        u32::from_be_bytes(self.0[off..off + 4].try_into().unwrap())
    }

    pub fn deployed_at(&self) -> u32 {
        u32::from_be_bytes(self.0[0..4].try_into().unwrap())
    }

    /// spec.md §4.1: `with_deployed_at(t, ts) -> u256` — clears the top 32
    /// bits and sets them to `ts`, leaving every offset untouched. Used by
    /// the Factory at escrow creation (spec.md §4.5 step 2).
    pub fn with_deployed_at(&self, ts: u32) -> Self {
        let mut word = self.0;
        word[0..4].copy_from_slice(&ts.to_be_bytes());
        Self(word)
    }

    /// spec.md §4.1: `phase_deadline(t, phase) -> u64`.
    pub fn phase_deadline(&self, phase: Phase) -> u64 {
        self.deployed_at() as u64 + self.offset(phase) as u64
    }

    /// spec.md §4.1: `rescue_deadline(t, rescue_delay) -> u64`.
    pub fn rescue_deadline(&self, rescue_delay: u64) -> u64 {
        self.deployed_at() as u64 + rescue_delay
    }

    /// `current_time >= deadline` — spec.md §4.1 "after" policy. The
    /// boundary second belongs to the later phase.
    pub fn is_after(&self, phase: Phase, now: u64) -> bool {
        now >= self.phase_deadline(phase)
    }

    /// `current_time < deadline` — spec.md §4.1 "before" policy.
    pub fn is_before(&self, phase: Phase, now: u64) -> bool {
        now < self.phase_deadline(phase)
    }

    pub fn validate_ordering(&self) -> Result<(), SwapError> {
        let (offsets, _) = self.unpack();
        if offsets.is_well_ordered() {
            Ok(())
        } else {
            Err(SwapError::InvalidTime)
        }
    }
}

mod serde_bytes32 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_offsets() -> PhaseOffsets {
        PhaseOffsets {
            src_withdrawal: 10,
            src_public_withdrawal: 120,
            src_cancellation: 300,
            src_public_cancellation: 400,
            dst_withdrawal: 10,
            dst_public_withdrawal: 100,
            dst_cancellation: 290,
        }
    }

    #[test]
    fn pack_unpack_round_trips() {
        let offsets = sample_offsets();
        let packed = Timelocks::pack(offsets, 1_000);
        let (unpacked, deployed_at) = packed.unpack();
        assert_eq!(unpacked, offsets);
        assert_eq!(deployed_at, 1_000);
    }

    #[test]
    fn pack_unpack_round_trips_at_u32_max() {
        let offsets = PhaseOffsets {
            src_withdrawal: 0,
            src_public_withdrawal: 0,
            src_cancellation: u32::MAX,
            src_public_cancellation: u32::MAX,
            dst_withdrawal: 0,
            dst_public_withdrawal: 0,
            dst_cancellation: u32::MAX - 1,
        };
        let packed = Timelocks::pack(offsets, u32::MAX);
        let (unpacked, deployed_at) = packed.unpack();
        assert_eq!(unpacked, offsets);
        assert_eq!(deployed_at, u32::MAX);
    }

    #[test]
    fn with_deployed_at_only_touches_top_bits() {
        let offsets = sample_offsets();
        let packed = Timelocks::pack(offsets, 1_000).with_deployed_at(2_000);
        let (unpacked, deployed_at) = packed.unpack();
        assert_eq!(unpacked, offsets);
        assert_eq!(deployed_at, 2_000);
    }

    #[test]
    fn phase_deadline_is_deployed_at_plus_offset() {
        let packed = Timelocks::pack(sample_offsets(), 1_000);
        assert_eq!(packed.phase_deadline(Phase::SrcWithdrawal), 1_010);
        assert_eq!(packed.phase_deadline(Phase::SrcCancellation), 1_300);
    }

    #[test]
    fn rescue_deadline_adds_rescue_delay_to_deployed_at() {
        let packed = Timelocks::pack(sample_offsets(), 1_000);
        assert_eq!(packed.rescue_deadline(3_600), 4_600);
    }

    #[test]
    fn boundary_second_belongs_to_the_later_phase() {
        let packed = Timelocks::pack(sample_offsets(), 1_000);
        // deadline for SrcWithdrawal is 1_010.
        assert!(!packed.is_after(Phase::SrcWithdrawal, 1_009));
        assert!(packed.is_after(Phase::SrcWithdrawal, 1_010));
        assert!(packed.is_before(Phase::SrcWithdrawal, 1_009));
        assert!(!packed.is_before(Phase::SrcWithdrawal, 1_010));
    }

    #[test]
    fn well_ordered_offsets_pass_validation() {
        let packed = Timelocks::pack(sample_offsets(), 1_000);
        assert!(packed.validate_ordering().is_ok());
    }

    #[test]
    fn dst_cancellation_not_strictly_before_src_cancellation_is_rejected() {
        let mut offsets = sample_offsets();
        offsets.dst_cancellation = offsets.src_cancellation; // must be strictly less
        let packed = Timelocks::pack(offsets, 1_000);
        assert_eq!(packed.validate_ordering(), Err(SwapError::InvalidTime));
    }

    #[test]
    fn src_public_withdrawal_not_before_src_cancellation_is_rejected() {
        let mut offsets = sample_offsets();
        offsets.src_public_withdrawal = offsets.src_cancellation; // must be strictly less
        let packed = Timelocks::pack(offsets, 1_000);
        assert_eq!(packed.validate_ordering(), Err(SwapError::InvalidTime));
    }
}
