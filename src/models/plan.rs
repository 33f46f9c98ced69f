//! Subnetting request and plan types.

use super::ipv6::{is_nibble_aligned, Ipv6Net, MAX_LENGTH};
use crate::error::PlanError;
use crate::processing::Subnets;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Decimal text of 2^128, the only count that does not fit in a u128.
const TWO_POW_128: &str = "340282366920938463463374607431768211456";

/// Exact number of subnets in a plan, always a power of two.
///
/// Stored as the exponent so that splitting `::/0` into /128 blocks (2^128)
/// is still representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubnetCount {
    log2: u8,
}

impl SubnetCount {
    /// Exponents above 128 are clamped to 128.
    pub fn from_log2(log2: u8) -> SubnetCount {
        SubnetCount {
            log2: log2.min(MAX_LENGTH),
        }
    }

    pub fn log2(&self) -> u8 {
        self.log2
    }

    /// The count as an integer, None only for 2^128.
    pub fn as_u128(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.log2))
    }

    pub fn as_u64(&self) -> Option<u64> {
        1u64.checked_shl(u32::from(self.log2))
    }

    /// True when the count is strictly greater than `n`.
    pub fn exceeds(&self, n: u64) -> bool {
        match self.as_u128() {
            Some(count) => count > u128::from(n),
            None => true,
        }
    }

    /// `min(self, n)` as a u64.
    pub fn min_u64(&self, n: u64) -> u64 {
        match self.as_u64() {
            Some(count) => count.min(n),
            None => n,
        }
    }
}

impl fmt::Display for SubnetCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.as_u128() {
            Some(count) => write!(f, "{count}"),
            None => f.write_str(TWO_POW_128),
        }
    }
}

impl Serialize for SubnetCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_u128() {
            Some(count) => serializer.serialize_u128(count),
            None => serializer.serialize_str(TWO_POW_128),
        }
    }
}

/// Advisory note attached to plans whose target length is not a multiple of 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentWarning {
    target_len: u8,
}

impl AlignmentWarning {
    /// Warning for `target_len`, None when it sits on a nibble boundary.
    pub fn check(target_len: u8) -> Option<AlignmentWarning> {
        if is_nibble_aligned(target_len) {
            None
        } else {
            Some(AlignmentWarning { target_len })
        }
    }

    pub fn target_len(&self) -> u8 {
        self.target_len
    }
}

impl fmt::Display for AlignmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Warning: /{} will not output prefixes on a nibble boundary. Maybe rethink what you are doing?",
            self.target_len
        )
    }
}

impl Serialize for AlignmentWarning {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A validated (source block, target prefix length) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubnetRequest {
    source: Ipv6Net,
    target_len: u8,
}

impl SubnetRequest {
    /// Validate `target_len` against `source`.
    ///
    /// The target must lie in 0..=128 and be strictly longer than the source
    /// prefix; equal lengths would produce no new subnets.
    pub fn new(source: Ipv6Net, target_len: i64) -> Result<SubnetRequest, PlanError> {
        let target = u8::try_from(target_len)
            .ok()
            .filter(|len| *len <= MAX_LENGTH)
            .ok_or(PlanError::PrefixOutOfRange(target_len))?;
        if target <= source.prefix_len() {
            return Err(PlanError::InvalidPrefixRelation {
                source_len: source.prefix_len(),
                target_len,
            });
        }
        Ok(SubnetRequest {
            source,
            target_len: target,
        })
    }

    pub fn source(&self) -> Ipv6Net {
        self.source
    }

    pub fn target_len(&self) -> u8 {
        self.target_len
    }

    pub fn count(&self) -> SubnetCount {
        SubnetCount::from_log2(self.target_len - self.source.prefix_len())
    }

    pub fn warning(&self) -> Option<AlignmentWarning> {
        AlignmentWarning::check(self.target_len)
    }
}

/// The ordered partition of a source block into equal target-length blocks.
///
/// A plan holds no subnets itself; [`SubnetPlan::subnets`] walks them lazily
/// and starts over from the first block on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetPlan {
    request: SubnetRequest,
    limit: Option<u64>,
}

impl SubnetPlan {
    pub fn new(request: SubnetRequest) -> SubnetPlan {
        SubnetPlan {
            request,
            limit: None,
        }
    }

    /// Only the first `limit` blocks will be returned, `total()` is unaffected.
    pub fn with_limit(self, limit: Option<u64>) -> SubnetPlan {
        SubnetPlan { limit, ..self }
    }

    pub fn request(&self) -> &SubnetRequest {
        &self.request
    }

    pub fn source(&self) -> Ipv6Net {
        self.request.source()
    }

    pub fn target_len(&self) -> u8 {
        self.request.target_len()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Number of blocks in the full partition, ignoring any limit.
    pub fn total(&self) -> SubnetCount {
        self.request.count()
    }

    /// Number of blocks [`SubnetPlan::subnets`] yields.
    ///
    /// Saturates at `u128::MAX` for an unlimited `::/0` to /128 plan.
    pub fn returned(&self) -> u128 {
        match self.limit {
            Some(limit) => u128::from(self.total().min_u64(limit)),
            None => self.total().as_u128().unwrap_or(u128::MAX),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.limit.map_or(false, |limit| self.total().exceeds(limit))
    }

    pub fn warning(&self) -> Option<AlignmentWarning> {
        self.request.warning()
    }

    pub fn subnets(&self) -> Subnets {
        Subnets::new(self.source(), self.target_len(), self.limit)
    }

    pub fn first(&self) -> Option<Ipv6Net> {
        self.subnets().next()
    }

    /// Last returned block, found without walking the ones before it.
    pub fn last(&self) -> Option<Ipv6Net> {
        self.subnets().next_back()
    }
}

struct SubnetSeq<'a>(&'a SubnetPlan);

impl Serialize for SubnetSeq<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.subnets())
    }
}

impl Serialize for SubnetPlan {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SubnetPlan", 4)?;
        state.serialize_field("warning", &self.warning())?;
        state.serialize_field("total_count", &self.total())?;
        state.serialize_field("returned_count", &self.returned())?;
        state.serialize_field("subnets", &SubnetSeq(self))?;
        state.end()
    }
}
