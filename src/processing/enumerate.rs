//! Subnet enumeration.
//!
//! Splits a source block into every sub-block of a target prefix length,
//! walking them lazily so memory use never depends on how many exist.

use crate::error::PlanError;
use crate::models::{Ipv6Net, SubnetPlan, SubnetRequest, MAX_LENGTH};
use std::iter::FusedIterator;

/// Default bound on how many subnets a front end may realise per request.
pub const DEFAULT_MAX_RESULTS: u64 = 1 << 20;

/// Validate a request and return its plan.
///
/// The plan is unbounded: its [`Subnets`] iterator can walk any count up to
/// 2^128 without allocating.
///
/// # Examples
/// ```
/// use ipv6_subnet_planner::processing::enumerate;
/// let plan = enumerate("3fff:1::/32", 48).unwrap();
/// assert_eq!(plan.total().to_string(), "65536");
/// assert_eq!(plan.first().unwrap().to_string(), "3fff:1::/48");
/// ```
pub fn enumerate(source: &str, target_len: i64) -> Result<SubnetPlan, PlanError> {
    let source = Ipv6Net::new(source)?;
    let request = SubnetRequest::new(source, target_len)?;
    log::debug!(
        "enumerate {source} -> /{target_len}: {} subnets",
        request.count()
    );
    Ok(SubnetPlan::new(request))
}

/// Like [`enumerate`], but for callers that realise the subnets.
///
/// Fails with [`PlanError::ResultSetTooLarge`] when the number of blocks that
/// would be returned, `min(limit, total)` or `total` without a limit, is
/// greater than `max_results`.
pub fn enumerate_limited(
    source: &str,
    target_len: i64,
    limit: Option<u64>,
    max_results: u64,
) -> Result<SubnetPlan, PlanError> {
    let plan = enumerate(source, target_len)?;
    let total = plan.total();
    let too_large = match limit {
        Some(limit) => limit > max_results && total.exceeds(max_results),
        None => total.exceeds(max_results),
    };
    if too_large {
        log::warn!("refusing to realise {total} subnets (max {max_results}, limit {limit:?})");
        return Err(PlanError::ResultSetTooLarge {
            total,
            max: max_results,
        });
    }
    Ok(plan.with_limit(limit))
}

/// Lazy, ascending walk over the blocks of a [`SubnetPlan`].
///
/// Holds only the next and last base address, so `nth` and `next_back` are
/// O(1) no matter how many blocks lie in between.
#[derive(Debug, Clone)]
pub struct Subnets {
    front: u128,
    back: u128,
    shift: u32,
    len: u8,
    done: bool,
}

impl Subnets {
    /// `target_len` must be in `source.prefix_len() + 1..=128`.
    pub(crate) fn new(source: Ipv6Net, target_len: u8, limit: Option<u64>) -> Subnets {
        debug_assert!(target_len > source.prefix_len() && target_len <= MAX_LENGTH);
        let shift = u32::from(MAX_LENGTH - target_len);
        let front = source.bits();
        let last_block = (u128::from(source.hi()) >> shift) << shift;

        let back = match limit {
            Some(limit) => {
                let max_index = (last_block - front) >> shift;
                let index = max_index.min(u128::from(limit.saturating_sub(1)));
                front + (index << shift)
            }
            None => last_block,
        };

        Subnets {
            front,
            back,
            shift,
            len: target_len,
            done: limit == Some(0),
        }
    }

    fn step(&self) -> u128 {
        1u128 << self.shift
    }

    /// Blocks left to yield, saturating at `u128::MAX` for the full 2^128 walk.
    pub fn remaining(&self) -> u128 {
        if self.done {
            0
        } else {
            ((self.back - self.front) >> self.shift).saturating_add(1)
        }
    }
}

impl Iterator for Subnets {
    type Item = Ipv6Net;

    fn next(&mut self) -> Option<Ipv6Net> {
        if self.done {
            return None;
        }
        let net = Ipv6Net::from_bits(self.front, self.len);
        if self.front == self.back {
            self.done = true;
        } else {
            self.front += self.step();
        }
        Some(net)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<Ipv6Net> {
        let n = n as u128;
        if n >= self.remaining() {
            self.done = true;
            return None;
        }
        self.front += n << self.shift;
        self.next()
    }

    fn last(mut self) -> Option<Ipv6Net> {
        self.next_back()
    }
}

impl DoubleEndedIterator for Subnets {
    fn next_back(&mut self) -> Option<Ipv6Net> {
        if self.done {
            return None;
        }
        let net = Ipv6Net::from_bits(self.back, self.len);
        if self.front == self.back {
            self.done = true;
        } else {
            self.back -= self.step();
        }
        Some(net)
    }
}

impl FusedIterator for Subnets {}
