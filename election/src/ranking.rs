//! Deterministic top-K selection over `(address, stake)` pairs.
//!
//! Stakes alone do not uniquely order delegates, so ties are broken by
//! ascending address. A bounded min-heap of size `k` keeps the cost at
//! O(D log K) for D candidates.

use autonomix_types::{Address, TokenAmount};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A candidate in ranking order: greater means better placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Ranked {
    stake: TokenAmount,
    address: Address,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.stake
            .cmp(&other.stake)
            // Lower address wins a tie, so it must compare greater.
            .then_with(|| other.address.cmp(&self.address))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The `k` best candidates, best first.
///
/// Duplicate addresses in the input are not deduplicated; the stake ledger
/// never yields any.
pub fn select_top(
    candidates: impl IntoIterator<Item = (Address, TokenAmount)>,
    k: usize,
) -> Vec<(Address, TokenAmount)> {
    if k == 0 {
        return Vec::new();
    }
    // Min-heap of the current best k: the root is the weakest member.
    let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(k + 1);
    for (address, stake) in candidates {
        let candidate = Ranked { stake, address };
        if heap.len() < k {
            heap.push(Reverse(candidate));
        } else if let Some(Reverse(weakest)) = heap.peek() {
            if candidate > *weakest {
                heap.pop();
                heap.push(Reverse(candidate));
            }
        }
    }
    // Ascending Reverse order is descending rank.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(r)| (r.address, r.stake))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn amt(n: u128) -> TokenAmount {
        TokenAmount::new(n)
    }

    #[test]
    fn orders_by_stake_descending() {
        let top = select_top(vec![(addr(1), amt(1)), (addr(2), amt(5)), (addr(3), amt(3))], 21);
        assert_eq!(
            top,
            vec![(addr(2), amt(5)), (addr(3), amt(3)), (addr(1), amt(1))]
        );
    }

    #[test]
    fn truncates_to_k() {
        let top = select_top(vec![(addr(1), amt(1)), (addr(2), amt(5)), (addr(3), amt(3))], 2);
        assert_eq!(top, vec![(addr(2), amt(5)), (addr(3), amt(3))]);
    }

    #[test]
    fn ties_broken_by_ascending_address() {
        let top = select_top(
            vec![(addr(9), amt(4)), (addr(3), amt(4)), (addr(5), amt(4)), (addr(1), amt(2))],
            2,
        );
        assert_eq!(top, vec![(addr(3), amt(4)), (addr(5), amt(4))]);
    }

    #[test]
    fn result_independent_of_input_order() {
        let mut input: Vec<(Address, TokenAmount)> =
            (1..40).map(|i| (addr(i), amt((i % 7) as u128))).collect();
        let forward = select_top(input.clone(), 10);
        input.reverse();
        assert_eq!(select_top(input, 10), forward);
    }

    #[test]
    fn empty_and_zero_k() {
        assert!(select_top(Vec::new(), 21).is_empty());
        assert!(select_top(vec![(addr(1), amt(1))], 0).is_empty());
    }
}
