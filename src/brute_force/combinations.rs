//! Lexicographic k-combinations of `0..n`.

/// Binomial coefficient C(n, k), `None` on u64 overflow.
pub fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // Exact at every step: acc * (n - i) is divisible by (i + 1).
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return None;
        }
    }
    Some(acc as u64)
}

/// The combination at position `rank` in lexicographic order.
///
/// `rank` must be below `binomial(n, k)`.
pub fn unrank(mut rank: u64, n: usize, k: usize) -> Vec<usize> {
    let mut combo = Vec::with_capacity(k);
    let mut next = 0;
    for p in 0..k {
        let mut c = next;
        loop {
            // Combinations that start with `c` at position p.
            let block = binomial(n - c - 1, k - p - 1).unwrap_or(u64::MAX);
            if rank < block {
                break;
            }
            rank -= block;
            c += 1;
        }
        combo.push(c);
        next = c + 1;
    }
    combo
}

/// Advances `combo` to the next combination of `0..n` in lexicographic order.
///
/// Returns `false` (leaving `combo` unchanged) after the last combination.
pub fn next_combination(combo: &mut [usize], n: usize) -> bool {
    let k = combo.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if combo[i] < n - k + i {
            combo[i] += 1;
            for j in (i + 1)..k {
                combo[j] = combo[j - 1] + 1;
            }
            return true;
        }
    }
    false
}
