//! Burrows-Wheeler Transform over 16-bit tokens.
//!
//! The forward transform sorts all cyclic rotations of the token block with
//! a prefix-doubling suffix sort (counting sort per round, O(n log n)) and
//! emits the last column plus the row of the original string. Sorting
//! rotations rather than plain suffixes keeps the LF-mapping inverse exact
//! for every input, including periodic blocks.

use trisplit_core::error::{Result, TriSplitError};

/// Number of distinct 16-bit tokens.
const TOKEN_ALPHABET: usize = 1 << 16;

/// Result of the forward transform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BwtResult {
    /// Last column of the sorted rotation matrix.
    pub l_stream: Vec<u16>,
    /// Row of the original string in the sorted rotation matrix.
    pub primary_index: u32,
}

/// Sort the cyclic rotations of `tokens`, returning start positions in
/// ascending rotation order. Ties between identical rotations are broken
/// arbitrarily, which the inverse tolerates.
fn sort_rotations(tokens: &[u16]) -> Vec<u32> {
    let n = tokens.len();

    let mut order: Vec<u32> = vec![0; n];
    let mut class: Vec<u32> = vec![0; n];

    // Round 0: counting sort by the first token of each rotation
    let mut count = vec![0u32; TOKEN_ALPHABET];
    for &t in tokens {
        count[t as usize] += 1;
    }
    let mut pos = 0u32;
    for c in count.iter_mut() {
        let freq = *c;
        *c = pos;
        pos += freq;
    }
    for (i, &t) in tokens.iter().enumerate() {
        order[count[t as usize] as usize] = i as u32;
        count[t as usize] += 1;
    }

    class[order[0] as usize] = 0;
    let mut classes = 1u32;
    for i in 1..n {
        if tokens[order[i] as usize] != tokens[order[i - 1] as usize] {
            classes += 1;
        }
        class[order[i] as usize] = classes - 1;
    }

    // Doubling rounds: sort by (class[i], class[i + len]) with a stable
    // counting sort keyed on the first half
    let mut shifted: Vec<u32> = vec![0; n];
    let mut new_class: Vec<u32> = vec![0; n];
    let mut len = 1usize;

    while len < n && (classes as usize) < n {
        for i in 0..n {
            let o = order[i] as usize;
            shifted[i] = if o >= len {
                (o - len) as u32
            } else {
                (o + n - len) as u32
            };
        }

        let mut cnt = vec![0u32; classes as usize];
        for &c in class.iter() {
            cnt[c as usize] += 1;
        }
        let mut pos = 0u32;
        for c in cnt.iter_mut() {
            let freq = *c;
            *c = pos;
            pos += freq;
        }
        for &start in shifted.iter() {
            let cls = class[start as usize] as usize;
            order[cnt[cls] as usize] = start;
            cnt[cls] += 1;
        }

        new_class[order[0] as usize] = 0;
        let mut next_classes = 1u32;
        for i in 1..n {
            let cur = order[i] as usize;
            let prev = order[i - 1] as usize;
            let cur_key = (class[cur], class[(cur + len) % n]);
            let prev_key = (class[prev], class[(prev + len) % n]);
            if cur_key != prev_key {
                next_classes += 1;
            }
            new_class[cur] = next_classes - 1;
        }

        std::mem::swap(&mut class, &mut new_class);
        classes = next_classes;
        len <<= 1;
    }

    order
}

/// Apply the forward transform.
pub fn apply(tokens: &[u16]) -> BwtResult {
    if tokens.is_empty() {
        return BwtResult::default();
    }

    let n = tokens.len();
    let rotation_order = sort_rotations(tokens);

    let mut l_stream = Vec::with_capacity(n);
    let mut primary_index = 0u32;
    for (row, &start) in rotation_order.iter().enumerate() {
        if start == 0 {
            primary_index = row as u32;
            l_stream.push(tokens[n - 1]);
        } else {
            l_stream.push(tokens[start as usize - 1]);
        }
    }

    BwtResult {
        l_stream,
        primary_index,
    }
}

/// Invert the transform with the standard LF-mapping.
pub fn inverse_apply(bwt: &BwtResult) -> Result<Vec<u16>> {
    let l_stream = &bwt.l_stream;
    let n = l_stream.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if bwt.primary_index as usize >= n {
        return Err(TriSplitError::corrupted(
            0,
            format!(
                "primary index {} out of range for {} tokens",
                bwt.primary_index, n
            ),
        ));
    }

    // C[s]: number of tokens strictly smaller than s
    let mut cumulative = vec![0u32; TOKEN_ALPHABET];
    for &s in l_stream {
        cumulative[s as usize] += 1;
    }
    let mut sum = 0u32;
    for c in cumulative.iter_mut() {
        let freq = *c;
        *c = sum;
        sum += freq;
    }

    // p[i] = C[l[i]] + rank of l[i] among the prior occurrences
    let mut seen = vec![0u32; TOKEN_ALPHABET];
    let mut lf = vec![0u32; n];
    for (i, &s) in l_stream.iter().enumerate() {
        let s = s as usize;
        lf[i] = cumulative[s] + seen[s];
        seen[s] += 1;
    }

    let mut original = vec![0u16; n];
    let mut current = bwt.primary_index as usize;
    for i in 0..n {
        original[n - 1 - i] = l_stream[current];
        current = lf[current] as usize;
    }

    Ok(original)
}
