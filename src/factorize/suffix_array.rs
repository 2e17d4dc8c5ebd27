//! Suffix array construction over integer alphabets.
//!
//! Prefix doubling with counting-sort passes (Manber–Myers): each round sorts the
//! suffixes by their first `2k` symbols using the ranks from the previous round, so
//! the whole build is `O(n log n)` time and `O(n)` extra space. Symbols are first
//! compressed to dense ranks, so the alphabet can be any `u32` range.

/// Builds the suffix array of `text`: `sa[r]` is the start of the `r`-th smallest suffix.
pub fn build_suffix_array(text: &[u32]) -> Vec<usize> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }

    // Dense initial ranks.
    let mut distinct: Vec<u32> = text.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    let mut rank: Vec<usize> = text
        .iter()
        .map(|s| distinct.binary_search(s).unwrap_or(0))
        .collect();
    let mut classes = distinct.len();

    let mut sa: Vec<usize> = (0..n).collect();
    counting_sort_by_rank(&mut sa, &rank, classes);

    let mut second = Vec::with_capacity(n);
    let mut next_rank = vec![0usize; n];
    let mut k = 1;

    while classes < n && k < n {
        // Order by the second half: suffixes without one come first.
        second.clear();
        second.extend(n - k..n);
        second.extend(sa.iter().filter(|&&p| p >= k).map(|&p| p - k));

        // Stable counting sort of `second` by first-half rank.
        let mut count = vec![0usize; classes + 1];
        for &p in &second {
            count[rank[p] + 1] += 1;
        }
        for c in 1..count.len() {
            count[c] += count[c - 1];
        }
        for &p in &second {
            sa[count[rank[p]]] = p;
            count[rank[p]] += 1;
        }

        // Re-rank by (rank[p], rank[p + k]).
        let key = |p: usize| (rank[p], if p + k < n { rank[p + k] + 1 } else { 0 });
        next_rank[sa[0]] = 0;
        classes = 1;
        for r in 1..n {
            if key(sa[r]) != key(sa[r - 1]) {
                classes += 1;
            }
            next_rank[sa[r]] = classes - 1;
        }
        std::mem::swap(&mut rank, &mut next_rank);
        k *= 2;
    }

    sa
}

/// Stable counting sort of positions by `rank`.
fn counting_sort_by_rank(sa: &mut [usize], rank: &[usize], classes: usize) {
    let mut count = vec![0usize; classes + 1];
    for &r in rank {
        count[r + 1] += 1;
    }
    for c in 1..count.len() {
        count[c] += count[c - 1];
    }
    for p in 0..rank.len() {
        sa[count[rank[p]]] = p;
        count[rank[p]] += 1;
    }
}

/// Inverse of a suffix array: `rank[sa[r]] == r`.
pub fn inverse_suffix_array(sa: &[usize]) -> Vec<usize> {
    let mut rank = vec![0usize; sa.len()];
    for (r, &p) in sa.iter().enumerate() {
        rank[p] = r;
    }
    rank
}

/// Kasai's linear-time LCP array: `lcp[r]` is the common-prefix length of the suffixes
/// at ranks `r - 1` and `r`; `lcp[0]` is 0.
pub fn lcp_array(text: &[u32], sa: &[usize], rank: &[usize]) -> Vec<usize> {
    let n = text.len();
    let mut lcp = vec![0usize; n];
    let mut h = 0usize;
    for i in 0..n {
        if rank[i] == 0 {
            h = 0;
            continue;
        }
        let j = sa[rank[i] - 1];
        while i + h < n && j + h < n && text[i + h] == text[j + h] {
            h += 1;
        }
        lcp[rank[i]] = h;
        h = h.saturating_sub(1);
    }
    lcp
}

/// Burrows–Wheeler transform read off a suffix array (the suffix at 0 wraps to the end).
pub fn bwt_from_suffix_array(text: &[u32], sa: &[usize]) -> Vec<u32> {
    sa.iter()
        .map(|&p| if p == 0 { text[text.len() - 1] } else { text[p - 1] })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(text: &[u32]) -> Vec<usize> {
        let mut sa: Vec<usize> = (0..text.len()).collect();
        sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        sa
    }

    #[test]
    fn test_banana() {
        // b a n a n a
        let text = [1, 0, 2, 0, 2, 0];
        assert_eq!(build_suffix_array(&text), vec![5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_matches_naive_sort_on_mixed_inputs() {
        let inputs: Vec<Vec<u32>> = vec![
            vec![0; 17],
            vec![0, 1, 0, 1, 0, 1, 0, 1, 1],
            vec![7, 3, 3, 900, 3, 7, 3, 3, 900, 0],
            (0..50).map(|i| (i * 37 % 11) as u32).collect(),
            vec![42],
        ];
        for text in inputs {
            assert_eq!(build_suffix_array(&text), naive(&text), "text {:?}", text);
        }
    }

    #[test]
    fn test_empty() {
        assert!(build_suffix_array(&[]).is_empty());
    }

    #[test]
    fn test_lcp_of_banana() {
        // a, ana, anana, banana, na, nana
        let text = [1, 0, 2, 0, 2, 0];
        let sa = build_suffix_array(&text);
        let rank = inverse_suffix_array(&sa);
        assert_eq!(rank, vec![3, 2, 5, 1, 4, 0]);
        assert_eq!(lcp_array(&text, &sa, &rank), vec![0, 1, 3, 0, 0, 2]);
    }

    #[test]
    fn test_lcp_matches_direct_comparison() {
        let text: Vec<u32> = (0..120u32).map(|i| (i * i / 3 + i) % 3).collect();
        let sa = build_suffix_array(&text);
        let lcp = lcp_array(&text, &sa, &inverse_suffix_array(&sa));
        for r in 1..sa.len() {
            let direct = text[sa[r - 1]..]
                .iter()
                .zip(&text[sa[r]..])
                .take_while(|(a, b)| a == b)
                .count();
            assert_eq!(lcp[r], direct, "rank {}", r);
        }
    }

    #[test]
    fn test_bwt_of_banana() {
        let text = [1, 0, 2, 0, 2, 0];
        let sa = build_suffix_array(&text);
        // n n b a a a
        assert_eq!(bwt_from_suffix_array(&text, &sa), vec![2, 2, 1, 0, 0, 0]);
    }
}
