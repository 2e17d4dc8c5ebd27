//! LZ78 incremental-dictionary parsing.
//!
//! The dictionary is a trie stored as an arena: node `0` is the empty phrase and every
//! other node is `(parent, symbol)`, addressed by its index. Child lookup goes through a
//! single hash map keyed by `(parent, symbol)`, so the parse is `O(n)` expected time and
//! memory grows with the number of phrases, not with the alphabet.

use hashbrown::HashMap;

use crate::error::{ComplexityError, Result};

const ROOT: u32 = 0;

/// One dictionary entry: the phrase `prefix` extended by `symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lz78Phrase {
    /// Arena index of the longest proper prefix (`0` is the empty phrase).
    pub prefix: u32,
    pub symbol: u32,
}

/// Arena-backed phrase trie.
#[derive(Debug, Default)]
pub struct PhraseTrie {
    nodes: Vec<Lz78Phrase>,
    children: HashMap<(u32, u32), u32>,
}

impl PhraseTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Lz78Phrase {
                prefix: ROOT,
                symbol: 0,
            }],
            children: HashMap::new(),
        }
    }

    #[inline]
    pub fn child(&self, node: u32, symbol: u32) -> Option<u32> {
        self.children.get(&(node, symbol)).copied()
    }

    /// Adds `node + symbol` and returns its index.
    pub fn insert(&mut self, node: u32, symbol: u32) -> Result<u32> {
        let id = u32::try_from(self.nodes.len()).map_err(|_| {
            ComplexityError::InternalError("LZ78 dictionary exceeds u32::MAX phrases".to_string())
        })?;
        self.nodes.push(Lz78Phrase {
            prefix: node,
            symbol,
        });
        self.children.insert((node, symbol), id);
        Ok(id)
    }

    /// Number of phrases, not counting the empty root.
    pub fn phrase_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Spells out phrase `id` from the root.
    pub fn phrase(&self, mut id: u32) -> Vec<u32> {
        let mut out = Vec::new();
        while id != ROOT {
            let node = self.nodes[id as usize];
            out.push(node.symbol);
            id = node.prefix;
        }
        out.reverse();
        out
    }
}

/// Result of an LZ78 parse.
#[derive(Debug)]
pub struct Lz78Parse {
    pub trie: PhraseTrie,
    /// Trie node of each emitted factor, in text order.
    pub factors: Vec<u32>,
}

impl Lz78Parse {
    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }
}

/// Parses `text`, keeping the factor list and the dictionary.
pub fn parse(text: &[u32]) -> Result<Lz78Parse> {
    if text.is_empty() {
        return Err(ComplexityError::InvalidInput(
            "cannot factorize an empty sequence".to_string(),
        ));
    }

    let mut trie = PhraseTrie::new();
    let mut factors = Vec::new();
    let mut node = ROOT;

    for &symbol in text {
        match trie.child(node, symbol) {
            Some(next) => node = next,
            None => {
                factors.push(trie.insert(node, symbol)?);
                node = ROOT;
            }
        }
    }
    // Trailing phrase already in the dictionary.
    if node != ROOT {
        factors.push(node);
    }

    Ok(Lz78Parse { trie, factors })
}

/// Number of LZ78 factors of `text`.
pub fn factor_count(text: &[u32]) -> Result<usize> {
    let parsed = parse(text)?;
    crate::log_metric!(
        "event" = "lz78_parse",
        "n" = text.len(),
        "factors" = parsed.factor_count(),
        "dictionary" = parsed.trie.phrase_count()
    );
    Ok(parsed.factor_count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_parse() {
        // a | b | aa | ab | aaa
        let text = [0, 1, 0, 0, 0, 1, 0, 0, 0];
        let parsed = parse(&text).unwrap();
        let phrases: Vec<Vec<u32>> = parsed.factors.iter().map(|&f| parsed.trie.phrase(f)).collect();
        assert_eq!(
            phrases,
            vec![vec![0], vec![1], vec![0, 0], vec![0, 1], vec![0, 0, 0]]
        );
        assert_eq!(parsed.trie.phrase_count(), 5);
    }

    #[test]
    fn test_trailing_known_phrase_counts_once() {
        // a | b | a  (the last `a` is already a phrase)
        let parsed = parse(&[0, 1, 0]).unwrap();
        assert_eq!(parsed.factor_count(), 3);
        assert_eq!(parsed.trie.phrase_count(), 2);
    }

    #[test]
    fn test_factors_concatenate_to_input() {
        let text: Vec<u32> = (0..500u32).map(|i| (i * 7 + i / 3) % 3).collect();
        let parsed = parse(&text).unwrap();
        let rebuilt: Vec<u32> = parsed
            .factors
            .iter()
            .flat_map(|&f| parsed.trie.phrase(f))
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_constant_sequence_grows_by_one() {
        // Phrase lengths 1, 2, 3, ... so 10 = 1 + 2 + 3 + 4 gives four factors.
        assert_eq!(factor_count(&[0; 10]).unwrap(), 4);
        assert_eq!(factor_count(&[9]).unwrap(), 1);
    }

    #[test]
    fn test_empty_is_invalid_input() {
        assert!(matches!(
            factor_count(&[]),
            Err(ComplexityError::InvalidInput(_))
        ));
    }
}
