// Symbols, tags and the pair alphabet.

use hashbrown::HashMap;

use crate::LoadError;
use crate::compression::ByteReader;

/// Index of a tag in the alphabet's tag table.
pub type TagId = u32;

/// One transducer symbol.
///
/// On disk symbols are signed integers: `0` is epsilon, positive values are
/// Unicode scalar values and `-(k + 1)` is tag `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Epsilon,
    Char(char),
    Tag(TagId),
}

impl Symbol {
    /// Decode a raw signed symbol. Returns `None` for tags outside
    /// `tag_count` and for values that are not Unicode scalar values.
    pub fn from_raw(raw: i64, tag_count: usize) -> Option<Symbol> {
        match raw {
            0 => Some(Symbol::Epsilon),
            r if r > 0 => u32::try_from(r).ok().and_then(char::from_u32).map(Symbol::Char),
            r => {
                let index = usize::try_from(-r - 1).ok()?;
                (index < tag_count).then_some(Symbol::Tag(index as TagId))
            }
        }
    }

    /// Encode back to the raw signed form.
    pub fn to_raw(self) -> i64 {
        match self {
            Symbol::Epsilon => 0,
            Symbol::Char(c) => i64::from(c as u32),
            Symbol::Tag(id) => -i64::from(id) - 1,
        }
    }

    #[inline]
    pub fn is_epsilon(self) -> bool {
        self == Symbol::Epsilon
    }

    #[inline]
    pub fn is_tag(self) -> bool {
        matches!(self, Symbol::Tag(_))
    }
}

/// Symbol table of a compiled transducer.
///
/// Transitions do not store symbols directly: each refers to an entry in the
/// pair list, which holds an `(input, output)` symbol pair. Tags are stored
/// with their angle brackets (`<n>`).
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    letters: Vec<char>,
    tags: Vec<String>,
    tag_index: HashMap<String, TagId>,
    pairs: Vec<(Symbol, Symbol)>,
}

impl Alphabet {
    /// Read the tag list and the pair list.
    ///
    /// Pair members are biased by the tag count so that they are never
    /// negative on disk.
    pub(crate) fn read(reader: &mut ByteReader<'_>, letters: String) -> Result<Self, LoadError> {
        let tag_count = reader.read_count("tag count")?;
        let mut tags = Vec::with_capacity(tag_count);
        let mut tag_index = HashMap::with_capacity(tag_count);
        for id in 0..tag_count {
            let name = reader.read_string("tag name")?;
            let tag = format!("<{name}>");
            tag_index.entry(tag.clone()).or_insert(id as TagId);
            tags.push(tag);
        }

        let pair_count = reader.read_count("pair count")?;
        let mut pairs = Vec::with_capacity(pair_count);
        for _ in 0..pair_count {
            let left = reader.read_multibyte("pair")?;
            let right = reader.read_multibyte("pair")?;
            pairs.push((
                decode_biased(left, tag_count)?,
                decode_biased(right, tag_count)?,
            ));
        }

        Ok(Self {
            letters: letters.chars().collect(),
            tags,
            tag_index,
            pairs,
        })
    }

    /// Alphabetic characters declared by the dictionary.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn is_letter(&self, c: char) -> bool {
        self.letters.contains(&c)
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Bracketed name of a tag.
    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tags.get(id as usize).map(String::as_str)
    }

    /// Look up a bracketed tag (`<n>`).
    pub fn tag_id(&self, tag: &str) -> Option<TagId> {
        self.tag_index.get(tag).copied()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn pair(&self, index: usize) -> Option<(Symbol, Symbol)> {
        self.pairs.get(index).copied()
    }

    /// Decode a biased on-disk symbol against this alphabet.
    pub fn decode_biased(&self, value: u32) -> Result<Symbol, LoadError> {
        decode_biased(value, self.tags.len())
    }

    /// Append the textual form of `symbol` to `out`. Epsilon renders as nothing.
    pub fn render(&self, symbol: Symbol, out: &mut String) {
        match symbol {
            Symbol::Epsilon => {}
            Symbol::Char(c) => out.push(c),
            Symbol::Tag(id) => {
                if let Some(name) = self.tag_name(id) {
                    out.push_str(name);
                }
            }
        }
    }

    /// Render a symbol sequence.
    pub fn render_all(&self, symbols: &[Symbol]) -> String {
        let mut out = String::new();
        for &s in symbols {
            self.render(s, &mut out);
        }
        out
    }
}

fn decode_biased(value: u32, tag_count: usize) -> Result<Symbol, LoadError> {
    let raw = i64::from(value) - tag_count as i64;
    Symbol::from_raw(raw, tag_count)
        .ok_or_else(|| LoadError::Malformed(format!("symbol {raw} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::{write_multibyte, write_string};

    /// Build an alphabet section: tag names, then biased pairs.
    fn make_alphabet(tags: &[&str], pairs: &[(i64, i64)]) -> Vec<u8> {
        let bias = tags.len() as i64;
        let mut buf = Vec::new();
        write_multibyte(&mut buf, tags.len() as u32).unwrap();
        for t in tags {
            write_string(&mut buf, t).unwrap();
        }
        write_multibyte(&mut buf, pairs.len() as u32).unwrap();
        for &(l, r) in pairs {
            write_multibyte(&mut buf, (l + bias) as u32).unwrap();
            write_multibyte(&mut buf, (r + bias) as u32).unwrap();
        }
        buf
    }

    #[test]
    fn raw_symbol_decoding() {
        assert_eq!(Symbol::from_raw(0, 2), Some(Symbol::Epsilon));
        assert_eq!(Symbol::from_raw('a' as i64, 2), Some(Symbol::Char('a')));
        assert_eq!(Symbol::from_raw(-1, 2), Some(Symbol::Tag(0)));
        assert_eq!(Symbol::from_raw(-2, 2), Some(Symbol::Tag(1)));
        assert_eq!(Symbol::from_raw(-3, 2), None);
        assert_eq!(Symbol::from_raw(0xD800, 2), None);
    }

    #[test]
    fn raw_encoding_inverts_decoding() {
        for s in [Symbol::Epsilon, Symbol::Char('ö'), Symbol::Tag(4)] {
            assert_eq!(Symbol::from_raw(s.to_raw(), 5), Some(s));
        }
    }

    #[test]
    fn read_tags_and_pairs() {
        let data = make_alphabet(&["n", "def"], &[(0, 0), ('a' as i64, 'a' as i64), (-2, 'c' as i64)]);
        let mut r = ByteReader::new(&data, 0);
        let alpha = Alphabet::read(&mut r, "abc".to_string()).unwrap();

        assert_eq!(alpha.tag_count(), 2);
        assert_eq!(alpha.tag_name(0), Some("<n>"));
        assert_eq!(alpha.tag_id("<def>"), Some(1));
        assert_eq!(alpha.tag_id("def"), None);
        assert_eq!(alpha.pair_count(), 3);
        assert_eq!(alpha.pair(0), Some((Symbol::Epsilon, Symbol::Epsilon)));
        assert_eq!(alpha.pair(2), Some((Symbol::Tag(1), Symbol::Char('c'))));
        assert_eq!(alpha.pair(3), None);
        assert!(alpha.is_letter('b'));
        assert!(!alpha.is_letter('z'));
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn reject_pair_with_surrogate_symbol() {
        let data = make_alphabet(&["n"], &[(0xD800, 0)]);
        let mut r = ByteReader::new(&data, 0);
        assert!(matches!(
            Alphabet::read(&mut r, String::new()),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn reject_truncated_pair_list() {
        let mut data = make_alphabet(&["n"], &[(0, 0), (1, 1)]);
        data.pop();
        let mut r = ByteReader::new(&data, 0);
        assert!(matches!(
            Alphabet::read(&mut r, String::new()),
            Err(LoadError::Truncated { .. })
        ));
    }

    #[test]
    fn render_symbols() {
        let data = make_alphabet(&["n", "pl"], &[]);
        let mut r = ByteReader::new(&data, 0);
        let alpha = Alphabet::read(&mut r, String::new()).unwrap();
        let text = alpha.render_all(&[
            Symbol::Char('c'),
            Symbol::Epsilon,
            Symbol::Char('a'),
            Symbol::Tag(0),
            Symbol::Tag(1),
        ]);
        assert_eq!(text, "ca<n><pl>");
    }
}
