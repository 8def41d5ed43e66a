//! Token filtering module
//!
//! Splits lines into whitespace-separated tokens and keeps the ones that parse
//! as base-10 integers inside the accepted range.

/// Inclusive range of accepted integer values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerRange {
    pub min: i32,
    pub max: i32,
}

impl IntegerRange {
    /// The closed interval [-1023, 1023]
    pub const DEFAULT: Self = Self { min: -1023, max: 1023 };

    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }

    /// Number of distinct values in the range
    pub fn span(&self) -> usize {
        (i64::from(self.max) - i64::from(self.min) + 1) as usize
    }
}

impl Default for IntegerRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of inspecting a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Accepted(i32),
    OutOfRange,
    Malformed,
}

/// Classify one token against the range
///
/// The whole token must be a signed decimal integer. Anything the integer
/// parser rejects ("5.0", "0x1f", "1_000", "--5") is malformed; integers too
/// large for `i32` can never be in range and count as out of range.
#[inline]
pub fn classify_token(token: &str, range: IntegerRange) -> TokenClass {
    match token.parse::<i32>() {
        Ok(value) if range.contains(value) => TokenClass::Accepted(value),
        Ok(_) => TokenClass::OutOfRange,
        Err(e) => match e.kind() {
            std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
                TokenClass::OutOfRange
            }
            _ => TokenClass::Malformed,
        },
    }
}

/// Token separator: Unicode whitespace plus the ASCII information
/// separators U+001C..=U+001F
#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Split a line on runs of separators, never yielding empty tokens
pub fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(is_separator).filter(|token| !token.is_empty())
}

/// Extract every valid integer on a line
pub fn process_line(line: &str, range: IntegerRange) -> Vec<i32> {
    tokens(line)
        .filter_map(|token| match classify_token(token, range) {
            TokenClass::Accepted(value) => Some(value),
            _ => None,
        })
        .collect()
}

/// Per-line token counts, used for statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TokenCounts {
    pub tokens: u64,
    pub accepted: u64,
    pub out_of_range: u64,
    pub malformed: u64,
}

impl TokenCounts {
    pub fn record(&mut self, class: TokenClass) {
        self.tokens += 1;
        match class {
            TokenClass::Accepted(_) => self.accepted += 1,
            TokenClass::OutOfRange => self.out_of_range += 1,
            TokenClass::Malformed => self.malformed += 1,
        }
    }

    pub fn merge(&mut self, other: TokenCounts) {
        self.tokens += other.tokens;
        self.accepted += other.accepted;
        self.out_of_range += other.out_of_range;
        self.malformed += other.malformed;
    }
}

/// Like [`process_line`] but also tallies why tokens were dropped
pub fn process_line_counted<F>(line: &str, range: IntegerRange, mut accept: F) -> TokenCounts
where
    F: FnMut(i32),
{
    let mut counts = TokenCounts::default();

    for token in tokens(line) {
        let class = classify_token(token, range);
        if let TokenClass::Accepted(value) = class {
            accept(value);
        }
        counts.record(class);
    }

    counts
}
