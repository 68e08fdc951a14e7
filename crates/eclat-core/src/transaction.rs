//! Transaction loading.
//!
//! Input format: one transaction per line, items are decimal non-negative
//! integers separated by spaces, commas or tabs. Lines end with `\n` or `\r`;
//! blank lines are skipped. Any other byte is rejected with its line number.
//!
//! ```text
//! 1 2 5
//! 2,4
//! 2	3
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};

#[inline]
fn is_newline(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

#[inline]
fn is_separator(b: u8) -> bool {
    b == b' ' || b == b',' || b == b'\t'
}

/// Converts a minimum support fraction into an absolute transaction count:
/// `ceil(fraction * transactions)`, never below 1.
///
/// # Errors
///
/// Returns [`Error::InvalidSupport`] if `fraction` is not a positive finite number.
pub fn min_support_count(fraction: f64, transactions: usize) -> Result<u64> {
    if !fraction.is_finite() || fraction <= 0.0 {
        return Err(Error::InvalidSupport(fraction));
    }
    let count = (fraction * transactions as f64).ceil() as u64;
    Ok(count.max(1))
}

/// Immutable list of transactions, indexed by read order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionSet {
    transactions: Vec<Vec<u32>>,
    item_max: Option<u32>,
}

impl TransactionSet {
    /// Builds a set from in-memory item lists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyTransactions`] if the list cannot be indexed
    /// with 32-bit transaction ids.
    pub fn from_transactions(transactions: Vec<Vec<u32>>) -> Result<Self> {
        if transactions.len() as u64 > u64::from(u32::MAX) + 1 {
            return Err(Error::TooManyTransactions(transactions.len()));
        }
        let item_max = transactions.iter().flatten().copied().max();
        Ok(Self {
            transactions,
            item_max,
        })
    }

    /// Reads and parses a transaction file, keeping the first
    /// `round(fraction * n)` transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid bytes or
    /// `fraction` is not positive.
    pub fn from_path<P: AsRef<Path>>(path: P, fraction: f64) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::with_capacity(128 * 1024, file), fraction)
    }

    /// Parses transactions from a reader. See [`TransactionSet::from_path`].
    ///
    /// # Errors
    ///
    /// See [`TransactionSet::from_path`].
    pub fn from_reader<R: BufRead>(mut reader: R, fraction: f64) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::parse(&buf, fraction)
    }

    /// Parses transactions from a byte buffer. See [`TransactionSet::from_path`].
    ///
    /// # Errors
    ///
    /// See [`TransactionSet::from_path`].
    pub fn parse(input: &[u8], fraction: f64) -> Result<Self> {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Err(Error::InvalidFraction(fraction));
        }

        let mut transactions = Vec::new();
        let mut line_no = 1usize;
        let mut pos = 0usize;
        while pos < input.len() {
            let end = input[pos..]
                .iter()
                .position(|&b| is_newline(b))
                .map_or(input.len(), |off| pos + off);
            let line = &input[pos..end];
            if !line.is_empty() {
                transactions.push(parse_line(line, line_no)?);
            }

            pos = end;
            while pos < input.len() && is_newline(input[pos]) {
                // "\r\n" counts as a single line break
                if !(input[pos] == b'\n' && pos > 0 && input[pos - 1] == b'\r') {
                    line_no += 1;
                }
                pos += 1;
            }
        }

        let keep = ((fraction * transactions.len() as f64).round() as usize).min(transactions.len());
        transactions.truncate(keep);
        transactions.shrink_to_fit();
        Self::from_transactions(transactions)
    }

    /// Number of transactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Returns true if there are no transactions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Largest item identifier, `None` when no transaction has an item.
    #[must_use]
    pub fn item_max(&self) -> Option<u32> {
        self.item_max
    }

    /// Size of the item universe: `item_max + 1`, or 0.
    #[must_use]
    pub fn universe(&self) -> usize {
        self.item_max.map_or(0, |max| max as usize + 1)
    }

    /// Transaction at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u32]> {
        self.transactions.get(index).map(Vec::as_slice)
    }

    /// Iterates over transactions in read order.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.transactions.iter().map(Vec::as_slice)
    }

    /// Total number of (transaction, item) occurrences.
    #[must_use]
    pub fn occurrences(&self) -> usize {
        self.transactions.iter().map(Vec::len).sum()
    }
}

fn parse_line(line: &[u8], line_no: usize) -> Result<Vec<u32>> {
    if let Some(&byte) = line
        .iter()
        .find(|&&b| !b.is_ascii_digit() && !is_separator(b))
    {
        return Err(Error::MalformedInput {
            line: line_no,
            byte,
        });
    }

    line.split(|&b| is_separator(b))
        .filter(|token| !token.is_empty())
        .map(|token| parse_item(token, line_no))
        .collect()
}

fn parse_item(token: &[u8], line_no: usize) -> Result<u32> {
    token
        .iter()
        .try_fold(0u32, |acc, &b| {
            acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
        })
        .ok_or_else(|| Error::InvalidItem {
            line: line_no,
            token: String::from_utf8_lossy(token).into_owned(),
        })
}
