//! Exhaustive enumeration of commafree codes of block length four.
//!
//! A set of equal-length words is *commafree* if no concatenation of two
//! code words (in either order, repetition allowed) contains a code word
//! starting at an interior position. Such codes allow a receiver to find
//! word boundaries in an unbroken stream without a separator symbol.
//!
//! The enumeration follows Algorithm C as presented in [The Art of
//! Computer Programming, Volume 4, Fascicle 5](https://www-cs-faculty.stanford.edu/~knuth/taocp.html)
//! (§7.2.2, backtrack programming): a backtracking search over one word
//! per cyclic equivalence class, driven by prefix/suffix occupancy lists
//! and a journaled memory table so that undoing a level costs only the
//! changes made on it. Class representatives come from the preprime
//! generator of §7.2.1.1 (Algorithm F), exposed here as [`preprimes`].

mod check;
mod preprime;
mod search;
#[cfg(test)]
mod tests;

pub use check::is_commafree;
pub use preprime::{preprimes, Preprimes};
pub use search::{max_code_size, Search};

use thiserror::Error;

/// A four-letter word over the alphabet `0..m`.
pub type Word = [u8; 4];

/// Parameter errors reported by [`Search::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("alphabet size {0} is outside 2..=7")]
    AlphabetSize(usize),

    #[error("goal {goal} is outside {min}..={max} for alphabet size {m}")]
    Goal {
        m: usize,
        goal: usize,
        min: usize,
        max: usize,
    },
}
