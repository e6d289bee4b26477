//! # Trigram Similarity
//!
//! String similarity scoring for fuzzy product search.
//!
//! ## How Scoring Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Trigram Similarity Pipeline                         │
//! │                                                                     │
//! │  "Paracetamol"                                                      │
//! │       │ lowercase, split on non-alphanumeric                        │
//! │       ▼                                                             │
//! │  "paracetamol"                                                      │
//! │       │ pad each word: two spaces front, one space back             │
//! │       ▼                                                             │
//! │  "  paracetamol "                                                   │
//! │       │ slide a 3-char window                                       │
//! │       ▼                                                             │
//! │  {"  p", " pa", "par", "ara", "rac", ..., "ol "}                    │
//! │                                                                     │
//! │  similarity(a, b) = |A ∩ B| / |A ∪ B|     (Jaccard over trigrams)   │
//! │                                                                     │
//! │  Range: 0.0 (nothing shared) ..= 1.0 (identical trigram sets)       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The padding means the first characters of a word weigh more than the
//! middle: a query that gets the start of a product name right scores
//! high even when the tail is mistyped, which is the common data-entry
//! error at a counter.

use std::collections::HashSet;

/// A single trigram. Tuple of chars rather than a slice so no allocation
/// happens per window.
type Trigram = (char, char, char);

/// Extracts the trigram set of a string.
///
/// Text is lowercased and split into alphanumeric words; each word is
/// padded with two leading and one trailing space before windowing, so
/// every word contributes `len + 1` trigrams.
///
/// ## Example
/// ```rust
/// use kirana_core::similarity::trigrams;
///
/// // hyphen splits: "oral" and "b" pad and window independently
/// let set = trigrams("Oral-B");
/// assert!(set.contains(&(' ', ' ', 'o')));
/// assert!(set.contains(&(' ', ' ', 'b')));
/// ```
pub fn trigrams(text: &str) -> HashSet<Trigram> {
    let lower = text.to_lowercase();
    let mut set = HashSet::new();

    for word in lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut padded: Vec<char> = Vec::with_capacity(word.chars().count() + 3);
        padded.push(' ');
        padded.push(' ');
        padded.extend(word.chars());
        padded.push(' ');

        for window in padded.windows(3) {
            set.insert((window[0], window[1], window[2]));
        }
    }

    set
}

/// Trigram similarity of two strings, in `[0.0, 1.0]`.
///
/// Jaccard overlap of the two trigram sets. Either side empty (or all
/// non-alphanumeric) scores `0.0`; an empty query must never match the
/// whole inventory.
///
/// ## Example
/// ```rust
/// use kirana_core::similarity::similarity;
///
/// assert_eq!(similarity("dolo 650", "Dolo 650"), 1.0);
/// assert_eq!(similarity("anything", ""), 0.0);
/// assert!(similarity("amoxicillin", "amox") > 0.3);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let ta = trigrams(a);
    let tb = trigrams(b);

    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let shared = ta.intersection(&tb).count();
    let union = ta.len() + tb.len() - shared;

    shared as f64 / union as f64
}

/// Rank key for a product against a query: the greater of the name
/// similarity and the batch similarity. A missing batch contributes 0.
pub fn best_similarity(query: &str, name: &str, batch: Option<&str>) -> f64 {
    let name_sim = similarity(query, name);
    let batch_sim = batch.map(|b| similarity(query, b)).unwrap_or(0.0);
    name_sim.max(batch_sim)
}

// =============================================================================
// Unit Tests
// =============================================================================
