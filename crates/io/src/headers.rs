//! Canonical header keys for accent- and case-tolerant column matching.
//!
//! "Código", "codigo" and " CÓDIGO " all reduce to `codigo`: the header is
//! decomposed (NFKD), everything outside ASCII is dropped (which removes the
//! combining marks), then it is trimmed and lower-cased.

use unicode_normalization::UnicodeNormalization;

use crate::csv::Table;

pub fn canonical_key(header: &str) -> String {
    let ascii: String = header.nfkd().filter(char::is_ascii).collect();
    ascii.trim().to_lowercase()
}

/// Replace every header of `table` with its canonical key.
pub fn normalize(table: &mut Table) {
    table.map_headers(canonical_key);
}
