//! Vendor name heuristics: extraction from statement descriptions and
//! fuzzy name matching.

mod extract;
mod similarity;

pub use extract::VendorExtractor;
pub use similarity::{levenshtein, similarity};
