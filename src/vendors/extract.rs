use regex::Regex;

use crate::models::UNKNOWN_VENDOR;

/// Bank-added prefixes that carry no vendor information.
const PREFIXES: &[&str] = &[
    "POS PURCHASE ",
    "CARD PURCHASE ",
    "PURCHASE ",
    "EFT PAYMENT ",
    "PAYMENT TO ",
    "PAYMENT ",
    "DEBIT ORDER ",
    "DIRECT DEBIT ",
    "ATM WITHDRAWAL ",
    "TRANSFER ",
    "CREDIT ",
    "DEBIT ",
    "POS ",
    "TFR ",
];

/// Trailing tokens that describe the transaction rather than the payee.
const SUFFIXES: &[&str] = &[
    " ACCOUNT",
    " CARD",
    " PAYMENT",
    " TRANSFER",
    " TRANSACTION",
    " TXN",
    " WITHDRAWAL",
    " DEPOSIT",
    " FEE",
    " CHARGE",
    " LLC",
    " INC",
    " LTD",
    " LIMITED",
];

/// Filler words dropped wherever they appear.
const STOP_WORDS: &[&str] = &[
    "THE", "A", "AN", "AND", "OR", "AT", "ON", "IN", "TO", "FOR", "BY", "WITH", "FROM", "OF",
    "LTD", "LLC", "INC", "CO", "CORP", "PTY",
];

/// Heuristic vendor-name extraction from free-text statement descriptions.
///
/// Compiled once and reused; the bulk extraction paths run this over every
/// transaction missing a vendor.
pub struct VendorExtractor {
    noise: Vec<Regex>,
}

impl VendorExtractor {
    pub fn new() -> Self {
        let patterns = [
            r"#\d+",               // store numbers
            r"REF:?\s*\S+",        // reference codes
            r"\b\d{2}/\d{2}/\d{2,4}\b", // inline dates
            r"\b\d+\.\d+\b",       // decimal amounts
            r"\(\d+\)",            // parenthesized numbers
            r"\b\d{5,}\b",         // long numeric ids
            r"\b[A-Z0-9]{10,}\b",  // long alphanumeric blobs
        ];
        Self {
            noise: patterns
                .iter()
                .map(|p| Regex::new(p).expect("static pattern compiles"))
                .collect(),
        }
    }

    /// Extract the most vendor-like token span from a description.
    ///
    /// Total function: always returns a non-empty string, falling back to the
    /// "Unknown" sentinel when nothing usable survives the noise stripping.
    pub fn extract(&self, description: &str) -> String {
        let mut text = description.trim().to_uppercase();
        if text.is_empty() {
            return UNKNOWN_VENDOR.to_string();
        }

        for prefix in PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest.to_string();
                break;
            }
        }
        for suffix in SUFFIXES {
            if let Some(rest) = text.strip_suffix(suffix) {
                text = rest.to_string();
                break;
            }
        }

        for pattern in &self.noise {
            text = pattern.replace_all(&text, "").into_owned();
        }

        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|word| word.len() > 1 && !STOP_WORDS.contains(word))
            .take(3)
            .collect();

        if words.is_empty() {
            return UNKNOWN_VENDOR.to_string();
        }

        words
            .iter()
            .map(|word| title_case(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}
