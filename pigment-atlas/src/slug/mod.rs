//! URL slug derivation
//!
//! Turns display names into lowercase ASCII tokens safe for use as path
//! segments: `"Quinacridone Rose"` becomes `quinacridone-rose`.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Separator placed between alphanumeric runs
pub const SEPARATOR: char = '-';

/// Derive a slug from a display name
///
/// - Unicode NFKD decomposition, combining marks dropped (`é` → `e`)
/// - Letters that do not decompose are transliterated (`ß` → `ss`)
/// - Lowercased; every run of other characters becomes one `-`
/// - No leading or trailing `-`
///
/// The result is not unique: `"Red!"` and `"red"` share a slug. Callers
/// that need uniqueness fold a second key into the input.
///
/// # Examples
///
/// ```
/// use pigment_atlas::slug::slug;
///
/// assert_eq!(slug("Payne's Gray"), "payne-s-gray");
/// assert_eq!(slug("  Bleu Céruléen "), "bleu-ceruleen");
/// assert_eq!(slug("PR101"), "pr101");
/// ```
#[must_use]
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            push_pending(&mut out, &mut pending_separator);
            out.push(c.to_ascii_lowercase());
        } else if let Some(ascii) = transliterate(c) {
            push_pending(&mut out, &mut pending_separator);
            out.push_str(ascii);
        } else {
            pending_separator = true;
        }
    }

    out
}

/// Emits a deferred separator, but never at the start of the slug
fn push_pending(out: &mut String, pending: &mut bool) {
    if *pending && !out.is_empty() {
        out.push(SEPARATOR);
    }
    *pending = false;
}

/// Lowercase ASCII spelling for letters NFKD leaves untouched
fn transliterate(c: char) -> Option<&'static str> {
    let ascii = match c {
        'ß' | 'ẞ' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ø' | 'Ø' => "o",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'ł' | 'Ł' => "l",
        'þ' | 'Þ' => "th",
        'ı' => "i",
        _ => return None,
    };
    Some(ascii)
}
