//! Brazilian-Portuguese string ordering.
//!
//! Sorting city and segment names by raw bytes puts every accented name
//! after `z` ("Águas Claras" after "Zona Sul"). This module implements the
//! three-level comparison used by the pt-BR locale for Latin text:
//!
//! 1. base letters, ignoring case and diacritics
//! 2. diacritics (unaccented before accented)
//! 3. case (lowercase before uppercase)
//!
//! Any remaining tie is broken by byte order so the result is a total order.

use std::cmp::Ordering;

/// Compares two strings in pt-BR order for Latin text.
pub fn compare_pt_br(a: &str, b: &str) -> Ordering {
    let ka = CollationKey::new(a);
    let kb = CollationKey::new(b);

    ka.base
        .cmp(&kb.base)
        .then_with(|| ka.accents.cmp(&kb.accents))
        .then_with(|| ka.upper.cmp(&kb.upper))
        .then_with(|| a.cmp(b))
}

/// Sorts a slice of strings in pt-BR order.
pub fn sort_pt_br<S: AsRef<str>>(values: &mut [S]) {
    values.sort_by(|a, b| compare_pt_br(a.as_ref(), b.as_ref()));
}

struct CollationKey {
    base: Vec<char>,
    accents: Vec<bool>,
    upper: Vec<bool>,
}

impl CollationKey {
    fn new(value: &str) -> Self {
        let mut base = Vec::with_capacity(value.len());
        let mut accents = Vec::with_capacity(value.len());
        let mut upper = Vec::with_capacity(value.len());

        for c in value.chars() {
            let is_upper = c.is_uppercase();
            for lower in c.to_lowercase() {
                let (letter, accented) = fold(lower);
                base.push(letter);
                accents.push(accented);
                upper.push(is_upper);
            }
        }

        Self {
            base,
            accents,
            upper,
        }
    }
}

/// Maps a lowercase character to its base letter and whether it carried a diacritic.
fn fold(c: char) -> (char, bool) {
    let base = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'í' | 'ì' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ú' | 'ù' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => return (other, false),
    };
    (base, true)
}
