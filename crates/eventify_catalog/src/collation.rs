//! Locale-style string ordering for event names
//!
//! Approximates the default collation of a browser's `localeCompare` for
//! Latin-script text in three passes:
//!
//! 1. base letters, ignoring accents and case, with whitespace and
//!    punctuation before digits and digits before letters
//! 2. accents: an unaccented letter sorts before its accented forms
//! 3. case: lower case sorts before upper case

use std::cmp::Ordering;

/// Strip the diacritic from a lower-case Latin letter.
fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' | 'ŗ' => 'r',
        'ś' | 'š' | 'ş' | 'ŝ' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

fn class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

struct Folded {
    lower: char,
    base: char,
    upper_case: bool,
}

fn fold(s: &str) -> Vec<Folded> {
    s.chars()
        .flat_map(|c| {
            let upper_case = c.is_uppercase();
            c.to_lowercase().map(move |lower| Folded {
                lower,
                base: base_letter(lower),
                upper_case,
            })
        })
        .collect()
}

/// Compare two strings the way a name sort should.
pub fn collate(a: &str, b: &str) -> Ordering {
    let a = fold(a);
    let b = fold(b);

    let primary = a
        .iter()
        .map(|f| (class(f.base), f.base))
        .cmp(b.iter().map(|f| (class(f.base), f.base)));

    primary
        .then_with(|| {
            // accented letters after their base letter
            a.iter()
                .map(|f| (f.lower != f.base, f.lower))
                .cmp(b.iter().map(|f| (f.lower != f.base, f.lower)))
        })
        .then_with(|| a.iter().map(|f| f.upper_case).cmp(b.iter().map(|f| f.upper_case)))
}
