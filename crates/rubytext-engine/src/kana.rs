//! Character classes used by the scanner and aligner.
//!
//! Two classes matter to the engine: *phonetic* characters (kana), which
//! never receive a reading annotation, and *annotable* characters
//! (logographs), which trigger automatic tokenizer lookup. Everything else
//! (Latin, punctuation, digits) is inert.

/// Returns true for phonetic (kana) characters.
///
/// Covers hiragana, katakana, the katakana phonetic extensions, halfwidth
/// katakana, the prolonged sound mark and the kana iteration marks.
pub fn is_kana(c: char) -> bool {
    matches!(c,
        '\u{3041}'..='\u{3096}'   // hiragana
        | '\u{309D}'..='\u{309E}' // hiragana iteration marks
        | '\u{30A1}'..='\u{30FA}' // katakana
        | '\u{30FC}'              // prolonged sound mark
        | '\u{30FD}'..='\u{30FE}' // katakana iteration marks
        | '\u{31F0}'..='\u{31FF}' // katakana phonetic extensions
        | '\u{FF66}'..='\u{FF9F}' // halfwidth katakana
    )
}

/// Returns true for characters that can carry a reading annotation.
///
/// This is the tokenizer-dictionary character class: CJK unified ideographs
/// plus the handful of marks that behave like ideographs in Japanese text
/// (々 〆 and the small counter kana ヵ/ヶ which take on-readings in words
/// like 一ヶ月).
pub fn is_annotable(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'   // CJK unified ideographs
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{F900}'..='\u{FAFF}' // CJK compatibility ideographs
        | '\u{3005}'              // ideographic iteration mark 々
        | '\u{3006}'              // ideographic closing mark 〆
        | '\u{30F5}'..='\u{30F6}' // small ヵ/ヶ
    )
}

/// Returns true for characters the tokenizer can consume: kana or annotable.
pub fn is_japanese(c: char) -> bool {
    is_kana(c) || is_annotable(c)
}

/// Fast-path presence check: does the unit contain anything worth scanning?
///
/// The scanner short-circuits on false, keeping non-Japanese content at
/// negligible cost.
pub fn has_annotable(text: &str) -> bool {
    text.chars().any(is_annotable)
}

/// Kana-skip test: the whole string is phonetic, character by character.
///
/// Empty strings are not "all kana"; an empty base never forms a segment.
pub fn is_all_kana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_kana)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiragana_and_katakana_are_kana() {
        assert!(is_kana('か'));
        assert!(is_kana('ナ'));
        assert!(is_kana('ー'));
        assert!(is_kana('ゞ'));
    }

    #[test]
    fn ideographs_are_annotable_not_kana() {
        assert!(is_annotable('漢'));
        assert!(is_annotable('々'));
        assert!(!is_kana('漢'));
        assert!(!is_annotable('か'));
    }

    #[test]
    fn punctuation_is_neither() {
        for c in ['。', '、', '!', 'a', '1', ' '] {
            assert!(!is_kana(c), "{c}");
            assert!(!is_annotable(c), "{c}");
        }
    }

    #[test]
    fn presence_check() {
        assert!(has_annotable("mostly latin with 字 inside"));
        assert!(!has_annotable("no japanese here"));
        // Kana alone is not worth scanning either.
        assert!(!has_annotable("かなのみ"));
    }

    #[test]
    fn all_kana() {
        assert!(is_all_kana("かな"));
        assert!(is_all_kana("した"));
        assert!(is_all_kana("コード"));
        assert!(!is_all_kana("勉強した"));
        assert!(!is_all_kana(""));
    }
}
