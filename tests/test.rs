//! Integration tests exercising the public crate surface end to end.

use ropeskip::JumpRope;

static UCHARS: [char; 23] = [
    'a', 'b', 'c', '1', '2', '3', ' ', '\n', // ASCII
    '\u{a9}', '\u{a5}', '\u{bd}', // Latin-1 supplement (U+80 - U+FF)
    '\u{391}', '\u{394}', '\u{3b4}', '\u{3c1}', // Greek (U+0370 - U+03FF)
    '\u{2190}', '\u{21af}', '\u{21bb}', '\u{21c8}', // Arrows (U+2190 - U+21FF)
    '\u{10190}', '\u{10194}', '\u{10198}', '\u{1019a}', // Ancient Roman symbols
];

fn check(r: &JumpRope, expected: &str) {
    assert_eq!(r.size(), expected.len());
    assert_eq!(r.to_string(), expected);
    assert_eq!(r.runes(), expected.chars().count());
}

#[test]
fn empty_rope_has_no_contents() {
    let mut r = JumpRope::new();
    check(&r, "");
    r.insert(0, "").unwrap();
    check(&r, "");
}

#[test]
fn insert_at_location() {
    let mut r = JumpRope::new();

    r.insert(0, "AAA").unwrap();
    check(&r, "AAA");

    r.insert(0, "BBB").unwrap();
    check(&r, "BBBAAA");

    r.insert(6, "CCC").unwrap();
    check(&r, "BBBAAACCC");

    r.insert(5, "DDD").unwrap();
    check(&r, "BBBAADDDACCC");
}

#[test]
fn insert_handles_every_sample_rune() {
    let mut r = JumpRope::new();
    let text: String = UCHARS.iter().collect();
    r.insert(0, &text).unwrap();
    check(&r, &text);
}

#[test]
fn erase_across_a_range_of_positions() {
    for cut_at in 0..20 {
        let mut r = JumpRope::with_seed(cut_at as u64);
        r.insert(0, "0123456789 hello world ab2cdefghi fakk1 eir3d").unwrap();
        let before = r.to_string();
        r.erase_at(cut_at, 3).unwrap();
        let expected: String = before
            .chars()
            .enumerate()
            .filter(|(i, _)| *i < cut_at || *i >= cut_at + 3)
            .map(|(_, c)| c)
            .collect();
        check(&r, &expected);
    }
}

#[test]
fn insert_and_erase_span_many_knots() {
    let mut r = JumpRope::with_seed(42);
    let chunk: String = (0..500).map(|i| UCHARS[i % UCHARS.len()]).collect();
    for _ in 0..4 {
        let len = r.runes();
        r.insert(len / 2, &chunk).unwrap();
    }
    let total_runes = r.runes();
    assert_eq!(total_runes, chunk.chars().count() * 4);

    r.erase_at(0, total_runes).unwrap();
    check(&r, "");
}

#[test]
fn out_of_range_positions_clamp_instead_of_panicking() {
    let mut r = JumpRope::with_seed(1);
    r.insert(0, "hello").unwrap();
    r.insert(1_000_000, " world").unwrap();
    assert_eq!(r.to_string(), "hello world");

    r.erase_at(3, 1_000_000).unwrap();
    assert_eq!(r.to_string(), "hel");
}

#[test]
fn byte_offset_and_index_agree_with_chars() {
    let mut r = JumpRope::with_seed(2);
    let text = "Hello \u{4e16}\u{754c} goodbye";
    r.insert(0, text).unwrap();

    for (rune_pos, (byte_pos, c)) in text.char_indices().enumerate() {
        assert_eq!(r.byte_offset(rune_pos), Some(byte_pos));
        assert_eq!(r.index(rune_pos), Some(c));
    }
    assert_eq!(r.byte_offset(text.chars().count()), Some(text.len()));
}

#[test]
fn substr_matches_a_naive_char_slice() {
    let mut r = JumpRope::with_seed(3);
    let text = "0123456789 hello world ab2cdefghi fakk1 eir3d";
    r.insert(0, text).unwrap();
    let chars: Vec<char> = text.chars().collect();

    for a in 0..chars.len() {
        for b in a..chars.len() {
            let expected: String = chars[a..b].iter().collect();
            assert_eq!(r.substr(a, b), expected);
        }
    }
}

#[test]
fn before_scans_backward_to_a_matching_rune() {
    let mut r = JumpRope::with_seed(4);
    r.insert(0, "one two three four").unwrap();
    let (pos, c) = r.before(19, |ch: char| ch == ' ').unwrap();
    assert_eq!(c, ' ');
    assert_eq!(&r.to_string()[..pos], "one two three");
}
