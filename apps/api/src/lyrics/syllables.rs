//! Syllable estimation for prompt annotation.
//!
//! A vowel-group heuristic, not a phonetic model. The estimate only decorates the
//! prompt so the model has a target rhythm; nothing downstream gates on it.

/// A raw line paired with its estimated syllable count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllableAnnotatedLine {
    pub text: String,
    /// Always >= 1.
    pub syllable_estimate: u32,
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Vowel groups in one word, with the silent trailing `e` rule applied.
fn word_syllables(word: &str) -> u32 {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut groups: Vec<&[char]> = Vec::new();
    let mut start: Option<usize> = None;
    for (i, &c) in letters.iter().enumerate() {
        match (is_vowel(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                groups.push(&letters[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        groups.push(&letters[s..]);
    }

    let ends_in_lone_e = letters.last() == Some(&'e')
        && groups.last().is_some_and(|g| g.len() == 1 && g[0] == 'e');
    if groups.len() > 1 && ends_in_lone_e {
        groups.pop();
    }

    groups.len() as u32
}

/// Estimates the syllables in a line of text. Never returns 0.
pub fn count_syllables(text: &str) -> u32 {
    text.split_whitespace()
        .map(word_syllables)
        .sum::<u32>()
        .max(1)
}

/// Annotates each line with its syllable estimate, preserving order.
pub fn annotate(lines: &[String]) -> Vec<SyllableAnnotatedLine> {
    lines
        .iter()
        .map(|line| SyllableAnnotatedLine {
            text: line.clone(),
            syllable_estimate: count_syllables(line),
        })
        .collect()
}
