//! Guess scoring.

use super::word::{GuessError, Word};
use std::fmt;
use std::str::FromStr;

/// Per-letter result of comparing a guess with the secret
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LetterScore {
    /// Right letter, right position
    Exact,
    /// Letter occurs somewhere else in the secret
    Present,
    /// Letter does not occur in the secret
    Absent,
}

impl LetterScore {
    pub fn symbol(&self) -> char {
        match self {
            LetterScore::Exact => '🟩',
            LetterScore::Present => '🟨',
            LetterScore::Absent => '⬜',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '🟩' => Some(LetterScore::Exact),
            '🟨' => Some(LetterScore::Present),
            '⬜' => Some(LetterScore::Absent),
            _ => None,
        }
    }
}

/// Feedback for one guess, rendered on the wire as a symbol string like `⬜⬜⬜🟨🟩`
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Feedback(Vec<LetterScore>);

impl Feedback {
    pub fn new(scores: Vec<LetterScore>) -> Self {
        Self(scores)
    }

    pub fn scores(&self) -> &[LetterScore] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every letter is an exact match
    pub fn is_win(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|s| *s == LetterScore::Exact)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for score in &self.0 {
            write!(f, "{}", score.symbol())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feedback({})", self)
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| LetterScore::from_symbol(c).ok_or_else(|| format!("unknown feedback symbol {:?}", c)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for Feedback {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Feedback> for String {
    fn from(feedback: Feedback) -> Self {
        feedback.to_string()
    }
}

/// Score `guess` against `secret`.
///
/// Position i is Exact when the letters match, else Present when the secret
/// contains the letter anywhere, else Absent. Containment is not
/// count-limited: repeated guess letters can each read Present.
pub fn score(guess: &Word, secret: &Word) -> Result<Feedback, GuessError> {
    if guess.len() != secret.len() {
        return Err(GuessError::LengthMismatch {
            guess: guess.len(),
            secret: secret.len(),
        });
    }

    let secret_bytes = secret.as_bytes();
    let scores = guess
        .as_bytes()
        .iter()
        .zip(secret_bytes)
        .map(|(g, s)| {
            if g == s {
                LetterScore::Exact
            } else if secret_bytes.contains(g) {
                LetterScore::Present
            } else {
                LetterScore::Absent
            }
        })
        .collect();

    Ok(Feedback(scores))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn score_str(guess: &str, secret: &str) -> String {
        score(&w(guess), &w(secret)).unwrap().to_string()
    }

    #[test]
    fn test_crane_sequence() {
        assert_eq!(score_str("SLATE", "CRANE"), "⬜⬜🟩⬜🟩");
        assert_eq!(score_str("CRATE", "CRANE"), "🟩🟩🟩⬜🟩");
        assert_eq!(score_str("CRANE", "CRANE"), "🟩🟩🟩🟩🟩");
    }

    #[test]
    fn test_present_letters() {
        assert_eq!(score_str("REACT", "CRANE"), "🟨🟨🟩🟨⬜");
    }

    #[test]
    fn test_duplicate_letters_each_read_present() {
        // THREW has a single E; all three misplaced Es read present
        assert_eq!(score_str("EERIE", "THREW"), "🟨🟨🟩⬜🟨");
    }

    #[test]
    fn test_exact_iff_same_letter() {
        let pairs = [("SLATE", "CRANE"), ("ABBEY", "BABES"), ("ZZZZZ", "AZAZA")];
        for (guess, secret) in pairs {
            let feedback = score(&w(guess), &w(secret)).unwrap();
            for (i, s) in feedback.scores().iter().enumerate() {
                let same = guess.as_bytes()[i] == secret.as_bytes()[i];
                assert_eq!(*s == LetterScore::Exact, same, "{} vs {} at {}", guess, secret, i);
            }
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert_eq!(
            score(&w("CRANES"), &w("CRANE")),
            Err(GuessError::LengthMismatch {
                guess: 6,
                secret: 5
            })
        );
    }

    #[test]
    fn test_is_win() {
        assert!(score(&w("CRANE"), &w("CRANE")).unwrap().is_win());
        assert!(!score(&w("CRATE"), &w("CRANE")).unwrap().is_win());
        assert!(!Feedback::new(vec![]).is_win());
    }

    #[test]
    fn test_feedback_string_roundtrip() {
        let feedback: Feedback = "⬜🟨🟩".parse().unwrap();
        assert_eq!(
            feedback.scores(),
            &[LetterScore::Absent, LetterScore::Present, LetterScore::Exact]
        );
        assert_eq!(serde_json::to_string(&feedback).unwrap(), "\"⬜🟨🟩\"");
        assert!("🟥".parse::<Feedback>().is_err());
    }
}
