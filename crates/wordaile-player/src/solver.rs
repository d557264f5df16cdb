//! Guess selection from the board so far.

use rand::seq::SliceRandom;
use wordaile_core::{score, BoardState, Word, WordList};

/// Picks guesses that agree with every piece of feedback seen so far
#[derive(Clone, Debug)]
pub struct Solver {
    words: WordList,
}

impl Solver {
    pub fn new(words: WordList) -> Self {
        Self { words }
    }

    /// Words that could still be the secret
    pub fn candidates<'a>(&'a self, board: &'a BoardState) -> impl Iterator<Item = &'a Word> + 'a {
        self.unguessed(board).filter(move |candidate| {
            board
                .guesses()
                .iter()
                .zip(board.feedback())
                .all(|(guess, feedback)| {
                    score(guess, candidate).is_ok_and(|expected| &expected == feedback)
                })
        })
    }

    /// A random consistent word, or any unguessed word when nothing fits
    pub fn choose(&self, board: &BoardState) -> Option<Word> {
        let mut rng = rand::thread_rng();

        let consistent: Vec<&Word> = self.candidates(board).collect();
        if let Some(word) = consistent.choose(&mut rng) {
            return Some((*word).clone());
        }

        let fallback: Vec<&Word> = self.unguessed(board).collect();
        fallback.choose(&mut rng).map(|word| (*word).clone())
    }

    fn unguessed<'a>(&'a self, board: &'a BoardState) -> impl Iterator<Item = &'a Word> + 'a {
        self.words
            .words()
            .iter()
            .filter(move |word| !board.guesses().contains(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn board_after(guesses: &[&str], secret: &str) -> BoardState {
        let mut board = BoardState::new();
        for guess in guesses {
            let feedback = score(&w(guess), &w(secret)).unwrap();
            board.record(w(guess), feedback, 5).unwrap();
        }
        board
    }

    #[test]
    fn test_empty_board_allows_every_word() {
        let solver = Solver::new(WordList::from_words(["CRANE", "SLATE", "BRAVE"], 5).unwrap());
        let board = BoardState::new();
        assert_eq!(solver.candidates(&board).count(), 3);
        assert!(solver.choose(&board).is_some());
    }

    #[test]
    fn test_candidates_match_feedback() {
        let solver = Solver::new(
            WordList::from_words(["CRANE", "CRATE", "SLATE", "BRICK", "PIANO"], 5).unwrap(),
        );
        let board = board_after(&["SLATE"], "CRANE");

        let candidates: Vec<&str> = solver.candidates(&board).map(|w| w.as_str()).collect();
        // SLATE against CRANE reads ⬜⬜🟩⬜🟩; only CRANE reproduces that
        assert_eq!(candidates, vec!["CRANE"]);
        assert_eq!(solver.choose(&board), Some(w("CRANE")));
    }

    #[test]
    fn test_never_repeats_a_guess() {
        let solver = Solver::new(WordList::from_words(["CRANE", "SLATE"], 5).unwrap());
        let board = board_after(&["SLATE"], "PIANO");

        // Nothing is consistent with the feedback, so fall back to unguessed words
        assert_eq!(solver.candidates(&board).count(), 0);
        assert_eq!(solver.choose(&board), Some(w("CRANE")));
    }

    #[test]
    fn test_exhausted_list() {
        let solver = Solver::new(WordList::from_words(["SLATE"], 5).unwrap());
        let board = board_after(&["SLATE"], "CRANE");
        assert_eq!(solver.choose(&board), None);
    }
}
