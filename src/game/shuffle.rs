//! Per-client answer shuffling.
//!
//! Every client shows the choices of a question in its own order, while the
//! server only ever sees indices into the original order.

use crate::protocol::Question;

/// Visual state of one choice on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    None,
    Correct,
    Wrong,
}

/// A question with its choices in a client-local order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShuffledQuestion {
    question: Question,
    /// `order[shuffled] == original`
    order: Vec<usize>,
    /// `position[original] == shuffled`
    position: Vec<usize>,
}

impl ShuffledQuestion {
    /// Fisher-Yates shuffle driven by `rng`.
    pub fn with_rng(question: Question, rng: &mut fastrand::Rng) -> Self {
        let n = question.choices.len();
        let mut order: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = rng.usize(..=i);
            order.swap(i, j);
        }
        Self::with_order(question, order)
    }

    fn with_order(question: Question, order: Vec<usize>) -> Self {
        let mut position = vec![0; order.len()];
        for (shuffled, &original) in order.iter().enumerate() {
            position[original] = shuffled;
        }
        Self {
            question,
            order,
            position,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Choices in display order.
    pub fn choices(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .map(|&original| self.question.choices[original].as_str())
    }

    /// Original index behind a displayed position.
    pub fn original_index(&self, shuffled: usize) -> Option<usize> {
        self.order.get(shuffled).copied()
    }

    /// Displayed position of an original index.
    pub fn shuffled_index(&self, original: usize) -> Option<usize> {
        self.position.get(original).copied()
    }

    /// Highlight for each displayed position.
    ///
    /// A reveal marks the correct choice and suppresses the wrong-guess
    /// highlight.
    pub fn marks(&self, reveal: Option<usize>, wrong: Option<usize>) -> Vec<ChoiceMark> {
        let mut marks = vec![ChoiceMark::None; self.len()];
        match reveal {
            Some(correct) => {
                if let Some(pos) = self.shuffled_index(correct) {
                    marks[pos] = ChoiceMark::Correct;
                }
            }
            None => {
                if let Some(pos) = wrong.and_then(|w| self.shuffled_index(w)) {
                    marks[pos] = ChoiceMark::Wrong;
                }
            }
        }
        marks
    }
}
