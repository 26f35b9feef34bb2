//! Locating the spoken span and aligning it word by word.

mod aligner;
mod range;

pub use aligner::SequenceAligner;
pub use range::RangeLocator;

use crate::text::filler_len;

/// Mark every token that belongs to a filler ("um", "you know", ...).
pub(crate) fn mark_fillers(normalized: &[&str]) -> Vec<bool> {
    let mut marks = vec![false; normalized.len()];
    let mut i = 0;
    while i < normalized.len() {
        match filler_len(&normalized[i..]) {
            0 => i += 1,
            len => {
                marks[i..i + len].fill(true);
                i += len;
            }
        }
    }
    marks
}

/// Row-major similarity table between two word lists.
pub(crate) struct SimilarityMatrix {
    cols: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    pub(crate) fn build(rows: &[&str], cols: &[&str]) -> Self {
        let data = crate::parallel::map_indices(rows.len(), |i| {
            cols.iter()
                .map(|c| crate::text::similarity(rows[i], c))
                .collect::<Vec<_>>()
        })
        .into_iter()
        .flatten()
        .collect();

        Self {
            cols: cols.len(),
            data,
        }
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_fillers() {
        let words = ["so", "um", "you", "know", "the", "i", "mean", "i"];
        assert_eq!(
            mark_fillers(&words),
            vec![false, true, true, true, false, true, true, false]
        );
    }

    #[test]
    fn test_similarity_matrix_layout() {
        let matrix = SimilarityMatrix::build(&["cat", "dog"], &["dog", "cat", "cow"]);
        assert_eq!(matrix.get(0, 1), 1.0);
        assert_eq!(matrix.get(1, 0), 1.0);
        assert!(matrix.get(0, 0) < 0.5);
    }
}
