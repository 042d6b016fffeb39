/// Softmax over raw logits, numerically stabilized.
///
/// Subtracts the maximum before exponentiating and accumulates the
/// exponentials in f64, so the result is invariant under a constant shift of
/// all inputs.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let exps: Vec<f64> = logits.iter().map(|&v| f64::from(v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();

    exps.iter().map(|&e| (e / sum) as f32).collect()
}

/// Index of the first occurrence of the maximum value (left-most tie-break).
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best = i;
        }
    }
    best
}

/// Running correct/total tally against ground-truth labels.
#[derive(Debug, Default)]
pub struct Accuracy {
    correct: usize,
    total: usize,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, predicted: i64, label: i64) {
        if predicted == label {
            self.correct += 1;
        }
        self.total += 1;
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `correct / total` in [0, 1]; 0.0 before anything was recorded.
    pub fn value(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        for logits in [
            vec![2.0f32, -1.0],
            vec![0.0, 0.0, 0.0],
            vec![10.0, -10.0, 3.5, 0.1],
        ] {
            let probs = softmax(&logits);
            let sum: f32 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sum was {sum}");
        }
    }

    #[test]
    fn test_softmax_shift_invariant() {
        let logits = [1.5f32, -0.5, 3.0];
        let shifted: Vec<f32> = logits.iter().map(|&v| v + 100.0).collect();

        let a = softmax(&logits);
        let b = softmax(&shifted);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_preserves_order() {
        let logits = [0.3f32, 2.1, -4.0, 1.0];
        let probs = softmax(&logits);
        assert!(probs[1] > probs[3]);
        assert!(probs[3] > probs[0]);
        assert!(probs[0] > probs[2]);
    }

    #[test]
    fn test_softmax_two_class_example() {
        let probs = softmax(&[2.0, -1.0]);
        assert!((probs[0] - 0.953).abs() < 1e-3, "probs were {probs:?}");
        assert!((probs[1] - 0.047).abs() < 1e-3, "probs were {probs:?}");
        assert_eq!(argmax(&[2.0, -1.0]), 0);
    }

    #[test]
    fn test_argmax_basic() {
        assert_eq!(argmax(&[0.1, 0.9, 0.5]), 1);
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), 1);
    }

    #[test]
    fn test_argmax_first_of_ties() {
        assert_eq!(argmax(&[1.0, 5.0, 5.0, 5.0]), 1);
        assert_eq!(argmax(&[2.0, 2.0]), 0);
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_accuracy_perfect() {
        let mut accuracy = Accuracy::new();
        for label in 0..10 {
            accuracy.record(label, label);
        }
        assert_eq!(accuracy.value(), 1.0);
        assert_eq!(accuracy.correct(), 10);
        assert_eq!(accuracy.total(), 10);
    }

    #[test]
    fn test_accuracy_one_miss() {
        let mut accuracy = Accuracy::new();
        for label in 0..10 {
            let predicted = if label == 7 { 0 } else { label };
            accuracy.record(predicted, label);
        }
        assert_eq!(accuracy.value(), 9.0 / 10.0);
    }

    #[test]
    fn test_accuracy_empty() {
        assert_eq!(Accuracy::new().value(), 0.0);
    }
}
