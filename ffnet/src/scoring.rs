use crate::net::Network;
use crate::tensor::Tensor;
use std::fmt::Write;

pub trait Scorer {
    fn process_item(&mut self, output: &Tensor, expected: &Tensor);
}

pub struct NoOpScorer;

impl Scorer for NoOpScorer {
    #[inline]
    fn process_item(&mut self, _output: &Tensor, _expected: &Tensor) {}
}

/// Fraction of output elements whose rounded prediction equals the rounded
/// target, the same measure the training loop reports per epoch.
#[derive(Clone, Debug, Default)]
pub struct RoundedScorer {
    correct: usize,
    total: usize,
}

impl RoundedScorer {
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Scorer for RoundedScorer {
    fn process_item(&mut self, output: &Tensor, expected: &Tensor) {
        for (&p, &e) in std::iter::zip(output.as_slice(), expected.as_slice()) {
            if p.round() == e.round() {
                self.correct += 1;
            }
            self.total += 1;
        }
    }
}

/// Confusion matrix over predicted classes. A single-output network is
/// treated as a two-class classifier thresholded at 0.5.
#[derive(Clone, Debug)]
pub struct MulticlassScorer {
    classes: usize,
    /// Row is the expected class, column the predicted one.
    matrix: Vec<usize>,
    count: usize,
}

impl MulticlassScorer {
    pub fn new(classes: usize) -> Self {
        assert!(classes > 0, "Scorer needs at least one class");
        MulticlassScorer {
            classes,
            matrix: vec![0; classes * classes],
            count: 0,
        }
    }

    pub fn for_net(net: &Network) -> Self {
        Self::new(net.output_size().max(2))
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn confusion(&self, expected: usize, predicted: usize) -> usize {
        self.matrix[expected * self.classes + predicted]
    }

    pub fn correct(&self) -> usize {
        (0..self.classes).map(|c| self.confusion(c, c)).sum()
    }

    pub fn error_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.count - self.correct()) as f64 / self.count as f64
        }
    }

    /// Row-normalized confusion matrix followed by the error rate.
    pub fn report(&self) -> String {
        let mut out = String::from("Confusion Matrix:\n");
        for row in self.matrix.chunks(self.classes) {
            let total = row.iter().sum::<usize>().max(1) as f64;
            let cells: Vec<String> = row.iter().map(|&c| format!("{:.3}", c as f64 / total)).collect();
            let _ = writeln!(out, "  [{}]", cells.join(", "));
        }
        let incorrect = self.count - self.correct();
        let _ = write!(
            out,
            "Error rate: {:.2}% ({incorrect}/{})",
            self.error_rate() * 100.0,
            self.count
        );
        out
    }

    pub fn print_report(&self) {
        println!("{}", self.report());
    }

    fn class_of(t: &Tensor) -> usize {
        if t.len() == 1 {
            (t.get(0) >= 0.5) as usize
        } else {
            t.argmax().unwrap_or(0)
        }
    }
}

impl Scorer for MulticlassScorer {
    fn process_item(&mut self, output: &Tensor, expected: &Tensor) {
        for t in [output, expected] {
            assert!(
                t.len() == 1 || t.len() <= self.classes,
                "Output width {} exceeds a {}-class scorer",
                t.len(),
                self.classes
            );
        }
        let expected = Self::class_of(expected);
        let predicted = Self::class_of(output);
        assert!(
            expected < self.classes && predicted < self.classes,
            "Class index out of range for a {}-class scorer",
            self.classes
        );
        self.matrix[expected * self.classes + predicted] += 1;
        self.count += 1;
    }
}
