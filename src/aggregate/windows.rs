//! Trailing windows and the primitives applied over them.
//!
//! Unlike a prefix-expanding window, a trailing window refuses to emit a
//! value until it holds `size` points, so early buckets come out as `None`.

/// Fixed-size trailing window over an ordered series.
#[derive(Debug, Clone, Copy)]
pub struct TrailingWindow {
    size: usize,
}

impl TrailingWindow {
    pub fn new(size: usize) -> Self {
        TrailingWindow { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of leading points that produce no output.
    pub fn burn_in(&self) -> usize {
        self.size - 1
    }

    /// Applies `primitive` to the `size` values ending at each index.
    ///
    /// Indices before the window fills yield `None`.
    pub fn apply<F>(&self, data: &[f64], mut primitive: F) -> Vec<Option<f64>>
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut result = Vec::with_capacity(data.len());

        for index in 0..data.len() {
            if index + 1 < self.size {
                result.push(None);
                continue;
            }
            let window = &data[index + 1 - self.size..=index];
            result.push(Some(primitive(window)));
        }

        result
    }
}

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
