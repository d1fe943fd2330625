//! Lazy sample generators backing `linear_table`.
//!
//! All iterators here are pure functions of their inputs and implement
//! [`Clone`], so a table description can be enumerated any number of times
//! without materializing the full grid.

/// Samples along a single axis.
///
/// Either `count` uniformly spaced values over `[start, stop]`, the last
/// one pinned to `stop`, or an explicit list of coordinates.
#[derive(Debug, Clone)]
pub struct AxisSamples {
    source: AxisSource,
    index: usize,
}

#[derive(Debug, Clone)]
enum AxisSource {
    Uniform { start: f64, stop: f64, count: usize },
    Explicit(Vec<f64>),
}

impl AxisSamples {
    /// Uniform samples spanning `[start, stop]`.
    pub fn uniform(start: f64, stop: f64, count: usize) -> Self {
        Self {
            source: AxisSource::Uniform { start, stop, count },
            index: 0,
        }
    }

    /// Explicit sample coordinates, yielded as given.
    pub fn explicit(values: Vec<f64>) -> Self {
        Self {
            source: AxisSource::Explicit(values),
            index: 0,
        }
    }

    fn total(&self) -> usize {
        match &self.source {
            AxisSource::Uniform { count, .. } => *count,
            AxisSource::Explicit(values) => values.len(),
        }
    }

    fn value(&self, i: usize) -> f64 {
        match &self.source {
            AxisSource::Uniform { start, stop, count } => {
                if *count < 2 {
                    return *start;
                }
                if i == count - 1 {
                    return *stop;
                }
                let step = (stop - start) / (count - 1) as f64;
                i as f64 * step + start
            }
            AxisSource::Explicit(values) => values[i],
        }
    }
}

impl Iterator for AxisSamples {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.total() {
            return None;
        }
        let v = self.value(self.index);
        self.index += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AxisSamples {}

/// Three axes walked in lock-step, one row per step.
///
/// Channels that run out early (ragged explicit domains) yield `NaN`
/// until the longest channel is exhausted.
#[derive(Debug, Clone)]
pub struct RowSamples {
    axes: [AxisSamples; 3],
}

impl RowSamples {
    /// Creates a row iterator from one sampler per channel.
    pub fn new(axes: [AxisSamples; 3]) -> Self {
        Self { axes }
    }
}

impl Iterator for RowSamples {
    type Item = [f64; 3];

    fn next(&mut self) -> Option<[f64; 3]> {
        let row = [self.axes[0].next(), self.axes[1].next(), self.axes[2].next()];
        if row.iter().all(Option::is_none) {
            return None;
        }
        Some(row.map(|v| v.unwrap_or(f64::NAN)))
    }
}

/// Cartesian grid of three axes, enumerated with the last axis fastest.
///
/// Yields `[a0[i], a1[j], a2[k]]` for `i`, `j`, `k` in row-major order,
/// which is the in-memory layout of a [`Lut3D`](crate::Lut3D) table.
#[derive(Debug, Clone)]
pub struct GridSamples {
    axes: [Vec<f64>; 3],
    index: usize,
}

impl GridSamples {
    /// Creates a grid from the per-axis coordinates.
    pub fn new(axes: [Vec<f64>; 3]) -> Self {
        Self { axes, index: 0 }
    }

    fn total(&self) -> usize {
        self.axes.iter().map(Vec::len).product()
    }
}

impl Iterator for GridSamples {
    type Item = [f64; 3];

    fn next(&mut self) -> Option<[f64; 3]> {
        if self.index >= self.total() {
            return None;
        }
        let n1 = self.axes[1].len();
        let n2 = self.axes[2].len();
        let k = self.index % n2;
        let j = (self.index / n2) % n1;
        let i = self.index / (n1 * n2);
        self.index += 1;
        Some([self.axes[0][i], self.axes[1][j], self.axes[2][k]])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridSamples {}
