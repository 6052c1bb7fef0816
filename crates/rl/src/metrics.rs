//! Scalar metrics emitted during training as `(name, value, step)` triples.

/// Receiver for training scalars.
pub trait MetricsSink {
    fn record(&mut self, name: &str, value: f32, step: u64);
}

impl<T: MetricsSink + ?Sized> MetricsSink for &mut T {
    fn record(&mut self, name: &str, value: f32, step: u64) {
        (**self).record(name, value, step);
    }
}

/// Emits every scalar as a `tracing` event on the `metrics` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn record(&mut self, name: &str, value: f32, step: u64) {
        tracing::trace!(target: "metrics", name, value, step);
    }
}

/// Drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _name: &str, _value: f32, _step: u64) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scalar {
    pub name: String,
    pub value: f32,
    pub step: u64,
}

/// Keeps every scalar in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    records: Vec<Scalar>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[Scalar] {
        &self.records
    }

    /// `(step, value)` pairs recorded under `name`, in arrival order.
    #[must_use]
    pub fn series(&self, name: &str) -> Vec<(u64, f32)> {
        self.records
            .iter()
            .filter(|s| s.name == name)
            .map(|s| (s.step, s.value))
            .collect()
    }

    #[must_use]
    pub fn last(&self, name: &str) -> Option<f32> {
        self.records
            .iter()
            .rev()
            .find(|s| s.name == name)
            .map(|s| s.value)
    }
}

impl MetricsSink for MemorySink {
    fn record(&mut self, name: &str, value: f32, step: u64) {
        self.records.push(Scalar {
            name: name.to_owned(),
            value,
            step,
        });
    }
}
