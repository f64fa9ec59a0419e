use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Uniform random source injected into the generator.
// `next_uniform` must return a value in [0, 1).
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

// Reproducible ChaCha8 stream keyed by a u64 seed
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    rng: ChaCha8Rng,
    draws: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // Values drawn since the last (re)seed
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    // Rewind to the start of the current seed's stream
    pub fn reset(&mut self) {
        self.reseed(self.seed);
    }
}

impl RandomSource for SeededSource {
    fn next_uniform(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen_range(0.0..1.0)
    }
}

// Replays a fixed script of values.
// Once the script runs out it yields the fill value if one was set,
// otherwise it starts over from the first value.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<f64>,
    fill: Option<f64>,
    cursor: usize,
    draws: u64,
}

impl ScriptedSource {
    pub fn new(script: Vec<f64>) -> Self {
        Self {
            script,
            fill: None,
            cursor: 0,
            draws: 0,
        }
    }

    // Yield `value` forever after the script is consumed
    pub fn then_repeat(mut self, value: f64) -> Self {
        self.fill = Some(value);
        self
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.draws = 0;
    }
}

impl RandomSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        self.draws += 1;
        if self.cursor < self.script.len() {
            let v = self.script[self.cursor];
            self.cursor += 1;
            return v;
        }
        match self.fill {
            Some(v) => v,
            None if self.script.is_empty() => 0.0,
            None => {
                self.cursor = 1;
                self.script[0]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomSource, ScriptedSource, SeededSource};

    #[test]
    fn seeded_values_in_unit_interval() {
        let mut rng = SeededSource::new(7);
        for _ in 0..10_000 {
            let v = rng.next_uniform();
            assert!((0.0..1.0).contains(&v), "value {} out of [0, 1)", v);
        }
        assert_eq!(rng.draws(), 10_000);
    }

    #[test]
    fn seeded_reset_replays_stream() {
        let mut rng = SeededSource::new(42);
        let first: Vec<f64> = (0..16).map(|_| rng.next_uniform()).collect();
        rng.reset();
        let again: Vec<f64> = (0..16).map(|_| rng.next_uniform()).collect();
        assert_eq!(first, again);

        rng.reseed(43);
        let other: Vec<f64> = (0..16).map(|_| rng.next_uniform()).collect();
        assert_ne!(first, other);
        assert_eq!(rng.seed(), 43);
    }

    #[test]
    fn scripted_then_fill() {
        let mut rng = ScriptedSource::new(vec![0.1, 0.2]).then_repeat(0.5);
        let got: Vec<f64> = (0..4).map(|_| rng.next_uniform()).collect();
        assert_eq!(got, vec![0.1, 0.2, 0.5, 0.5]);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn scripted_wraps_without_fill() {
        let mut rng = ScriptedSource::new(vec![0.1, 0.2, 0.3]);
        let got: Vec<f64> = (0..7).map(|_| rng.next_uniform()).collect();
        assert_eq!(got, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1]);
        rng.reset();
        assert_eq!(rng.next_uniform(), 0.1);
    }

    #[test]
    fn borrowed_source_advances_owner() {
        let mut rng = ScriptedSource::new(vec![0.25, 0.75]);
        {
            let mut lent = &mut rng;
            assert_eq!(RandomSource::next_uniform(&mut lent), 0.25);
        }
        assert_eq!(rng.next_uniform(), 0.75);
    }
}
