// Small seeded PRNG for particle embellishment.
//
// This is NOT cryptographically secure. It only drives visual jitter, and a
// fixed seed makes frame sequences reproducible in tests.

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform in [0, 1).
    #[inline]
    pub fn next_f64_01(&mut self) -> f64 {
        // 53 high bits -> exact f64 mantissa.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    #[inline]
    pub fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64_01()
    }

    /// Uniform in `low..high`; returns `low` for an empty range.
    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u64;
        low + (self.next_u64() % span) as usize
    }

    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64_01() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Prng::new(7);
        let mut b = Prng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_f64_01(), b.next_f64_01());
        }
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut r = Prng::new(0);
        for _ in 0..1000 {
            let f = r.gen_range_f64(0.005, 0.02);
            assert!((0.005..=0.02).contains(&f));
            let u = r.gen_range_usize(1, 4);
            assert!((1..4).contains(&u));
        }
        assert_eq!(r.gen_range_usize(3, 3), 3);
        assert!(!r.chance(0.0));
    }
}
