use rand::Rng;

// [1, max_height], each extra level with probability 1/2
pub(crate) fn random_height(max_height: usize) -> usize {
    let mut rng = rand::rng();
    let mut h = 1;
    while h < max_height && rng.random::<bool>() {
        h += 1;
    }
    h
}

#[cfg(test)]
mod tests {
    use super::random_height;

    #[test]
    fn height_in_bounds() {
        for _ in 0..10_000 {
            let h = random_height(4);
            assert!((1..=4).contains(&h));
        }
        assert_eq!(random_height(1), 1);
    }

    #[test]
    fn height_distribution() {
        const SAMPLES: usize = 100_000;
        const MAX_HEIGHT: usize = 32;

        let mut at_least = [0usize; MAX_HEIGHT + 1];
        for _ in 0..SAMPLES {
            let h = random_height(MAX_HEIGHT);
            for extra in 0..h {
                at_least[extra] += 1;
            }
        }

        assert_eq!(at_least[0], SAMPLES);
        // P(extra levels >= h) = 2^-h
        for h in 1..=6 {
            let expected = SAMPLES as f64 / (1u64 << h) as f64;
            let got = at_least[h] as f64;
            let tolerance = expected * 0.1;
            assert!(
                (got - expected).abs() < tolerance,
                "extra levels >= {h}: expected ~{expected}, got {got}"
            );
        }
    }
}
