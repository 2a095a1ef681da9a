use rand::{rngs::StdRng, SeedableRng};
use sekisho::secret::SecretGenerator;

mod fixtures;

use self::fixtures::{seeded_generator, RNG_SEED};

#[test]
fn honors_length() {
    let generator = seeded_generator();

    assert_eq!(generator.generate(0).len(), 0);
    assert_eq!(generator.generate(16).len(), 16);
    assert_eq!(generator.generate(40).len(), 40);
}

#[test]
fn honors_alphabet() {
    let generator = seeded_generator().with_alphabet("ab");
    let secret = generator.generate(64);

    assert!(secret.chars().all(|c| c == 'a' || c == 'b'));
}

#[test]
fn default_alphabet_is_alphanumeric() {
    let generator = seeded_generator();
    let secret = generator.generate(64);

    assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn same_seed_same_sequence() {
    let left = SecretGenerator::from_source(StdRng::seed_from_u64(RNG_SEED));
    let right = SecretGenerator::from_source(StdRng::seed_from_u64(RNG_SEED));

    assert_eq!(left.generate(32), right.generate(32));
}

#[test]
fn different_seeds_diverge() {
    let left = SecretGenerator::from_source(StdRng::seed_from_u64(RNG_SEED));
    let right = SecretGenerator::from_source(StdRng::seed_from_u64(RNG_SEED + 1));

    assert_ne!(left.generate(32), right.generate(32));
}
