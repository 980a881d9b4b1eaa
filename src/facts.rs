use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{FACT_FALLBACK, SPACE_FACTS};

pub fn random_fact<R: Rng + ?Sized>(facts: &[&'static str], rng: &mut R) -> &'static str {
    facts.choose(rng).copied().unwrap_or(FACT_FALLBACK)
}

pub fn banner_fact() -> &'static str {
    random_fact(SPACE_FACTS, &mut rand::thread_rng())
}
