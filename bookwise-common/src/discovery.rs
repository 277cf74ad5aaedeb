//! Book of the day and random discovery

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;

/// Deterministic daily pick: `items[(year * 1000 + day_of_year) % len]`
///
/// Callers pass the title-ordered catalog so the pick is stable for the day.
pub fn book_of_the_day<T>(items: &[T], today: NaiveDate) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let seed = i64::from(today.year()) * 1000 + i64::from(today.ordinal());
    let index = seed.rem_euclid(items.len() as i64) as usize;
    items.get(index)
}

/// Uniformly random element
pub fn random_pick<T>(items: &[T]) -> Option<&T> {
    items.choose(&mut rand::thread_rng())
}
