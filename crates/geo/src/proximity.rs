//! Nearest-feature ranking.
//!
//! Distances are computed for every candidate (in parallel with the
//! `parallel` feature), then only the closest `k` are fully sorted.
//! Ties are broken by input position, so identical inputs always rank
//! identically.

use crate::{haversine_distance, Coordinate, Feature};
use serde::Serialize;
use std::cmp::Ordering;

/// Number of nearest features returned when the caller does not choose.
pub const DEFAULT_K: usize = 5;

/// Anything with a position that can be ranked by distance.
pub trait Located {
    /// Position used for distance ranking.
    fn coordinate(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl Located for Feature {
    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}

/// An item paired with its distance from the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked<T> {
    /// The ranked item
    pub item: T,
    /// Great-circle distance from the reference point in kilometers
    pub distance_km: f64,
}

/// Return the `k` items closest to `reference`, closest first.
///
/// Returns every item when fewer than `k` exist and an empty vector when
/// `items` is empty or `k` is zero.
///
/// # Example
/// ```
/// use streamlyne_geo::{nearest, Coordinate};
///
/// let here = Coordinate::new(12.9716, 77.5946);
/// let points = [
///     Coordinate::new(13.0827, 80.2707),
///     Coordinate::new(12.9716, 77.5946),
///     Coordinate::new(12.9800, 77.6000),
/// ];
///
/// let ranked = nearest(&here, &points, 2);
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked[0].distance_km, 0.0);
/// assert_eq!(*ranked[1].item, points[2]);
/// ```
pub fn nearest<'a, T>(reference: &Coordinate, items: &'a [T], k: usize) -> Vec<Ranked<&'a T>>
where
    T: Located + Sync,
{
    if k == 0 || items.is_empty() {
        return Vec::new();
    }

    let mut scored = distances(reference, items);
    let k = k.min(scored.len());

    if k < scored.len() {
        scored.select_nth_unstable_by(k - 1, by_distance_then_position);
        scored.truncate(k);
    }
    scored.sort_unstable_by(by_distance_then_position);

    scored
        .into_iter()
        .map(|(index, distance_km)| Ranked {
            item: &items[index],
            distance_km,
        })
        .collect()
}

#[inline]
fn by_distance_then_position(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
}

fn distances<T: Located + Sync>(reference: &Coordinate, items: &[T]) -> Vec<(usize, f64)> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| (index, haversine_distance(reference, &item.coordinate())))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| (index, haversine_distance(reference, &item.coordinate())))
            .collect()
    }
}
