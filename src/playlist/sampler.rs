use crate::models::TrackCandidate;
use log::debug;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// Scale weights so they sum to 1.
///
/// Non-finite and negative entries count as 0. If nothing is left the weights
/// become uniform.
pub fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let cleaned: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    let total: f64 = cleaned.iter().sum();

    if total <= 0.0 || !total.is_finite() {
        debug!(
            "All {} sampling weights are zero, falling back to uniform",
            weights.len()
        );
        let uniform = 1.0 / weights.len() as f64;
        return vec![uniform; weights.len()];
    }

    cleaned.into_iter().map(|w| w / total).collect()
}

/// Sampling weight of one candidate before normalization
fn floored_weight(
    candidate: &TrackCandidate,
    weight_fn: Option<&dyn Fn(&TrackCandidate) -> f64>,
    popularity_floor: f64,
) -> f64 {
    let raw = match weight_fn {
        Some(weight) => weight(candidate),
        None => f64::from(candidate.popularity),
    };
    let weight = raw.max(popularity_floor).abs();
    if weight.is_finite() { weight } else { 0.0 }
}

/// Draw `count` distinct indices, each draw proportional to the weights of
/// the indices not yet drawn
fn sample_indices<R: Rng + ?Sized>(weights: &[f64], count: usize, rng: &mut R) -> Vec<usize> {
    let mut current = normalize_weights(weights);
    let mut drawn = vec![false; weights.len()];
    let mut picked = Vec::with_capacity(count);

    while picked.len() < count && picked.len() < weights.len() {
        if current.iter().all(|&w| w == 0.0) {
            debug!("Remaining sampling weights are zero, falling back to uniform");
            for (weight, &taken) in current.iter_mut().zip(&drawn) {
                if !taken {
                    *weight = 1.0;
                }
            }
        }

        // Rebuilt per draw so the total is summed fresh rather than drifting
        let dist = match WeightedIndex::new(&current) {
            Ok(dist) => dist,
            Err(e) => {
                debug!("Weighted draw unavailable ({e}), stopping early");
                break;
            }
        };
        let index = dist.sample(rng);
        picked.push(index);
        drawn[index] = true;
        current[index] = 0.0;
    }
    picked
}

/// Select at most `limit` candidates, weighted by popularity, without replacement.
///
/// Each candidate weighs `|max(w, popularity_floor)|`, where `w` comes from
/// `weight_fn` or defaults to the candidate's popularity. When everything fits
/// under the limit no randomness is used. The result is always sorted by
/// ascending popularity, ties keeping their input order.
pub fn select<R: Rng + ?Sized>(
    candidates: Vec<TrackCandidate>,
    limit: usize,
    weight_fn: Option<&dyn Fn(&TrackCandidate) -> f64>,
    popularity_floor: f64,
    rng: &mut R,
) -> Vec<TrackCandidate> {
    if limit == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut selected = if candidates.len() <= limit {
        candidates
    } else {
        let weights: Vec<f64> = candidates
            .iter()
            .map(|candidate| floored_weight(candidate, weight_fn, popularity_floor))
            .collect();
        let mut picked = sample_indices(&weights, limit, rng);
        picked.sort_unstable();
        debug!("Sampled {} of {} candidates", picked.len(), candidates.len());

        let mut slots: Vec<Option<TrackCandidate>> = candidates.into_iter().map(Some).collect();
        picked
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect()
    };

    selected.sort_by_key(|candidate| candidate.popularity);
    selected
}
