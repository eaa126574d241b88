//! Query parser family models and the composition engine.
//!
//! Each parser family (sparse/lexical, dense-vector, spatial) is a
//! validated model that flattens itself into [`WireParams`] through
//! [`SolrQuery::build`]. Composition with caller-supplied overrides
//! happens in [`compose`]; that merge is the only precedence seam,
//! and overrides win on key collision.

pub mod dense;
pub mod local_params;
pub mod sparse;
pub mod spatial;

use crate::param::WireParams;

/// A validated query model that can flatten itself to wire parameters.
///
/// `build` is pure and idempotent: it performs no I/O, mutates
/// nothing, and returns identical output for identical input. All
/// validation happens when the model is constructed, so `build` cannot
/// fail.
pub trait SolrQuery {
    /// Flatten this model into the wire parameter set.
    fn build(&self) -> WireParams;
}

/// Compose a query model with caller-supplied extra parameters.
///
/// The model's `build()` output is merged with `overrides`; on key
/// collision the override wins. Deterministic: the same model and
/// overrides always produce the same result.
#[must_use]
pub fn compose(query: &dyn SolrQuery, overrides: WireParams) -> WireParams {
    let mut params = query.build();
    params.merge(overrides);
    params
}
