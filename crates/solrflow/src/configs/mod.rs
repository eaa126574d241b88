//! Optional feature configuration blocks for lexical queries.
//!
//! Each block owns a fixed namespace prefix and a fixed top-level
//! enable flag (`facet`, `group`, `hl`, `mlt`). Attaching a block to a
//! sparse query activates the feature even when no option is set; the
//! four blocks are independent and may all be attached at once.

mod facet;
mod group;
mod highlight;
mod more_like_this;

pub use facet::{FacetConfig, FacetMethod, FacetRange, FacetSort, RangeInclude, RangeOther};
pub use group::{GroupConfig, GroupFormat};
pub use highlight::{HighlightConfig, HighlightEncoder, HighlightMethod};
pub use more_like_this::{InterestingTerms, MoreLikeThisConfig};

use crate::param::WireParams;

/// The four feature attachment points of a sparse query.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FeatureConfigs {
    pub facet: Option<FacetConfig>,
    pub group: Option<GroupConfig>,
    pub highlight: Option<HighlightConfig>,
    pub more_like_this: Option<MoreLikeThisConfig>,
}

impl FeatureConfigs {
    pub(crate) fn flatten_into(&self, out: &mut WireParams) {
        if let Some(facet) = &self.facet {
            facet.flatten_into(out);
        }
        if let Some(group) = &self.group {
            group.flatten_into(out);
        }
        if let Some(highlight) = &self.highlight {
            highlight.flatten_into(out);
        }
        if let Some(mlt) = &self.more_like_this {
            mlt.flatten_into(out);
        }
    }
}
