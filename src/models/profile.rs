//! Response contract for one extraction.

use serde::{Deserialize, Serialize};

/// Structured business metadata extracted from one rendered page.
///
/// This is the terminal artifact of the pipeline and serializes directly
/// into the API response body. `logo` is `null` when no candidate survived;
/// `colors` and `socials` degrade to empty lists rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Site name from `og:site_name`, falling back to the page title.
    pub business_name: String,
    /// Meta description, falling back to `og:description`.
    pub description: String,
    /// Resolved logo URL, if any candidate survived.
    pub logo: Option<String>,
    /// Dominant logo colors as `#rrggbb` strings, most populous first.
    pub colors: Vec<String>,
    /// Social profile links found on the page, in first-seen order.
    pub socials: Vec<String>,
}
