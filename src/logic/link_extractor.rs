//! Pattern scanners for resource links embedded in Markdown.
//!
//! Only link extraction is done here; document structure (code fences,
//! reference-style links, HTML) is deliberately not interpreted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{LinkKind, RawLink};

/// `![alt](target)`; the target runs up to the first `)`
static IMAGE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\(([^)]*?)\)").expect("valid image link pattern"));

/// `[label](dir/name.gift)`; only the trailing `name.gift` segment is captured.
/// The optional `!` lets image syntax be consumed here and then discarded.
static GIFT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!?\[[^\]]*\]\((?:[^)]*/)?([^/)]+\.gift)\)").expect("valid gift link pattern")
});

fn pattern(kind: LinkKind) -> &'static Regex {
    match kind {
        LinkKind::Image => &*IMAGE_LINK,
        LinkKind::Gift => &*GIFT_LINK,
    }
}

/// Scan `text` for links of `kind`, left to right, without overlap.
///
/// The returned iterator is lazy; call again to rescan the same text.
/// `![alt](x.gift)` is an image, never a gift.
pub fn extract(text: &str, kind: LinkKind) -> impl Iterator<Item = RawLink<'_>> + '_ {
    pattern(kind).captures_iter(text).filter_map(move |caps| {
        let matched = caps.get(0)?;
        if kind == LinkKind::Gift && matched.as_str().starts_with('!') {
            return None;
        }
        let target = caps.get(1)?;
        Some(RawLink {
            matched_text: matched.as_str(),
            raw_relative_path: target.as_str(),
        })
    })
}
