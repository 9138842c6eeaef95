use itertools::Itertools;

use crate::logic::link_extractor::extract;
use crate::logic::path_resolver::{is_absolute_url, parent_dir, resolve};
use crate::model::{
    DocumentReference, ItemFormat, ItemsEndpoint, LinkKind, RawLink, ResourceDescriptor,
};

/// Turns the links of one document into fetchable resource descriptors.
///
/// Pure computation: nothing is fetched here.
pub struct DescriptorBuilder<'a> {
    endpoint: &'a ItemsEndpoint,
    document: &'a DocumentReference,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(endpoint: &'a ItemsEndpoint, document: &'a DocumentReference) -> Self {
        Self { endpoint, document }
    }

    /// Descriptors for every `kind` link in `text`, in first-occurrence order.
    ///
    /// Links to absolute URLs are skipped, links that cannot be turned into a
    /// fetch URL are dropped, and links sharing a canonical name collapse to
    /// the first one seen.
    pub fn build(&self, text: &str, kind: LinkKind) -> Vec<ResourceDescriptor> {
        let base = parent_dir(&self.document.path);
        let mut external = 0usize;
        let mut resolved = 0usize;

        let descriptors: Vec<ResourceDescriptor> = extract(text, kind)
            .filter(|link| {
                let keep = !is_absolute_url(link.raw_relative_path);
                if !keep {
                    external += 1;
                }
                keep
            })
            .filter_map(|link| self.describe(base, link))
            .inspect(|_| resolved += 1)
            .unique_by(|descriptor| descriptor.canonical_name.clone())
            .collect();

        log::debug!(
            "{} {} link(s) in {}: {} external skipped, {} duplicate(s) collapsed",
            descriptors.len(),
            kind.label(),
            self.document.path,
            external,
            resolved - descriptors.len()
        );

        descriptors
    }

    fn describe(&self, base: &str, link: RawLink<'_>) -> Option<ResourceDescriptor> {
        let canonical_name = canonical_name(link.raw_relative_path)?;
        let absolute_path = resolve(base, link.raw_relative_path);

        let fetch_url = match self.endpoint.item_url(
            &self.document.coordinate,
            &absolute_path,
            ItemFormat::Binary,
        ) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("dropping link {:?}: {}", link.matched_text, e);
                return None;
            }
        };

        Some(ResourceDescriptor {
            fetch_url,
            canonical_name,
            original_relative_path: link.raw_relative_path.to_string(),
        })
    }
}

/// Final segment of the author's reference, with `&` escaped as `%26`
pub fn canonical_name(reference: &str) -> Option<String> {
    let segment = reference.rsplit('/').next().unwrap_or(reference);
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.replace('&', "%26"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepositoryCoordinate;

    fn endpoint() -> ItemsEndpoint {
        ItemsEndpoint::new("https://dev.azure.com/", "7.1-preview.1")
    }

    fn document(branch: Option<&str>) -> DocumentReference {
        let mut coordinate = RepositoryCoordinate::new("acme", "Courses", "Unit-1");
        coordinate.branch = branch.map(str::to_string);
        DocumentReference {
            coordinate,
            path: "/unit1/docs/intro.md".to_string(),
        }
    }

    fn query_value(descriptor: &ResourceDescriptor, key: &str) -> Option<String> {
        descriptor
            .fetch_url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_build_resolves_against_document_directory() {
        let endpoint = endpoint();
        let doc = document(None);
        let descriptors = DescriptorBuilder::new(&endpoint, &doc)
            .build("![a](../img/a.png) ![b](http://ex.com/b.png)", LinkKind::Image);

        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].canonical_name, "a.png");
        assert_eq!(descriptors[0].original_relative_path, "../img/a.png");
        assert_eq!(
            query_value(&descriptors[0], "path").as_deref(),
            Some("/unit1/img/a.png")
        );
        assert_eq!(query_value(&descriptors[0], "versionDescriptor.version"), None);
    }

    #[test]
    fn test_branch_qualifies_fetch_url_only_when_supplied() {
        let endpoint = endpoint();
        let doc = document(Some("draft"));
        let descriptors =
            DescriptorBuilder::new(&endpoint, &doc).build("![a](a.png)", LinkKind::Image);

        assert_eq!(
            query_value(&descriptors[0], "versionDescriptor.version").as_deref(),
            Some("draft")
        );
    }

    #[test]
    fn test_duplicate_names_keep_first_occurrence() {
        let endpoint = endpoint();
        let doc = document(None);
        let descriptors = DescriptorBuilder::new(&endpoint, &doc).build(
            "![one](./a.png) ![two](images/a.png) ![three](b.png)",
            LinkKind::Image,
        );

        let names: Vec<&str> = descriptors.iter().map(|d| d.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(descriptors[0].original_relative_path, "./a.png");
    }

    #[test]
    fn test_ampersand_is_escaped_in_canonical_name() {
        let endpoint = endpoint();
        let doc = document(None);
        let descriptors = DescriptorBuilder::new(&endpoint, &doc)
            .build("![x](pics/salt&pepper.png)", LinkKind::Image);

        assert_eq!(descriptors[0].canonical_name, "salt%26pepper.png");
        assert_eq!(descriptors[0].original_relative_path, "pics/salt&pepper.png");
        assert_eq!(
            query_value(&descriptors[0], "path").as_deref(),
            Some("/unit1/docs/pics/salt&pepper.png")
        );
    }

    #[test]
    fn test_gift_descriptors_resolve_trailing_segment() {
        let endpoint = endpoint();
        let doc = document(None);
        let descriptors = DescriptorBuilder::new(&endpoint, &doc)
            .build("[Open](gifts/week1/box.gift)", LinkKind::Gift);

        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].canonical_name, "box.gift");
        assert_eq!(
            query_value(&descriptors[0], "path").as_deref(),
            Some("/unit1/docs/box.gift")
        );
    }

    #[test]
    fn test_unnamed_references_are_dropped() {
        let endpoint = endpoint();
        let doc = document(None);
        let descriptors = DescriptorBuilder::new(&endpoint, &doc)
            .build("![dir](img/) ![empty]() ![ok](ok.png)", LinkKind::Image);

        let names: Vec<&str> = descriptors.iter().map(|d| d.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["ok.png"]);
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("a/b/c.png").as_deref(), Some("c.png"));
        assert_eq!(canonical_name("R&D.png").as_deref(), Some("R%26D.png"));
        assert_eq!(canonical_name("a/"), None);
        assert_eq!(canonical_name(".."), None);
    }
}
