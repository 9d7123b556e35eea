use crate::element::{Element, ElementId};
use crate::visitor::{walk_element, Visitor};
use crc32fast::Hasher;

/// Generate the id seed for a funnel page using CRC32
pub fn get_page_seed(funnel_page_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(b"funnel-page://");
    hasher.update(funnel_page_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for elements within a page
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Page seed (CRC32)
    count: u64,   // Sequential counter
}

impl IdGenerator {
    pub fn new(funnel_page_id: &str) -> Self {
        Self {
            seed: get_page_seed(funnel_page_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Continue numbering after the highest id this generator already minted
    /// into `tree` (ids from an earlier session of the same page).
    pub fn resume(&mut self, tree: &Element) {
        let mut scan = HighestCount {
            prefix: format!("{}-", self.seed),
            highest: self.count,
        };
        scan.visit_element(tree);
        self.count = scan.highest;
    }

    /// Generate next sequential ID.
    ///
    /// `None` once the counter is exhausted, which only happens after resuming
    /// past an id ending in `u64::MAX`.
    pub fn new_id(&mut self) -> Option<ElementId> {
        self.count = self.count.checked_add(1)?;
        Some(ElementId::new(format!("{}-{}", self.seed, self.count)))
    }

    /// Get page seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

struct HighestCount {
    prefix: String,
    highest: u64,
}

impl Visitor for HighestCount {
    fn visit_element(&mut self, element: &Element) {
        let counter = element
            .id
            .as_str()
            .strip_prefix(self.prefix.as_str())
            .and_then(|n| n.parse::<u64>().ok());

        if let Some(n) = counter {
            self.highest = self.highest.max(n);
        }
        walk_element(self, element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn test_page_seed_generation() {
        let seed1 = get_page_seed("page-1");
        let seed2 = get_page_seed("page-1");

        // Same page always generates same seed
        assert_eq!(seed1, seed2);

        // Different pages generate different seeds
        let seed3 = get_page_seed("page-2");
        assert_ne!(seed1, seed3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("page-1");

        let id1 = gen.new_id().unwrap();
        let id2 = gen.new_id().unwrap();

        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id1.as_str().starts_with(gen.seed()));
    }

    #[test]
    fn test_resume_skips_existing_ids() {
        let mut first = IdGenerator::new("page-1");
        let a = first.new_id().unwrap();
        let b = first.new_id().unwrap();

        let body = Element::body()
            .with_child(Element::new(a, ElementKind::Text))
            .with_child(Element::new(b.clone(), ElementKind::Container))
            .with_child(Element::new("foreign-99", ElementKind::Image));

        let mut second = IdGenerator::new("page-1");
        second.resume(&body);

        let next = second.new_id().unwrap();
        assert_ne!(next, b);
        assert!(next.as_str().ends_with("-3"));
    }

    #[test]
    fn test_resume_past_u32_range() {
        let body = Element::body()
            .with_child(Element::new("draft-4294967295", ElementKind::Text));

        let mut gen = IdGenerator::from_seed("draft".to_string());
        gen.resume(&body);

        assert_eq!(gen.new_id().unwrap().as_str(), "draft-4294967296");
    }

    #[test]
    fn test_exhausted_counter_mints_nothing() {
        let body = Element::body().with_child(Element::new(
            format!("draft-{}", u64::MAX),
            ElementKind::Text,
        ));

        let mut gen = IdGenerator::from_seed("draft".to_string());
        gen.resume(&body);

        assert!(gen.new_id().is_none());
        // Overflowing must not wrap around to ids already handed out
        assert!(gen.new_id().is_none());
    }
}
