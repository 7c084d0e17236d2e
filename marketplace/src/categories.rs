//! Offer categories.

/// A category an offer can list under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub slug: &'static str,
    pub label: &'static str,
}

/// Every category, in display order.
pub const CATEGORIES: &[Category] = &[
    Category { slug: "lessons", label: "Lessons & Tutoring" },
    Category { slug: "creative", label: "Creative & Media" },
    Category { slug: "tech", label: "Tech & Digital" },
    Category { slug: "home", label: "Home & Lifestyle" },
    Category { slug: "wellness", label: "Wellness & Personal" },
    Category { slug: "events", label: "Events & Hospitality" },
    Category { slug: "business", label: "Business & Admin" },
    Category { slug: "logistics", label: "Transport & Logistics" },
    Category { slug: "other", label: "Other" },
];

/// Display label for a slug, falling back to "Other".
pub fn category_label(slug: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|c| c.slug == slug)
        .map(|c| c.label)
        .unwrap_or("Other")
}
