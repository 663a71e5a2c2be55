//! Field descriptors: which content keys exist per section and where they render.

use crate::models::GalleryKind;

/// How a field is written to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text input / textContent.
    Text,
    /// Rich-text editor / innerHTML.
    Rich,
    /// Checkbox.
    Flag,
}

#[derive(Debug)]
pub struct FieldDescriptor {
    /// Key in the section's content object.
    pub name: &'static str,
    /// Element id suffix after `{section}-`.
    pub target: &'static str,
    pub kind: FieldKind,
    /// Built-in text used when the key is absent.
    pub default: &'static str,
    /// Flag field that switches read-more on for this field.
    pub read_more: Option<&'static str>,
}

#[derive(Debug)]
pub struct SectionDescriptor {
    pub key: &'static str,
    pub fields: &'static [FieldDescriptor],
    /// Column ids (after `{section}-`) that can be hidden individually.
    pub columns: &'static [&'static str],
    /// Columns render as hoverable cards.
    pub carded: bool,
    pub gallery: Option<GalleryKind>,
}

impl SectionDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const fn text(name: &'static str, target: &'static str, default: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        target,
        kind: FieldKind::Text,
        default,
        read_more: None,
    }
}

const fn rich(name: &'static str, target: &'static str, default: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        target,
        kind: FieldKind::Rich,
        default,
        read_more: None,
    }
}

const fn rich_read_more(
    name: &'static str,
    target: &'static str,
    default: &'static str,
    flag: &'static str,
) -> FieldDescriptor {
    FieldDescriptor {
        name,
        target,
        kind: FieldKind::Rich,
        default,
        read_more: Some(flag),
    }
}

const fn flag(name: &'static str, target: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        target,
        kind: FieldKind::Flag,
        default: "",
        read_more: None,
    }
}

pub static SECTIONS: &[SectionDescriptor] = &[
    SectionDescriptor {
        key: "session1",
        fields: &[
            text("title1", "title1", "Welcome to Our Professional Website"),
            text("title2", "title2", "Your Success is Our Priority"),
        ],
        columns: &[],
        carded: false,
        gallery: None,
    },
    SectionDescriptor {
        key: "session2",
        fields: &[
            text("heading", "heading", "Our Services"),
            text("col1Heading", "col1-heading", "Web Development"),
            rich(
                "col1Content",
                "col1-content",
                "Professional web development services with modern technologies and responsive design.",
            ),
            text("col2Heading", "col2-heading", "Digital Marketing"),
            rich(
                "col2Content",
                "col2-content",
                "Comprehensive digital marketing strategies to grow your business online.",
            ),
            text("col3Heading", "col3-heading", "Consulting"),
            rich(
                "col3Content",
                "col3-content",
                "Expert business consulting to help you make informed decisions.",
            ),
        ],
        columns: &["col1", "col2", "col3"],
        carded: true,
        gallery: None,
    },
    SectionDescriptor {
        key: "session3",
        fields: &[
            text("heading", "heading", "About Our Company"),
            text("col1Heading", "col1-heading", "About Our Company"),
            rich(
                "col1Content",
                "col1-content",
                "We are a leading company in providing innovative solutions for businesses worldwide. Our team of experts is dedicated to delivering exceptional results.",
            ),
            text("col2Part1Heading", "col2-part1-heading", "Our Mission"),
            rich(
                "col2Part1Content",
                "col2-part1-content",
                "To empower businesses with cutting-edge technology and strategic insights.",
            ),
            text("col2Part2Heading", "col2-part2-heading", "Our Vision"),
            rich(
                "col2Part2Content",
                "col2-part2-content",
                "To be the global leader in digital transformation and business innovation.",
            ),
            text("col3Heading", "col3-heading", "Our Values"),
            rich_read_more(
                "col3Content",
                "col3-content",
                "Integrity, innovation, and customer satisfaction are at the core of everything we do. We believe in building lasting relationships with our clients.",
                "col3Readmore",
            ),
            flag("col3Readmore", "col3-readmore"),
        ],
        columns: &["col1", "col2", "col3"],
        carded: false,
        gallery: None,
    },
    SectionDescriptor {
        key: "session4",
        fields: &[
            text("heading", "heading", "Our Expertise"),
            text("col1Heading", "col1-heading", "Our Expertise"),
            rich(
                "col1Content",
                "col1-content",
                "With years of experience in the industry, we have developed expertise in various domains including technology, marketing, and business strategy.",
            ),
            text("col2Heading", "col2-heading", "Why Choose Us"),
            rich(
                "col2Content",
                "col2-content",
                "We offer personalized solutions, 24/7 support, and proven results. Our client-centric approach ensures your success is our top priority.",
            ),
            text("col3Heading", "col3-heading", "Our Process"),
            rich_read_more(
                "col3Content",
                "col3-content",
                "Our streamlined process ensures efficient project delivery from conception to completion, keeping you informed every step of the way.",
                "col3Readmore",
            ),
            flag("col3Readmore", "col3-readmore"),
        ],
        columns: &["col1", "col2", "col3"],
        carded: false,
        gallery: None,
    },
    SectionDescriptor {
        key: "session5",
        fields: &[
            text("heading", "heading", "Our Portfolio"),
            text("col1Heading", "col1-heading", "Project Alpha"),
            rich("col1Content", "col1-content", "Innovative web application development."),
            text("col2Heading", "col2-heading", "Project Beta"),
            rich("col2Content", "col2-content", "Mobile app development and deployment."),
            text("col3Heading", "col3-heading", "Project Gamma"),
            rich("col3Content", "col3-content", "E-commerce platform optimization."),
            text("col4Heading", "col4-heading", "Project Delta"),
            rich("col4Content", "col4-content", "Digital marketing campaign success."),
        ],
        columns: &["col1", "col2", "col3", "col4"],
        carded: true,
        gallery: None,
    },
    SectionDescriptor {
        key: "session6",
        fields: &[text("heading", "heading", "Our Photo Gallery")],
        columns: &[],
        carded: false,
        gallery: Some(GalleryKind::Image),
    },
    SectionDescriptor {
        key: "session7",
        fields: &[text("heading", "heading", "Our Video Gallery")],
        columns: &[],
        carded: false,
        gallery: Some(GalleryKind::Video),
    },
];

/// Look up a section by key.
pub fn section(key: &str) -> Option<&'static SectionDescriptor> {
    SECTIONS.iter().find(|s| s.key == key)
}
