//! Articles the site ships with.
//!
//! The detail route falls back to these when `articles/{id}` is absent, so the
//! "Read More" links of the default content always lead somewhere.

use super::Article;

struct BuiltinArticle {
    id: &'static str,
    title: &'static str,
    content: &'static str,
    image: &'static str,
    date: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
}

impl BuiltinArticle {
    fn to_article(&self) -> Article {
        Article {
            title: self.title.to_string(),
            content: self.content.to_string(),
            image: Some(self.image.to_string()),
            video: None,
            date: Some(self.date.to_string()),
            category: Some(self.category.to_string()),
            tags: self.tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

static BUILTIN_ARTICLES: &[BuiltinArticle] = &[
    BuiltinArticle {
        id: "service1",
        title: "Web Development Services",
        content: r#"<h2>Professional Web Development</h2>
<p>Our web development services encompass everything from simple websites to complex web applications. We use the latest technologies and best practices to ensure your website is fast, secure, and user-friendly.</p>
<h3>Our Approach</h3>
<p>We follow a comprehensive development process that includes:</p>
<ul>
<li>Requirements analysis and planning</li>
<li>UI/UX design and prototyping</li>
<li>Frontend and backend development</li>
<li>Testing and quality assurance</li>
<li>Deployment and maintenance</li>
</ul>
<h3>Technologies We Use</h3>
<p>Our team is proficient in a wide range of technologies including:</p>
<ul>
<li>HTML5, CSS3, and JavaScript</li>
<li>React, Vue.js, and Angular</li>
<li>Node.js, Python, and PHP</li>
<li>MySQL, PostgreSQL, and MongoDB</li>
<li>AWS, Google Cloud, and Azure</li>
</ul>
<blockquote>"A well-designed website is not just about looks; it's about functionality, user experience, and achieving your business goals."</blockquote>
<h3>Why Choose Our Web Development Services?</h3>
<p>With years of experience in the industry, we have successfully delivered hundreds of projects for clients ranging from startups to enterprise-level organizations. Our commitment to quality and customer satisfaction sets us apart.</p>"#,
        image: "https://images.pexels.com/photos/3184360/pexels-photo-3184360.jpeg?auto=compress&cs=tinysrgb&w=800&h=400&fit=crop",
        date: "2025-01-15",
        category: "Web Development",
        tags: &["Web Development", "Frontend", "Backend", "Full Stack"],
    },
    BuiltinArticle {
        id: "service2",
        title: "Digital Marketing Solutions",
        content: r#"<h2>Comprehensive Digital Marketing</h2>
<p>In today's digital age, having a strong online presence is crucial for business success. Our digital marketing services help you reach your target audience, increase brand awareness, and drive conversions.</p>
<h3>Our Services Include</h3>
<ul>
<li>Search Engine Optimization (SEO)</li>
<li>Pay-Per-Click (PPC) Advertising</li>
<li>Social Media Marketing</li>
<li>Content Marketing</li>
<li>Email Marketing</li>
<li>Analytics and Reporting</li>
</ul>
<h3>SEO Strategy</h3>
<p>Our SEO approach focuses on both technical optimization and content strategy. We conduct thorough keyword research, optimize your website structure, and create high-quality content that ranks well in search engines.</p>
<h3>Social Media Management</h3>
<p>We help you build and maintain a strong social media presence across all major platforms. Our team creates engaging content, manages your social media accounts, and runs targeted advertising campaigns.</p>
<blockquote>"Digital marketing is not just about being online; it's about being found by the right people at the right time."</blockquote>"#,
        image: "https://images.pexels.com/photos/3184465/pexels-photo-3184465.jpeg?auto=compress&cs=tinysrgb&w=800&h=400&fit=crop",
        date: "2025-01-14",
        category: "Digital Marketing",
        tags: &["SEO", "PPC", "Social Media", "Content Marketing"],
    },
    BuiltinArticle {
        id: "service3",
        title: "Business Consulting",
        content: r#"<h2>Strategic Business Consulting</h2>
<p>Our business consulting services help organizations optimize their operations, improve efficiency, and achieve sustainable growth. We work closely with our clients to understand their unique challenges and develop tailored solutions.</p>
<h3>Areas of Expertise</h3>
<ul>
<li>Business Strategy Development</li>
<li>Process Optimization</li>
<li>Digital Transformation</li>
<li>Change Management</li>
<li>Performance Improvement</li>
<li>Risk Management</li>
</ul>
<h3>Our Methodology</h3>
<p>We follow a proven methodology that ensures successful project delivery:</p>
<ol>
<li><strong>Assessment:</strong> We analyze your current situation and identify opportunities for improvement.</li>
<li><strong>Strategy:</strong> We develop a comprehensive strategy aligned with your business objectives.</li>
<li><strong>Implementation:</strong> We work with your team to implement the recommended solutions.</li>
<li><strong>Monitoring:</strong> We track progress and make adjustments as needed to ensure success.</li>
</ol>
<blockquote>"Success in business requires training and discipline and hard work. But if you're not frightened by these things, the opportunities are just as great today as they ever were." - David Rockefeller</blockquote>"#,
        image: "https://images.pexels.com/photos/3184339/pexels-photo-3184339.jpeg?auto=compress&cs=tinysrgb&w=800&h=400&fit=crop",
        date: "2025-01-13",
        category: "Business Consulting",
        tags: &["Strategy", "Consulting", "Business", "Optimization"],
    },
    BuiltinArticle {
        id: "mission",
        title: "Our Mission",
        content: r#"<h2>Empowering Businesses Through Innovation</h2>
<p>Our mission is to empower businesses with cutting-edge technology and strategic insights that drive growth, efficiency, and success in the digital age.</p>
<h3>What Drives Us</h3>
<p>We believe that every business, regardless of size, deserves access to world-class technology solutions and strategic guidance. Our mission is built on three core principles:</p>
<ul>
<li><strong>Innovation:</strong> We constantly explore new technologies and methodologies to provide our clients with the most advanced solutions.</li>
<li><strong>Excellence:</strong> We maintain the highest standards of quality in everything we do, from project planning to final delivery.</li>
<li><strong>Partnership:</strong> We view our clients as partners and work collaboratively to achieve their business objectives.</li>
</ul>
<h3>Our Commitment</h3>
<p>We are committed to delivering exceptional value to our clients through:</p>
<ul>
<li>Personalized solutions tailored to specific business needs</li>
<li>Transparent communication throughout the project lifecycle</li>
<li>Continuous support and maintenance</li>
<li>Knowledge transfer and training</li>
</ul>"#,
        image: "https://images.pexels.com/photos/3184292/pexels-photo-3184292.jpeg?auto=compress&cs=tinysrgb&w=800&h=400&fit=crop",
        date: "2025-01-12",
        category: "About Us",
        tags: &["Mission", "Values", "Company"],
    },
    BuiltinArticle {
        id: "vision",
        title: "Our Vision",
        content: r#"<h2>Leading the Future of Digital Transformation</h2>
<p>Our vision is to be the global leader in digital transformation and business innovation, helping organizations worldwide adapt and thrive in an increasingly digital world.</p>
<h3>The Future We Envision</h3>
<p>We envision a future where:</p>
<ul>
<li>Every business has access to cutting-edge technology solutions</li>
<li>Digital transformation is accessible and affordable for all</li>
<li>Innovation drives sustainable business growth</li>
<li>Technology serves humanity and creates positive impact</li>
</ul>
<h3>Our Role in Shaping the Future</h3>
<p>As we work towards our vision, we focus on:</p>
<ul>
<li>Developing innovative solutions that address real-world challenges</li>
<li>Building long-term partnerships with our clients</li>
<li>Investing in research and development</li>
<li>Contributing to the global technology community</li>
</ul>
<blockquote>"The best way to predict the future is to create it." - Peter Drucker</blockquote>"#,
        image: "https://images.pexels.com/photos/3184317/pexels-photo-3184317.jpeg?auto=compress&cs=tinysrgb&w=800&h=400&fit=crop",
        date: "2025-01-11",
        category: "About Us",
        tags: &["Vision", "Future", "Innovation"],
    },
];

/// Built-in article shown for `id` when nothing is stored under it.
pub fn builtin_article(id: &str) -> Option<Article> {
    BUILTIN_ARTICLES
        .iter()
        .find(|article| article.id == id)
        .map(BuiltinArticle::to_article)
}

/// Teaser card in the related articles strip of a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedArticle {
    pub id: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub image: &'static str,
}

/// Most related articles shown under one article.
pub const MAX_RELATED: usize = 3;

static RELATED_ARTICLES: &[RelatedArticle] = &[
    RelatedArticle {
        id: "service1",
        title: "Web Development Services",
        excerpt: "Professional web development with modern technologies.",
        image: "https://images.pexels.com/photos/3184360/pexels-photo-3184360.jpeg?auto=compress&cs=tinysrgb&w=400&h=200&fit=crop",
    },
    RelatedArticle {
        id: "service2",
        title: "Digital Marketing Solutions",
        excerpt: "Comprehensive digital marketing strategies for growth.",
        image: "https://images.pexels.com/photos/3184465/pexels-photo-3184465.jpeg?auto=compress&cs=tinysrgb&w=400&h=200&fit=crop",
    },
    RelatedArticle {
        id: "mission",
        title: "Our Mission",
        excerpt: "Empowering businesses through innovation and technology.",
        image: "https://images.pexels.com/photos/3184292/pexels-photo-3184292.jpeg?auto=compress&cs=tinysrgb&w=400&h=200&fit=crop",
    },
];

/// Related articles for the article `current`, never including itself.
pub fn related_articles(current: &str) -> Vec<&'static RelatedArticle> {
    RELATED_ARTICLES
        .iter()
        .filter(|article| article.id != current)
        .take(MAX_RELATED)
        .collect()
}
