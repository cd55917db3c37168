//! Built-in career and skill catalog.
//!
//! Static reference data the recommendation engine and the entity extractor
//! match profiles against.

/// Broad family a field belongs to. Fields in the same cluster share most of
/// their day-to-day skills, which makes moving between them easier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCluster {
    Technology,
    Creative,
    Business,
}

#[derive(Debug)]
pub struct CareerTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Short field name used for transition matching.
    pub field: &'static str,
    pub cluster: FieldCluster,
    pub interest_tags: &'static [&'static str],
    /// In the order they should be presented.
    pub required_skills: &'static [&'static str],
    pub growth_potential: &'static str,
}

#[derive(Debug)]
pub struct SkillInfo {
    pub name: &'static str,
    pub category: &'static str,
    /// Skills that should be learned first.
    pub depends_on: &'static [&'static str],
    pub resources: &'static [&'static str],
}

pub const CAREERS: &[CareerTemplate] = &[
    CareerTemplate {
        id: "software_engineer",
        title: "Software Engineer",
        description: "Design, build and maintain software products.",
        field: "software engineering",
        cluster: FieldCluster::Technology,
        interest_tags: &["software", "programming", "coding", "technology", "web", "apps"],
        required_skills: &["JavaScript", "React", "Node.js", "Git", "SQL"],
        growth_potential: "High",
    },
    CareerTemplate {
        id: "data_analyst",
        title: "Data Analyst",
        description: "Turn raw data into insights that drive decisions.",
        field: "data analysis",
        cluster: FieldCluster::Technology,
        interest_tags: &["data", "analytics", "numbers", "statistics", "research"],
        required_skills: &["SQL", "Excel", "Statistics", "Data Analysis", "Tableau"],
        growth_potential: "High",
    },
    CareerTemplate {
        id: "data_scientist",
        title: "Data Scientist",
        description: "Build statistical and machine learning models to answer hard questions.",
        field: "data science",
        cluster: FieldCluster::Technology,
        interest_tags: &["data", "machine learning", "ai", "research", "statistics"],
        required_skills: &["Python", "Statistics", "SQL", "Machine Learning"],
        growth_potential: "High",
    },
    CareerTemplate {
        id: "security_analyst",
        title: "Security Analyst",
        description: "Protect systems and data from threats.",
        field: "cybersecurity",
        cluster: FieldCluster::Technology,
        interest_tags: &["security", "cybersecurity", "networks", "privacy"],
        required_skills: &["Networking", "Linux", "Security Fundamentals", "Python"],
        growth_potential: "High",
    },
    CareerTemplate {
        id: "ux_designer",
        title: "UX Designer",
        description: "Shape how people experience products through research and design.",
        field: "ux design",
        cluster: FieldCluster::Creative,
        interest_tags: &["design", "ux", "user experience", "art", "creative", "psychology"],
        required_skills: &["User Research", "Figma", "Prototyping", "Visual Design"],
        growth_potential: "Medium",
    },
    CareerTemplate {
        id: "digital_marketer",
        title: "Digital Marketer",
        description: "Grow audiences and revenue through online channels.",
        field: "marketing",
        cluster: FieldCluster::Creative,
        interest_tags: &["marketing", "social media", "content", "writing", "brand"],
        required_skills: &["Copywriting", "Content Strategy", "SEO", "Analytics"],
        growth_potential: "Medium",
    },
    CareerTemplate {
        id: "product_manager",
        title: "Product Manager",
        description: "Decide what gets built and why, and align teams around it.",
        field: "product management",
        cluster: FieldCluster::Business,
        interest_tags: &["product", "strategy", "business", "leadership", "startups"],
        required_skills: &["Communication", "Data Analysis", "Product Strategy", "Stakeholder Management"],
        growth_potential: "High",
    },
    CareerTemplate {
        id: "project_manager",
        title: "Project Manager",
        description: "Plan and deliver projects on time and within scope.",
        field: "project management",
        cluster: FieldCluster::Business,
        interest_tags: &["organization", "planning", "management", "operations", "leadership"],
        required_skills: &["Communication", "Project Planning", "Risk Management", "Agile"],
        growth_potential: "Medium",
    },
];

pub const SKILLS: &[SkillInfo] = &[
    SkillInfo {
        name: "JavaScript",
        category: "technical",
        depends_on: &[],
        resources: &["MDN JavaScript Guide", "javascript.info"],
    },
    SkillInfo {
        name: "React",
        category: "technical",
        depends_on: &["JavaScript"],
        resources: &["Official React tutorial", "Build a small React app end to end"],
    },
    SkillInfo {
        name: "Node.js",
        category: "technical",
        depends_on: &["JavaScript"],
        resources: &["Node.js official docs", "Build a REST API with Node.js"],
    },
    SkillInfo {
        name: "Git",
        category: "technical",
        depends_on: &[],
        resources: &["Pro Git book", "Contribute to an open source project"],
    },
    SkillInfo {
        name: "SQL",
        category: "technical",
        depends_on: &[],
        resources: &["SQLBolt interactive lessons", "Query a public dataset"],
    },
    SkillInfo {
        name: "Excel",
        category: "technical",
        depends_on: &[],
        resources: &["Excel skills course", "Rebuild a report you use at work"],
    },
    SkillInfo {
        name: "Python",
        category: "technical",
        depends_on: &[],
        resources: &["Official Python tutorial", "Automate the Boring Stuff with Python"],
    },
    SkillInfo {
        name: "Statistics",
        category: "analytical",
        depends_on: &[],
        resources: &["Introductory statistics course", "Practice with real survey data"],
    },
    SkillInfo {
        name: "Data Analysis",
        category: "analytical",
        depends_on: &["Excel"],
        resources: &["Analyze a dataset and write up findings"],
    },
    SkillInfo {
        name: "Tableau",
        category: "technical",
        depends_on: &["SQL"],
        resources: &["Tableau free training videos", "Publish a dashboard on Tableau Public"],
    },
    SkillInfo {
        name: "Machine Learning",
        category: "technical",
        depends_on: &["Python", "Statistics"],
        resources: &["Introductory machine learning course", "Kaggle starter competitions"],
    },
    SkillInfo {
        name: "Networking",
        category: "technical",
        depends_on: &[],
        resources: &["Networking fundamentals course", "Set up a home lab network"],
    },
    SkillInfo {
        name: "Linux",
        category: "technical",
        depends_on: &[],
        resources: &["The Linux command line book", "Run a Linux server for a month"],
    },
    SkillInfo {
        name: "Security Fundamentals",
        category: "technical",
        depends_on: &["Networking", "Linux"],
        resources: &["Security fundamentals certification prep", "Capture-the-flag exercises"],
    },
    SkillInfo {
        name: "User Research",
        category: "design",
        depends_on: &[],
        resources: &["Run five user interviews", "Research methods handbook"],
    },
    SkillInfo {
        name: "Figma",
        category: "design",
        depends_on: &[],
        resources: &["Figma official tutorials", "Redesign an app screen you use daily"],
    },
    SkillInfo {
        name: "Prototyping",
        category: "design",
        depends_on: &["Figma"],
        resources: &["Prototype and test a small flow"],
    },
    SkillInfo {
        name: "Visual Design",
        category: "design",
        depends_on: &[],
        resources: &["Visual design fundamentals course", "Study and recreate three layouts"],
    },
    SkillInfo {
        name: "Copywriting",
        category: "creative",
        depends_on: &[],
        resources: &["Write and test ten headlines", "Copywriting handbook"],
    },
    SkillInfo {
        name: "Content Strategy",
        category: "creative",
        depends_on: &["Copywriting"],
        resources: &["Plan a month of content for a real audience"],
    },
    SkillInfo {
        name: "SEO",
        category: "technical",
        depends_on: &[],
        resources: &["Search engine optimization starter guide", "Audit a small website"],
    },
    SkillInfo {
        name: "Analytics",
        category: "analytical",
        depends_on: &[],
        resources: &["Web analytics certification", "Set up tracking on a personal site"],
    },
    SkillInfo {
        name: "Communication",
        category: "soft",
        depends_on: &[],
        resources: &["Present a topic to your team", "Toastmasters or a similar group"],
    },
    SkillInfo {
        name: "Product Strategy",
        category: "business",
        depends_on: &["Data Analysis"],
        resources: &["Write a one-page strategy for a product you use"],
    },
    SkillInfo {
        name: "Stakeholder Management",
        category: "soft",
        depends_on: &["Communication"],
        resources: &["Map the stakeholders of a current project"],
    },
    SkillInfo {
        name: "Project Planning",
        category: "business",
        depends_on: &[],
        resources: &["Plan a small project with milestones and owners"],
    },
    SkillInfo {
        name: "Risk Management",
        category: "business",
        depends_on: &["Project Planning"],
        resources: &["Build a risk register for a project"],
    },
    SkillInfo {
        name: "Agile",
        category: "business",
        depends_on: &["Project Planning"],
        resources: &["Scrum guide", "Run a two-week sprint on a personal project"],
    },
    SkillInfo {
        name: "Problem Solving",
        category: "soft",
        depends_on: &[],
        resources: &["Work through structured case exercises"],
    },
    SkillInfo {
        name: "Leadership",
        category: "soft",
        depends_on: &["Communication"],
        resources: &["Lead a small initiative at work", "Find a mentor who leads teams"],
    },
];

/// Skills valued in almost every field.
pub const TRANSFERABLE_SKILLS: &[&str] = &["Communication", "Problem Solving", "Leadership", "Project Planning"];

/// Look up a catalog skill by name, ignoring case.
pub fn skill_info(name: &str) -> Option<&'static SkillInfo> {
    SKILLS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Find the career template that best names `field`.
///
/// Matches on id, title, field name or interest tag, in that order.
pub fn find_career(field: &str) -> Option<&'static CareerTemplate> {
    let needle = field.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    CAREERS
        .iter()
        .find(|c| c.id == needle.replace(' ', "_"))
        .or_else(|| {
            CAREERS.iter().find(|c| {
                let title = c.title.to_lowercase();
                title == needle || needle.contains(&title) || title.contains(&needle)
            })
        })
        .or_else(|| {
            CAREERS
                .iter()
                .find(|c| contains_phrase(&needle, c.field) || contains_phrase(c.field, &needle))
        })
        .or_else(|| {
            CAREERS
                .iter()
                .find(|c| c.interest_tags.iter().any(|tag| contains_phrase(&needle, tag)))
        })
}

/// Whether `phrase` occurs in `text` as whole words, ignoring case and
/// punctuation.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let phrase = normalize(phrase);
    if phrase.trim().is_empty() {
        return false;
    }
    format!(" {} ", normalize(text)).contains(&format!(" {} ", phrase.trim()))
}

fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(|word| word.trim_matches('.'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every distinct interest tag in the catalog.
pub fn interest_tags() -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = CAREERS.iter().flat_map(|c| c.interest_tags.iter().copied()).collect();
    tags.sort_unstable();
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_required_skill_is_described() {
        for career in CAREERS {
            for skill in career.required_skills {
                assert!(skill_info(skill).is_some(), "{} needs {skill}", career.id);
            }
        }
    }

    #[test]
    fn every_dependency_is_described() {
        for skill in SKILLS {
            for dep in skill.depends_on {
                assert!(skill_info(dep).is_some(), "{} depends on {dep}", skill.name);
            }
        }
    }

    #[test]
    fn find_career_by_title_field_or_tag() {
        assert_eq!(find_career("Data Scientist").map(|c| c.id), Some("data_scientist"));
        assert_eq!(find_career("ux design").map(|c| c.id), Some("ux_designer"));
        assert_eq!(find_career("cybersecurity").map(|c| c.id), Some("security_analyst"));
        assert!(find_career("basket weaving").is_none());
        assert!(find_career("  ").is_none());
        // "retail" must not match the "ai" tag.
        assert!(find_career("retail").is_none());
    }

    #[test]
    fn phrases_match_whole_words_only() {
        assert!(contains_phrase("I love Machine-Learning!", "machine learning"));
        assert!(contains_phrase("node.js and react", "Node.js"));
        assert!(!contains_phrase("retail", "ai"));
        assert!(contains_phrase("I want to get into data science.", "data science"));
        assert!(!contains_phrase("anything", ""));
    }

    #[test]
    fn interest_tags_are_unique() {
        let tags = interest_tags();
        let mut deduped = tags.clone();
        deduped.dedup();
        assert_eq!(tags, deduped);
        assert!(tags.contains(&"data"));
    }
}
