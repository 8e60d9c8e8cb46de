use serde::{Deserialize, Serialize};

/// The whole site's content, stored as one JSON document.
///
/// Generic over the project representation so the stored document
/// (`Portfolio<Project>`) and the enriched response (`Portfolio<EnrichedProject>`)
/// share one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio<P = Project> {
    pub name: String,
    pub hero: Hero,
    pub about: About,
    pub stats: Vec<Stat>,
    pub skills: Skills,
    pub projects: Vec<P>,
    pub contact: ContactInfo,
    pub social: SocialLinks,
    #[serde(rename = "resumeUrl", default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

impl<P> Portfolio<P> {
    /// Rebuilds the document with a different project representation.
    pub fn with_projects<Q>(self, projects: Vec<Q>) -> Portfolio<Q> {
        Portfolio {
            name: self.name,
            hero: self.hero,
            about: self.about,
            stats: self.stats,
            skills: self.skills,
            projects,
            contact: self.contact,
            social: self.social,
            resume_url: self.resume_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub greeting: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub frontend: Vec<Skill>,
    pub backend: Vec<Skill>,
    pub tools: Vec<Skill>,
}

impl Skills {
    /// All skills with the category they belong to.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Skill)> {
        self.frontend
            .iter()
            .map(|s| ("frontend", s))
            .chain(self.backend.iter().map(|s| ("backend", s)))
            .chain(self.tools.iter().map(|s| ("tools", s)))
    }
}

/// A named skill with a proficiency level from 1 to 5.
///
/// The level is any JSON number (`4`, `4.0`, `3.5`) and is written back in the
/// form it was given; the range is checked during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: serde_json::Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    Web,
    Mobile,
    Api,
    Game,
    Graphics,
    System,
    Devops,
    Vr,
    All,
}

/// A project as stored in the portfolio document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub category: ProjectCategory,
    /// Asset folder name; empty means the project has no image folder.
    pub image_folder: String,
    /// Advisory only: the image folder on disk is authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<String>>,
    #[serde(rename = "githubUrl", default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(rename = "liveUrl", default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
}

impl Project {
    pub fn image_folder(&self) -> Option<&str> {
        let folder = self.image_folder.trim();
        (!folder.is_empty()).then_some(folder)
    }
}

/// A project as returned to the client: `images` holds the originals found on
/// disk, while the raw scan and the stored list are kept in separate fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProject {
    #[serde(flatten)]
    pub project: Project,
    #[serde(rename = "allImages", skip_serializing_if = "Option::is_none")]
    pub all_images: Option<Vec<String>>,
    #[serde(rename = "originalImages", skip_serializing_if = "Option::is_none")]
    pub original_images: Option<Vec<String>>,
}

impl EnrichedProject {
    /// Wraps a project that has no image folder; nothing is derived.
    pub fn passthrough(project: Project) -> Self {
        Self {
            project,
            all_images: None,
            original_images: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(rename = "githubUrl", default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(rename = "linkedinUrl", default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(rename = "twitterUrl", default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
}

pub type EnrichedPortfolio = Portfolio<EnrichedProject>;

#[cfg(test)]
pub(crate) fn sample_portfolio() -> Portfolio {
    serde_json::from_value(sample_portfolio_json()).expect("sample portfolio is valid")
}

#[cfg(test)]
pub(crate) fn sample_portfolio_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Example",
        "hero": {
            "greeting": "Hi, I'm",
            "title": "Systems Developer",
            "description": "I build fast things."
        },
        "about": { "description": "Ten years of shipping software." },
        "stats": [{ "value": "10+", "label": "Years" }],
        "skills": {
            "frontend": [{ "name": "TypeScript", "level": 4 }],
            "backend": [{ "name": "Rust", "level": 5 }],
            "tools": [{ "name": "Docker", "level": 3 }]
        },
        "projects": [
            {
                "id": "raytracer",
                "title": "Raytracer",
                "description": "A path tracer.",
                "technologies": ["Rust"],
                "category": "graphics",
                "image_folder": "raytracer",
                "images": ["legacy.png"],
                "githubUrl": "https://github.com/example/raytracer"
            },
            {
                "id": "cli",
                "title": "CLI",
                "description": "A command line tool.",
                "technologies": ["Rust"],
                "category": "system",
                "image_folder": ""
            }
        ],
        "contact": {
            "email": "ada@example.com",
            "phone": "+1 555 0100",
            "location": "Remote"
        },
        "social": { "githubUrl": "https://github.com/example" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_camel_case_fields() {
        let value = sample_portfolio_json();
        let portfolio: Portfolio = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(
            portfolio.projects[0].github_url.as_deref(),
            Some("https://github.com/example/raytracer")
        );
        assert_eq!(serde_json::to_value(&portfolio).unwrap(), value);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut value = sample_portfolio_json();
        value["projects"][0]["category"] = serde_json::json!("blockchain");
        assert!(serde_json::from_value::<Portfolio>(value).is_err());
    }

    #[test]
    fn test_blank_image_folder_is_none() {
        let portfolio = sample_portfolio();
        assert_eq!(portfolio.projects[0].image_folder(), Some("raytracer"));
        assert_eq!(portfolio.projects[1].image_folder(), None);
    }

    #[test]
    fn test_enriched_project_serializes_flat() {
        let mut project = sample_portfolio().projects.remove(0);
        project.images = Some(vec!["a.png".to_string()]);
        let enriched = EnrichedProject {
            project,
            all_images: Some(vec!["a.png".to_string(), "a_small.jpg".to_string()]),
            original_images: Some(vec!["legacy.png".to_string()]),
        };
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["id"], "raytracer");
        assert_eq!(value["images"], serde_json::json!(["a.png"]));
        assert_eq!(value["allImages"][1], "a_small.jpg");
        assert_eq!(value["originalImages"][0], "legacy.png");
    }
}
