//! Payload schemas for the five entity kinds.
//!
//! Each struct is both the request body and the stored document shape. Optional fields
//! are stored as `null` when omitted and list fields default to empty lists.

use serde::{Deserialize, Serialize};

use culinary_core::document::Entity;

use crate::validation::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Tags for filtering and search.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Entity for Recipe {
    fn collection_name() -> &'static str {
        "recipe"
    }
}

impl Validate for Recipe {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_url("image_url", self.image_url.as_deref());
        errors.check_url("video_url", self.video_url.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    /// Teaching content or summary.
    pub content: String,
    /// Beginner/Intermediate/Advanced; free text.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Entity for Lesson {
    fn collection_name() -> &'static str {
        "lesson"
    }
}

impl Validate for Lesson {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_url("video_url", self.video_url.as_deref());
        errors.into_result()
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    /// Ad headline.
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Entity for Ad {
    fn collection_name() -> &'static str {
        "ad"
    }
}

impl Validate for Ad {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_url("image_url", self.image_url.as_deref());
        errors.check_url("link_url", self.link_url.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hosted video URL (YouTube, Vimeo, etc.).
    pub video_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entity for Video {
    fn collection_name() -> &'static str {
        "video"
    }
}

impl Validate for Video {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_url("video_url", Some(&self.video_url));
        errors.into_result()
    }
}

/// The site's contact details. Only one is ever stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    /// Physical address.
    pub address: String,
}

impl Entity for Contact {
    fn collection_name() -> &'static str {
        "contact"
    }
}

impl Validate for Contact {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_email("email", &self.email);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ad_active_defaults_to_true() {
        let ad: Ad = serde_json::from_value(json!({ "title": "Knife sale" })).unwrap();
        assert!(ad.active);

        let ad: Ad = serde_json::from_value(json!({ "title": "Old", "active": false })).unwrap();
        assert!(!ad.active);
    }

    #[test]
    fn recipe_lists_default_to_empty() {
        let recipe: Recipe = serde_json::from_value(json!({ "title": "Toast" })).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
        assert!(recipe.tags.is_empty());
        assert_eq!(recipe.description, None);
    }

    #[test]
    fn video_without_url_does_not_deserialize() {
        let err = serde_json::from_value::<Video>(json!({ "title": "Dicing onions" })).unwrap_err();
        assert!(err.to_string().contains("video_url"));
    }

    #[test]
    fn validators_report_each_bad_field() {
        let recipe = Recipe {
            title: "Ramen".to_string(),
            description: None,
            ingredients: vec![],
            steps: vec![],
            tags: vec![],
            image_url: Some("nope".to_string()),
            video_url: Some("also nope".to_string()),
        };

        let errors = recipe.validate().unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["image_url", "video_url"]);
    }

    #[test]
    fn contact_requires_valid_email() {
        let contact = Contact {
            phone: "555-0100".to_string(),
            email: "not-an-email".to_string(),
            address: "1 Market St".to_string(),
        };
        assert_eq!(contact.validate().unwrap_err().errors()[0].field, "email");

        let contact = Contact { email: "hello@example.com".to_string(), ..contact };
        assert!(contact.validate().is_ok());
    }
}
