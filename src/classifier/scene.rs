use serde::{Deserialize, Serialize};

use super::rules::RuleSet;

/// Catalog entry for one scene of the film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Phrases that point at this scene when they appear in chat text.
    #[serde(default, skip_serializing)]
    pub keywords: Vec<String>,
}

/// Immutable scene catalog plus the keyword rules derived from it.
///
/// Catalog order is rule order, so the first scene whose keywords occur in
/// the text is the one reported.
#[derive(Debug)]
pub struct SceneCatalog {
    scenes: Vec<Scene>,
    rules: RuleSet<usize>,
}

impl SceneCatalog {
    pub fn new(scenes: Vec<Scene>) -> Self {
        let mut rules = RuleSet::new();
        for (index, scene) in scenes.iter().enumerate() {
            let keywords: Vec<String> = scene
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            rules.push(move |text| keywords.iter().any(|k| text.contains(k.as_str())), index);
        }
        Self { scenes, rules }
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Return the first scene whose keywords appear in `text`, ignoring case.
    pub fn detect(&self, text: &str) -> Option<&Scene> {
        let lowered = text.to_lowercase();
        self.rules
            .evaluate(&lowered)
            .and_then(|&index| self.scenes.get(index))
    }
}

#[cfg(test)]
pub(crate) fn holiday_scenes() -> Vec<Scene> {
    let scene = |id: &str, title: &str, keywords: &[&str]| Scene {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        image_url: format!("https://storage.googleapis.com/holiday_add_assets/{id}.png"),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    };
    vec![
        scene("london", "London at Christmas", &["london", "skyline"]),
        scene("living-room", "Cozy Living Room", &["living room", "family", "tree"]),
        scene(
            "money-animation",
            "Money at Work",
            &["money", "invest", "savings", "rewards"],
        ),
    ]
}
