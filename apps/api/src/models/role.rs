use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weighted top-level evaluation dimension. Weights conventionally sum to
/// 100 across a category set; this is prompt guidance, not an enforced
/// invariant (the confirm handler warns when the sum is off).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainCategory {
    pub name: String,
    pub description: String,
    pub weight: u32,
}

/// A finer-grained dimension attached to one main category by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub name: String,
    pub main_category: String,
    pub description: String,
}

/// The full evaluation rubric for a role: model-suggested, caller-editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySet {
    pub main_categories: Vec<MainCategory>,
    pub sub_categories: Vec<SubCategory>,
    #[serde(default)]
    pub evaluation_guidance: String,
}

impl CategorySet {
    /// Sum of main-category weights. 100 by convention.
    pub fn weight_total(&self) -> u32 {
        self.main_categories.iter().map(|c| c.weight).sum()
    }
}

/// The job opening being recruited for. At most one exists per session;
/// saving a new role replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: String,
    pub categories: CategorySet,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(title: String, description: String, required_skills: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            required_skills,
            categories: CategorySet::default(),
            created_at: Utc::now(),
        }
    }
}
