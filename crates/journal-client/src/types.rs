//! Wire types of the journal API.

use homework_core::{ChildProfile, EducationRef};
use serde::Deserialize;

/// Every journal response wraps its payload in `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: T,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub current: Option<u32>,
    #[serde(default)]
    pub next: Option<u32>,
}

impl<T> ListPage<T> {
    /// The page to request next, if the server reports one after this.
    pub fn next_page(&self) -> Option<u32> {
        match (self.current, self.next) {
            (Some(current), Some(next)) if current < next => Some(next),
            _ => None,
        }
    }
}

/// A child entry of `person/related-child-list`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedChild {
    pub firstname: String,
    pub surname: String,
    #[serde(default)]
    pub educations: Vec<RelatedEducation>,
}

/// An education entry of a related child.
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedEducation {
    pub education_id: i64,
    #[serde(default)]
    pub institution_name: String,
    #[serde(default)]
    pub group_name: String,
}

impl From<RelatedChild> for ChildProfile {
    fn from(child: RelatedChild) -> Self {
        Self {
            first_name: child.firstname,
            last_name: child.surname,
            educations: child
                .educations
                .into_iter()
                .map(|education| EducationRef {
                    education_id: education.education_id,
                    institution: education.institution_name,
                    group: education.group_name,
                })
                .collect(),
        }
    }
}
