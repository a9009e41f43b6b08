//! Page rendering abstractions

use crate::core::error::RenderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

/// Sub-resource categories a renderer may skip to load a page faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Media,
    Font,
    Stylesheet,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Image,
        ResourceType::Media,
        ResourceType::Font,
        ResourceType::Stylesheet,
    ];
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResourceType::Image => "image",
                ResourceType::Media => "media",
                ResourceType::Font => "font",
                ResourceType::Stylesheet => "stylesheet",
            }
        )
    }
}

impl FromStr for ResourceType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(ResourceType::Image),
            "media" => Ok(ResourceType::Media),
            "font" => Ok(ResourceType::Font),
            "stylesheet" => Ok(ResourceType::Stylesheet),
            _ => Err(anyhow::anyhow!("Invalid resource type: {}", s)),
        }
    }
}

/// Set of sub-resource categories the renderer should not load.
///
/// Blocking only changes how fast a page renders, never what the document
/// text contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBlockPolicy {
    blocked: BTreeSet<ResourceType>,
}

impl ResourceBlockPolicy {
    pub fn new(blocked: impl IntoIterator<Item = ResourceType>) -> Self {
        Self {
            blocked: blocked.into_iter().collect(),
        }
    }

    pub fn blocks(&self, resource: ResourceType) -> bool {
        self.blocked.contains(&resource)
    }
}

impl Default for ResourceBlockPolicy {
    fn default() -> Self {
        Self::new(ResourceType::ALL)
    }
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub url: String,
    pub block_policy: ResourceBlockPolicy,
}

/// Produces the final HTML of a page after client-side scripts have run.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<String, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_blocks_everything_non_essential() {
        let policy = ResourceBlockPolicy::default();
        for resource in ResourceType::ALL {
            assert!(policy.blocks(resource));
        }
        assert!(!ResourceBlockPolicy::new(Vec::new()).blocks(ResourceType::Image));
    }

    #[test]
    fn test_resource_type_from_str() {
        assert_eq!("Image".parse::<ResourceType>().unwrap(), ResourceType::Image);
        assert_eq!(
            "STYLESHEET".parse::<ResourceType>().unwrap(),
            ResourceType::Stylesheet
        );
        assert!("script".parse::<ResourceType>().is_err());
        assert_eq!(ResourceType::Font.to_string(), "font");
    }
}
