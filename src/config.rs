//! Bridge configuration.

/// Configuration for the bridge's runtime behavior and agent identity.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Display name published on the agent card.
    pub agent_name: String,
    /// Description published on the agent card.
    pub agent_description: String,
    /// Buffer size of each task's outbound status channel.
    pub channel_capacity: usize,
    /// Name given to the final-answer artifact on completed tasks.
    pub artifact_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            agent_name: "Research Agent".to_string(),
            agent_description: "A research agent that answers questions using web search"
                .to_string(),
            channel_capacity: 100,
            artifact_name: "search result".to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_agent_description(mut self, description: impl Into<String>) -> Self {
        self.agent_description = description.into();
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.channel_capacity, 100);
        assert_eq!(config.artifact_name, "search result");
    }

    #[test]
    fn test_builder_overrides() {
        let config = BridgeConfig::default()
            .with_agent_name("Scout")
            .with_channel_capacity(8);
        assert_eq!(config.agent_name, "Scout");
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.artifact_name, "search result");
    }
}
