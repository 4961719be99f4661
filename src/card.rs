//! Agent card published for discovery.

use crate::a2a::{
    AgentCapabilities, AgentCard, AgentSkill, TransportProtocol, PROTOCOL_VERSION,
};
use crate::config::BridgeConfig;

/// Build the discovery card for the research agent.
///
/// The skills mirror the tools the reasoning runtime has access to: web
/// search, academic paper search, and encyclopedia lookup. Streaming is
/// on; push notifications and cancellation are not offered.
pub fn research_agent_card(config: &BridgeConfig, url: impl Into<String>) -> AgentCard {
    let skills = vec![
        AgentSkill {
            id: "web_search".to_string(),
            name: "Web Search (DuckDuckGo)".to_string(),
            description:
                "Search the web using DuckDuckGo to find current information, news, and general knowledge."
                    .to_string(),
            tags: vec![
                "websearch".to_string(),
                "duckduckgo".to_string(),
                "research".to_string(),
                "internet".to_string(),
            ],
            examples: vec![
                "What's the current temperature in Bristol UK?".to_string(),
                "Find recent news about quantum computing".to_string(),
                "Search for the latest AI developments".to_string(),
            ],
            input_modes: Vec::new(),
            output_modes: Vec::new(),
        },
        AgentSkill {
            id: "arxiv_search".to_string(),
            name: "Academic Paper Search (arXiv)".to_string(),
            description:
                "Search arXiv for academic papers and research publications in physics, mathematics, computer science, and related fields."
                    .to_string(),
            tags: vec![
                "research".to_string(),
                "papers".to_string(),
                "arxiv".to_string(),
                "academic".to_string(),
                "science".to_string(),
            ],
            examples: vec![
                "Find recent papers on quantum computing".to_string(),
                "Search for machine learning research from 2025".to_string(),
                "What are the latest papers on neural networks?".to_string(),
            ],
            input_modes: Vec::new(),
            output_modes: Vec::new(),
        },
        AgentSkill {
            id: "wikipedia_search".to_string(),
            name: "Wikipedia Search".to_string(),
            description:
                "Search Wikipedia for encyclopedic information, definitions, historical facts, and general knowledge on a wide range of topics."
                    .to_string(),
            tags: vec![
                "wikipedia".to_string(),
                "encyclopedia".to_string(),
                "knowledge".to_string(),
                "facts".to_string(),
                "reference".to_string(),
            ],
            examples: vec![
                "What is quantum entanglement?".to_string(),
                "Tell me about the history of the internet".to_string(),
                "Explain what neural networks are".to_string(),
            ],
            input_modes: Vec::new(),
            output_modes: Vec::new(),
        },
    ];

    AgentCard {
        name: config.agent_name.clone(),
        description: config.agent_description.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        url: url.into(),
        preferred_transport: TransportProtocol::JsonRpc,
        capabilities: AgentCapabilities {
            streaming: Some(true),
            push_notifications: Some(false),
            state_transition_history: None,
        },
        default_input_modes: vec!["text".to_string()],
        default_output_modes: vec!["text".to_string()],
        skills,
        provider: None,
        documentation_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_lists_research_skills() {
        let card = research_agent_card(&BridgeConfig::default(), "http://localhost:9998/");

        let ids: Vec<&str> = card.skills.iter().map(|skill| skill.id.as_str()).collect();
        assert_eq!(ids, vec!["web_search", "arxiv_search", "wikipedia_search"]);

        assert_eq!(card.capabilities.streaming, Some(true));
        assert_eq!(card.default_input_modes, vec!["text"]);
        assert_eq!(card.url, "http://localhost:9998/");
    }

    #[test]
    fn test_card_serializes_with_schema_names() {
        let card = research_agent_card(&BridgeConfig::default(), "http://localhost:9998/");
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("protocolVersion").is_some());
        assert!(json.get("defaultInputModes").is_some());
        assert_eq!(json["preferredTransport"], "JSONRPC");
    }
}
