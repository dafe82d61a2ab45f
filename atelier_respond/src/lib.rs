use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const REPLY_PREFIX: &str = "I'd be happy to help with that! ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Color,
    Fit,
    Style,
    Fabric,
    Fallback,
}

impl Intent {
    /// Rules are checked in declaration order and the first hit wins, so
    /// "what color fits my size" is a color question.
    const RULES: [(Intent, &'static [&'static str]); 4] = [
        (Intent::Color, &["color"]),
        (Intent::Fit, &["size", "fit"]),
        (Intent::Style, &["style", "trend"]),
        (Intent::Fabric, &["fabric"]),
    ];

    pub fn classify(input_txt: &str) -> Self {
        let input_txt = input_txt.to_lowercase();
        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| input_txt.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Fallback)
    }

    fn body(&self) -> &'static str {
        match self {
            Intent::Color => "Based on current trends, I recommend soft pastels like lavender and sage green for spring, or rich jewel tones like emerald and sapphire for a bold look.",
            Intent::Fit => "For the perfect fit, I recommend using our AI body measurement tool. Would you like me to guide you through it?",
            Intent::Style => "This season's hottest trends include cottagecore aesthetics, Y2K revival pieces, and sustainable minimalism. Which style resonates with you?",
            Intent::Fabric => "Great question! For summer, I recommend lightweight cotton, linen, or bamboo blends. For formal wear, silk and crepe work beautifully.",
            Intent::Fallback => "Could you tell me more about what you're looking for? I can help with design ideas, styling tips, sizing, or fabric recommendations.",
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            Intent::Color => &[
                "Show color palettes",
                "What matches my skin tone?",
                "Trending color combos",
            ],
            Intent::Fit => &["Start body scan", "Size chart help", "Fit troubleshooting"],
            Intent::Style => &[
                "Show cottagecore looks",
                "Y2K outfit ideas",
                "Minimalist wardrobe",
            ],
            Intent::Fabric => &[
                "Fabric comparison",
                "Care instructions",
                "Sustainable options",
            ],
            Intent::Fallback => &[
                "Design a dress",
                "Style consultation",
                "Fabric guide",
                "Size help",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
    pub suggestions: Vec<String>,
}

impl From<Intent> for Reply {
    fn from(intent: Intent) -> Self {
        Self {
            intent,
            text: format!("{REPLY_PREFIX}{}", intent.body()),
            suggestions: intent.suggestions().iter().map(|x| x.to_string()).collect(),
        }
    }
}

/// Never fails: blank input is the caller's problem and simply lands on the
/// fallback reply here.
pub fn classify(input_txt: &str) -> Reply {
    let intent = Intent::classify(input_txt);
    debug!("Classified prompt as {intent:?}: `{input_txt}`");
    intent.into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuickAction {
    Sizing,
    Style,
    Fabric,
    Order,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Sizing,
        QuickAction::Style,
        QuickAction::Fabric,
        QuickAction::Order,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            QuickAction::Sizing => "sizing",
            QuickAction::Style => "style",
            QuickAction::Fabric => "fabric",
            QuickAction::Order => "order",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::Sizing => "Help with sizing",
            QuickAction::Style => "Style advice",
            QuickAction::Fabric => "Fabric info",
            QuickAction::Order => "Track order",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            QuickAction::Sizing => "📏",
            QuickAction::Style => "✨",
            QuickAction::Fabric => "🧵",
            QuickAction::Order => "📦",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::Sizing => "Can you help me with sizing?",
            QuickAction::Style => "I need style advice",
            QuickAction::Fabric => "Tell me about fabrics",
            QuickAction::Order => "I want to track my order",
        }
    }
}

impl FromStr for QuickAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match QuickAction::ALL
            .into_iter()
            .find(|action| action.id().eq_ignore_ascii_case(s))
        {
            Some(action) => Ok(action),
            None => bail!("unknown quick action '{s}' (expected sizing, style, fabric or order)"),
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn can_match_color_in_any_case() {
        for prompt in ["color", "Help me pick COLORS", "which Colour or color?"] {
            let reply = classify(prompt);

            assert_eq!(Intent::Color, reply.intent);
            assert_eq!(
                vec![
                    "Show color palettes",
                    "What matches my skin tone?",
                    "Trending color combos"
                ],
                reply.suggestions
            );
            assert!(reply.text.contains("jewel tones"));
        }
    }

    #[test]
    fn can_prefer_color_over_size() {
        assert_eq!(Intent::Color, classify("what color fits my size").intent);
        assert_eq!(Intent::Color, classify("What color fits my size?").intent);
    }

    #[test]
    fn can_prefer_fit_over_style_and_fabric() {
        assert_eq!(Intent::Fit, classify("does this style fit?").intent);
        assert_eq!(Intent::Fit, classify("fabric SIZE chart").intent);
    }

    #[test]
    fn can_prefer_style_over_fabric() {
        assert_eq!(Intent::Style, classify("trending fabric").intent);
        assert_eq!(Intent::Style, classify("Show me trending styles").intent);
    }

    #[test]
    fn can_match_fit_as_substring() {
        // plain substring matching, so "outfit" is a fit question
        assert_eq!(Intent::Fit, classify("an outfit for tonight").intent);
    }

    #[test]
    fn can_reply_to_fabric_question() {
        let reply = classify("Tell me about fabric");

        assert_eq!(Intent::Fabric, reply.intent);
        assert!(reply
            .text
            .starts_with("I'd be happy to help with that! Great question!"));
        assert_eq!(
            vec!["Fabric comparison", "Care instructions", "Sustainable options"],
            reply.suggestions
        );
    }

    #[test]
    fn can_fallback_on_empty_input() {
        let reply = classify("");

        assert_eq!(Intent::Fallback, reply.intent);
        assert_eq!(
            "I'd be happy to help with that! Could you tell me more about what you're looking for? I can help with design ideas, styling tips, sizing, or fabric recommendations.",
            reply.text
        );
        assert_eq!(
            vec!["Design a dress", "Style consultation", "Fabric guide", "Size help"],
            reply.suggestions
        );
    }

    #[test]
    fn can_prefix_every_reply() {
        for intent in [
            Intent::Color,
            Intent::Fit,
            Intent::Style,
            Intent::Fabric,
            Intent::Fallback,
        ] {
            let reply = Reply::from(intent);
            assert!(reply.text.starts_with(REPLY_PREFIX));
            assert!(!reply.suggestions.is_empty());
        }
    }

    #[test]
    fn can_parse_quick_actions() {
        assert_eq!(QuickAction::Fabric, "fabric".parse().unwrap());
        assert_eq!(QuickAction::Sizing, " Sizing ".parse().unwrap());
        assert!("returns".parse::<QuickAction>().is_err());
    }

    #[test]
    fn can_route_quick_action_prompts() {
        // "sizing" contains neither "size" nor "fit"
        assert_eq!(Intent::Fallback, classify(QuickAction::Sizing.prompt()).intent);
        assert_eq!(Intent::Style, classify(QuickAction::Style.prompt()).intent);
        assert_eq!(Intent::Fabric, classify(QuickAction::Fabric.prompt()).intent);
        assert_eq!(Intent::Fallback, classify(QuickAction::Order.prompt()).intent);
    }
}
