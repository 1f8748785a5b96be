//! The ordered intent rule table.
//!
//! Each rule pairs a set of trigger substrings with a response template over
//! the knowledge base. Matching is a linear scan in declaration order with
//! early exit: the first rule with any trigger contained in the lowercased
//! utterance wins. Declaration order is the tie-break for overlapping
//! triggers, so this must stay a list, never a map.

use maitre_kb::KnowledgeBase;

/// A single intent rule: trigger substrings plus a response template.
pub struct IntentRule {
    /// Short topic label, used in logs.
    pub topic: &'static str,
    /// Substrings that fire this rule when found in the lowercased utterance.
    pub triggers: &'static [&'static str],
    /// Renders the response from the knowledge base.
    pub render: fn(&KnowledgeBase) -> String,
}

impl IntentRule {
    /// Whether any trigger is contained in the (already lowercased) text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t))
    }
}

/// The fixed, ordered collection of intent rules.
pub struct RuleTable {
    rules: Vec<IntentRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable {
    /// Build the rule table in its fixed declaration order.
    pub fn new() -> Self {
        let rules = vec![
            IntentRule {
                topic: "reservation",
                triggers: &["reservation", "book", "table"],
                render: |kb| {
                    format!(
                        "I'd be delighted to help you with a reservation at {}. \
                         You can call us at {} to reserve a table. We're open Tuesday \
                         through Sunday. Would you like to know our hours for a specific day?",
                        kb.name, kb.phone
                    )
                },
            },
            IntentRule {
                topic: "hours",
                triggers: &["hour", "open", "close"],
                render: |kb| {
                    format!(
                        "{} is open Tuesday through Saturday from 5 PM to 11 PM, \
                         Friday and Saturday until midnight, and Sunday from 5 PM to 10 PM. \
                         We're closed on Mondays. When would you like to visit us?",
                        kb.name
                    )
                },
            },
            IntentRule {
                topic: "menu",
                triggers: &["menu", "food", "dish", "specialty"],
                render: |kb| {
                    format!(
                        "Our menu features {}. Our signature dishes include our famous {}, \
                         {}, and {}. We also offer an exquisite {} and finish with our \
                         house-made {}. Would you like to hear more about any specific dish?",
                        kb.cuisine,
                        kb.specialties[0],
                        kb.specialties[1],
                        kb.specialties[2],
                        kb.specialties[3],
                        kb.specialties[4]
                    )
                },
            },
            IntentRule {
                topic: "location",
                triggers: &["location", "address", "where"],
                render: |kb| {
                    format!(
                        "{} is located in the heart of {} at {}. We offer valet parking \
                         for your convenience. Would you like directions?",
                        kb.name, kb.location, kb.address
                    )
                },
            },
            IntentRule {
                topic: "price",
                triggers: &["price", "cost", "expensive"],
                render: |kb| {
                    format!(
                        "{} is a fine dining establishment. Our price range is {}. \
                         We offer an unforgettable culinary experience with the finest \
                         ingredients and impeccable service. Would you like to know about \
                         our tasting menu options?",
                        kb.name, kb.price_range
                    )
                },
            },
            IntentRule {
                topic: "dress-code",
                triggers: &["dress", "attire", "wear"],
                render: |kb| {
                    format!(
                        "Our dress code is {}. We want you to feel comfortable while \
                         maintaining the elegant atmosphere of our restaurant. Business \
                         casual or formal attire is perfect for dining with us.",
                        kb.dress_code
                    )
                },
            },
            IntentRule {
                topic: "parking",
                triggers: &["parking", "valet"],
                render: |kb| {
                    format!(
                        "Yes, we offer complimentary valet parking for all our guests. \
                         Simply pull up to our entrance at {}, and our valet team will \
                         take care of your vehicle.",
                        kb.address
                    )
                },
            },
            IntentRule {
                topic: "events",
                triggers: &["special", "event", "private"],
                render: |kb| {
                    format!(
                        "{} offers {}. We're perfect for special occasions, business \
                         dinners, and celebrations. Would you like to inquire about \
                         private dining for a special event?",
                        kb.name,
                        kb.features_joined()
                    )
                },
            },
            IntentRule {
                topic: "wine",
                triggers: &["wine", "drink", "bar"],
                render: |_kb| {
                    "We have an extensive wine collection housed in our \
                     temperature-controlled wine cellar, featuring selections from around \
                     the world. Our sommelier can help you pair the perfect wine with your \
                     meal. We also offer craft cocktails and premium spirits."
                        .to_string()
                },
            },
            IntentRule {
                topic: "greeting",
                triggers: &["hello", "hi", "hey"],
                render: |kb| {
                    format!(
                        "Welcome to {}, New York's premier destination for {}! I'm your \
                         AI assistant. How may I help you today? I can assist with \
                         reservations, menu information, hours, location, and more.",
                        kb.name, kb.cuisine
                    )
                },
            },
            IntentRule {
                topic: "thanks",
                triggers: &["thank"],
                render: |kb| {
                    format!(
                        "You're very welcome! We look forward to serving you at {}. \
                         If you need anything else, feel free to ask. Have a wonderful day!",
                        kb.name
                    )
                },
            },
        ];
        Self { rules }
    }

    /// Return the first rule whose trigger set matches the lowercased text.
    pub fn first_match(&self, lowered: &str) -> Option<&IntentRule> {
        self.rules.iter().find(|rule| rule.matches(lowered))
    }

    /// Number of topic rules (excluding the fallback).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The fallback response for utterances no topic rule matches.
pub fn fallback_response(kb: &KnowledgeBase) -> String {
    format!(
        "Thank you for your interest in {}. I can help you with reservations, \
         our menu, hours of operation, location, special events, and more. \
         What would you like to know?",
        kb.name
    )
}
