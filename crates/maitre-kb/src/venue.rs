use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use maitre_core::error::{MaitreError, Result};

/// Human-readable opening hours for each weekday.
///
/// Each field is either a schedule string ("5:00 PM - 11:00 PM") or the
/// closed sentinel "Closed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekHours {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

impl WeekHours {
    /// Whether the venue is closed on the given day's schedule string.
    pub fn is_closed(schedule: &str) -> bool {
        schedule.eq_ignore_ascii_case("closed")
    }

    fn days(&self) -> [(&'static str, &str); 7] {
        [
            ("monday", self.monday.as_str()),
            ("tuesday", self.tuesday.as_str()),
            ("wednesday", self.wednesday.as_str()),
            ("thursday", self.thursday.as_str()),
            ("friday", self.friday.as_str()),
            ("saturday", self.saturday.as_str()),
            ("sunday", self.sunday.as_str()),
        ]
    }
}

/// The venue knowledge base.
///
/// Never mutated after construction. `specialties` and `features` are
/// ordered: index 0 of `specialties` is the signature dish, and templates
/// reference indices 0 through 4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub name: String,
    pub location: String,
    pub address: String,
    pub phone: String,
    pub hours: WeekHours,
    pub cuisine: String,
    pub specialties: Vec<String>,
    pub price_range: String,
    pub dress_code: String,
    pub features: Vec<String>,
}

impl KnowledgeBase {
    /// The compiled-in default venue record.
    pub fn default_venue() -> Self {
        Self {
            name: "Sajed Restaurant".to_string(),
            location: "Manhattan, New York City".to_string(),
            address: "123 Park Avenue, New York, NY 10001".to_string(),
            phone: "(212) 555-0123".to_string(),
            hours: WeekHours {
                monday: "Closed".to_string(),
                tuesday: "5:00 PM - 11:00 PM".to_string(),
                wednesday: "5:00 PM - 11:00 PM".to_string(),
                thursday: "5:00 PM - 11:00 PM".to_string(),
                friday: "5:00 PM - 12:00 AM".to_string(),
                saturday: "5:00 PM - 12:00 AM".to_string(),
                sunday: "5:00 PM - 10:00 PM".to_string(),
            },
            cuisine: "Contemporary Mediterranean with Persian influences".to_string(),
            specialties: vec![
                "Saffron-infused lamb shank".to_string(),
                "Grilled branzino with pomegranate glaze".to_string(),
                "Wagyu beef kebab".to_string(),
                "Truffle mushroom risotto".to_string(),
                "Baklava with pistachios".to_string(),
            ],
            price_range: "$$$$ (Fine Dining)".to_string(),
            dress_code: "Business Casual to Formal".to_string(),
            features: vec![
                "Private dining rooms".to_string(),
                "Wine cellar".to_string(),
                "Live music on weekends".to_string(),
                "Valet parking".to_string(),
            ],
        }
    }

    /// Load a venue record from a TOML file and validate its shape.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let kb: KnowledgeBase = toml::from_str(&content)
            .map_err(|e| MaitreError::KnowledgeBase(e.to_string()))?;
        kb.validate()?;
        info!("Venue knowledge base loaded from {}", path.display());
        Ok(kb)
    }

    /// Validate the record shape.
    ///
    /// Response templates index `specialties[0..=4]` and join `features`,
    /// so both must be populated; identity fields and every day's schedule
    /// string must be non-empty.
    pub fn validate(&self) -> Result<()> {
        let identity = [
            ("name", &self.name),
            ("location", &self.location),
            ("address", &self.address),
            ("phone", &self.phone),
            ("cuisine", &self.cuisine),
            ("price_range", &self.price_range),
            ("dress_code", &self.dress_code),
        ];
        for (field, value) in identity {
            if value.trim().is_empty() {
                return Err(MaitreError::KnowledgeBase(format!(
                    "field '{}' must not be empty",
                    field
                )));
            }
        }
        for (day, schedule) in self.hours.days() {
            if schedule.trim().is_empty() {
                return Err(MaitreError::KnowledgeBase(format!(
                    "hours for {} must not be empty",
                    day
                )));
            }
        }
        if self.specialties.len() < 5 {
            return Err(MaitreError::KnowledgeBase(format!(
                "at least 5 specialties are required, found {}",
                self.specialties.len()
            )));
        }
        if self.features.is_empty() {
            return Err(MaitreError::KnowledgeBase(
                "at least one feature is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The feature list rendered for templates, comma-joined.
    pub fn features_joined(&self) -> String {
        self.features.join(", ")
    }
}
