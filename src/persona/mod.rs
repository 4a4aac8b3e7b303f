// src/persona/mod.rs
// Family personas: one fixed voice per family member.
// The catalog is built once at startup and never mutated.

pub mod father;
pub mod mother;
pub mod sibling;

use serde::{Deserialize, Serialize};

use crate::error::InvalidPersona;

/// Directive shared by every persona: tone, answer length, warmth.
pub const BASELINE_DIRECTIVE: &str = "너는 이 가족을 끔찍이 아끼는 AI 비서야. 한국어로 따뜻하게 대답해. \
답변은 3~5문장 정도로 짧고 다정하게 하고, 상대의 하루를 먼저 챙겨 줘.";

/// Stable persona identity. Display labels are parsed into this once at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKey {
    Father,
    Mother,
    Sibling,
}

impl PersonaKey {
    pub const ALL: [PersonaKey; 3] = [PersonaKey::Father, PersonaKey::Mother, PersonaKey::Sibling];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaKey::Father => "father",
            PersonaKey::Mother => "mother",
            PersonaKey::Sibling => "sibling",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PersonaKey::Father => father::LABEL,
            PersonaKey::Mother => mother::LABEL,
            PersonaKey::Sibling => sibling::LABEL,
        }
    }

    fn relation(&self) -> &'static str {
        match self {
            PersonaKey::Father => father::RELATION,
            PersonaKey::Mother => mother::RELATION,
            PersonaKey::Sibling => sibling::RELATION,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PersonaKey::Father => father::NAME,
            PersonaKey::Mother => mother::NAME,
            PersonaKey::Sibling => sibling::NAME,
        }
    }

    fn voice(&self) -> &'static str {
        match self {
            PersonaKey::Father => father::VOICE,
            PersonaKey::Mother => mother::VOICE,
            PersonaKey::Sibling => sibling::VOICE,
        }
    }
}

impl std::fmt::Display for PersonaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PersonaKey {
    type Err = InvalidPersona;

    /// Accepts the key ("father"), the sidebar label ("아버지 (손기혁)"),
    /// the relation ("아버지") or the name ("손기혁").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_lowercase();

        // Label form: take the name between the parentheses
        let parenthesized = trimmed
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(name, _)| name.trim());

        PersonaKey::ALL
            .into_iter()
            .find(|key| {
                lowered == key.as_str()
                    || trimmed == key.label()
                    || trimmed == key.relation()
                    || trimmed == key.name()
                    || parenthesized == Some(key.name())
            })
            .ok_or_else(|| InvalidPersona(s.to_string()))
    }
}

/// One authored persona with its prepared instruction and greeting
#[derive(Debug, Clone)]
pub struct Persona {
    pub key: PersonaKey,
    pub label: &'static str,
    pub name: &'static str,
    instruction: String,
    greeting: String,
}

impl Persona {
    fn build(key: PersonaKey) -> Self {
        Self {
            key,
            label: key.label(),
            name: key.name(),
            instruction: format!("{}\n{}", BASELINE_DIRECTIVE, key.voice()),
            greeting: format!("{}님! 오늘도 행복한 하루 보내세요 🍀", key.name()),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Page title shown above the conversation
    pub fn title(&self) -> String {
        format!("{}님 전용 상담소 💬", self.name)
    }
}

/// Static table of the three family personas
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: [Persona; 3],
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaCatalog {
    pub fn new() -> Self {
        Self {
            personas: PersonaKey::ALL.map(Persona::build),
        }
    }

    pub fn get(&self, key: PersonaKey) -> &Persona {
        match key {
            PersonaKey::Father => &self.personas[0],
            PersonaKey::Mother => &self.personas[1],
            PersonaKey::Sibling => &self.personas[2],
        }
    }

    /// Look up by key or label; unrecognized input is `InvalidPersona`
    pub fn lookup(&self, key: &str) -> Result<&Persona, InvalidPersona> {
        Ok(self.get(key.parse()?))
    }

    pub fn instruction_for(&self, key: &str) -> Result<&str, InvalidPersona> {
        self.lookup(key).map(Persona::instruction)
    }

    pub fn greeting_for(&self, key: &str) -> Result<&str, InvalidPersona> {
        self.lookup(key).map(Persona::greeting)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_labels() {
        assert_eq!("father".parse::<PersonaKey>(), Ok(PersonaKey::Father));
        assert_eq!("MOTHER".parse::<PersonaKey>(), Ok(PersonaKey::Mother));
        assert_eq!("막내 (손준호)".parse::<PersonaKey>(), Ok(PersonaKey::Sibling));
        assert_eq!("아버지".parse::<PersonaKey>(), Ok(PersonaKey::Father));
        assert_eq!("김영숙".parse::<PersonaKey>(), Ok(PersonaKey::Mother));
        assert_eq!("엄마(김영숙)".parse::<PersonaKey>(), Ok(PersonaKey::Mother));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "uncle".parse::<PersonaKey>().unwrap_err();
        assert_eq!(err, InvalidPersona("uncle".into()));
        assert!("".parse::<PersonaKey>().is_err());
    }

    #[test]
    fn test_father_instruction_has_baseline_and_voice() {
        let catalog = PersonaCatalog::new();
        let instruction = catalog.instruction_for("father").unwrap();
        assert!(instruction.starts_with(BASELINE_DIRECTIVE));
        assert!(instruction.contains("손기혁"));
        assert!(instruction.contains("존댓말"));
        assert!(!instruction.contains("반존대"));
    }

    #[test]
    fn test_instruction_for_unknown_key() {
        let catalog = PersonaCatalog::new();
        assert_eq!(
            catalog.instruction_for("grandma"),
            Err(InvalidPersona("grandma".into()))
        );
        assert!(catalog.greeting_for("grandma").is_err());
    }

    #[test]
    fn test_greeting_uses_name() {
        let catalog = PersonaCatalog::new();
        assert_eq!(
            catalog.greeting_for("mother").unwrap(),
            "김영숙님! 오늘도 행복한 하루 보내세요 🍀"
        );
        assert_eq!(catalog.get(PersonaKey::Sibling).title(), "손준호님 전용 상담소 💬");
    }

    #[test]
    fn test_catalog_order_matches_keys() {
        let catalog = PersonaCatalog::new();
        let keys: Vec<_> = catalog.iter().map(|p| p.key).collect();
        assert_eq!(keys, PersonaKey::ALL.to_vec());
        for key in PersonaKey::ALL {
            assert_eq!(catalog.get(key).key, key);
        }
    }
}
