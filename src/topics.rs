//! The fixed catalog of deepening topics a student can choose in phase two.
//!
//! Topics are a closed enum so every lookup (title, description, follow-up
//! questions) is an exhaustive `match` rather than a string-keyed map.

use std::fmt;

/// General follow-up questions shared by every topic.
pub const GENERAL_FOLLOW_UPS: [&str; 5] = [
    "Wat zou er gebeuren als dit besluit verkeerd uitpakt?",
    "Hoe zou dit anders zijn bij een groot internationaal bedrijf dan bij een lokaal bedrijf?",
    "Welke keuze zou jij zelf maken, en waarom?",
    "Hoe hangt dit samen met wat je in hoofdstuk 6 hebt gelezen?",
    "Hoe denk je dat dit over 10 jaar anders zou zijn door automatisering of duurzaamheid?",
];

const SHIPPER_FOLLOW_UPS: [&str; 3] = [
    "Welke extra kosten, risico's of logistieke stappen komen erbij kijken voor een kleine onderneming die wil verschepen via een barge?",
    "Welke schaalvoordelen of nadelen zie je voor een verlader bij de keuze tussen truck en schip?",
    "Welke rol spelen betrouwbaarheid en flexibiliteit bij deze keuze?",
];

/// A deepening topic. Declaration order is catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ContainerTerminal,
    Drp,
    RoutePlanning,
    TerminalLocation,
    LogisticsServices,
    Uncertainties,
    ShipperPerspective,
}

impl Topic {
    const ALL: [Self; 7] = [
        Self::ContainerTerminal,
        Self::Drp,
        Self::RoutePlanning,
        Self::TerminalLocation,
        Self::LogisticsServices,
        Self::Uncertainties,
        Self::ShipperPerspective,
    ];

    /// All topics in catalog order.
    pub const fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Stable identifier used for selection.
    pub const fn id(self) -> &'static str {
        match self {
            Self::ContainerTerminal => "containerterminal",
            Self::Drp => "drp",
            Self::RoutePlanning => "routeplanning",
            Self::TerminalLocation => "vestigingslocatie",
            Self::LogisticsServices => "dienstverlening",
            Self::Uncertainties => "onzekerheden",
            Self::ShipperPerspective => "verladersperspectief",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::ContainerTerminal => "Containerterminal: definitie en functie",
            Self::Drp => "Relatie met DRP-I & DRP-II",
            Self::RoutePlanning => "Routeplanprobleem: welk type past bij dit vraagstuk?",
            Self::TerminalLocation => "Optimale vestigingslocatie van een terminal",
            Self::LogisticsServices => "Logistieke dienstverlening",
            Self::Uncertainties => "Onzekerheden in aanbod en vraag",
            Self::ShipperPerspective => "Verladersperspectief",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::ContainerTerminal => {
                "Onderzoek wat een containerterminal precies is en welke rol het speelt"
            }
            Self::Drp => "Verbind de game-ervaring met Distribution Requirements Planning",
            Self::RoutePlanning => "Analyseer welk type routeplanprobleem van toepassing is",
            Self::TerminalLocation => "Welke variabelen spelen mee bij locatiekeuze?",
            Self::LogisticsServices => "Hoe zou je een containerterminal typeren en waarom?",
            Self::Uncertainties => "Omgaan met onzekerheden in containeraanbod of klantvraag",
            Self::ShipperPerspective => "Hoe interessant is scheepvaart voor kleine ondernemingen?",
        }
    }

    /// Questions only this topic asks. Most topics have none.
    pub const fn specific_follow_ups(self) -> &'static [&'static str] {
        match self {
            Self::ShipperPerspective => &SHIPPER_FOLLOW_UPS,
            Self::ContainerTerminal
            | Self::Drp
            | Self::RoutePlanning
            | Self::TerminalLocation
            | Self::LogisticsServices
            | Self::Uncertainties => &[],
        }
    }

    /// Topic-specific follow-ups first, then the shared pool.
    pub fn follow_up_questions(self) -> Vec<&'static str> {
        self.specific_follow_ups()
            .iter()
            .chain(GENERAL_FOLLOW_UPS.iter())
            .copied()
            .collect()
    }

    /// Look a topic up by its identifier. Matching is exact.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.id() == id)
    }

    /// Resolve either an identifier or a 1-based catalog number.
    pub fn resolve(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(number) = input.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(|index| Self::ALL.get(index))
                .copied();
        }
        Self::from_id(input)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
