//! Intent classification over a fixed, ordered regex table.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coarse purpose of an inbound message, drawn from a closed label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Salutation,
    QuestionPrix,
    Disponibilite,
    DemandeInfo,
    Commande,
    Probleme,
    Remerciement,
    Contact,
    Livraison,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salutation => "salutation",
            Self::QuestionPrix => "question_prix",
            Self::Disponibilite => "disponibilite",
            Self::DemandeInfo => "demande_info",
            Self::Commande => "commande",
            Self::Probleme => "probleme",
            Self::Remerciement => "remerciement",
            Self::Contact => "contact",
            Self::Livraison => "livraison",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First-match-wins classifier.
///
/// Table order is part of the contract: greetings are checked before the
/// price/info patterns, so a greeting that also asks a question classifies
/// as `Salutation`.
#[derive(Debug)]
pub struct IntentClassifier {
    patterns: Vec<(Intent, Regex)>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        let table = [
            (Intent::Salutation, r"\b(bonjour|bonsoir|salut|hello|hi|coucou)\b"),
            (Intent::QuestionPrix, r"\b(prix|coût|combien|tarif)\b"),
            (Intent::Disponibilite, r"\b(disponible|dispo|stock|reste)\b"),
            (Intent::DemandeInfo, r"\b(info|information|comment|pourquoi|détail)\b"),
            (Intent::Commande, r"\b(commander|acheter|prendre|réserver|veux)\b"),
            (Intent::Probleme, r"\b(problème|souci|erreur|aide|marche pas)\b"),
            (Intent::Remerciement, r"\b(merci|thanks)\b"),
            (Intent::Contact, r"\b(contact|téléphone|email|appeler)\b"),
            (Intent::Livraison, r"\b(livraison|livrer|délai|expédition)\b"),
        ];
        let patterns = table
            .into_iter()
            .map(|(intent, pattern)| (intent, Regex::new(&format!("(?i){pattern}")).unwrap()))
            .collect();
        Self { patterns }
    }

    /// Classify `text`; `General` when no pattern matches.
    pub fn classify(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(&lowered))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
