//! Reply personalization: sentiment prefix and intent suffix around the
//! matched template.

use crate::analysis::analyzer::MessageAnalysis;
use crate::analysis::intent::Intent;
use crate::analysis::sentiment::Sentiment;

/// Wrap a matched template according to the message analysis.
pub fn personalize(template: &str, analysis: &MessageAnalysis) -> String {
    let prefix = match analysis.sentiment.label {
        Sentiment::Negatif => "Je comprends votre préoccupation. ",
        Sentiment::Positif => "Merci pour votre intérêt ! ",
        Sentiment::Neutre => "",
    };

    let suffix = match analysis.intent {
        Intent::QuestionPrix => " N'hésitez pas si vous avez d'autres questions.",
        Intent::Probleme => " Notre équipe est là pour vous aider.",
        Intent::Commande => " Nous traitons votre demande rapidement.",
        Intent::Contact => " Vous pouvez nous contacter directement.",
        _ => " Merci pour votre message !",
    };

    format!("{prefix}{template}{suffix}")
}
