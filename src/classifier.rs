//! Offensiveness classification.
//!
//! The bot treats the classifier as a black box that maps texts to probabilities
//! in `[0, 1]`. Two implementations are provided: [`HttpClassifier`] for a remote
//! model service and [`LexiconClassifier`], a self-contained term matcher used when
//! no service is configured.

use async_trait::async_trait;
use log::debug;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Scores texts by how likely they are to be offensive.
#[async_trait]
pub trait OffensivenessClassifier: Send + Sync {
    /// Returns one probability per input text, in the same order.
    async fn predict_probabilities(&self, texts: &[String]) -> Result<Vec<f64>, ClassifierError>;
}

/// Returns true if the given text is offensive, i.e. its probability is strictly
/// above `probability_threshold`.
pub async fn is_offensive<C: OffensivenessClassifier + ?Sized>(
    classifier: &C,
    text: &str,
    probability_threshold: f64,
) -> Result<bool, ClassifierError> {
    let probabilities = classifier
        .predict_probabilities(&[text.to_string()])
        .await?;
    let probability = match probabilities.as_slice() {
        [p] => *p,
        other => {
            return Err(ClassifierError::LengthMismatch {
                expected: 1,
                got: other.len(),
            })
        }
    };
    debug!(
        "Offensiveness probability {:.3} (threshold {:.3})",
        probability, probability_threshold
    );
    Ok(probability > probability_threshold)
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    probabilities: Vec<f64>,
}

/// Classifier backed by a remote model service.
///
/// Sends `POST {"texts": [...]}` and expects `{"probabilities": [...]}`.
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpClassifier {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

/// Checks a response batch against the request batch.
fn validate_probabilities(expected: usize, probabilities: Vec<f64>) -> Result<Vec<f64>, ClassifierError> {
    if probabilities.len() != expected {
        return Err(ClassifierError::LengthMismatch {
            expected,
            got: probabilities.len(),
        });
    }
    if let Some(bad) = probabilities
        .iter()
        .copied()
        .find(|p| !(0.0..=1.0).contains(p))
    {
        return Err(ClassifierError::OutOfRange(bad));
    }
    Ok(probabilities)
}

#[async_trait]
impl OffensivenessClassifier for HttpClassifier {
    async fn predict_probabilities(&self, texts: &[String]) -> Result<Vec<f64>, ClassifierError> {
        debug!("Requesting {} predictions from {}", texts.len(), self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PredictRequest { texts })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let body: PredictResponse = response.json().await?;
        validate_probabilities(texts.len(), body.probabilities)
    }
}

/// Default terms for [`LexiconClassifier`].
const DEFAULT_TERMS: &[&str] = &[
    "asshole", "bastard", "bitch", "bullshit", "crap", "cunt", "damn", "dick",
    "douche", "fag", "fuck", "fucker", "fucking", "idiot", "moron", "motherfucker",
    "nazi", "piss", "prick", "retard", "shit", "shitty", "slut", "stupid", "twat",
    "wanker", "whore",
];

/// Each match multiplies the probability of the text being clean by this factor.
const PER_MATCH_CLEAN_PROBABILITY: f64 = 0.4;

/// Self-contained classifier that counts whole-word matches against a term list.
///
/// The probability is `1 - 0.4^matches`: no match scores `0.0`, one match `0.6`,
/// two matches `0.84`.
pub struct LexiconClassifier {
    pattern: Regex,
}

impl LexiconClassifier {
    /// Builds a classifier with the built-in term list.
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_terms(DEFAULT_TERMS)
    }

    /// Builds a classifier from a list of terms (matched case-insensitively).
    pub fn with_terms<S: AsRef<str>>(terms: &[S]) -> Result<Self, regex::Error> {
        let alternatives = terms
            .iter()
            .map(|term| regex::escape(term.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives))?;
        Ok(LexiconClassifier { pattern })
    }

    fn probability(&self, text: &str) -> f64 {
        let matches = self.pattern.find_iter(text).count();
        1.0 - PER_MATCH_CLEAN_PROBABILITY.powi(matches as i32)
    }
}

#[async_trait]
impl OffensivenessClassifier for LexiconClassifier {
    async fn predict_probabilities(&self, texts: &[String]) -> Result<Vec<f64>, ClassifierError> {
        Ok(texts.iter().map(|text| self.probability(text)).collect())
    }
}
