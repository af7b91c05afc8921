//! Similar-articles support for bhub.
//!
//! Embeddings come from an external HTTP service behind the
//! [`EmbeddingProvider`] trait; this module only stores vectors (as JSON on
//! the article row) and ranks candidates by cosine similarity. When no
//! provider is configured the feature degrades to empty results.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::content::{Article, ArticleRepository};
use crate::db::Database;
use crate::{BhubError, Result};

/// External boundary for computing text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Compute an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedding provider backed by an HTTP service.
///
/// POSTs `{"text": ...}` to `<base>/embed` and expects
/// `{"embedding": [...]}` back.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl HttpEmbeddingProvider {
    /// Create a provider against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BhubError::Embedding(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embed", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| BhubError::Embedding(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(BhubError::Embedding(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| BhubError::Embedding(format!("invalid embedding response: {e}")))?;

        Ok(body.embedding)
    }
}

/// Serialize an embedding vector for storage on the article row.
pub fn encode_embedding(vector: &[f32]) -> String {
    serde_json::to_string(vector).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a stored embedding vector.
pub fn decode_embedding(json: &str) -> Option<Vec<f32>> {
    serde_json::from_str(json).ok()
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Find the articles most similar to the given one.
///
/// Ranks up to `candidates` recent non-archived articles by cosine
/// similarity against the target's stored embedding. Articles without an
/// embedding (including the target) yield an empty result.
pub async fn find_similar(
    db: &Database,
    article_id: i64,
    candidates: usize,
    limit: usize,
) -> Result<Vec<Article>> {
    let repo = ArticleRepository::new(db.pool());

    let article = repo
        .get_by_id(article_id)
        .await?
        .ok_or_else(|| BhubError::NotFound("article".into()))?;

    let target = match article.embedding.as_deref().and_then(decode_embedding) {
        Some(vector) => vector,
        None => return Ok(Vec::new()),
    };

    let pool = repo
        .list_recent_with_embeddings(candidates as i64, article_id)
        .await?;

    let mut scored: Vec<(f32, Article)> = pool
        .into_iter()
        .filter_map(|candidate| {
            let vector = candidate.embedding.as_deref().and_then(decode_embedding)?;
            let score = cosine_similarity(&target, &vector);
            (score > 0.0).then_some((score, candidate))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);

    Ok(scored.into_iter().map(|(_, article)| article).collect())
}
