//! Embedding generation and cosine similarity using Model2Vec

use crate::error::{Result, SmartCvError};
use log::info;
use model2vec_rs::model::StaticModel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Text embedding capability. Implementations must be deterministic for a
/// fixed model version: the same text always encodes to the same vector.
pub trait Embedder: Send + Sync {
    fn encode(&self, text: &str) -> Vec<f32>;

    /// Model identifier, for report metadata.
    fn model_name(&self) -> &str;
}

/// Embedding engine backed by a Model2Vec static model. Loaded once and
/// shared read-only across analyses.
pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityScore {
    /// Cosine similarity of the two texts, in [-1, 1]
    pub score: f32,
    pub embedding_dim: usize,
}

impl EmbeddingEngine {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();

        let model = StaticModel::from_pretrained(model_path, None, None, None).map_err(|e| {
            SmartCvError::EmbeddingUnavailable(format!(
                "Failed to load embedding model from {}: {}",
                model_path.display(),
                e
            ))
        })?;

        info!(
            "Embedding model {} loaded in {:.2?}",
            model_name,
            start_time.elapsed()
        );

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for EmbeddingEngine {
    fn encode(&self, text: &str) -> Vec<f32> {
        self.model.encode_single(text)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity between two embeddings: dot(a,b) / (|a| * |b|).
///
/// A zero-norm embedding (empty or all-unknown input) scores 0.0 instead of
/// producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SmartCvError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}

/// Encode both texts independently and reduce them to one similarity scalar.
pub fn similarity(embedder: &dyn Embedder, text1: &str, text2: &str) -> Result<SimilarityScore> {
    let embedding1 = embedder.encode(text1);
    let embedding2 = embedder.encode(text2);

    let score = cosine_similarity(&embedding1, &embedding2)?;

    Ok(SimilarityScore {
        score,
        embedding_dim: embedding1.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HashEmbedder;

    // Deterministic stand-in: folds bytes into a fixed-dimension vector.
    impl Embedder for HashEmbedder {
        fn encode(&self, text: &str) -> Vec<f32> {
            let mut embedding = vec![0.0f32; 16];
            for (i, byte) in text.bytes().enumerate() {
                embedding[i % 16] += byte as f32 / 255.0;
            }
            embedding
        }

        fn model_name(&self) -> &str {
            "hash-embedder"
        }
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, 0.3, 0.2];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        let score = cosine_similarity(&a, &b).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_symmetry() {
        let a = vec![0.1, 0.9, 0.4];
        let b = vec![0.7, 0.2, 0.5];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero_not_nan() {
        let zero = vec![0.0, 0.0, 0.0];
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&v, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(cosine_similarity(&a, &b).is_err());
    }

    #[test]
    fn test_similarity_self_is_one() {
        let embedder = HashEmbedder;
        let result = similarity(&embedder, "Python developer", "Python developer").unwrap();
        assert!((result.score - 1.0).abs() < 1e-6);
        assert_eq!(result.embedding_dim, 16);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let embedder = HashEmbedder;
        let ab = similarity(
            &embedder,
            "Python developer with 5 years experience",
            "Looking for Python developer",
        )
        .unwrap();
        let ba = similarity(
            &embedder,
            "Looking for Python developer",
            "Python developer with 5 years experience",
        )
        .unwrap();
        assert!((ab.score - ba.score).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_empty_text_does_not_crash() {
        let embedder = HashEmbedder;
        let result = similarity(&embedder, "", "Looking for Python developer").unwrap();
        assert_eq!(result.score, 0.0);
    }
}
