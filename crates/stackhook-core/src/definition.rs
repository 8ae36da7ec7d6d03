// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Schema of the vector index backing a knowledge base.
//!
//! The sync service writes three fields per ingested chunk: source
//! metadata, the raw text chunk, and its embedding vector. The metadata
//! field is stored but not indexed; the vector field uses an hnsw knn
//! index with l2 distance.

use serde_json::json;

/// Index definition builder.
#[derive(Debug, Clone)]
pub struct IndexDefinition {
    /// Field holding per-chunk source metadata; stored, not indexed
    pub metadata_field: String,
    /// Field holding the raw text chunk
    pub chunk_field: String,
    /// Name of the knn vector field
    pub vector_field: String,
    /// Vector dimension; must match the embedding model's output width
    pub dimension: u32,
}

impl IndexDefinition {
    /// Default field layout for an index name.
    pub fn new(index_name: &str, dimension: u32) -> Self {
        Self {
            metadata_field: "KB_METADATA".to_string(),
            chunk_field: "KB_TEXT_CHUNK".to_string(),
            vector_field: format!("{index_name}-vector"),
            dimension,
        }
    }

    /// Render the definition as the JSON document the store expects.
    pub fn to_json(&self) -> String {
        let mut properties = serde_json::Map::new();
        properties.insert(
            self.metadata_field.clone(),
            json!({ "type": "text", "index": false }),
        );
        properties.insert(self.chunk_field.clone(), json!({ "type": "text" }));
        properties.insert(
            self.vector_field.clone(),
            json!({
                "type": "knn_vector",
                "dimension": self.dimension,
                "method": {
                    "engine": "faiss",
                    "space_type": "l2",
                    "name": "hnsw",
                    "parameters": {}
                }
            }),
        );

        json!({
            // The store expects the flag as a string
            "settings": { "knn": "true" },
            "mappings": { "properties": properties }
        })
        .to_string()
    }
}
