use url::Url;

pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL_ID: &str = "musicgen-medium";

const STANDARD_MODELS: [(&str, &str); 3] = [
    ("musicgen-small", "facebook/musicgen-small"),
    ("musicgen-medium", "facebook/musicgen-medium"),
    ("musicgen-large", "facebook/musicgen-large"),
];
const AUDIOLDM2_MODEL: (&str, &str) = ("audioldm2", "cvssp/audioldm2-music");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: String,
    pub endpoint: Url,
}

/// Immutable model id → endpoint table. Lookups never fail: anything the
/// table does not know resolves to the default entry.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
    default_index: usize,
}

impl ModelRegistry {
    pub fn new(entries: Vec<ModelEntry>, default_id: &str) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("model registry needs at least one entry".to_string());
        }
        let default_index = entries
            .iter()
            .position(|entry| entry.id == default_id)
            .ok_or_else(|| format!("default model {default_id} is not registered"))?;
        Ok(Self {
            entries,
            default_index,
        })
    }

    /// Standard MusicGen table under `base_url`, optionally with AudioLDM2.
    pub fn standard(base_url: &str, include_audioldm2: bool) -> Result<Self, String> {
        let base = normalize_base_url(base_url);
        let mut models = STANDARD_MODELS.to_vec();
        if include_audioldm2 {
            models.push(AUDIOLDM2_MODEL);
        }
        let entries = models
            .into_iter()
            .map(|(id, repo)| {
                let raw = format!("{base}/{repo}");
                Url::parse(&raw)
                    .map(|endpoint| ModelEntry {
                        id: id.to_string(),
                        endpoint,
                    })
                    .map_err(|err| format!("invalid endpoint {raw}: {err}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries, DEFAULT_MODEL_ID)
    }

    pub fn resolve(&self, model_id: Option<&str>) -> &ModelEntry {
        model_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .and_then(|id| self.entries.iter().find(|entry| entry.id == id))
            .unwrap_or_else(|| self.default_entry())
    }

    pub fn default_entry(&self) -> &ModelEntry {
        &self.entries[self.default_index]
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == model_id)
    }

    pub fn model_ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }
}

fn normalize_base_url(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_INFERENCE_BASE_URL.to_string();
    }
    trimmed.to_string()
}
