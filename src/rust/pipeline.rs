//! Symptom selection in, enriched diagnosis out.

use std::collections::HashSet;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierKind, Ensemble, EnsembleBuilder};
use crate::config::DataConfig;
use crate::dataset::TrainingSet;
use crate::error::DiagnosisError;
use crate::knowledge::{KnowledgeBase, KnowledgeEntry};
use crate::label::LabelCodec;
use crate::schema::FeatureSchema;

/// The enriched answer for one symptom selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease: String,
    pub description: String,
    pub precautions: Vec<String>,
    pub medications: Vec<String>,
    #[serde(rename = "diets")]
    pub diet: Vec<String>,
    pub workout: String,
}

impl PredictionResult {
    fn assemble(disease: String, entry: KnowledgeEntry) -> Self {
        Self {
            disease,
            description: entry.description,
            precautions: entry.precautions,
            medications: entry.medications,
            diet: entry.diet,
            workout: entry.workout,
        }
    }
}

/// What one ensemble member predicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub model: ClassifierKind,
    pub disease: String,
}

/// Every member's answer side by side, plus the primary member's enriched
/// result. Disagreements are left for the caller to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleDiagnosis {
    pub primary: PredictionResult,
    pub verdicts: Vec<ModelVerdict>,
}

impl EnsembleDiagnosis {
    pub fn is_unanimous(&self) -> bool {
        self.verdicts
            .iter()
            .all(|v| v.disease == self.primary.disease)
    }
}

/// Everything inference needs, built once at startup and read-only after.
///
/// # Thread Safety
///
/// All fields are immutable after construction, so a context can be shared
/// across threads with `Arc` and `diagnose` called concurrently.
#[derive(Debug)]
pub struct InferenceContext {
    schema: FeatureSchema,
    codec: LabelCodec,
    ensemble: Ensemble,
    knowledge: KnowledgeBase,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<InferenceContext>();
        assert_send_sync::<Pipeline>();
    }
};

impl InferenceContext {
    /// Assembles a context from already fitted parts.
    ///
    /// # Errors
    /// `DimensionMismatch` if the ensemble was fitted on a different number
    /// of features than the schema holds.
    pub fn new(
        schema: FeatureSchema,
        codec: LabelCodec,
        ensemble: Ensemble,
        knowledge: KnowledgeBase,
    ) -> Result<Self, DiagnosisError> {
        if ensemble.n_features() != schema.len() {
            return Err(DiagnosisError::DimensionMismatch {
                expected: schema.len(),
                actual: ensemble.n_features(),
            });
        }
        Ok(Self {
            schema,
            codec,
            ensemble,
            knowledge,
        })
    }

    /// Builds the schema and codec from `training` and fits the ensemble.
    pub fn train(
        training: &TrainingSet,
        allowed_symptoms: Option<&[String]>,
        builder: EnsembleBuilder,
        knowledge: KnowledgeBase,
    ) -> Result<Self, DiagnosisError> {
        let schema = FeatureSchema::new(training.columns(), allowed_symptoms)?;
        let codec = LabelCodec::fit(training.labels());
        let targets = codec.encode_all(training.labels())?;
        let features = training.feature_matrix(&schema)?;
        let ensemble = builder.build(features.view(), &targets, codec.len())?;
        info!(
            "Fitted {} model(s) over {} symptoms and {} diseases",
            ensemble.len(),
            schema.len(),
            codec.len()
        );
        Self::new(schema, codec, ensemble, knowledge)
    }

    /// Loads the training file and knowledge tables named in `config` and
    /// fits the ensemble.
    pub fn load(config: &DataConfig, builder: EnsembleBuilder) -> Result<Self, DiagnosisError> {
        let training = TrainingSet::from_path(&config.training, &config.label_column)?;
        let knowledge = KnowledgeBase::load(config);
        Self::train(
            &training,
            config.allowed_symptoms.as_deref(),
            builder,
            knowledge,
        )
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn codec(&self) -> &LabelCodec {
        &self.codec
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Predicts with the primary model and enriches the result.
    pub fn diagnose(&self, selected: &HashSet<String>) -> Result<PredictionResult, DiagnosisError> {
        validate_selection(selected)?;
        let vector = self.schema.vectorize(selected);
        let index = self.ensemble.predict(&vector)?;
        let disease = self.codec.decode(index)?.to_string();
        debug!("{} symptom(s) -> {}", selected.len(), disease);
        let entry = self.knowledge.lookup(&disease);
        Ok(PredictionResult::assemble(disease, entry))
    }

    /// Predicts with every member; only the primary answer is enriched.
    pub fn diagnose_all(&self, selected: &HashSet<String>) -> Result<EnsembleDiagnosis, DiagnosisError> {
        validate_selection(selected)?;
        let vector = self.schema.vectorize(selected);
        let verdicts = self
            .ensemble
            .predict_all(&vector)?
            .into_iter()
            .map(|(model, index)| {
                Ok(ModelVerdict {
                    model,
                    disease: self.codec.decode(index)?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, DiagnosisError>>()?;

        let disease = verdicts[0].disease.clone();
        let entry = self.knowledge.lookup(&disease);
        Ok(EnsembleDiagnosis {
            primary: PredictionResult::assemble(disease, entry),
            verdicts,
        })
    }
}

/// Entry point for callers: a context once startup succeeded, or nothing.
#[derive(Debug, Default)]
pub struct Pipeline {
    context: Option<InferenceContext>,
}

impl Pipeline {
    pub fn ready(context: InferenceContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// A pipeline that answers every request with `ModelNotReady`
    pub fn not_ready() -> Self {
        Self { context: None }
    }

    /// Runs the startup load-and-fit. Failures are logged and returned;
    /// the caller is expected to abort.
    pub fn start(config: &DataConfig, builder: EnsembleBuilder) -> Result<Self, DiagnosisError> {
        match InferenceContext::load(config, builder) {
            Ok(context) => {
                info!("System ready: {} symptoms known", context.schema().len());
                Ok(Self::ready(context))
            }
            Err(e) => {
                error!("Startup failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Result<&InferenceContext, DiagnosisError> {
        self.context.as_ref().ok_or(DiagnosisError::ModelNotReady)
    }

    /// Known symptom names in schema order
    pub fn symptoms(&self) -> Result<&[String], DiagnosisError> {
        Ok(self.context()?.schema().names())
    }

    pub fn diagnose<I, S>(&self, symptoms: I) -> Result<PredictionResult, DiagnosisError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected = collect_selection(symptoms);
        validate_selection(&selected)?;
        self.context()?.diagnose(&selected)
    }

    pub fn diagnose_all<I, S>(&self, symptoms: I) -> Result<EnsembleDiagnosis, DiagnosisError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected = collect_selection(symptoms);
        validate_selection(&selected)?;
        self.context()?.diagnose_all(&selected)
    }
}

fn collect_selection<I, S>(symptoms: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    symptoms
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect()
}

fn validate_selection(selected: &HashSet<String>) -> Result<(), DiagnosisError> {
    if selected.is_empty() {
        return Err(DiagnosisError::InvalidInput("no symptoms selected".into()));
    }
    if selected.iter().any(|s| s.trim().is_empty()) {
        return Err(DiagnosisError::InvalidInput("symptom names cannot be blank".into()));
    }
    Ok(())
}
