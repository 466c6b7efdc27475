//! A symptom-to-diagnosis inference pipeline with knowledge base enrichment.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use neurodx::{ClassifierKind, EnsembleBuilder, InferenceContext, KnowledgeBase, Pipeline, TrainingSet};
//!
//! let csv = "fever,cough,headache,prognosis\n1,1,0,Flu\n0,0,1,Migraine\n";
//! let training = TrainingSet::from_reader(csv.as_bytes(), "prognosis", Path::new("inline"))?;
//!
//! let context = InferenceContext::train(
//!     &training,
//!     None,
//!     EnsembleBuilder::new().add_model(ClassifierKind::DecisionTree)?,
//!     KnowledgeBase::empty(),
//! )?;
//! let pipeline = Pipeline::ready(context);
//!
//! let result = pipeline.diagnose(["fever", "cough"])?;
//! println!("Predicted disease: {}", result.disease);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! A ready pipeline is immutable and can be shared across threads using `Arc`:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::thread;
//! use neurodx::{ClassifierKind, EnsembleBuilder, InferenceContext, KnowledgeBase, Pipeline, TrainingSet};
//!
//! let csv = "fever,cough,prognosis\n1,0,Malaria\n0,1,Bronchitis\n";
//! let training = TrainingSet::from_reader(csv.as_bytes(), "prognosis", Path::new("inline"))?;
//! let builder = EnsembleBuilder::new().add_model(ClassifierKind::NaiveBayes)?;
//! let pipeline = Arc::new(Pipeline::ready(
//!     InferenceContext::train(&training, None, builder, KnowledgeBase::empty())?,
//! ));
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let pipeline = Arc::clone(&pipeline);
//!     handles.push(thread::spawn(move || {
//!         pipeline.diagnose(["cough"]).unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dataset;
mod error;
pub mod knowledge;
pub mod label;
pub mod pipeline;
pub mod schema;

pub use catalog::Category;
pub use classifier::{Classifier, ClassifierKind, DecisionTree, Ensemble, EnsembleBuilder, NaiveBayes, RandomForest};
pub use config::{DataConfig, TrainingConfig, DATA_DIR_ENV};
pub use dataset::TrainingSet;
pub use error::DiagnosisError;
pub use knowledge::{KnowledgeBase, KnowledgeEntry, ReferenceTable};
pub use label::LabelCodec;
pub use pipeline::{EnsembleDiagnosis, InferenceContext, ModelVerdict, Pipeline, PredictionResult};
pub use schema::FeatureSchema;

pub fn init_logger() {
    env_logger::init();
}
