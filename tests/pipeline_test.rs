use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use neurodx::knowledge::{DEFAULT_DESCRIPTION, DEFAULT_WORKOUT, FALLBACK_WORKOUT};
use neurodx::{ClassifierKind, DataConfig, DiagnosisError, EnsembleBuilder, Pipeline, TrainingConfig};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn start_with(config: &DataConfig, kinds: &[ClassifierKind]) -> Pipeline {
    let mut builder = EnsembleBuilder::new().with_training_config(TrainingConfig {
        n_estimators: 25,
        ..TrainingConfig::default()
    });
    for &kind in kinds {
        builder = builder.add_model(kind).expect("distinct model kinds");
    }
    Pipeline::start(config, builder).expect("fixtures should load")
}

fn tree_pipeline() -> Pipeline {
    start_with(&DataConfig::from_dir(fixtures()), &[ClassifierKind::DecisionTree])
}

#[test]
fn test_symptoms_follow_training_columns() {
    let pipeline = tree_pipeline();
    let symptoms = pipeline.symptoms().unwrap();
    assert_eq!(symptoms.len(), 9);
    assert_eq!(symptoms[0], "fever");
    assert_eq!(symptoms[8], "chills");
}

#[test]
fn test_flu_is_fully_enriched() {
    let result = tree_pipeline().diagnose(["fever", "cough"]).unwrap();
    assert_eq!(result.disease, "Flu");
    assert_eq!(
        result.description,
        "An infectious respiratory illness caused by influenza viruses."
    );
    assert_eq!(result.precautions, vec!["rest", "drink fluids", "avoid crowds"]);
    assert_eq!(result.medications, vec!["Paracetamol", "Rest"]);
    assert_eq!(result.diet, vec!["Soup", "Herbal tea"]);
    assert_eq!(result.workout, "Stay in bed");
}

#[test]
fn test_unknown_symptoms_do_not_change_the_answer() {
    let pipeline = tree_pipeline();
    let plain = pipeline.diagnose(["fever", "cough"]).unwrap();
    let noisy = pipeline.diagnose(["fever", "cough", "glowing_eyes", "Fever"]).unwrap();
    assert_eq!(plain, noisy);
}

#[test]
fn test_sparse_knowledge_falls_back_per_field() {
    let result = tree_pipeline().diagnose(["headache"]).unwrap();
    assert_eq!(result.disease, "Migraine");
    assert_eq!(result.description, DEFAULT_DESCRIPTION);
    assert_eq!(result.precautions, vec!["lie down in a dark room"]);
    assert!(result.medications.is_empty());
    assert!(result.diet.is_empty());
    assert_eq!(result.workout, DEFAULT_WORKOUT);
}

#[test]
fn test_list_cell_variants() {
    let pipeline = tree_pipeline();

    let fungal = pipeline.diagnose(["itching", "skin_rash"]).unwrap();
    assert_eq!(fungal.disease, "Fungal infection");
    assert_eq!(fungal.description, "A skin condition caused by fungi.");
    assert_eq!(fungal.medications, vec!["[Antifungal Cream"]);

    let gastro = pipeline.diagnose(["nausea", "vomiting"]).unwrap();
    assert_eq!(gastro.disease, "Gastroenteritis");
    assert_eq!(gastro.medications, vec!["Oral rehydration salts", "Probiotics"]);
    assert_eq!(gastro.diet, vec!["Bland diet"]);
}

#[test]
fn test_repeated_diagnosis_is_identical() {
    let config = DataConfig::from_dir(fixtures());
    let a = start_with(&config, &[ClassifierKind::RandomForest]);
    let b = start_with(&config, &[ClassifierKind::RandomForest]);
    for symptoms in [vec!["fever", "chills"], vec!["cough"], vec!["itching", "nausea"]] {
        let first = a.diagnose(&symptoms).unwrap();
        assert_eq!(first, a.diagnose(&symptoms).unwrap());
        assert_eq!(first, b.diagnose(&symptoms).unwrap());
    }
}

#[test]
fn test_missing_knowledge_tables_only_degrade_fields() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(fixtures().join("Training.csv"), dir.path().join("Training.csv")).unwrap();

    let pipeline = start_with(&DataConfig::from_dir(dir.path()), &[ClassifierKind::DecisionTree]);
    let result = pipeline.diagnose(["fever", "cough"]).unwrap();
    assert_eq!(result.disease, "Flu");
    assert_eq!(result.description, DEFAULT_DESCRIPTION);
    assert!(result.precautions.is_empty());
    assert!(result.medications.is_empty());
    assert!(result.diet.is_empty());
    assert_eq!(result.workout, FALLBACK_WORKOUT);
}

#[test]
fn test_missing_training_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = Pipeline::start(
        &DataConfig::from_dir(dir.path()),
        EnsembleBuilder::new().add_model(ClassifierKind::NaiveBayes).unwrap(),
    );
    assert!(matches!(result, Err(DiagnosisError::StartupDataMissing { .. })));
}

#[test]
fn test_repeated_training_column_trains_on_first_copy() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Training.csv"),
        "fever,cough,fever,prognosis\n1,0,0,Flu\n0,1,1,Cold\n",
    )
    .unwrap();
    let pipeline = start_with(&DataConfig::from_dir(dir.path()), &[ClassifierKind::DecisionTree]);

    assert_eq!(pipeline.symptoms().unwrap(), &["fever", "cough"]);
    assert_eq!(pipeline.diagnose(["fever"]).unwrap().disease, "Flu");
    assert_eq!(pipeline.diagnose(["cough"]).unwrap().disease, "Cold");
}

#[test]
fn test_allow_list_narrows_schema() {
    let config = DataConfig::from_dir(fixtures()).with_allowed_symptoms(vec!["chills", "fever", "sneezing"]);
    let pipeline = start_with(&config, &[ClassifierKind::DecisionTree]);
    assert_eq!(pipeline.symptoms().unwrap(), &["chills", "fever"]);
}

#[test]
fn test_allow_list_without_overlap_fails_startup() {
    let config = DataConfig::from_dir(fixtures()).with_allowed_symptoms(vec!["sneezing"]);
    let result = Pipeline::start(
        &config,
        EnsembleBuilder::new().add_model(ClassifierKind::DecisionTree).unwrap(),
    );
    assert!(matches!(result, Err(DiagnosisError::EmptySchema)));
}

#[test]
fn test_every_member_reports_side_by_side() {
    let pipeline = start_with(
        &DataConfig::from_dir(fixtures()),
        &[
            ClassifierKind::DecisionTree,
            ClassifierKind::RandomForest,
            ClassifierKind::NaiveBayes,
        ],
    );
    let diagnosis = pipeline.diagnose_all(["joint_pain", "chills", "fever"]).unwrap();
    let models: Vec<ClassifierKind> = diagnosis.verdicts.iter().map(|v| v.model).collect();
    assert_eq!(
        models,
        vec![
            ClassifierKind::DecisionTree,
            ClassifierKind::RandomForest,
            ClassifierKind::NaiveBayes
        ]
    );
    assert_eq!(diagnosis.primary.disease, "Malaria");
    assert_eq!(diagnosis.verdicts[0].disease, "Malaria");
    let labels = pipeline.context().unwrap().codec().labels().to_vec();
    for verdict in &diagnosis.verdicts {
        assert!(labels.contains(&verdict.disease));
    }
}

#[test]
fn test_concurrent_diagnosis() {
    let pipeline = Arc::new(tree_pipeline());
    let expected = pipeline.diagnose(["headache", "nausea"]).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            thread::spawn(move || pipeline.diagnose(["headache", "nausea"]).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_empty_selection_never_reaches_the_model() {
    let pipeline = tree_pipeline();
    let result = pipeline.diagnose(Vec::<&str>::new());
    assert!(matches!(result, Err(DiagnosisError::InvalidInput(_))));
    assert!(result.unwrap_err().is_client_error());
}
