use std::collections::HashSet;
use std::path::Path;

use neurodx::{
    ClassifierKind, DiagnosisError, Ensemble, FeatureSchema, LabelCodec, TrainingConfig, TrainingSet,
};

fn training() -> TrainingSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Training.csv");
    TrainingSet::from_path(path, "prognosis").expect("fixture training data")
}

fn selection(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_vectorize_three_symptoms() {
    let schema = FeatureSchema::new(&["fever", "cough", "headache"], None::<&[&str]>).unwrap();
    assert_eq!(schema.vectorize(&selection(&["fever", "cough"])), vec![1, 1, 0]);
}

#[test]
fn test_vector_length_always_matches_schema() {
    let set = training();
    let schema = FeatureSchema::new(set.columns(), None::<&[String]>).unwrap();
    for input in [&[][..], &["fever"][..], &["nope", "chills", "itching", "x"][..]] {
        let vector = schema.vectorize(&selection(input));
        assert_eq!(vector.len(), schema.len());
        for (name, bit) in schema.names().iter().zip(&vector) {
            assert_eq!(*bit == 1, input.contains(&name.as_str()));
        }
    }
}

#[test]
fn test_codec_round_trip_on_training_labels() {
    let set = training();
    let codec = LabelCodec::fit(set.labels());
    assert_eq!(codec.len(), 5);
    for label in set.labels() {
        assert_eq!(codec.decode(codec.encode(label).unwrap()).unwrap(), label);
    }
    assert!(matches!(codec.encode("Typhoid"), Err(DiagnosisError::UnknownLabel(_))));
}

#[test]
fn test_all_members_predict_fitted_classes() -> Result<(), DiagnosisError> {
    let set = training();
    let schema = FeatureSchema::new(set.columns(), None::<&[String]>)?;
    let codec = LabelCodec::fit(set.labels());
    let targets = codec.encode_all(set.labels())?;
    let features = set.feature_matrix(&schema)?;

    let mut builder = Ensemble::builder().with_training_config(TrainingConfig {
        n_estimators: 20,
        ..TrainingConfig::default()
    });
    for kind in ClassifierKind::ALL {
        builder = builder.add_model(kind)?;
    }
    let ensemble = builder.build(features.view(), &targets, codec.len())?;

    for row in features.rows() {
        for (_, index) in ensemble.predict_all(&row.to_vec())? {
            assert!(codec.decode(index).is_ok());
        }
    }
    Ok(())
}

#[test]
fn test_decision_tree_recovers_training_labels() -> Result<(), DiagnosisError> {
    let set = training();
    let schema = FeatureSchema::new(set.columns(), None::<&[String]>)?;
    let codec = LabelCodec::fit(set.labels());
    let targets = codec.encode_all(set.labels())?;
    let features = set.feature_matrix(&schema)?;

    let ensemble = Ensemble::builder()
        .add_model(ClassifierKind::DecisionTree)?
        .build(features.view(), &targets, codec.len())?;
    for (row, &target) in features.rows().into_iter().zip(&targets) {
        assert_eq!(ensemble.predict(&row.to_vec())?, target);
    }
    Ok(())
}

#[test]
fn test_forest_is_reproducible_for_a_seed() -> Result<(), DiagnosisError> {
    let set = training();
    let schema = FeatureSchema::new(set.columns(), None::<&[String]>)?;
    let codec = LabelCodec::fit(set.labels());
    let targets = codec.encode_all(set.labels())?;
    let features = set.feature_matrix(&schema)?;

    let fit = |seed| {
        neurodx::RandomForest::fit(
            features.view(),
            &targets,
            codec.len(),
            &TrainingConfig {
                n_estimators: 30,
                seed,
                ..TrainingConfig::default()
            },
        )
    };
    let a = fit(42)?;
    let b = fit(42)?;
    let queries = [
        selection(&["fever"]),
        selection(&["cough", "headache"]),
        selection(&["vomiting", "chills", "itching"]),
    ];
    for query in &queries {
        let vector = schema.vectorize(query);
        assert_eq!(a.votes(&vector), b.votes(&vector));
    }
    Ok(())
}

#[test]
fn test_wrong_vector_length_is_rejected() -> Result<(), DiagnosisError> {
    let set = training();
    let schema = FeatureSchema::new(set.columns(), None::<&[String]>)?;
    let codec = LabelCodec::fit(set.labels());
    let targets = codec.encode_all(set.labels())?;
    let features = set.feature_matrix(&schema)?;
    let ensemble = Ensemble::builder()
        .add_model(ClassifierKind::NaiveBayes)?
        .build(features.view(), &targets, codec.len())?;

    assert!(matches!(
        ensemble.predict(&[1, 0, 1]),
        Err(DiagnosisError::DimensionMismatch { expected: 9, actual: 3 })
    ));
    Ok(())
}

#[test]
fn test_direct_fit_reports_bad_targets() {
    let set = training();
    let schema = FeatureSchema::new(set.columns(), None::<&[String]>).unwrap();
    let features = set.feature_matrix(&schema).unwrap();
    let mut targets = vec![0; set.len()];
    targets[1] = 5;

    let config = TrainingConfig::default();
    assert!(matches!(
        neurodx::RandomForest::fit(features.view(), &targets, 2, &config),
        Err(DiagnosisError::UnknownLabel(_))
    ));
    assert!(matches!(
        neurodx::DecisionTree::fit(features.view(), &targets[1..], 6, &config),
        Err(DiagnosisError::BuildError(_))
    ));
}
