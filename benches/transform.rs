use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use student_performance::components::DataTransformation;
use student_performance::config::{AppConfig, ArtifactConfig};
use student_performance::model::{FittedLinearRegression, InferenceModel, LinearModel, LinearParams};
use student_performance::pipeline::{CustomData, Predictor};
use student_performance::preprocessing::{FittedColumnTransformer, FittedTransformer, Transformer};

const GENDERS: [&str; 2] = ["female", "male"];
const GROUPS: [&str; 5] = ["group A", "group B", "group C", "group D", "group E"];
const EDUCATION: [&str; 6] = [
    "some high school",
    "high school",
    "some college",
    "associate's degree",
    "bachelor's degree",
    "master's degree",
];
const LUNCH: [&str; 2] = ["standard", "free/reduced"];
const PREP: [&str; 2] = ["none", "completed"];

/// Deterministic synthetic records covering every category.
fn records(n: usize) -> Vec<CustomData> {
    (0..n)
        .map(|i| {
            CustomData::new(
                GENDERS[i % GENDERS.len()],
                GROUPS[i % GROUPS.len()],
                EDUCATION[i % EDUCATION.len()],
                LUNCH[(i / 3) % LUNCH.len()],
                PREP[(i / 7) % PREP.len()],
                40.0 + (i * 37 % 60) as f64,
                38.0 + (i * 53 % 62) as f64,
            )
        })
        .collect()
}

fn fitted_plan() -> FittedColumnTransformer {
    let dir = std::env::temp_dir().join("student-performance-bench");
    let config = AppConfig {
        artifacts: ArtifactConfig::in_dir(dir),
        ..AppConfig::default()
    };
    let plan = DataTransformation::new(&config)
        .and_then(|dt| dt.build_plan())
        .expect("default plan");
    let table = CustomData::tables_from_records(&records(1000)).expect("training table");
    plan.fit(&table).expect("fit plan")
}

fn bench_plan_transform(c: &mut Criterion) {
    let plan = fitted_plan();

    for rows in [1usize, 100, 10_000].iter() {
        let table = CustomData::tables_from_records(&records(*rows)).expect("table");
        c.bench_with_input(BenchmarkId::new("plan_transform", rows), &table, |b, table| {
            b.iter(|| black_box(plan.transform(black_box(table)).expect("transform")));
        });
    }
}

fn bench_predict(c: &mut Criterion) {
    let plan = fitted_plan();
    let model: FittedLinearRegression = LinearModel::from_linear_params(LinearParams {
        weights: ndarray::Array1::from_elem(plan.n_features_out(), 0.1),
        bias: 10.0,
    });
    let predictor = Predictor::new(plan, model).expect("widths match");

    let single = records(1).remove(0).to_table().expect("record");
    c.bench_function("predict_single_record", |b| {
        b.iter(|| black_box(predictor.predict(black_box(&single)).expect("predict")));
    });

    let batch = CustomData::tables_from_records(&records(1000)).expect("batch");
    c.bench_function("predict_batch_1000", |b| {
        b.iter(|| black_box(predictor.predict(black_box(&batch)).expect("predict")));
    });

    assert_eq!(predictor.model().n_features_in(), predictor.plan().n_features_out());
}

criterion_group!(benches, bench_plan_transform, bench_predict);
criterion_main!(benches);
