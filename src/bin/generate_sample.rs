//! Writes a synthetic wafer dataset (`Wafer_TRAIN.arff`, `wafer_sample.parquet`)
//! and a small forest model (`rf_model.json`) so the dashboard runs end to end.

use std::fmt::Write as _;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

const N_FEATURES: usize = 152;
const N_ROWS: usize = 1000;
const ABNORMAL_RATE: f64 = 0.1;

/// The dashboard's `inference::INPUT_FEATURES`, from the same source file.
const MODEL_FEATURES: [&str; 41] = include!("../inference/input_features.in");

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One sensor trace. Abnormal wafers carry a bump over att100..att125
/// and a damped tail.
fn generate_trace(abnormal: bool, rng: &mut SimpleRng) -> Vec<f64> {
    let level = rng.gauss(0.0, 0.2);
    (0..N_FEATURES)
        .map(|k| {
            let phase = k as f64 / N_FEATURES as f64 * 2.0 * std::f64::consts::PI;
            let mut v = level + phase.sin();
            if abnormal {
                if (99..125).contains(&k) {
                    v += 1.5;
                }
                if k >= 135 {
                    v *= 0.3;
                }
            }
            (v + rng.gauss(0.0, 0.15)).clamp(-4.0, 4.0)
        })
        .collect()
}

/// Decision stump on one feature: threshold halfway between class means,
/// leaf weights from the class counts on each side.
fn fit_stump(rows: &[(Vec<f64>, bool)], feature: usize, model_index: usize) -> serde_json::Value {
    let mean = |abnormal: bool| {
        let vals: Vec<f64> = rows
            .iter()
            .filter(|(_, a)| *a == abnormal)
            .map(|(x, _)| x[feature])
            .collect();
        vals.iter().sum::<f64>() / vals.len().max(1) as f64
    };
    let threshold = (mean(true) + mean(false)) / 2.0;

    // [abnormal (class 0), normal (class 1)]
    let mut left = [0.0; 2];
    let mut right = [0.0; 2];
    for (x, abnormal) in rows {
        let side = if x[feature] <= threshold { &mut left } else { &mut right };
        side[usize::from(!*abnormal)] += 1.0;
    }

    json!({
        "nodes": [
            { "feature": model_index, "threshold": threshold, "left": 1, "right": 2 },
            { "value": left },
            { "value": right }
        ]
    })
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let rows: Vec<(Vec<f64>, bool)> = (0..N_ROWS)
        .map(|_| {
            let abnormal = rng.next_f64() < ABNORMAL_RATE;
            (generate_trace(abnormal, &mut rng), abnormal)
        })
        .collect();

    // ---- ARFF ----
    let mut arff = String::from("% Synthetic wafer sensor traces\n@relation Wafer\n\n");
    for k in 1..=N_FEATURES {
        writeln!(arff, "@attribute att{k} numeric").expect("write to String");
    }
    arff.push_str("@attribute target {-1,1}\n\n@data\n");
    for (x, abnormal) in &rows {
        let values: Vec<String> = x.iter().map(|v| format!("{v:.6}")).collect();
        let label = if *abnormal { "-1" } else { "1" };
        writeln!(arff, "{},{label}", values.join(",")).expect("write to String");
    }
    std::fs::write("Wafer_TRAIN.arff", arff).expect("Failed to write ARFF");

    // ---- Parquet ----
    let mut fields: Vec<Field> = (1..=N_FEATURES)
        .map(|k| Field::new(format!("att{k}"), DataType::Float64, false))
        .collect();
    fields.push(Field::new("target", DataType::Int64, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = (0..N_FEATURES)
        .map(|k| Arc::new(Float64Array::from_iter_values(rows.iter().map(|(x, _)| x[k]))) as ArrayRef)
        .collect();
    columns.push(Arc::new(Int64Array::from_iter_values(
        rows.iter().map(|(_, a)| if *a { -1 } else { 1 }),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");
    let file = std::fs::File::create("wafer_sample.parquet").expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // ---- Model ----
    let stump_features = ["att111", "att113", "att115", "att118", "att121", "att140", "att145"];
    let trees: Vec<serde_json::Value> = stump_features
        .iter()
        .map(|name| {
            let model_index = MODEL_FEATURES
                .iter()
                .position(|f| f == name)
                .expect("stump feature is a model feature");
            let feature: usize = name[3..].parse::<usize>().expect("att<k> name") - 1;
            fit_stump(&rows, feature, model_index)
        })
        .collect();

    let model = json!({
        "feature_names": &MODEL_FEATURES[..],
        "classes": [0, 1],
        "trees": trees,
    });
    let text = serde_json::to_string_pretty(&model).expect("Failed to serialize model");
    std::fs::write("rf_model.json", text).expect("Failed to write model");

    let abnormal = rows.iter().filter(|(_, a)| *a).count();
    println!(
        "Wrote {N_ROWS} wafer records ({abnormal} abnormal, {N_FEATURES} features) to \
         Wafer_TRAIN.arff and wafer_sample.parquet, {} trees to rf_model.json",
        stump_features.len()
    );
}
