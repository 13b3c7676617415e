use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    /// `Some(value)` except for a `rate` fraction of draws.
    fn maybe(&mut self, value: f64, rate: f64) -> Option<f64> {
        (self.next_f64() >= rate).then_some(value)
    }
}

struct Student {
    id: i64,
    name: String,
    group: &'static str,
    hours_studied: Option<f64>,
    attendance: Option<f64>,
    sleep_hours: f64,
    exam_score: Option<f64>,
}

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<Student> {
    let groups = ["A", "B", "C"];
    (0..n)
        .map(|i| {
            let hours = rng.gauss(12.0, 4.0).clamp(0.0, 30.0);
            let attendance = (rng.gauss(85.0, 8.0)).clamp(40.0, 100.0);
            let sleep = rng.gauss(7.0, 1.0).clamp(3.0, 11.0);
            let score = (30.0 + 2.2 * hours + 0.3 * attendance + rng.gauss(0.0, 6.0))
                .clamp(0.0, 100.0);

            Student {
                id: i as i64 + 1,
                name: format!("student_{:03}", i + 1),
                group: groups[i % groups.len()],
                hours_studied: rng.maybe((hours * 10.0).round() / 10.0, 0.05),
                attendance: rng.maybe(attendance.round(), 0.03),
                sleep_hours: (sleep * 10.0).round() / 10.0,
                exam_score: rng.maybe(score.round(), 0.04),
            }
        })
        .collect()
}

fn write_csv(path: &str, students: &[Student]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating CSV file")?;
    wtr.write_record([
        "id",
        "name",
        "group",
        "hours_studied",
        "attendance",
        "sleep_hours",
        "exam_score",
    ])?;
    let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for s in students {
        wtr.write_record([
            s.id.to_string(),
            s.name.clone(),
            s.group.to_string(),
            opt(s.hours_studied),
            opt(s.attendance),
            s.sleep_hours.to_string(),
            opt(s.exam_score),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &str, students: &[Student]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("group", DataType::Utf8, false),
        Field::new("hours_studied", DataType::Float64, true),
        Field::new("attendance", DataType::Float64, true),
        Field::new("sleep_hours", DataType::Float64, false),
        Field::new("exam_score", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(students.iter().map(|s| s.id))),
            Arc::new(StringArray::from_iter_values(students.iter().map(|s| s.name.as_str()))),
            Arc::new(StringArray::from_iter_values(students.iter().map(|s| s.group))),
            Arc::new(Float64Array::from_iter(students.iter().map(|s| s.hours_studied))),
            Arc::new(Float64Array::from_iter(students.iter().map(|s| s.attendance))),
            Arc::new(Float64Array::from_iter_values(students.iter().map(|s| s.sleep_hours))),
            Arc::new(Float64Array::from_iter(students.iter().map(|s| s.exam_score))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let students = generate(&mut rng, 120);

    write_csv("student_data.csv", &students)?;
    write_parquet("student_data.parquet", &students)?;

    println!(
        "Wrote {} students to student_data.csv and student_data.parquet",
        students.len()
    );
    Ok(())
}
