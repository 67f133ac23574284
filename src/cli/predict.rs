//! Predict command - interactive prompt or JSON input file

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::classifier::Prediction;
use crate::inference::InferenceService;
use crate::schema::{parse_lenient, stringify_json_values, FieldWarning, FEATURE_NAMES};

pub fn run(service: &InferenceService, input: Option<&Path>, format: &str) -> Result<()> {
    let prediction = match input {
        Some(path) => {
            let raw = read_input_file(path)?;
            let (prediction, warnings) = service.predict_lenient(&raw);
            for warning in &warnings {
                eprintln!("{}", style(warning).yellow());
            }
            prediction
        }
        None => {
            let stdin = std::io::stdin();
            let mut reader = stdin.lock();
            let mut stdout = std::io::stdout();
            let (values, _) = prompt_features(&mut reader, &mut stdout)?;
            service.predict(&values)
        }
    };

    let mut stdout = std::io::stdout();
    match format {
        "json" => print_json(&prediction, &mut stdout),
        _ => print_text(&prediction, &mut stdout),
    }
}

/// Ask for every feature in schema order.
///
/// Unparseable answers (including an empty line or end of input) are
/// recorded as 0.0 and reported, and the prompting carries on.
pub fn prompt_features<R: BufRead, W: Write>(
    reader: &mut R,
    out: &mut W,
) -> Result<(HashMap<String, f64>, Vec<FieldWarning>)> {
    let mut values = HashMap::with_capacity(FEATURE_NAMES.len());
    let mut warnings = Vec::new();
    let mut line = String::new();

    for &name in FEATURE_NAMES.iter() {
        write!(out, "Enter {name}: ")?;
        out.flush()?;

        line.clear();
        reader
            .read_line(&mut line)
            .with_context(|| format!("Failed to read value for {name}"))?;

        let value = match parse_lenient(&line) {
            Ok(v) => v,
            Err(error) => {
                let warning = FieldWarning { field: name, error };
                writeln!(out, "{}", style(&warning).yellow())?;
                tracing::warn!(field = name, "{}", warning.error);
                warnings.push(warning);
                0.0
            }
        };
        values.insert(name.to_string(), value);
    }

    Ok((values, warnings))
}

fn read_input_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Input file {} is not valid JSON", path.display()))?;
    let object = value
        .as_object()
        .with_context(|| format!("Input file {} must contain a JSON object", path.display()))?;
    Ok(stringify_json_values(object))
}

fn print_text<W: Write>(prediction: &Prediction, out: &mut W) -> Result<()> {
    let label = if prediction.is_attrition() {
        style(prediction.label_text()).red().bold()
    } else {
        style(prediction.label_text()).green().bold()
    };
    writeln!(out, "\nPrediction: {label}")?;
    writeln!(
        out,
        "Confidence (probability of Attrition): {}",
        prediction.rounded_probability()
    )?;
    Ok(())
}

fn print_json<W: Write>(prediction: &Prediction, out: &mut W) -> Result<()> {
    let json = serde_json::json!({
        "prediction": prediction.label_text(),
        "label": prediction.label,
        "probability": prediction.probability,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    Ok(())
}
