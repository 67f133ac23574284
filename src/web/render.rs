//! HTML rendering for the prediction form
//!
//! Produces one self-contained page: the form (with the last submitted
//! values kept) and, after a submit, the risk panel.

use std::collections::HashMap;

use super::form::{format_number, NumericInput, Section, Widget, SECTIONS};
use crate::classifier::Prediction;
use crate::schema::categorical::CategoricalAttribute;

/// Outcome shown under the form.
pub struct Outcome<'a> {
    pub prediction: &'a Prediction,
    pub warnings: &'a [String],
}

/// Render the full page.
///
/// `values` holds the submitted form (empty on first load).
pub fn render_page(values: &HashMap<String, String>, outcome: Option<&Outcome<'_>>) -> String {
    let mut html = String::new();

    html.push_str(&render_head());
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(
        r#"<div class="header">
    <h1>📊 HR Attrition Predictor</h1>
    <p>Provide employee details below to predict the likelihood of attrition.</p>
</div>
"#,
    );

    html.push_str("<form method=\"post\" action=\"/predict\" class=\"content\">\n");
    html.push_str("<div class=\"columns\">\n");
    for section in SECTIONS.iter().filter(|s| !s.collapsible) {
        html.push_str(&render_section(section, values));
    }
    html.push_str("</div>\n");
    for section in SECTIONS.iter().filter(|s| s.collapsible) {
        html.push_str(&render_section(section, values));
    }
    html.push_str(
        "<button type=\"submit\" class=\"primary\">🔮 Predict Attrition</button>\n</form>\n",
    );

    if let Some(outcome) = outcome {
        html.push_str(&render_outcome(outcome));
    }

    html.push_str("</div>\n</body>\n</html>");
    html
}

fn render_head() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>📊 HR Attrition Predictor</title>
    <style>
{CSS}
    </style>
</head>
"#
    )
}

fn render_section(section: &Section, values: &HashMap<String, String>) -> String {
    let mut html = String::new();
    if section.collapsible {
        html.push_str(&format!(
            "<details class=\"section\">\n<summary>{}</summary>\n<div class=\"grid\">\n",
            html_escape(section.title)
        ));
    } else {
        html.push_str(&format!(
            "<div class=\"section\">\n<h2>{}</h2>\n<div>\n",
            html_escape(section.title)
        ));
    }

    for widget in section.widgets {
        let current = values
            .get(widget.key())
            .cloned()
            .unwrap_or_else(|| widget.default_value());
        html.push_str(&match widget {
            Widget::Slider(n) => render_numeric(n, "range", &current),
            Widget::Number(n) => render_numeric(n, "number", &current),
            Widget::Radio(attr) => render_radio(attr, &current),
            Widget::Select(attr) => render_select(attr, &current),
        });
    }

    if section.collapsible {
        html.push_str("</div>\n</details>\n");
    } else {
        html.push_str("</div>\n</div>\n");
    }
    html
}

fn render_numeric(input: &NumericInput, kind: &str, current: &str) -> String {
    let field = html_escape(input.field);
    let live = if kind == "range" {
        format!(" <output id=\"{field}-value\">{}</output>", html_escape(current))
    } else {
        String::new()
    };
    let oninput = if kind == "range" {
        format!(" oninput=\"document.getElementById('{field}-value').value=this.value\"")
    } else {
        String::new()
    };
    format!(
        r#"<label class="field">{label}{live}
    <input type="{kind}" name="{field}" min="{min}" max="{max}" step="{step}" value="{value}"{oninput}>
</label>
"#,
        label = html_escape(input.label),
        min = format_number(input.min),
        max = format_number(input.max),
        step = format_number(input.step),
        value = html_escape(current),
    )
}

fn render_radio(attr: &CategoricalAttribute, current: &str) -> String {
    let mut html = format!(
        "<fieldset class=\"field\">\n<legend>{}</legend>\n",
        html_escape(attr.label)
    );
    for choice in attr.choices {
        let checked = if choice.label.eq_ignore_ascii_case(current.trim()) {
            " checked"
        } else {
            ""
        };
        html.push_str(&format!(
            "<label class=\"inline\"><input type=\"radio\" name=\"{}\" value=\"{}\"{checked}> {}</label>\n",
            html_escape(attr.key),
            html_escape(choice.label),
            html_escape(choice.label),
        ));
    }
    html.push_str("</fieldset>\n");
    html
}

fn render_select(attr: &CategoricalAttribute, current: &str) -> String {
    let mut html = format!(
        "<label class=\"field\">{}\n<select name=\"{}\">\n",
        html_escape(attr.label),
        html_escape(attr.key)
    );
    for choice in attr.choices {
        let selected = if choice.label.eq_ignore_ascii_case(current.trim()) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "<option value=\"{0}\"{selected}>{0}</option>\n",
            html_escape(choice.label)
        ));
    }
    html.push_str("</select>\n</label>\n");
    html
}

fn render_outcome(outcome: &Outcome<'_>) -> String {
    let mut html = String::from("<div class=\"result\">\n<h2>Prediction Result</h2>\n");

    for warning in outcome.warnings {
        html.push_str(&format!(
            "<div class=\"panel warning\">{}</div>\n",
            html_escape(warning)
        ));
    }

    let p = outcome.prediction;
    if p.is_attrition() {
        html.push_str(&format!(
            "<div class=\"panel error\">High Risk of Attrition (Probability: {})</div>\n",
            p.percent()
        ));
        html.push_str(
            "<div class=\"panel warning\">Consider reviewing this employee's workload, compensation, and satisfaction levels.</div>\n",
        );
    } else {
        html.push_str(&format!(
            "<div class=\"panel success\">Low Risk of Attrition (Probability: {})</div>\n",
            p.percent()
        ));
        html.push_str(
            "<div class=\"panel info\">This employee is likely to stay with the company.</div>\n",
        );
    }

    html.push_str("</div>\n");
    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded CSS
const CSS: &str = r#"
:root {
    --primary-color: #ff4b4b;
    --background-color: #f8fafc;
    --text-color: #1e293b;
    --card-background: white;
    --border-color: #e2e8f0;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: var(--text-color);
    background: var(--background-color);
    padding: 2rem;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    background: var(--card-background);
    border-radius: 12px;
    box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);
    overflow: hidden;
}

.header { padding: 2rem; border-bottom: 1px solid var(--border-color); }
.header h1 { font-size: 2rem; margin-bottom: 0.25rem; }

.content { padding: 2rem; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; padding-top: 1rem; }
@media (max-width: 720px) { .columns, .grid { grid-template-columns: 1fr; } }

.section h2 { font-size: 1.2rem; margin-bottom: 1rem; }
details.section {
    margin: 1.5rem 0;
    padding: 1rem;
    border: 1px solid var(--border-color);
    border-radius: 8px;
}
details.section summary { cursor: pointer; font-weight: 600; }

.field { display: block; margin-bottom: 1rem; border: none; }
.field input[type=range], .field input[type=number], .field select { display: block; width: 100%; margin-top: 0.25rem; }
.field output { font-weight: 600; color: var(--primary-color); }
.inline { margin-right: 1rem; }

button.primary {
    background: var(--primary-color);
    color: white;
    border: none;
    border-radius: 8px;
    padding: 0.6rem 1.4rem;
    font-size: 1rem;
    cursor: pointer;
}

.result { padding: 0 2rem 2rem; }
.result h2 { margin-bottom: 1rem; }
.panel { padding: 1rem; border-radius: 8px; margin-bottom: 0.75rem; }
.panel.error { background: #fee2e2; color: #991b1b; }
.panel.warning { background: #fef9c3; color: #854d0e; }
.panel.success { background: #dcfce7; color: #166534; }
.panel.info { background: #dbeafe; color: #1e40af; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_has_form_and_no_result() {
        let html = render_page(&HashMap::new(), None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("name=\"Age\" min=\"18\" max=\"70\" step=\"1\" value=\"35\""));
        assert!(html.contains("name=\"MonthlyIncome\" min=\"1000\" max=\"20000\" step=\"100\""));
        assert!(html.contains("<details class=\"section\">"));
        assert!(html.contains("value=\"Male\" checked"));
        assert!(!html.contains("Prediction Result"));
    }

    #[test]
    fn test_high_risk_panel() {
        let prediction = Prediction::from_probability(0.8123);
        let outcome = Outcome {
            prediction: &prediction,
            warnings: &[],
        };
        let html = render_page(&HashMap::new(), Some(&outcome));
        assert!(html.contains("panel error\">High Risk of Attrition (Probability: 81.23%)"));
        assert!(html.contains("Consider reviewing this employee"));
        assert!(!html.contains("Low Risk"));
    }

    #[test]
    fn test_low_risk_panel_with_warnings() {
        let prediction = Prediction::from_probability(0.1);
        let warnings = vec!["Invalid input for <Age>, using 0.0".to_string()];
        let outcome = Outcome {
            prediction: &prediction,
            warnings: &warnings,
        };
        let html = render_page(&HashMap::new(), Some(&outcome));
        assert!(html.contains("panel success\">Low Risk of Attrition (Probability: 10.00%)"));
        assert!(html.contains("likely to stay with the company"));
        assert!(html.contains("Invalid input for &lt;Age&gt;"));
    }

    #[test]
    fn test_submitted_values_are_kept() {
        let mut values = HashMap::new();
        values.insert("Age".to_string(), "52".to_string());
        values.insert("MaritalStatus".to_string(), "Married".to_string());
        values.insert("OverTime".to_string(), "No".to_string());
        let html = render_page(&values, None);
        assert!(html.contains("value=\"52\""));
        assert!(html.contains("<option value=\"Married\" selected>"));
        assert!(html.contains("value=\"No\" checked"));
        assert!(!html.contains("value=\"Yes\" checked"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("R&D <\"x\">"),
            "R&amp;D &lt;&quot;x&quot;&gt;"
        );
    }
}
