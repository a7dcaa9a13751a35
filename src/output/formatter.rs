//! HTML renderers for the candidate and job-match reports

use crate::error::{AgentHelperError, Result};
use crate::processing::records::{first_string, JobMatchRecord, MatchEntry};
use askama::Template;
use log::warn;
use serde_json::{Map, Value};
use std::path::Path;

/// Turns a parsed JSON report into a standalone HTML document.
pub trait ReportRenderer {
    fn render(&self, report: &Value) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub struct CandidateReportRenderer;

pub struct JobMatchReportRenderer;

#[derive(Debug, Clone, PartialEq)]
struct CandidateCard {
    name: String,
    title: String,
    file: String,
    skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct JobSection {
    heading: String,
    bars: Vec<MatchEntry>,
}

/// Askama template for the candidate report
#[derive(Template)]
#[template(source = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Resource Report</title>
  <style>
    :root {
      --gold: #FFCC00;
      --black: #000000;
      --dark: #1f1f1f;
      --grey-1: #f7f7f7;
      --grey-2: #eaeaea;
      --grey-3: #8c8c8c;
      --white: #ffffff;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Roboto, Helvetica, Arial, sans-serif;
      color: var(--dark);
      background: var(--grey-1);
      line-height: 1.5;
    }
    header {
      background: linear-gradient(90deg, var(--gold), #ffd84d);
      color: var(--black);
      padding: 24px 16px;
      border-bottom: 4px solid var(--black);
    }
    header .title { font-size: 20px; font-weight: 700; }
    header .count { margin-top: 4px; opacity: 0.85; font-weight: 600; }
    main { max-width: 1100px; margin: 24px auto; padding: 0 16px 48px; }
    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
      gap: 16px;
    }
    .card {
      background: var(--white);
      border: 1px solid var(--grey-2);
      border-radius: 10px;
      box-shadow: 0 2px 0 rgba(0,0,0,0.06);
      padding: 16px;
    }
    .card-header { border-left: 6px solid var(--gold); padding-left: 12px; margin-bottom: 12px; }
    .name { margin: 0 0 2px 0; font-size: 18px; color: var(--black); }
    .card .title { font-size: 14px; opacity: 0.9; }
    .meta { margin-top: 6px; font-size: 12px; color: var(--grey-3); }
    .skills { display: flex; flex-wrap: wrap; gap: 8px; }
    .badge {
      background: var(--grey-1);
      border: 1px solid var(--grey-2);
      border-radius: 999px;
      padding: 6px 10px;
      font-size: 12px;
    }
    footer { text-align: center; color: var(--grey-3); font-size: 12px; padding: 24px 16px; }
    .empty { margin-top: 24px; color: var(--grey-3); font-style: italic; }
  </style>
  <meta name="theme-color" content="#FFCC00" />
</head>
<body>
  <header>
    <div class="title">Resource Report</div>
    <div class="count">{{ total }} candidate{% if total != 1 %}s{% endif %}</div>
  </header>
  <main>
    {% if cards.is_empty() %}
    <div class="empty">No candidates found. Ensure resumes are present and analysis has run.</div>
    {% endif %}
    <section class="grid">
      {% for card in cards %}
      <article class="card">
        <div class="card-header">
          <h3 class="name">{{ card.name }}</h3>
          <div class="title">{{ card.title }}</div>
          <div class="meta">{% if !card.file.is_empty() %}<span class="file" title="{{ card.file }}">{{ card.file }}</span>{% endif %}</div>
        </div>
        <div class="skills">
          {% for skill in card.skills %}<span class="badge" title="{{ skill }}">{{ skill }}</span>
          {% endfor %}
        </div>
      </article>
      {% endfor %}
    </section>
  </main>
  <footer>Generated by rm-agent-helper on {{ generated_at }}</footer>
</body>
</html>
"##, ext = "html")]
struct CandidateReportTemplate {
    total: usize,
    cards: Vec<CandidateCard>,
    generated_at: String,
}

/// Askama template for the job-match report
#[derive(Template)]
#[template(source = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Job Match Report</title>
  <style>
    :root {
      --gold: #FFCC00;
      --black: #000000;
      --grey-1: #f7f7f7;
      --grey-2: #eaeaea;
      --grey-3: #8c8c8c;
      --white: #ffffff;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Roboto, Helvetica, Arial, sans-serif;
      color: #1f1f1f;
      background: var(--grey-1);
      line-height: 1.5;
    }
    header {
      background: linear-gradient(90deg, var(--gold), #ffd84d);
      color: var(--black);
      padding: 24px 16px;
      border-bottom: 4px solid var(--black);
    }
    main { max-width: 1000px; margin: 24px auto; padding: 0 16px 48px; }
    .job {
      background: var(--white);
      border: 1px solid var(--grey-2);
      border-radius: 10px;
      box-shadow: 0 2px 0 rgba(0,0,0,0.06);
      padding: 16px;
      margin-bottom: 16px;
    }
    .job-title { margin: 0 0 12px 0; font-size: 18px; color: var(--black); }
    .bar {
      position: relative;
      background: var(--grey-2);
      border-radius: 8px;
      height: 28px;
      margin: 8px 0;
      overflow: hidden;
    }
    .bar-fill { background: var(--gold); height: 100%; width: 0; transition: width 0.6s ease; }
    .bar-label {
      position: absolute;
      inset: 0;
      display: flex;
      align-items: center;
      padding: 0 10px;
      font-size: 13px;
      font-weight: 600;
    }
    .empty { margin-top: 24px; color: var(--grey-3); font-style: italic; }
  </style>
  <meta name="theme-color" content="#FFCC00" />
  <script>
    window.addEventListener('load', () => {
      document.querySelectorAll('.bar-fill').forEach(el => {
        const width = el.style.width;
        el.style.width = '0%';
        requestAnimationFrame(() => { el.style.width = width; });
      });
    });
  </script>
</head>
<body>
  <header>
    <div class="title">Job Match Report</div>
  </header>
  <main>
    {% if sections.is_empty() %}
    <div class="empty">No job matches found. Ensure job profiles and resumes are present.</div>
    {% endif %}
    {% for section in sections %}
    <section class="job">
      <h3 class="job-title">{{ section.heading }}</h3>
      <div class="bars">{% for bar in section.bars %}<div class="bar"><div class="bar-fill" style="width:{{ bar.percent }}%"></div><div class="bar-label">{{ bar.candidate_name }} — {{ bar.percent }}%</div></div>{% endfor %}</div>
    </section>
    {% endfor %}
  </main>
  <footer>Generated by rm-agent-helper on {{ generated_at }}</footer>
</body>
</html>
"##, ext = "html")]
struct JobMatchReportTemplate {
    sections: Vec<JobSection>,
    generated_at: String,
}

fn generated_at() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn strip_extension(file_name: &str) -> String {
    Path::new(file_name)
        .with_extension("")
        .to_string_lossy()
        .into_owned()
}

impl CandidateReportRenderer {
    /// Cards for a structured report, or for raw analyzer-tool output
    /// (`resource-file` + `text`) when the analysis never ran.
    fn cards(report: &Value) -> Vec<CandidateCard> {
        let Some(items) = report.as_array() else {
            return Vec::new();
        };
        let Some(first) = items.first().and_then(Value::as_object) else {
            return Vec::new();
        };

        let objects = items.iter().filter_map(Value::as_object);
        if first.contains_key("resource-name") || first.contains_key("experties") {
            objects.map(Self::structured_card).collect()
        } else if first.contains_key("resource-file") && first.contains_key("text") {
            objects.map(Self::tool_output_card).collect()
        } else {
            Vec::new()
        }
    }

    fn structured_card(fields: &Map<String, Value>) -> CandidateCard {
        let skills = ["experties", "skills"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_array))
            .find(|list| !list.is_empty())
            .map(|list| list.iter().map(display_text).collect())
            .unwrap_or_default();

        CandidateCard {
            name: first_string(fields, &["resource-name", "name"])
                .unwrap_or("Unknown")
                .to_string(),
            title: first_string(fields, &["resource-job-title", "title"])
                .unwrap_or_default()
                .to_string(),
            file: first_string(fields, &["resource-file"])
                .unwrap_or_default()
                .to_string(),
            skills,
        }
    }

    fn tool_output_card(fields: &Map<String, Value>) -> CandidateCard {
        let file = fields.get("resource-file").and_then(Value::as_str).unwrap_or_default();
        let name = if file.is_empty() { "Unknown".to_string() } else { strip_extension(file) };

        CandidateCard {
            name,
            title: String::new(),
            file: file.to_string(),
            skills: Vec::new(),
        }
    }
}

impl ReportRenderer for CandidateReportRenderer {
    fn render(&self, report: &Value) -> Result<String> {
        let cards = Self::cards(report);
        let template = CandidateReportTemplate {
            total: cards.len(),
            cards,
            generated_at: generated_at(),
        };
        Ok(template.render()?)
    }

    fn name(&self) -> &'static str {
        "candidate report"
    }
}

impl JobMatchReportRenderer {
    fn sections(report: &Value) -> Vec<JobSection> {
        report
            .as_array()
            .map(|jobs| {
                jobs.iter()
                    .filter_map(Value::as_object)
                    .map(JobMatchRecord::from_fields)
                    .map(|job| JobSection {
                        heading: job.heading().to_string(),
                        bars: job.matches,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ReportRenderer for JobMatchReportRenderer {
    fn render(&self, report: &Value) -> Result<String> {
        let template = JobMatchReportTemplate {
            sections: Self::sections(report),
            generated_at: generated_at(),
        };
        Ok(template.render()?)
    }

    fn name(&self) -> &'static str {
        "job-match report"
    }
}

/// Read a JSON report; unreadable or malformed files read as an empty report.
pub fn read_report(json_path: &Path) -> Value {
    let parsed = std::fs::read_to_string(json_path)
        .map_err(AgentHelperError::from)
        .and_then(|text| serde_json::from_str::<Value>(&text).map_err(AgentHelperError::from));

    parsed.unwrap_or_else(|e| {
        warn!("Rendering empty report, cannot read {}: {}", json_path.display(), e);
        Value::Array(Vec::new())
    })
}

/// Render the report stored at `json_path` into `html_path`.
pub fn render_report_file(
    renderer: &dyn ReportRenderer,
    json_path: &Path,
    html_path: &Path,
) -> Result<()> {
    let report = read_report(json_path);
    let html = renderer.render(&report)?;
    save_report_to_file(&html, html_path)
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_cards_are_escaped() {
        let report = json!([{
            "resource-name": "<script>alert('x')</script>",
            "resource-job-title": "R&D \"Lead\"",
            "experties": ["C++ <templates>"],
            "resource-file": "x.txt"
        }]);
        let html = CandidateReportRenderer.render(&report).unwrap();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains(
            r#"<h3 class="name">&#60;script&#62;alert(&#39;x&#39;)&#60;/script&#62;</h3>"#
        ));
        assert!(html.contains(r#"<div class="title">R&#38;D &#34;Lead&#34;</div>"#));
        assert!(html.contains("C++ &#60;templates&#62;</span>"));
        assert!(html.contains("1 candidate<"));
    }

    #[test]
    fn test_candidate_empty_state() {
        let html = CandidateReportRenderer.render(&json!({"not": "a list"})).unwrap();
        assert!(html.contains("0 candidates"));
        assert!(html.contains("No candidates found"));
    }

    #[test]
    fn test_tool_output_fallback_cards() {
        let report = json!([
            {"resource-file": "jane_doe.pdf", "text": "Jane Doe, engineer"},
            {"resource-file": "bob.md", "text": ""}
        ]);
        let cards = CandidateReportRenderer::cards(&report);
        let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["jane_doe", "bob"]);
        assert!(cards.iter().all(|c| c.skills.is_empty()));
    }

    #[test]
    fn test_lenient_candidate_keys() {
        let report = json!([
            {"experties": [], "name": "Ann", "title": "QA", "skills": ["Selenium", 5]}
        ]);
        let cards = CandidateReportRenderer::cards(&report);
        assert_eq!(cards[0].name, "Ann");
        assert_eq!(cards[0].title, "QA");
        assert_eq!(cards[0].skills, vec!["Selenium", "5"]);
    }

    #[test]
    fn test_job_match_bars() {
        let report = json!([{
            "job-file": "eng.txt",
            "matches": [{"resource-name": "Jane", "percent": 87}]
        }]);
        let html = JobMatchReportRenderer.render(&report).unwrap();

        assert!(html.contains(r#"style="width:87%""#));
        assert!(html.contains("Jane — 87%"));
        assert!(html.contains("eng.txt"));
        assert!(!html.contains("No job matches found"));
    }

    #[test]
    fn test_job_match_empty_state() {
        let html = JobMatchReportRenderer.render(&json!([])).unwrap();
        assert!(html.contains("No job matches found"));
    }

    #[test]
    fn test_read_report_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(read_report(&path), json!([]));
        assert_eq!(read_report(&dir.path().join("missing.json")), json!([]));
    }
}
