//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{CandidateReport, RankingReport};
use crate::processing::ranking::MatchTier;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    top_skills: usize,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
    detailed: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Candidate Ranking Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 960px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { padding: 8px 10px; border-bottom: 1px solid #e9ecef; text-align: left; }
        th { background: #f1f3f5; }
        .score-badge {
            display: inline-block;
            padding: 4px 12px;
            border-radius: 20px;
            font-weight: bold;
            color: white;
        }
        .tier-strong { background: #28a745; }
        .tier-good { background: #17a2b8; }
        .tier-weak { background: #ffc107; color: #000; }
        .tier-poor { background: #dc3545; }
        .candidate {
            background: #f8f9fa;
            padding: 15px;
            border-radius: 6px;
            margin: 15px 0;
            border-left: 4px solid #007acc;
        }
        .metadata {
            background: #e9ecef;
            padding: 15px;
            border-radius: 6px;
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Candidate Ranking Report</h1>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <h2>Job Requirements</h2>
        <p><strong>Source:</strong> {{ job_source }} | <strong>Required experience:</strong> {{ required_years }} years</p>
        <p><strong>Skills:</strong> {{ job_skills }}</p>

        <h2>Ranking</h2>
        <table>
            <tr><th>Rank</th><th>Candidate</th><th>Score</th><th>Recommendation</th><th>Experience</th></tr>
            {% for candidate in candidates %}
            <tr>
                <td>{{ candidate.rank }}</td>
                <td>{{ candidate.name }}</td>
                <td>{{ candidate.score }}</td>
                <td><span class="score-badge {{ candidate.tier_class }}">{{ candidate.recommendation }}</span></td>
                <td>{{ candidate.experience_years }} years</td>
            </tr>
            {% endfor %}
        </table>
        <p>Score range {{ min_score }} to {{ max_score }} (spread {{ spread }}): {{ differentiation }}</p>

        {% if detailed %}
        <h2>Candidate Details</h2>
        {% for candidate in candidates %}
        <div class="candidate">
            <h3>#{{ candidate.rank }} {{ candidate.name }}</h3>
            <p>{{ candidate.features }}</p>
            <p><strong>Matching skills:</strong> {{ candidate.matching_skills }}</p>
            <p><strong>Missing skills:</strong> {{ candidate.missing_skills }}</p>
            {% if !candidate.strengths.is_empty() %}
            <ul>
                {% for strength in candidate.strengths %}<li>{{ strength }}</li>{% endfor %}
            </ul>
            {% endif %}
            {% if !candidate.concerns.is_empty() %}
            <ul>
                {% for concern in candidate.concerns %}<li>{{ concern }}</li>{% endfor %}
            </ul>
            {% endif %}
        </div>
        {% endfor %}
        {% endif %}

        <div class="metadata">
            <p><strong>Generated by Candidate Ranker v{{ version }}</strong></p>
            <p><strong>Embedding model:</strong> {{ embedding_model }} | <strong>Scoring policy:</strong> {{ policy }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    detailed: bool,
    generated_at: String,
    processing_time: u64,
    job_source: String,
    required_years: u32,
    job_skills: String,
    candidates: Vec<HtmlCandidate>,
    min_score: String,
    max_score: String,
    spread: String,
    differentiation: String,
    version: String,
    embedding_model: String,
    policy: String,
}

struct HtmlCandidate {
    rank: usize,
    name: String,
    score: String,
    tier_class: &'static str,
    recommendation: String,
    experience_years: u32,
    features: String,
    matching_skills: String,
    missing_skills: String,
    strengths: Vec<String>,
    concerns: Vec<String>,
}

fn format_timestamp(report: &RankingReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn features_summary(candidate: &CandidateReport) -> String {
    candidate
        .features
        .named()
        .map(|(name, value)| format!("{}={:.3}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn differentiation_label(report: &RankingReport) -> &'static str {
    if report.statistics.clear_differentiation {
        "clear differentiation between candidates"
    } else {
        "candidates scored closely"
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, top_skills: usize) -> Self {
        Self {
            use_colors,
            detailed,
            top_skills,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_tier_badge(&self, tier: MatchTier) -> String {
        let color = match tier {
            MatchTier::StrongMatch => Color::Green,
            MatchTier::GoodMatch => Color::BrightGreen,
            MatchTier::WeakMatch => Color::Yellow,
            MatchTier::PoorMatch => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", tier.label().color(color).bold())
        } else {
            format!("[{}]", tier.label())
        }
    }

    fn limited(&self, items: &[String]) -> String {
        if items.is_empty() {
            return "none".to_string();
        }
        let shown: Vec<&str> = items.iter().take(self.top_skills).map(String::as_str).collect();
        if items.len() > shown.len() {
            format!("{} (+{} more)", shown.join(", "), items.len() - shown.len())
        } else {
            shown.join(", ")
        }
    }

    fn format_candidate(&self, candidate: &CandidateReport) -> String {
        let mut output = format!(
            "{:>2}. {} {} {}\n",
            candidate.rank,
            self.colorize(&candidate.name, Color::White),
            self.colorize(&format!("{:.3}", candidate.ai_score), Color::Cyan),
            self.format_tier_badge(candidate.tier)
        );
        output.push_str(&format!(
            "    Experience: {} years | Matching skills: {}\n",
            candidate.experience_years,
            self.limited(&candidate.matching_skills)
        ));

        if self.detailed {
            for (name, value) in candidate.features.named() {
                output.push_str(&format!("    {:<18} {:.3}\n", name, value));
            }
            if !candidate.missing_skills.is_empty() {
                output.push_str(&format!(
                    "    Missing skills: {}\n",
                    self.colorize(&self.limited(&candidate.missing_skills), Color::Yellow)
                ));
            }
            for strength in &candidate.strengths {
                output.push_str(&format!("    + {}\n", self.colorize(strength, Color::Green)));
            }
            for concern in &candidate.concerns {
                output.push_str(&format!("    - {}\n", self.colorize(concern, Color::Yellow)));
            }
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🏆 CANDIDATE RANKING", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Job Requirements", 2));
        output.push_str(&format!("Source: {}\n", report.job.source));
        output.push_str(&format!(
            "Required experience: {} years\n",
            report.job.required_experience_years
        ));
        output.push_str(&format!("Skills: {}\n", join_or_none(&report.job.skills)));

        output.push_str(&self.format_header("Ranking", 2));
        if report.candidates.is_empty() {
            output.push_str("No candidates to rank\n");
        }
        for candidate in &report.candidates {
            output.push_str(&self.format_candidate(candidate));
        }

        let stats = &report.statistics;
        output.push_str(&self.format_header("Score Distribution", 3));
        output.push_str(&format!(
            "Min {:.3} | Max {:.3} | Mean {:.3} | Spread {:.3}\n",
            stats.min, stats.max, stats.mean, stats.spread
        ));
        let verdict_color = if stats.clear_differentiation { Color::Green } else { Color::Yellow };
        output.push_str(&format!("{}\n", self.colorize(differentiation_label(report), verdict_color)));

        if let Some(top) = report.top_candidate() {
            output.push_str(&format!(
                "\n🎯 Top candidate: {} ({})\n",
                self.colorize(&top.name, Color::Green),
                top.recommendation
            ));
        }

        output.push_str(&format!(
            "\n{} Generated by Candidate Ranker v{} | Embedding: {} | Policy: {}\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.ranker_version,
            report.metadata.embedding_model,
            report.metadata.scoring_policy
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::from("# Candidate Ranking Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n\n",
                format_timestamp(report),
                report.metadata.processing_time_ms
            ));
        }

        output.push_str("## Job Requirements\n\n");
        output.push_str(&format!("- **Source:** `{}`\n", report.job.source));
        output.push_str(&format!(
            "- **Required experience:** {} years\n",
            report.job.required_experience_years
        ));
        output.push_str(&format!("- **Skills:** {}\n\n", join_or_none(&report.job.skills)));

        output.push_str("## Ranking\n\n");
        output.push_str("| Rank | Candidate | Score | Recommendation | Experience | Matching Skills |\n");
        output.push_str("|------|-----------|-------|----------------|------------|-----------------|\n");
        for candidate in &report.candidates {
            output.push_str(&format!(
                "| {} | {} | {:.3} | {} | {} years | {} |\n",
                candidate.rank,
                candidate.name,
                candidate.ai_score,
                candidate.recommendation,
                candidate.experience_years,
                join_or_none(&candidate.matching_skills)
            ));
        }

        let stats = &report.statistics;
        output.push_str(&format!(
            "\nScore range {:.3} to {:.3} (spread {:.3}): {}\n\n",
            stats.min,
            stats.max,
            stats.spread,
            differentiation_label(report)
        ));

        output.push_str("## Candidate Details\n\n");
        for candidate in &report.candidates {
            output.push_str(&format!("### {}. {}\n\n", candidate.rank, candidate.name));
            output.push_str("| Feature | Value |\n|---------|-------|\n");
            for (name, value) in candidate.features.named() {
                output.push_str(&format!("| {} | {:.3} |\n", name, value));
            }
            output.push('\n');
            if !candidate.missing_skills.is_empty() {
                output.push_str(&format!("**Missing skills:** {}\n\n", candidate.missing_skills.join(", ")));
            }
            for strength in &candidate.strengths {
                output.push_str(&format!("- ✅ {}\n", strength));
            }
            for concern in &candidate.concerns {
                output.push_str(&format!("- ⚠️ {}\n", concern));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by Candidate Ranker v{} using {} embeddings and the {} scoring policy*\n",
                report.metadata.ranker_version, report.metadata.embedding_model, report.metadata.scoring_policy
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool, detailed: bool) -> Self {
        Self {
            include_styles,
            detailed,
        }
    }

    fn create_template_data(&self, report: &RankingReport) -> HtmlTemplate {
        let candidates = report
            .candidates
            .iter()
            .map(|candidate| HtmlCandidate {
                rank: candidate.rank,
                name: candidate.name.clone(),
                score: format!("{:.3}", candidate.ai_score),
                tier_class: match candidate.tier {
                    MatchTier::StrongMatch => "tier-strong",
                    MatchTier::GoodMatch => "tier-good",
                    MatchTier::WeakMatch => "tier-weak",
                    MatchTier::PoorMatch => "tier-poor",
                },
                recommendation: candidate.recommendation.clone(),
                experience_years: candidate.experience_years,
                features: features_summary(candidate),
                matching_skills: join_or_none(&candidate.matching_skills),
                missing_skills: join_or_none(&candidate.missing_skills),
                strengths: candidate.strengths.clone(),
                concerns: candidate.concerns.clone(),
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            detailed: self.detailed,
            generated_at: format_timestamp(report),
            processing_time: report.metadata.processing_time_ms,
            job_source: report.job.source.clone(),
            required_years: report.job.required_experience_years,
            job_skills: join_or_none(&report.job.skills),
            candidates,
            min_score: format!("{:.3}", report.statistics.min),
            max_score: format!("{:.3}", report.statistics.max),
            spread: format!("{:.3}", report.statistics.spread),
            differentiation: differentiation_label(report).to_string(),
            version: report.metadata.ranker_version.clone(),
            embedding_model: report.metadata.embedding_model.clone(),
            policy: report.metadata.scoring_policy.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        Ok(self.create_template_data(report).render()?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, 5)
    }

    pub fn with_options(use_colors: bool, detailed: bool, top_skills: usize) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed, top_skills),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true, detailed),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}
