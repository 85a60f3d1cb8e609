use std::io::Write;

use crate::topology::{Broker, BrokerId, ClusterTopology};
use crate::validator::{Policy, ValidationReport};

const BANNER_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Plain aligned columns: header row, dashed rule under each header, rows.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<S: ToString>(&mut self, cells: impl IntoIterator<Item = S>) -> &mut Self {
        self.rows.push(cells.into_iter().map(|c| c.to_string()).collect());
        self
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let widths = self.widths();
        let line = |cells: &[String]| {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| format!("{:<w$}", cells.get(i).map(String::as_str).unwrap_or(""), w = *w))
                .collect();
            padded.join("  ").trim_end().to_string()
        };

        writeln!(out, "{}", line(&self.headers[..]))?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("  "))?;
        for row in &self.rows {
            writeln!(out, "{}", line(&row[..]))?;
        }
        Ok(())
    }
}

fn join_ids(ids: &[BrokerId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

fn list_ids<'a>(ids: impl IntoIterator<Item = &'a BrokerId>) -> String {
    let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    format!("[{}]", ids.join(", "))
}

pub fn write_brokers<'a, W: Write>(
    out: &mut W,
    brokers: impl IntoIterator<Item = &'a Broker>,
) -> std::io::Result<()> {
    writeln!(out, "\n=== Cluster Brokers ===\n")?;
    let mut table = Table::new(["ID", "Host", "Port"]);
    for b in brokers {
        table.row([b.id.to_string(), b.host.clone(), b.port.to_string()]);
    }
    table.write_to(out)
}

pub fn write_report<W: Write>(
    out: &mut W,
    report: &ValidationReport,
    policy: &Policy,
) -> std::io::Result<()> {
    let allowed = list_ids(&policy.allowed_brokers);

    writeln!(out, "\n=== Validation Results ===\n")?;
    writeln!(out, "Allowed brokers: {}", allowed)?;
    writeln!(out, "Topics checked:  {}", report.topics_checked)?;
    writeln!(out, "Partitions checked: {}", report.partitions_checked)?;
    writeln!(out, "Violations found: {}", report.violation_count())?;

    if !report.topic_details.is_empty() {
        writeln!(out, "\n=== Topic Details ===\n")?;

        for topic in &report.topic_details {
            let status = if topic.has_violations { "FAIL" } else { "PASS" };
            writeln!(out, "\nTopic: {} [{}]", topic.name, status)?;

            let mut table = Table::new(["Partition", "Leader", "Replicas", "ISR", "Violations"]);
            for p in &topic.partitions {
                let violations = if p.is_compliant() {
                    String::new()
                } else {
                    format!("Invalid: {}", list_ids(&p.violating_brokers))
                };
                table.row([
                    p.id.to_string(),
                    p.leader.to_string(),
                    join_ids(&p.replicas),
                    join_ids(&p.isr),
                    violations,
                ]);
            }
            table.write_to(out)?;
        }
    }

    if !report.violations.is_empty() {
        writeln!(out, "\n=== Violations Detail ===\n")?;
        for v in &report.violations {
            writeln!(out, "  - Topic: {}, Partition: {}", v.topic, v.partition)?;
            writeln!(out, "    Replicas: {}", list_ids(&v.all_replicas))?;
            writeln!(out, "    Invalid brokers: {}", list_ids(&v.invalid_brokers))?;
        }
    }

    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "\n{}", rule)?;
    if report.passed {
        writeln!(out, "VALIDATION PASSED")?;
        writeln!(
            out,
            "All {} topics use only brokers {}",
            report.topics_checked, allowed
        )?;
    } else {
        writeln!(out, "VALIDATION FAILED")?;
        writeln!(out, "Found {} placement violations", report.violation_count())?;
    }
    writeln!(out, "{}\n", rule)
}

pub fn write_no_topics<W: Write>(out: &mut W, policy: &Policy) -> std::io::Result<()> {
    writeln!(out, "\nNo topics found with prefix '{}'", policy.topic_prefix)
}

pub fn write_quiet<W: Write>(out: &mut W, report: &ValidationReport) -> std::io::Result<()> {
    if report.passed {
        writeln!(out, "PASSED")
    } else {
        writeln!(out, "FAILED: {} violations", report.violation_count())
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_id: Option<&'a str>,
    brokers: Vec<&'a Broker>,
    topic_prefix: &'a str,
    allowed_brokers: Vec<BrokerId>,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

pub fn write_json<W: Write>(
    out: &mut W,
    topology: &ClusterTopology,
    policy: &Policy,
    report: &ValidationReport,
) -> std::io::Result<()> {
    let doc = JsonOutput {
        cluster_id: topology.cluster_id(),
        brokers: topology.brokers().collect(),
        topic_prefix: &policy.topic_prefix,
        allowed_brokers: policy.allowed_brokers.iter().copied().collect(),
        report,
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)
}
