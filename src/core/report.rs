//! HR reporting pipeline: load three CSV sources, left-join them, clean,
//! aggregate by department/role, flag compensation outliers per
//! department (IQR rule) and rank performers, then export a JSON summary
//! plus an outliers-only CSV.

use crate::config::toml_config::{RankingConfig, ReportConfig};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, RowkitError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeCsvRow {
    pub employee_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub role: String,
    pub hire_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalaryCsvRow {
    pub employee_id: u32,
    pub base_salary: Option<f64>,
    pub bonus: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceCsvRow {
    pub employee_id: u32,
    pub year: i32,
    pub rating: Option<f64>,
    pub goals_met: Option<f64>,
}

/// Employees with salary and performance columns joined on, before
/// cleaning. Salary and rating stay optional until `clean` drops the
/// incomplete rows.
#[derive(Debug, Clone)]
pub struct MergedRow {
    pub employee_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub role: String,
    pub hire_date: String,
    pub base_salary: Option<f64>,
    pub bonus: f64,
    pub total_comp: Option<f64>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub goals_met: Option<f64>,
}

/// A fully cleaned report row, ready for aggregation and export.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub employee_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub role: String,
    pub hire_date: NaiveDate,
    pub base_salary: f64,
    pub bonus: f64,
    pub total_comp: f64,
    pub year: Option<i32>,
    pub rating: f64,
    pub goals_met: f64,
    pub is_comp_outlier: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub department: String,
    pub role: String,
    pub emp_count: usize,
    pub base_salary_mean: f64,
    pub base_salary_median: f64,
    pub base_salary_std: Option<f64>,
    pub total_comp_mean: f64,
    pub total_comp_median: f64,
    pub total_comp_std: Option<f64>,
    pub rating_mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedRow {
    pub employee_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub role: String,
    pub rating: f64,
    pub goals_met: f64,
    pub rating_norm: f64,
    pub goals_norm: f64,
    pub perf_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Kpi {
    pub employees: usize,
    pub mean_total_comp: f64,
    pub mean_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub kpi: Kpi,
    pub aggregates: Vec<GroupSummary>,
    pub top_by_department: Vec<RankedRow>,
    pub top_global: Vec<RankedRow>,
}

// ---------- small numeric helpers ----------

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Sample standard deviation (n - 1); undefined below two observations.
fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// Linearly interpolated quantile over a sorted slice, matching the
/// numpy/pandas default.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

// ---------- pipeline stages ----------

fn parse_csv<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Reads the three CSV sources. When a performance year is given, only
/// that year's performance rows are kept.
pub fn load<S: Storage>(
    storage: &S,
    config: &ReportConfig,
) -> Result<(Vec<EmployeeCsvRow>, Vec<SalaryCsvRow>, Vec<PerformanceCsvRow>)> {
    let employees: Vec<EmployeeCsvRow> = parse_csv(&storage.read_file(&config.data.employees)?)?;
    let salaries: Vec<SalaryCsvRow> = parse_csv(&storage.read_file(&config.data.salaries)?)?;
    let mut performance: Vec<PerformanceCsvRow> =
        parse_csv(&storage.read_file(&config.data.performance)?)?;
    if let Some(year) = config.performance_year {
        performance.retain(|p| p.year == year);
    }
    Ok((employees, salaries, performance))
}

/// Left-joins salaries then performance onto employees by employee_id.
/// Missing bonus becomes 0; total_comp = base_salary + bonus.
pub fn merge(
    employees: &[EmployeeCsvRow],
    salaries: &[SalaryCsvRow],
    performance: &[PerformanceCsvRow],
) -> Vec<MergedRow> {
    // first occurrence wins, as duplicates are dropped downstream anyway
    let mut salary_by_id: HashMap<u32, &SalaryCsvRow> = HashMap::new();
    for s in salaries {
        salary_by_id.entry(s.employee_id).or_insert(s);
    }
    let mut perf_by_id: HashMap<u32, &PerformanceCsvRow> = HashMap::new();
    for p in performance {
        perf_by_id.entry(p.employee_id).or_insert(p);
    }

    employees
        .iter()
        .map(|e| {
            let salary = salary_by_id.get(&e.employee_id);
            let perf = perf_by_id.get(&e.employee_id);
            let base_salary = salary.and_then(|s| s.base_salary);
            let bonus = salary.and_then(|s| s.bonus).unwrap_or(0.0);
            MergedRow {
                employee_id: e.employee_id,
                first_name: e.first_name.clone(),
                last_name: e.last_name.clone(),
                department: e.department.clone(),
                role: e.role.clone(),
                hire_date: e.hire_date.clone(),
                base_salary,
                bonus,
                total_comp: base_salary.map(|b| b + bonus),
                year: perf.map(|p| p.year),
                rating: perf.and_then(|p| p.rating),
                goals_met: perf.and_then(|p| p.goals_met),
            }
        })
        .collect()
}

/// Drops duplicate employee ids (keeping the first), rows without a base
/// salary or rating, and rows whose hire date does not parse.
pub fn clean(rows: Vec<MergedRow>) -> Vec<ReportRow> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.employee_id) {
            tracing::warn!("dropping duplicate employee_id {}", row.employee_id);
            continue;
        }
        let (Some(base_salary), Some(rating), Some(total_comp)) =
            (row.base_salary, row.rating, row.total_comp)
        else {
            tracing::warn!(
                "dropping employee_id {}: missing base_salary or rating",
                row.employee_id
            );
            continue;
        };
        let Ok(hire_date) = NaiveDate::parse_from_str(&row.hire_date, "%Y-%m-%d") else {
            tracing::warn!(
                "dropping employee_id {}: unparseable hire_date '{}'",
                row.employee_id,
                row.hire_date
            );
            continue;
        };
        out.push(ReportRow {
            employee_id: row.employee_id,
            first_name: row.first_name,
            last_name: row.last_name,
            department: row.department,
            role: row.role,
            hire_date,
            base_salary,
            bonus: row.bonus,
            total_comp,
            year: row.year,
            rating,
            goals_met: row.goals_met.unwrap_or(0.0),
            is_comp_outlier: false,
        });
    }
    out
}

/// Per (department, role) aggregation, sorted by department then role.
pub fn aggregate(rows: &[ReportRow]) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<(String, String), Vec<&ReportRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.department.clone(), row.role.clone()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|((department, role), members)| {
            let base: Vec<f64> = members.iter().map(|r| r.base_salary).collect();
            let comp: Vec<f64> = members.iter().map(|r| r.total_comp).collect();
            let ratings: Vec<f64> = members.iter().map(|r| r.rating).collect();
            GroupSummary {
                department,
                role,
                emp_count: members.len(),
                base_salary_mean: mean(&base),
                base_salary_median: median(&base),
                base_salary_std: sample_std(&base),
                total_comp_mean: mean(&comp),
                total_comp_median: median(&comp),
                total_comp_std: sample_std(&comp),
                rating_mean: mean(&ratings),
            }
        })
        .collect()
}

/// Flags compensation outliers with the IQR rule applied per department:
/// a row is an outlier iff its total_comp falls outside
/// [Q1 - 1.5*IQR, Q3 + 1.5*IQR] computed over its own department only.
pub fn flag_outliers(mut rows: Vec<ReportRow>) -> Vec<ReportRow> {
    let mut by_dept: HashMap<&str, Vec<f64>> = HashMap::new();
    for row in &rows {
        by_dept
            .entry(row.department.as_str())
            .or_default()
            .push(row.total_comp);
    }

    let mut bounds: HashMap<String, (f64, f64)> = HashMap::new();
    for (dept, mut values) in by_dept {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let q1 = quantile(&values, 0.25);
        let q3 = quantile(&values, 0.75);
        let iqr = q3 - q1;
        bounds.insert(dept.to_string(), (q1 - 1.5 * iqr, q3 + 1.5 * iqr));
    }

    for row in &mut rows {
        if let Some((lower, upper)) = bounds.get(&row.department) {
            row.is_comp_outlier = row.total_comp < *lower || row.total_comp > *upper;
        }
    }
    rows
}

fn min_max_norm(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}

/// Ranks performers. Rating and goals_met are min-max normalized per
/// department (a degenerate group normalizes to 0), combined into
/// `perf_score` with the configured weights. Returns the top N per
/// department (department ASC, score DESC) and the top N global.
pub fn rank(rows: &[ReportRow], ranking: &RankingConfig) -> (Vec<RankedRow>, Vec<RankedRow>) {
    let mut extremes: HashMap<&str, (f64, f64, f64, f64)> = HashMap::new();
    for row in rows {
        let entry = extremes
            .entry(row.department.as_str())
            .or_insert((f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY));
        entry.0 = entry.0.min(row.rating);
        entry.1 = entry.1.max(row.rating);
        entry.2 = entry.2.min(row.goals_met);
        entry.3 = entry.3.max(row.goals_met);
    }

    let mut ranked: Vec<RankedRow> = rows
        .iter()
        .map(|row| {
            let (r_min, r_max, g_min, g_max) = extremes[row.department.as_str()];
            let rating_norm = min_max_norm(row.rating, r_min, r_max);
            let goals_norm = min_max_norm(row.goals_met, g_min, g_max);
            RankedRow {
                employee_id: row.employee_id,
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
                department: row.department.clone(),
                role: row.role.clone(),
                rating: row.rating,
                goals_met: row.goals_met,
                rating_norm,
                goals_norm,
                perf_score: ranking.rating_weight * rating_norm
                    + ranking.goals_weight * goals_norm,
            }
        })
        .collect();

    let mut top_global = ranked.clone();
    top_global.sort_by(|a, b| {
        b.perf_score
            .partial_cmp(&a.perf_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top_global.truncate(ranking.top_n);

    ranked.sort_by(|a, b| {
        a.department.cmp(&b.department).then(
            b.perf_score
                .partial_cmp(&a.perf_score)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    let mut top_by_department = Vec::new();
    let mut dept_counts: HashMap<String, usize> = HashMap::new();
    for row in ranked {
        let count = dept_counts.entry(row.department.clone()).or_insert(0);
        if *count < ranking.top_n {
            *count += 1;
            top_by_department.push(row);
        }
    }

    (top_by_department, top_global)
}

/// Writes the JSON summary and the outliers-only CSV.
pub fn export<S: Storage>(
    storage: &S,
    config: &ReportConfig,
    rows: &[ReportRow],
    aggregates: Vec<GroupSummary>,
    top_by_department: Vec<RankedRow>,
    top_global: Vec<RankedRow>,
) -> Result<()> {
    let distinct: HashSet<u32> = rows.iter().map(|r| r.employee_id).collect();
    let comps: Vec<f64> = rows.iter().map(|r| r.total_comp).collect();
    let ratings: Vec<f64> = rows.iter().map(|r| r.rating).collect();
    let summary = ReportSummary {
        kpi: Kpi {
            employees: distinct.len(),
            mean_total_comp: mean(&comps),
            mean_rating: mean(&ratings),
        },
        aggregates,
        top_by_department,
        top_global,
    };
    storage.write_file(&config.output.summary, &serde_json::to_vec_pretty(&summary)?)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows.iter().filter(|r| r.is_comp_outlier) {
        writer.serialize(row)?;
    }
    let csv_bytes = writer
        .into_inner()
        .map_err(|e| RowkitError::validation(format!("CSV writer flush failed: {}", e)))?;
    storage.write_file(&config.output.outliers, &csv_bytes)?;
    Ok(())
}

/// Orchestrates load -> merge -> clean -> aggregate -> outliers -> rank
/// -> export.
pub struct ReportPipeline<S: Storage> {
    storage: S,
    config: ReportConfig,
}

impl<S: Storage> ReportPipeline<S> {
    pub fn new(storage: S, config: ReportConfig) -> Self {
        Self { storage, config }
    }

    /// Runs the whole pipeline and returns the summary output path.
    pub fn run(&self) -> Result<String> {
        tracing::info!("loading HR data");
        let (employees, salaries, performance) = load(&self.storage, &self.config)?;
        tracing::info!(
            "loaded {} employees, {} salary rows, {} performance rows",
            employees.len(),
            salaries.len(),
            performance.len()
        );

        let merged = merge(&employees, &salaries, &performance);
        let rows = clean(merged);
        tracing::info!("{} rows after cleaning", rows.len());

        let aggregates = aggregate(&rows);
        let rows = flag_outliers(rows);
        let outliers = rows.iter().filter(|r| r.is_comp_outlier).count();
        tracing::info!("{} compensation outliers flagged", outliers);

        let (top_by_department, top_global) = rank(&rows, &self.config.ranking);

        tracing::info!("exporting report to {}", self.config.output.summary);
        export(
            &self.storage,
            &self.config,
            &rows,
            aggregates,
            top_by_department,
            top_global,
        )?;
        Ok(self.config.output.summary.clone())
    }
}
