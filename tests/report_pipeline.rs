use rowkit::config::toml_config::{DataPaths, OutputPaths, RankingConfig, ReportConfig};
use rowkit::config::LocalStorage;
use rowkit::core::report::ReportPipeline;
use rowkit::utils::validation::Validate;
use tempfile::TempDir;

const SAMPLE_EMPLOYEES: &str = "\
employee_id,first_name,last_name,department,role,hire_date
101,Alice,Rossi,Sales,Manager,2019-03-12
102,Bob,Bianchi,Engineering,Developer,2021-07-01
103,Chiara,Verdi,HR,Analyst,2020-11-05
104,Diego,Neri,Engineering,Developer,2018-02-20
";

const SAMPLE_SALARIES: &str = "\
employee_id,base_salary,bonus
101,52000,5000
102,45000,2500
103,38000,1500
104,70000,12000
";

const SAMPLE_PERFORMANCE: &str = "\
employee_id,year,rating,goals_met
101,2024,4.5,8
102,2024,3.2,5
103,2023,4.9,9
103,2024,4.0,7
104,2024,4.8,10
";

fn setup(dir: &TempDir) -> ReportConfig {
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("employees.csv"), SAMPLE_EMPLOYEES).unwrap();
    std::fs::write(data.join("salaries.csv"), SAMPLE_SALARIES).unwrap();
    std::fs::write(data.join("performance.csv"), SAMPLE_PERFORMANCE).unwrap();

    ReportConfig {
        data: DataPaths {
            employees: "data/employees.csv".into(),
            salaries: "data/salaries.csv".into(),
            performance: "data/performance.csv".into(),
        },
        output: OutputPaths {
            summary: "output/hr_summary.json".into(),
            outliers: "output/hr_outliers.csv".into(),
        },
        performance_year: Some(2024),
        ranking: RankingConfig::default(),
    }
}

#[test]
fn test_end_to_end_report_pipeline() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir);
    config.validate().unwrap();

    let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());
    let pipeline = ReportPipeline::new(storage, config);
    let summary_path = pipeline.run().unwrap();
    assert_eq!(summary_path, "output/hr_summary.json");

    let summary_file = dir.path().join("output/hr_summary.json");
    assert!(summary_file.exists());
    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(summary_file).unwrap()).unwrap();

    // KPIs over the four sample employees
    assert_eq!(summary["kpi"]["employees"], 4);
    let mean_comp = summary["kpi"]["mean_total_comp"].as_f64().unwrap();
    let expected_mean = (57_000.0 + 47_500.0 + 39_500.0 + 82_000.0) / 4.0;
    assert!((mean_comp - expected_mean).abs() < 1e-6);

    // performance filtered to 2024: Chiara keeps her 2024 rating
    let aggregates = summary["aggregates"].as_array().unwrap();
    let hr_analyst = aggregates
        .iter()
        .find(|a| a["department"] == "HR" && a["role"] == "Analyst")
        .unwrap();
    assert_eq!(hr_analyst["rating_mean"].as_f64().unwrap(), 4.0);

    let eng_dev = aggregates
        .iter()
        .find(|a| a["department"] == "Engineering" && a["role"] == "Developer")
        .unwrap();
    assert_eq!(eng_dev["emp_count"], 2);
    let expected_eng_mean = (45_000.0 + 2_500.0 + 70_000.0 + 12_000.0) / 2.0;
    assert!((eng_dev["total_comp_mean"].as_f64().unwrap() - expected_eng_mean).abs() < 1e-6);

    // Diego (104) leads the global ranking
    let top_global = summary["top_global"].as_array().unwrap();
    assert_eq!(top_global[0]["employee_id"], 104);
    assert!((top_global[0]["perf_score"].as_f64().unwrap() - 1.0).abs() < 1e-9);

    // no compensation outlier in the sample population
    let outliers_file = dir.path().join("output/hr_outliers.csv");
    assert!(outliers_file.exists());
    let outliers = std::fs::read_to_string(outliers_file).unwrap();
    assert!(outliers.lines().filter(|l| !l.trim().is_empty()).count() <= 1);
}

#[test]
fn test_missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir);
    config.data.salaries = "data/nope.csv".into();

    let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());
    let pipeline = ReportPipeline::new(storage, config);
    assert!(pipeline.run().is_err());
}
