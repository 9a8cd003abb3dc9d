use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use hm_core::{LevelOrder, ObservationTable, TestResultRow};
use hm_inference::{
    PairwiseConfig, PairwiseTestResults, Selection, run_pairwise_tests, select_pairs,
};
use hm_prob::PairwiseTests;
use hm_viz::{ComparisonArtifact, ComparisonLabels, ErrorBar, PlotKind, PointOverlay};
use hm_viz_render::config::{VizConfig, resolve_config};
use hm_viz_render::output::OutputFormat;
use hm_viz_render::output::svg::write_atomic;
use hm_viz_render::{Capabilities, parse_artifact, render_svg, render_to_bytes};
use serde::Serialize;

/// Input table and the two columns to compare.
#[derive(Args)]
pub struct DataArgs {
    /// Input table (CSV; `.tsv` is read tab-separated)
    #[arg(long)]
    csv: PathBuf,

    /// Categorical column defining the groups
    #[arg(long)]
    group: String,

    /// Numeric column to compare
    #[arg(long)]
    value: String,

    /// x-axis order, comma separated. Defaults to the sorted group labels.
    #[arg(long, value_delimiter = ',')]
    order: Vec<String>,
}

/// Test family, correction and selection.
#[derive(Args)]
pub struct TestArgs {
    /// Mann-Whitney rank-sum tests instead of Welch t-tests
    #[arg(long)]
    nonparametric: bool,

    /// Multiple-comparison correction (holm, bonf, sidak, fdr_bh, fdr_by, none)
    #[arg(long, default_value = "holm")]
    padjust: String,

    /// Significance level used by --only-sig
    #[arg(long, default_value = "0.05")]
    alpha: f64,

    /// Keep only pairs with p < alpha
    #[arg(long)]
    only_sig: bool,

    /// Fail on the first pair that cannot be tested instead of reporting NaN
    #[arg(long)]
    strict: bool,
}

impl TestArgs {
    fn pairwise_config(&self) -> PairwiseConfig {
        PairwiseConfig { nonparametric: self.nonparametric, padjust: self.padjust.clone() }
    }
}

/// Styling shared by `plot` and `render`.
#[derive(Args)]
pub struct StyleArgs {
    /// Visualization config (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in theme (whitegrid, ticks, minimal); overrides the config's theme
    #[arg(long)]
    theme: Option<String>,

    /// Output figure; format from the extension (svg, png, pdf). Defaults to SVG on stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
pub struct PlotArgs {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    tests: TestArgs,

    #[command(flatten)]
    style: StyleArgs,

    /// Plot kind: box, violin or point
    #[arg(long, default_value = "box")]
    kind: String,

    /// Observation overlay for box/violin plots: swarm, strip or none
    #[arg(long, default_value = "swarm")]
    points: String,

    /// Error bar for point plots: ci:<level> or se:<multiplier>
    #[arg(long, default_value = "ci:95")]
    error: String,

    /// Plot title
    #[arg(long)]
    title: Option<String>,

    /// y-axis label (defaults to the value column name)
    #[arg(long)]
    ylabel: Option<String>,

    /// Also write the normalized test rows (JSON)
    #[arg(long)]
    tests_out: Option<PathBuf>,

    /// Also write the comparison artifact (JSON), re-renderable with `render`
    #[arg(long)]
    artifact_out: Option<PathBuf>,
}

#[derive(Args)]
pub struct TestsArgs {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    tests: TestArgs,

    /// Output file (pretty JSON). Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Comparison artifact (JSON) written by `plot --artifact-out`
    #[arg(long)]
    artifact: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

/// JSON document of the `tests` subcommand.
#[derive(Serialize)]
struct TestsReport<'a> {
    group: &'a str,
    value: &'a str,
    levels: &'a [String],
    test: &'static str,
    padjust: &'a str,
    pvalue_column: Option<&'a str>,
    alpha: f64,
    only_significant: bool,
    rows: &'a [TestResultRow],
    selected: Vec<TestResultRow>,
}

impl<'a> TestsReport<'a> {
    fn new(
        data: &'a DataArgs,
        tests: &'a TestArgs,
        order: &'a LevelOrder,
        results: &'a PairwiseTestResults,
        selection: &Selection,
    ) -> Self {
        Self {
            group: &data.group,
            value: &data.value,
            levels: order.as_slice(),
            test: if tests.nonparametric { "mann-whitney" } else { "welch" },
            padjust: &tests.padjust,
            pvalue_column: results.pvalue_column.as_deref(),
            alpha: tests.alpha,
            only_significant: tests.only_sig,
            rows: &results.rows,
            selected: selection
                .iter()
                .map(|(pair, pval)| TestResultRow { pair: pair.clone(), pval })
                .collect(),
        }
    }
}

pub fn cmd_plot(args: &PlotArgs) -> Result<()> {
    // Plot kind first: nothing is read or computed for an unsupported kind.
    PlotKind::parse(&args.kind, PointOverlay::default(), ErrorBar::default())?;
    let kind = PlotKind::parse(
        &args.kind,
        PointOverlay::parse(&args.points)?,
        ErrorBar::parse(&args.error)?,
    )?;
    let config = load_config(&args.style)?;
    let caps = Capabilities::detect(&config);
    tracing::debug!(%kind, annotations = caps.annotations, theme = %config.theme, "plot setup");

    let (table, order) = load_data(&args.data)?;
    let (results, selection) = run_tests(&table, &args.data, &order, &args.tests)?;

    let labels = ComparisonLabels { title: args.title.clone(), ylabel: args.ylabel.clone() };
    let artifact = ComparisonArtifact::build(
        &table,
        &args.data.group,
        &args.data.value,
        &order,
        kind,
        &selection,
        &labels,
    )?;

    // Render fully before writing anything.
    let figure = match &args.style.out {
        Some(path) => {
            let format = OutputFormat::from_path(path, &config.output.format)?;
            Some((path, render_to_bytes(&artifact, format, &config, caps)?))
        }
        None => None,
    };
    let tests_json = match &args.tests_out {
        Some(_) => Some(serde_json::to_string_pretty(&TestsReport::new(
            &args.data,
            &args.tests,
            &order,
            &results,
            &selection,
        ))?),
        None => None,
    };
    let artifact_json = match &args.artifact_out {
        Some(_) => Some(serde_json::to_string_pretty(&artifact)?),
        None => None,
    };

    match figure {
        Some((path, bytes)) => {
            write_atomic(path, &bytes)?;
            tracing::info!(
                path = %path.display(),
                brackets = artifact.brackets.len(),
                "figure saved"
            );
        }
        None => print_stdout(&render_svg(&artifact, &config, caps)?)?,
    }
    if let (Some(path), Some(json)) = (&args.tests_out, tests_json) {
        write_atomic(path, json.as_bytes())?;
    }
    if let (Some(path), Some(json)) = (&args.artifact_out, artifact_json) {
        write_atomic(path, json.as_bytes())?;
    }
    Ok(())
}

pub fn cmd_tests(args: &TestsArgs) -> Result<()> {
    let (table, order) = load_data(&args.data)?;
    let (results, selection) = run_tests(&table, &args.data, &order, &args.tests)?;
    let report = TestsReport::new(&args.data, &args.tests, &order, &results, &selection);
    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => write_atomic(path, json.as_bytes())?,
        None => println!("{json}"),
    }
    Ok(())
}

pub fn cmd_render(args: &RenderArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.artifact)
        .with_context(|| format!("failed to read {}", args.artifact.display()))?;
    let artifact = parse_artifact(&json)?;
    let config = load_config(&args.style)?;
    let caps = Capabilities::detect(&config);
    match &args.style.out {
        Some(path) => {
            let format = OutputFormat::from_path(path, &config.output.format)?;
            let bytes = render_to_bytes(&artifact, format, &config, caps)?;
            write_atomic(path, &bytes)?;
            tracing::info!(path = %path.display(), "figure saved");
        }
        None => print_stdout(&render_svg(&artifact, &config, caps)?)?,
    }
    Ok(())
}

fn load_config(style: &StyleArgs) -> Result<VizConfig> {
    let yaml = match &style.config {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };
    Ok(resolve_config(yaml.as_deref(), style.theme.as_deref())?)
}

fn load_data(data: &DataArgs) -> Result<(ObservationTable, LevelOrder)> {
    let table = crate::data::read_table(&data.csv)?;
    let order = if data.order.is_empty() {
        LevelOrder::derive(&table, &data.group)?
    } else {
        LevelOrder::new(data.order.iter().map(|s| s.trim()))?
    };
    tracing::debug!(levels = ?order.as_slice(), "level order");
    Ok((table, order))
}

fn run_tests(
    table: &ObservationTable,
    data: &DataArgs,
    order: &LevelOrder,
    tests: &TestArgs,
) -> Result<(PairwiseTestResults, Selection)> {
    let routine = PairwiseTests { strict: tests.strict, ..PairwiseTests::new() };
    let results = run_pairwise_tests(
        &routine,
        table,
        &data.group,
        &data.value,
        order,
        &tests.pairwise_config(),
    )?;
    let selection = select_pairs(&results, tests.alpha, tests.only_sig)?;
    tracing::info!(
        pairs = results.len(),
        selected = selection.len(),
        column = results.pvalue_column.as_deref().unwrap_or("-"),
        "pairwise tests done"
    );
    Ok((results, selection))
}

fn print_stdout(svg: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(svg.as_bytes())?;
    out.flush()?;
    Ok(())
}
