//! pipelines-workflow CLI - inspect the pipeline workflow catalog

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pipelines_workflow::error::Result;
use pipelines_workflow::{
    select_workflow, FixSuggestion, Graph, PipelineStep, StepType, WorkflowKind, WorkflowStep,
};

#[derive(Parser)]
#[command(name = "pipelines-workflow")]
#[command(about = "Inspect ingestion pipeline workflows and plan step reruns")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the steps of a workflow, grouped by level
    Show {
        /// occurrence, event-occurrence, event or validator
        workflow: WorkflowKind,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show which workflow a dataset's content selects
    Select {
        /// Dataset contains occurrence records
        #[arg(long)]
        occurrences: bool,

        /// Dataset contains event records
        #[arg(long)]
        events: bool,
    },

    /// Every step implied by running the given steps
    Closure {
        /// occurrence, event-occurrence, event or validator
        workflow: WorkflowKind,

        /// Step names (DWCA_TO_VERBATIM) or labels (dwcaToVerbatim)
        #[arg(required = true)]
        steps: Vec<StepType>,
    },

    /// Minimal steps to trigger so that all given steps run
    Roots {
        /// occurrence, event-occurrence, event or validator
        workflow: WorkflowKind,

        #[arg(required = true)]
        steps: Vec<StepType>,
    },

    /// Roots to trigger plus every step that will run, by level
    Plan {
        /// occurrence, event-occurrence, event or validator
        workflow: WorkflowKind,

        #[arg(required = true)]
        steps: Vec<StepType>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Workflow as a tree, with the last recorded run of each step
    Tree {
        /// occurrence, event-occurrence, event or validator
        workflow: WorkflowKind,

        /// JSON array of pipeline step records
        #[arg(long)]
        steps: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

#[derive(Serialize)]
struct StepView {
    step: StepType,
    label: &'static str,
    level: u32,
    next: Vec<StepType>,
}

#[derive(Serialize)]
struct WorkflowView {
    workflow: WorkflowKind,
    steps: Vec<StepView>,
}

fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Show { workflow, format } => show(workflow, format),
        Commands::Select {
            occurrences,
            events,
        } => {
            select(occurrences, events);
            Ok(())
        }
        Commands::Closure { workflow, steps } => closure(workflow, &steps),
        Commands::Roots { workflow, steps } => roots(workflow, &steps),
        Commands::Plan {
            workflow,
            steps,
            format,
        } => plan(workflow, &steps, format),
        Commands::Tree {
            workflow,
            steps,
            format,
        } => tree(workflow, steps, format),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

/// Prints `value` as JSON or YAML; returns false when text output was asked for
fn emit_structured<T: Serialize>(value: &T, format: Format) -> Result<bool> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(value)?),
        Format::Text => return Ok(false),
    }
    Ok(true)
}

fn show(workflow: WorkflowKind, format: Format) -> Result<()> {
    let graph = workflow.graph();
    let ordered = graph.sort_by_level(graph.nodes());

    let view = WorkflowView {
        workflow,
        steps: ordered
            .iter()
            .map(|step| StepView {
                step: *step,
                label: step.label(),
                level: graph.level_of(step),
                next: graph.edges_from(step).to_vec(),
            })
            .collect(),
    };
    if emit_structured(&view, format)? {
        return Ok(());
    }

    println!(
        "{} {} workflow ({} steps)",
        "→".cyan(),
        workflow.name().cyan().bold(),
        graph.len()
    );
    let mut current_level = 0;
    for view in &view.steps {
        if view.level != current_level {
            println!("  {}", format!("level {}", view.level).bold());
            current_level = view.level;
        }
        if view.next.is_empty() {
            println!("    {}", view.step);
        } else {
            let next: Vec<String> = view.next.iter().map(ToString::to_string).collect();
            println!("    {} {} {}", view.step, "→".dimmed(), next.join(", "));
        }
    }
    Ok(())
}

fn select(occurrences: bool, events: bool) {
    let graph = select_workflow(occurrences, events);
    let name = WorkflowKind::for_content(occurrences, events).map_or("empty", WorkflowKind::name);
    println!("{} ({} steps)", name, graph.len());
}

fn print_steps(graph: &Graph<StepType>, steps: &[StepType]) {
    for step in graph.sort_by_level(steps) {
        println!("{}", step);
    }
}

fn closure(workflow: WorkflowKind, steps: &[StepType]) -> Result<()> {
    workflow.check_steps(steps)?;
    let graph = workflow.graph();
    let implied: Vec<StepType> = graph.all_implied_by(steps).into_iter().collect();
    print_steps(graph, &implied);
    Ok(())
}

fn roots(workflow: WorkflowKind, steps: &[StepType]) -> Result<()> {
    workflow.check_steps(steps)?;
    for step in workflow.graph().minimal_roots_for(steps) {
        println!("{}", step);
    }
    Ok(())
}

fn plan(workflow: WorkflowKind, steps: &[StepType], format: Format) -> Result<()> {
    workflow.check_steps(steps)?;
    let plan = workflow.graph().plan(steps);

    if emit_structured(&plan, format)? {
        return Ok(());
    }

    let roots: Vec<String> = plan.roots.iter().map(ToString::to_string).collect();
    println!("{} {}", "Trigger:".green().bold(), roots.join(", "));
    for (level, members) in plan.stages() {
        let members: Vec<String> = members.iter().map(ToString::to_string).collect();
        println!("  {} {}", format!("level {}:", level).bold(), members.join(", "));
    }
    Ok(())
}

fn tree(
    workflow: WorkflowKind,
    records_path: Option<PathBuf>,
    format: Format,
) -> Result<()> {
    let records: Vec<PipelineStep> = match records_path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    tracing::debug!(records = records.len(), "loaded step records");

    let trees = WorkflowStep::tree(workflow.graph(), &records);
    if emit_structured(&trees, format)? {
        return Ok(());
    }

    for root in &trees {
        print_tree(root, 0);
    }
    Ok(())
}

fn print_tree(node: &WorkflowStep, depth: usize) {
    let status = match node.last_step.as_ref().and_then(|s| s.state) {
        Some(state) => format!("{:?}", state).to_uppercase().yellow().to_string(),
        None => "-".dimmed().to_string(),
    };
    println!("{}{} [{}]", "  ".repeat(depth), node.step_type, status);
    for next in &node.next_steps {
        print_tree(next, depth + 1);
    }
}
