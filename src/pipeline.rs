//! Analysis Pipeline
//! Runs every report in a fixed order for the current menu selections:
//! stats → data types → missing values → duplicates → visualization.
//! Each run starts from a fresh copy of the loaded dataset.

use crate::charts::{Chart, ChartBuilder, ChartError, ChartKind, ColumnClasses};
use crate::data::{
    DuplicateCount, DuplicateHandler, MissingReport, MissingValueHandler,
};
use crate::stats::{ColumnType, StatsCalculator, StatsTable};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Missing values menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValueAction {
    #[default]
    Default,
    CountMissing,
    FillMissing,
    DropMissing,
}

impl MissingValueAction {
    pub const ALL: [MissingValueAction; 4] = [
        MissingValueAction::Default,
        MissingValueAction::CountMissing,
        MissingValueAction::FillMissing,
        MissingValueAction::DropMissing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MissingValueAction::Default => "Default",
            MissingValueAction::CountMissing => "Count Missing Values",
            MissingValueAction::FillMissing => "Fill Missing Values",
            MissingValueAction::DropMissing => "Drop Missing Values",
        }
    }
}

/// Duplicated data menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateAction {
    #[default]
    Default,
    DisplayDuplicates,
    CountDuplicates,
    DropDuplicates,
}

impl DuplicateAction {
    pub const ALL: [DuplicateAction; 4] = [
        DuplicateAction::Default,
        DuplicateAction::DisplayDuplicates,
        DuplicateAction::CountDuplicates,
        DuplicateAction::DropDuplicates,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DuplicateAction::Default => "Default",
            DuplicateAction::DisplayDuplicates => "Display Duplicated Values",
            DuplicateAction::CountDuplicates => "Count Duplicates in each column",
            DuplicateAction::DropDuplicates => "Drop Duplicates",
        }
    }
}

/// Every user choice a run depends on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub missing: MissingValueAction,
    pub duplicate: DuplicateAction,
    pub fill_value: String,
    /// Column to visualize; the first column when unset or unknown.
    pub column: Option<String>,
    pub chart: ChartKind,
}

/// Output of the missing values menu.
#[derive(Debug, Clone)]
pub struct MissingSection {
    pub action: MissingValueAction,
    /// Rows removed or cells filled.
    pub affected: usize,
    pub report: MissingReport,
    /// Column types after a drop.
    pub data_types: Option<Vec<ColumnType>>,
}

impl MissingSection {
    pub fn message(&self) -> Option<&'static str> {
        match self.action {
            MissingValueAction::FillMissing => Some("Missing values filled successfully"),
            MissingValueAction::DropMissing => Some("Missing values dropped successfully"),
            _ => None,
        }
    }
}

/// Output of the duplicated data menu.
#[derive(Debug, Clone)]
pub enum DuplicateSection {
    Flags(DataFrame),
    Counts(Vec<DuplicateCount>),
    Dropped {
        removed: usize,
        counts: Vec<DuplicateCount>,
    },
}

#[derive(Debug)]
pub struct VisualSection {
    pub classes: ColumnClasses,
    /// Column actually plotted.
    pub column: Option<String>,
    pub chart: Option<Result<Chart, ChartError>>,
}

#[derive(Debug)]
pub struct RunReport {
    pub rows: usize,
    pub columns: usize,
    pub stats: StatsTable,
    pub data_types: Vec<ColumnType>,
    pub missing: Option<MissingSection>,
    pub duplicates: Option<DuplicateSection>,
    pub visual: VisualSection,
    /// Dataset as left by the menu actions of this run.
    pub working: DataFrame,
}

/// Run the whole analysis for one set of selections.
pub fn run(dataset: &DataFrame, selection: &Selection) -> Result<RunReport, PipelineError> {
    log::debug!(
        "Running pipeline: missing={:?} duplicates={:?} column={:?} chart={:?}",
        selection.missing,
        selection.duplicate,
        selection.column,
        selection.chart
    );

    let mut working = dataset.clone();

    let stats = StatsCalculator::describe(&working)?;
    let data_types = StatsCalculator::data_types(&working);
    let missing = run_missing_values(&mut working, selection)?;
    let duplicates = run_duplicates(&mut working, selection.duplicate)?;
    let visual = run_visualization(&working, selection);

    Ok(RunReport {
        rows: dataset.height(),
        columns: dataset.width(),
        stats,
        data_types,
        missing,
        duplicates,
        visual,
        working,
    })
}

fn run_missing_values(
    df: &mut DataFrame,
    selection: &Selection,
) -> PolarsResult<Option<MissingSection>> {
    let action = selection.missing;
    let (affected, data_types) = match action {
        MissingValueAction::Default => return Ok(None),
        MissingValueAction::CountMissing => (0, None),
        MissingValueAction::FillMissing => (
            MissingValueHandler::fill_missing_values(df, &selection.fill_value)?,
            None,
        ),
        MissingValueAction::DropMissing => {
            let dropped = MissingValueHandler::drop_missing_values(df)?;
            (dropped, Some(StatsCalculator::data_types(df)))
        }
    };

    Ok(Some(MissingSection {
        action,
        affected,
        report: MissingValueHandler::report(df)?,
        data_types,
    }))
}

fn run_duplicates(
    df: &mut DataFrame,
    action: DuplicateAction,
) -> PolarsResult<Option<DuplicateSection>> {
    let section = match action {
        DuplicateAction::Default => return Ok(None),
        DuplicateAction::DisplayDuplicates => {
            DuplicateSection::Flags(DuplicateHandler::duplicate_flags(df)?)
        }
        DuplicateAction::CountDuplicates => {
            DuplicateSection::Counts(DuplicateHandler::count_duplicates(df)?)
        }
        DuplicateAction::DropDuplicates => {
            let removed = DuplicateHandler::drop_duplicates(df)?;
            DuplicateSection::Dropped {
                removed,
                counts: DuplicateHandler::count_duplicates(df)?,
            }
        }
    };
    Ok(Some(section))
}

fn run_visualization(df: &DataFrame, selection: &Selection) -> VisualSection {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let column = selection
        .column
        .as_ref()
        .filter(|c| columns.contains(c))
        .or_else(|| columns.first())
        .cloned();

    let chart = column.as_deref().map(|name| {
        let chart = ChartBuilder::build(df, name, selection.chart);
        if let Err(e) = &chart {
            log::warn!("Cannot draw {} of {name}: {e}", selection.chart.label());
        }
        chart
    });

    VisualSection {
        classes: ColumnClasses::from_dataframe(df),
        column,
        chart,
    }
}
