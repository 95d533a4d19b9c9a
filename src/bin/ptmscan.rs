use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, IntoDiagnostic, Report, miette};
use modgraph::{
    ChemistryDatabase, Direction, ModificationCatalog, SearchSettings, SequenceGraph, Termini,
};
use polychem::Massive;
use rust_decimal::Decimal;
use rustyline::DefaultEditor;
use sifter::{IonScorer, Peaks};
use std::{env, fmt::Write, str::FromStr, sync::LazyLock};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

const PPM_TOLERANCE: f64 = 10.0;

static CHEMISTRY_DB: LazyLock<ChemistryDatabase> = LazyLock::new(ChemistryDatabase::default);

fn main() -> miette::Result<()> {
    setup_logging();

    let settings = SearchSettings::default();
    let catalog = ModificationCatalog::new(&CHEMISTRY_DB, &settings).map_err(|e| Report::new(*e))?;
    debug!(
        modifications = catalog.modifications().len(),
        max_variable_modifications = catalog.max_variable_modifications(),
        "loaded default modification catalog"
    );

    let mut rl = DefaultEditor::new().into_diagnostic()?;
    while let Ok(line) = rl.readline("Peptide: ") {
        rl.add_history_entry(&line).into_diagnostic()?;
        match peptide_info(&catalog, &line) {
            Ok(info) => print!("{info}"),
            Err(report) => render_error(&*report),
        }
    }

    Ok(())
}

fn setup_logging() {
    let level_filter = env::var("PTMSCAN_LOG")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::WARN);

    tracing_subscriber::fmt()
        .with_max_level(level_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// Each line holds a sequence, optionally followed by the m/z values of observed fragment ions
fn peptide_info(catalog: &ModificationCatalog<'_>, line: &str) -> miette::Result<String> {
    let mut words = line.split_whitespace();
    let Some(sequence) = words.next() else {
        return Ok(String::new());
    };
    let peaks: Peaks = words
        .map(|mz| {
            mz.parse::<f64>().map_err(|_| {
                miette!(
                    help = "fragment m/z values must be decimal numbers",
                    "couldn't parse {mz:?} as an m/z value"
                )
            })
        })
        .collect::<miette::Result<_>>()?;

    let scorer = IonScorer::new(catalog, &peaks, PPM_TOLERANCE);
    let mut graph =
        SequenceGraph::from_sequence(catalog, sequence, Termini::default(), Direction::Forward)
            .map_err(|e| Report::new(*e))?;
    let water = catalog.water();

    let mut buf = String::new();
    let sinks: Vec<_> = graph.final_combinations().collect();
    for sink in sinks {
        graph.set_sink(sink).map_err(|e| Report::new(*e))?;
        let neutral_mass = graph
            .sink_composition()
            .map(|composition| (composition + water).monoisotopic_mass());
        let scored = graph.score_and_modifications(&scorer);

        let placements: Vec<_> = scored.modifications.iter().map(ToString::to_string).collect();
        let neutral_mass = neutral_mass
            .map(|mass| decimal_round_workaround(mass, 6))
            .unwrap_or_default();
        writeln!(
            buf,
            "Neutral Mass: {neutral_mass}  Score: {}  Modifications: [{}]",
            scored.score,
            placements.join(", ")
        )
        .into_diagnostic()?;
    }
    writeln!(buf).into_diagnostic()?;

    Ok(buf)
}

fn render_error(diagnostic: &dyn Diagnostic) {
    let mut buf = String::new();
    if GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
        .render_report(&mut buf, diagnostic)
        .is_ok()
    {
        println!("{buf}");
    }
}

// FIXME: Really this should be fixed in `rust_decimal`...
fn decimal_round_workaround(value: impl Into<Decimal>, decimal_points: u32) -> String {
    let value = value.into().round_dp(decimal_points);
    format!("{value}")
}
