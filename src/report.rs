use crate::core::reference::heating::SUBSIDY_MEASURES;
use crate::output::Output;
use crate::scenario::{RunResults, Scenario};
use itertools::Itertools;
use std::io::Write;

/// Writes the three result artefacts: machine-readable JSON, a plain-text
/// transparency report echoing every figure behind the estimate, and a CSV
/// cost decomposition.

pub const RESULTS_KEY: &str = "results.json";
pub const REPORT_KEY: &str = "report.txt";
pub const COSTS_KEY: &str = "costs.csv";

pub fn write_results(
    output: &impl Output,
    scenario: &Scenario,
    results: &RunResults,
) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }
    write_json(output, results)?;
    write_text_report(output, scenario, results)?;
    write_cost_csv(output, results)?;
    Ok(())
}

pub fn write_json(output: &impl Output, results: &RunResults) -> anyhow::Result<()> {
    let writer = output.writer_for_location_key(RESULTS_KEY)?;
    serde_json::to_writer_pretty(writer, results)?;
    Ok(())
}

pub fn write_cost_csv(output: &impl Output, results: &RunResults) -> anyhow::Result<()> {
    let writer = output.writer_for_location_key(COSTS_KEY)?;
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["item", "energy [kWh]", "purchased", "cost [EUR]"])?;

    let costs = &results.costs;
    writer.write_record([
        costs.primary.label.to_string(),
        format!("{:.0}", costs.primary.purchased_kwh),
        format!("{:.1} {}", costs.primary.fuel_units, costs.primary.unit),
        format!("{:.2}", costs.primary.cost),
    ])?;
    if let Some(secondary) = &costs.secondary {
        writer.write_record([
            secondary.label.to_string(),
            format!("{:.0}", secondary.purchased_kwh),
            format!("{:.1} {}", secondary.fuel_units, secondary.unit),
            format!("{:.2}", secondary.cost),
        ])?;
    }
    writer.write_record([
        "Électricité (base)".to_string(),
        format!("{:.0}", costs.baseline_kwh),
        format!("{:.0} kWh", costs.baseline_kwh),
        format!("{:.2}", costs.baseline_cost),
    ])?;
    if costs.pool_kwh > 0. {
        writer.write_record([
            "Piscine".to_string(),
            format!("{:.0}", costs.pool_kwh),
            format!("{:.0} kWh", costs.pool_kwh),
            format!("{:.2}", costs.pool_cost),
        ])?;
    }
    if costs.ev_kwh > 0. {
        writer.write_record([
            "Véhicule électrique".to_string(),
            format!("{:.0}", costs.ev_kwh),
            format!("{:.0} kWh", costs.ev_kwh),
            format!("{:.2}", costs.ev_cost),
        ])?;
    }
    if let Some(pv) = &costs.pv {
        writer.write_record([
            "Autoconsommation PV".to_string(),
            format!("-{:.0}", pv.self_consumed_kwh),
            format!("{:.0} kWh produits", pv.generation_kwh),
            format!("-{:.2}", pv.credit),
        ])?;
    }
    writer.write_record([
        "Total".to_string(),
        format!("{:.0}", costs.total_relevant_kwh),
        String::new(),
        format!("{:.2}", costs.total_cost),
    ])?;
    writer.flush()?;
    Ok(())
}

pub fn write_text_report(
    output: &impl Output,
    scenario: &Scenario,
    results: &RunResults,
) -> anyhow::Result<()> {
    let mut writer = output.writer_for_location_key(REPORT_KEY)?;
    let resolved = &results.resolved;
    let building = &resolved.building;
    let demand = &results.heat_demand;
    let costs = &results.costs;
    let dpe = &results.dpe;

    writeln!(writer, "Energiekompas - estimation annuelle")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Zone : {} ({} degrés-jours)",
        resolved.zone_name, resolved.heating_degree_days
    )?;
    writeln!(writer, "Type : {}", resolved.archetype_label)?;
    writeln!(
        writer,
        "Surface : {:.0} m² × {} niveau(x) × {:.2} m = {:.0} m³",
        building.floor_area, building.floors, building.ceiling_height, building.volume
    )?;
    writeln!(
        writer,
        "Renouvellement d'air : {:.2} vol/h ({})",
        building.air_change_rate, building.wind_exposure
    )?;
    writeln!(writer)?;

    let envelope = &resolved.envelope;
    for (label, element) in [
        ("Fenêtres", envelope.window),
        ("Toiture", envelope.roof),
        ("Murs", envelope.wall),
        ("Plancher", envelope.floor),
    ] {
        writeln!(
            writer,
            "{label:<10} U = {:.2} W/m²·K sur {:.0} m²",
            element.u_value, element.area
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "Htr   : {:.1} W/K", demand.transmission_coefficient)?;
    writeln!(writer, "Hvent : {:.1} W/K", demand.ventilation_coefficient)?;
    writeln!(writer, "Htot  : {:.1} W/K", demand.total_coefficient)?;
    writeln!(
        writer,
        "Besoin de chauffage : {:.0} kWh/an (brut {:.0} kWh/an)",
        demand.demand_kwh, demand.raw_demand_kwh
    )?;
    writeln!(writer)?;

    writeln!(
        writer,
        "{} : {:.0} € ({:.1} {})",
        costs.primary.label, costs.primary.cost, costs.primary.fuel_units, costs.primary.unit
    )?;
    if let Some(secondary) = &costs.secondary {
        writeln!(
            writer,
            "{} : {:.0} € ({:.1} {})",
            secondary.label, secondary.cost, secondary.fuel_units, secondary.unit
        )?;
    }
    writeln!(writer, "Électricité (base) : {:.0} €", costs.baseline_cost)?;
    if costs.pool_kwh > 0. {
        writeln!(writer, "Piscine : {:.0} €", costs.pool_cost)?;
    }
    if costs.ev_kwh > 0. {
        writeln!(writer, "Véhicule électrique : {:.0} €", costs.ev_cost)?;
    }
    if let Some(pv) = &costs.pv {
        writeln!(
            writer,
            "Autoconsommation PV : -{:.0} € ({:.0} kWh sur {:.0} kWh produits)",
            pv.credit, pv.self_consumed_kwh, pv.generation_kwh
        )?;
    }
    writeln!(
        writer,
        "Total : {:.0} €/an (fourchette {:.0}-{:.0} €, ±{:.0} %)",
        costs.total_cost,
        costs.total_cost_low,
        costs.total_cost_high,
        costs.uncertainty_margin * 100.
    )?;
    writeln!(writer)?;

    writeln!(
        writer,
        "DPE indicatif : {} ({:.0} kWh/m²/an, fourchette {}-{})",
        dpe.class, dpe.intensity_kwh_per_m2, dpe.band.low, dpe.band.high
    )?;
    if let Some(ban) = dpe.rental_ban {
        writeln!(writer, "Attention : {ban}")?;
    }

    let subsidy_eligible = scenario.primary.subsidy_eligible
        || scenario
            .secondary
            .map(|(system, _)| system.subsidy_eligible)
            .unwrap_or(false);
    if subsidy_eligible {
        writeln!(writer)?;
        writeln!(writer, "Aides MaPrimeRénov' possibles (indicatif) :")?;
        writeln!(
            writer,
            "{}",
            SUBSIDY_MEASURES
                .iter()
                .map(|(label, amount)| format!("  - {label} : {amount}"))
                .join("\n")
        )?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "Outil d'orientation - ne remplace pas un audit DPE certifié."
    )?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use indexmap::IndexMap;
    use rstest::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct BufferOutput {
        buffers: Arc<Mutex<IndexMap<String, Vec<u8>>>>,
    }

    #[derive(Debug)]
    struct KeyedWriter {
        key: String,
        buffers: Arc<Mutex<IndexMap<String, Vec<u8>>>>,
    }

    impl Write for KeyedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffers
                .lock()
                .unwrap()
                .entry(self.key.clone())
                .or_default()
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Output for BufferOutput {
        fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
            Ok(KeyedWriter {
                key: location_key.to_string(),
                buffers: Arc::clone(&self.buffers),
            })
        }
    }

    impl BufferOutput {
        fn contents(&self, key: &str) -> String {
            String::from_utf8(self.buffers.lock().unwrap()[key].clone()).unwrap()
        }
    }

    #[fixture]
    fn scenario() -> Scenario {
        Scenario::from_input(
            &serde_json::from_value(json!({
                "building": {"floor_area": 120},
                "heating": {"primary": "gas_boiler", "secondary": "wood_stove"},
                "photovoltaics": {"capacity_kwp": 3}
            }))
            .unwrap(),
        )
    }

    #[rstest]
    fn json_results_are_valid_and_complete(scenario: Scenario) {
        let output = BufferOutput::default();
        let results = scenario.run();
        write_json(&output, &results).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&output.contents(RESULTS_KEY)).unwrap();
        assert!(parsed["heat_demand"]["transmission_coefficient"].is_number());
        assert!(parsed["costs"]["total_cost"].is_number());
        assert!(parsed["dpe"]["class"].is_string());
        assert!(parsed["resolved"]["zone"].is_string());
    }

    #[rstest]
    fn text_report_echoes_intermediate_figures(scenario: Scenario) {
        let output = BufferOutput::default();
        let results = scenario.run();
        write_text_report(&output, &scenario, &results).unwrap();
        let report = output.contents(REPORT_KEY);
        assert!(report.contains("Htr"));
        assert!(report.contains("Hvent"));
        assert!(report.contains("degrés-jours"));
        assert!(report.contains("DPE indicatif"));
        // wood stove appoint is subsidy-eligible
        assert!(report.contains("MaPrimeRénov'"));
    }

    #[rstest]
    fn cost_csv_has_one_row_per_cost_line(scenario: Scenario) {
        let output = BufferOutput::default();
        let results = scenario.run();
        write_cost_csv(&output, &results).unwrap();
        let csv = output.contents(COSTS_KEY);
        // header + primary + secondary + baseline + pv + total
        assert_eq!(csv.trim().lines().count(), 6);
        assert!(csv.lines().last().unwrap().starts_with("Total"));
    }

    #[rstest]
    fn noop_outputs_are_skipped_entirely(scenario: Scenario) {
        let results = scenario.run();
        write_results(&crate::output::SinkOutput, &scenario, &results).unwrap();
    }
}
