use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use doco_cli::replay::ReplayResult;
use doco_cli::report::snapshot_fields;

pub fn print_summary(result: &ReplayResult) {
    let mut steps = Table::new();
    steps.set_header(vec![
        header_cell("#"),
        header_cell("Intent"),
        header_cell("Result"),
        header_cell("Rev"),
    ]);
    apply_table_style(&mut steps);
    align_column(&mut steps, 0, CellAlignment::Right);
    align_column(&mut steps, 3, CellAlignment::Right);
    for step in &result.steps {
        let outcome = match &step.rejected {
            None => Cell::new("ok").fg(Color::Green),
            Some(reason) => Cell::new(format!("rejected: {reason}")).fg(Color::Red),
        };
        steps.add_row(vec![
            Cell::new(step.step),
            Cell::new(&step.intent),
            outcome,
            dim_cell(step.revision),
        ]);
    }
    println!("{steps}");

    let mut snapshot = Table::new();
    snapshot.set_header(vec![header_cell("Snapshot"), header_cell("Value")]);
    apply_table_style(&mut snapshot);
    for (label, value) in snapshot_fields(&result.snapshot) {
        snapshot.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    println!("{snapshot}");

    let rejected = result.rejected_count();
    if rejected > 0 {
        println!("{rejected} of {} intents rejected", result.steps.len());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
