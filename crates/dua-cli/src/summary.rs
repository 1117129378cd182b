use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dua_store::{ColumnInfo, TableSummary};

pub fn print_tables(tables: &[TableSummary]) {
    println!("{}", tables_table(tables));
}

/// One row per table: name, row count and its columns.
pub fn tables_table(tables: &[TableSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    let mut total_rows = 0u64;
    for summary in tables {
        total_rows += summary.row_count;
        let columns = summary
            .columns
            .iter()
            .map(column_label)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&summary.name)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            count_cell(summary.row_count),
            Cell::new(columns),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(format!("{} tables", tables.len())).fg(Color::DarkGrey),
    ]);
    table
}

/// `name TYPE`, with `*` for the primary key and `!` for NOT NULL.
fn column_label(column: &ColumnInfo) -> String {
    let mut label = format!("{} {}", column.name, column.declared_type);
    if column.primary_key {
        label.push('*');
    } else if column.not_null {
        label.push('!');
    }
    label
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: u64) -> Cell {
    if count == 0 {
        Cell::new(count).fg(Color::DarkGrey)
    } else {
        Cell::new(count)
    }
}
