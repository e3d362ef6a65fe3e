use crate::core::{Record, SectorRow, Table};
use crate::domain::severity::coerce_number;
use crate::utils::error::{CoverageError, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub const JOIN_KEY: &str = "site_id";
pub const CLUSTER_COLUMN: &str = "sa cluster";
pub const NUMERIC_COLUMNS: [&str; 5] = ["longitude", "latitude", "azimuth", "beam", "prb"];
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "longitude",
    "latitude",
    "azimuth",
    "beam",
    "prb",
    "sa cluster",
    "site_id",
];

/// Cell values read as missing, the same set pandas treats as NA by default.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_na(cell: &str) -> bool {
    NA_TOKENS.contains(&cell.trim())
}

/// Parse CSV bytes into a table. Cells are kept as strings; empty cells and
/// NA markers such as `N/A` or `NULL` are null.
pub fn parse_csv(name: &str, bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut data = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = match row.get(i) {
                Some(cell) if !is_na(cell) => Value::String(cell.to_string()),
                _ => Value::Null,
            };
            data.insert(column.clone(), value);
        }
        records.push(Record { data });
    }

    tracing::debug!("Parsed {} rows and {} columns from {}", records.len(), columns.len(), name);

    Ok(Table {
        name: name.to_string(),
        columns,
        records,
    })
}

fn normalize_column_name(column: &str) -> String {
    let lower = column.to_lowercase();
    if lower == "site id" {
        JOIN_KEY.to_string()
    } else {
        lower
    }
}

/// Lower-case every column name and map `site id` onto the join key.
pub fn normalize_columns(table: Table) -> Table {
    let columns = table
        .columns
        .iter()
        .map(|c| normalize_column_name(c))
        .collect();
    let records = table
        .records
        .into_iter()
        .map(|record| Record {
            data: record
                .data
                .into_iter()
                .map(|(k, v)| (normalize_column_name(&k), v))
                .collect(),
        })
        .collect();

    Table {
        name: table.name,
        columns,
        records,
    }
}

pub fn require_columns(table: &Table, required: &[&str]) -> Result<()> {
    let missing = table.missing_columns(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoverageError::MissingColumns {
            table: table.name.clone(),
            columns: missing,
        })
    }
}

fn join_key(record: &Record) -> Option<String> {
    match record.get(JOIN_KEY)? {
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Right join on `site_id`: every revenue row survives, in order, once per
/// matching BTS row. Clashing non-key columns get `_x` (BTS) and `_y`
/// (revenue) suffixes.
pub fn merge_right(bts: &Table, revenue: &Table) -> Table {
    let revenue_columns: HashSet<&str> = revenue.columns.iter().map(String::as_str).collect();
    let bts_columns: HashSet<&str> = bts.columns.iter().map(String::as_str).collect();

    let left_name = |c: &str| {
        if c != JOIN_KEY && revenue_columns.contains(c) {
            format!("{}_x", c)
        } else {
            c.to_string()
        }
    };
    let right_name = |c: &str| {
        if c != JOIN_KEY && bts_columns.contains(c) {
            format!("{}_y", c)
        } else {
            c.to_string()
        }
    };

    let mut columns: Vec<String> = bts.columns.iter().map(|c| left_name(c.as_str())).collect();
    columns.extend(
        revenue
            .columns
            .iter()
            .filter(|c| c.as_str() != JOIN_KEY)
            .map(|c| right_name(c.as_str())),
    );

    let mut index: HashMap<String, Vec<&Record>> = HashMap::new();
    for record in &bts.records {
        if let Some(key) = join_key(record) {
            index.entry(key).or_default().push(record);
        }
    }

    let mut records = Vec::new();
    for right in &revenue.records {
        let matches = join_key(right)
            .and_then(|key| index.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let build = |left: Option<&Record>| {
            let mut data = HashMap::with_capacity(columns.len());
            for column in &bts.columns {
                if column == JOIN_KEY {
                    continue;
                }
                let value = left
                    .and_then(|l| l.data.get(column))
                    .cloned()
                    .unwrap_or(Value::Null);
                data.insert(left_name(column.as_str()), value);
            }
            for (column, value) in &right.data {
                data.insert(right_name(column.as_str()), value.clone());
            }
            Record { data }
        };

        if matches.is_empty() {
            records.push(build(None));
        } else {
            records.extend(matches.iter().map(|left| build(Some(*left))));
        }
    }

    Table {
        name: "combined".to_string(),
        columns,
        records,
    }
}

pub fn drop_empty_rows(table: Table) -> Table {
    Table {
        records: table
            .records
            .into_iter()
            .filter(|r| !r.is_all_null())
            .collect(),
        ..table
    }
}

/// Rows with every numeric column coercible, plus how many rows were dropped.
pub fn to_sector_rows(table: &Table) -> (Vec<SectorRow>, usize) {
    let mut rows = Vec::with_capacity(table.records.len());
    let mut dropped = 0;

    for record in &table.records {
        let numbers: Option<Vec<f64>> = NUMERIC_COLUMNS
            .iter()
            .map(|c| record.get(c).and_then(coerce_number).filter(|v| !v.is_nan()))
            .collect();

        let Some(numbers) = numbers else {
            dropped += 1;
            tracing::warn!(
                "Skipping site {}: non-numeric value in one of {}",
                record.display(JOIN_KEY),
                NUMERIC_COLUMNS.join(", ")
            );
            continue;
        };

        rows.push(SectorRow {
            site_id: record.display(JOIN_KEY),
            cluster: record.get(CLUSTER_COLUMN).map(|_| record.display(CLUSTER_COLUMN)),
            longitude: numbers[0],
            latitude: numbers[1],
            azimuth: numbers[2],
            beam: numbers[3],
            prb: numbers[4],
            attributes: record.clone(),
        });
    }

    (rows, dropped)
}

/// Distinct non-null clusters in first-appearance order.
pub fn unique_clusters(rows: &[SectorRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|r| r.cluster.as_ref())
        .filter(|c| seen.insert(*c))
        .cloned()
        .collect()
}

/// Parse, normalize and join both inputs into validated sector rows.
pub fn prepare_rows(bts: Table, revenue: Table) -> Result<(Vec<SectorRow>, usize, usize)> {
    let bts = normalize_columns(bts);
    let revenue = normalize_columns(revenue);
    require_columns(&bts, &[JOIN_KEY])?;
    require_columns(&revenue, &[JOIN_KEY])?;

    let combined = drop_empty_rows(merge_right(&bts, &revenue));
    require_columns(&combined, &REQUIRED_COLUMNS)?;

    let joined = combined.records.len();
    let (rows, dropped) = to_sector_rows(&combined);
    Ok((rows, joined, dropped))
}
